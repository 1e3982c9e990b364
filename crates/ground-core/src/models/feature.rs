use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Marker style applied to a layer's features
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Style {
    /// Hex color, e.g. `#ff9131`
    pub color: String,
}

impl Style {
    pub fn new(color: impl Into<String>) -> Self {
        Self { color: color.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub default_style: Style,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
}

/// Authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

/// Who changed a feature, and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub user: User,
    pub client_timestamp: DateTime<Utc>,
}

impl AuditInfo {
    /// Stamp with the given user and the current time
    pub fn now(user: User) -> Self {
        Self { user, client_timestamp: Utc::now() }
    }
}

/// A polygon drawn and confirmed by the user, not yet persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonFeature {
    pub id: String,
    pub vertices: Vec<Point>,
    pub project: Project,
    pub layer: Layer,
    pub created: AuditInfo,
    pub last_modified: AuditInfo,
}
