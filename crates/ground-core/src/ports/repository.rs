use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{AuditInfo, Geometry, PolygonFeature, Project, User};

/// A feature as read back from persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFeature {
    pub id: String,
    pub project_id: String,
    pub layer_id: String,
    pub geometry: Geometry,
    pub created: AuditInfo,
    pub last_modified: AuditInfo,
}

/// Port for persisting drawn features
pub trait FeatureRepository: Send + Sync {
    /// Persist a completed polygon
    fn save_polygon_feature(&self, feature: &PolygonFeature) -> Result<()>;

    /// Retrieve a feature by ID
    fn get_feature(&self, id: &str) -> Result<Option<StoredFeature>>;

    /// All readable features of a project, oldest first
    fn list_features(&self, project_id: &str) -> Result<Vec<StoredFeature>>;
}

/// Port for the projects a user can collect data in
pub trait ProjectRepository: Send + Sync {
    /// Projects readable by the user, in a stable order
    fn project_summaries(&self, user: &User) -> Result<Vec<Project>>;

    /// Load a project and make it the active one
    fn activate_project(&self, id: &str) -> Result<Project>;

    fn active_project(&self) -> Option<Project>;
}
