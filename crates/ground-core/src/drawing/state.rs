use serde::{Deserialize, Serialize};

use crate::models::PolygonFeature;

/// State of a polygon drawing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "feature")]
pub enum DrawingState {
    InProgress,
    /// The finished polygon, ready to be persisted
    Completed(PolygonFeature),
    Canceled,
}

impl DrawingState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, DrawingState::InProgress)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, DrawingState::Completed(_))
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, DrawingState::Canceled)
    }

    pub fn unsaved_polygon_feature(&self) -> Option<&PolygonFeature> {
        match self {
            DrawingState::Completed(feature) => Some(feature),
            _ => None,
        }
    }
}
