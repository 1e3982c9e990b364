use std::sync::Arc;
use tracing::{info, warn};

use crate::drawing::state::DrawingState;
use crate::drawing::subject::Subscription;
use crate::ports::FeatureRepository;

/// Persist every completed polygon from a drawing state stream.
///
/// Runs until the controller owning the stream is dropped and returns the
/// number of features saved. A feature that fails to save is logged and
/// skipped.
pub async fn persist_completed(
    mut states: Subscription<DrawingState>,
    repository: Arc<dyn FeatureRepository>,
) -> usize {
    let mut saved = 0;
    while let Some(state) = states.next().await {
        let DrawingState::Completed(feature) = state else {
            continue;
        };
        match repository.save_polygon_feature(&feature) {
            Ok(()) => {
                info!(feature_id = %feature.id, "Saved polygon feature");
                saved += 1;
            }
            Err(e) => warn!(feature_id = %feature.id, error = %e, "Failed to save polygon feature"),
        }
    }
    saved
}
