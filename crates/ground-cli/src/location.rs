use async_trait::async_trait;
use ground_core::ports::{BooleanOrError, LocationManager};

/// Grants every lock request; scripted sessions have no device to ask.
pub struct SimulatedLocationManager;

#[async_trait]
impl LocationManager for SimulatedLocationManager {
    async fn enable_location_updates(&self) -> BooleanOrError {
        BooleanOrError::Value(true)
    }

    async fn disable_location_updates(&self) -> BooleanOrError {
        BooleanOrError::Value(false)
    }
}
