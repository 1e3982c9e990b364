use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Source of identifiers for newly drawn features
pub trait IdGenerator: Send + Sync {
    fn generate_uuid(&self) -> String;
}

/// Random v4 UUIDs, usable without connectivity
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate_uuid(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Port for the signed-in user
pub trait AuthenticationManager: Send + Sync {
    fn current_user(&self) -> User;
}

/// Always reports the same user, e.g. one read from configuration
#[derive(Debug, Clone)]
pub struct StaticAuthenticationManager {
    user: User,
}

impl StaticAuthenticationManager {
    pub fn new(user: User) -> Self {
        Self { user }
    }
}

impl AuthenticationManager for StaticAuthenticationManager {
    fn current_user(&self) -> User {
        self.user.clone()
    }
}

/// Outcome of a location lock request: the new lock state, or why it failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOrError {
    Value(bool),
    Error(String),
}

impl BooleanOrError {
    pub fn false_value() -> Self {
        BooleanOrError::Value(false)
    }

    pub fn is_true(&self) -> bool {
        matches!(self, BooleanOrError::Value(true))
    }
}

/// Port for device location services.
///
/// Implementations may prompt for permissions or wait on sensors.
#[async_trait]
pub trait LocationManager: Send + Sync {
    async fn enable_location_updates(&self) -> BooleanOrError;

    async fn disable_location_updates(&self) -> BooleanOrError;
}
