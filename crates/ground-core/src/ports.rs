//! Port trait definitions
//!
//! These traits define the collaborators the drawing flow and the project
//! selector depend on.

pub mod repository;
pub mod system;

pub use repository::{FeatureRepository, ProjectRepository, StoredFeature};
pub use system::{
    AuthenticationManager, BooleanOrError, IdGenerator, LocationManager,
    StaticAuthenticationManager, UuidGenerator,
};
