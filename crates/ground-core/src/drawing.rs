pub mod controller;
pub mod location;
pub mod sink;
pub mod state;
pub mod subject;

pub use controller::PolygonDrawingController;
pub use location::{IconTint, LocationLock};
pub use sink::persist_completed;
pub use state::DrawingState;
pub use subject::{Subject, Subscription};
