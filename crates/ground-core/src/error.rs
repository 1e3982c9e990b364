//! Error types for Ground

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroundError {
    // Codec errors
    #[error(transparent)]
    Decode(#[from] DecodeError),

    // Drawing errors
    #[error(transparent)]
    Drawing(#[from] DrawingError),

    // Project errors
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("No project at index {index}: {available} available")]
    ProjectIndexOutOfRange { index: usize, available: usize },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
}

/// Failures while turning a wire message or a store map back into a geometry.
///
/// Each variant is a distinct outcome so the persistence layer can log and skip
/// a bad record instead of crashing.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Geometry map is missing")]
    MissingMap,

    #[error("Geometry map has no 'type' field")]
    MissingType,

    #[error("Geometry 'type' must be a string, found {found}")]
    InvalidType { found: String },

    #[error("Unknown geometry type: {0}")]
    UnknownType(String),

    #[error("Geometry map has no 'coordinates' field")]
    MissingCoordinates,

    #[error("Null element at {path}")]
    NullElement { path: String },

    #[error("Unexpected value at {path}: expected {expected}")]
    UnexpectedValue { path: String, expected: &'static str },

    #[error("Non-numeric index key '{key}'")]
    NonNumericIndex { key: String },

    #[error("Index keys must be consecutive integers starting at 0, got {keys:?}")]
    InvalidIndexSequence { keys: Vec<String> },

    #[error("Linear ring must have at least one coordinate")]
    EmptyRing,

    #[error("Geometry message has no variant set")]
    GeometryNotSet,

    #[error("{message} is missing required field '{field}'")]
    MissingField {
        message: &'static str,
        field: &'static str,
    },

    #[error("Invalid protobuf payload: {0}")]
    Protobuf(#[from] prost::DecodeError),
}

/// Precondition violations in the drawing flow.
///
/// These are programming errors: the UI must never let the user reach them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawingError {
    #[error("No drawing session in progress")]
    NoActiveSession,

    #[error("Project or layer is not set")]
    MissingProjectOrLayer,

    #[error("Polygon is not complete")]
    PolygonNotComplete,
}

pub type Result<T> = std::result::Result<T, GroundError>;
