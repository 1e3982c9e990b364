//! Ground Core - Geometry model, codecs and polygon drawing
//!
//! This crate contains the domain logic shared by the Ground clients: the
//! geometry value types, their protobuf and document-store encodings, the
//! project selector and the interactive polygon drawing controller.

pub mod codec;
pub mod config;
pub mod drawing;
pub mod error;
pub mod memory;
pub mod models;
pub mod ports;
pub mod selector;

pub use error::{DecodeError, DrawingError, GroundError, Result};
