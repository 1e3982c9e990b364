//! Geometry codecs used at the persistence and sync boundaries.
//!
//! Both codecs are pure functions over immutable inputs.

pub mod store;
pub mod wire;

pub use store::{from_store_map, to_store_map, GeoPoint, StoreValue};
pub use wire::{decode_geometry, encode_geometry, geometry_to_wire, proto, wire_to_geometry};
