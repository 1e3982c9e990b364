pub mod feature;
pub mod geometry;
pub mod map;

pub use feature::{AuditInfo, Layer, PolygonFeature, Project, Style, User};
pub use geometry::{Coordinates, Geometry, LinearRing, MultiPolygon, Point, Polygon};
pub use map::{unsaved_features_from_polygon, MapFeature, MapPin, MapPolygon};
