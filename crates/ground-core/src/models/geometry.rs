//! In-memory geometry value types.
//!
//! These are the canonical shapes exchanged between the drawing controller,
//! the protobuf wire codec and the document-store codec.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A WGS 84 latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A single location, also used as a polygon vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub coordinates: Coordinates,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { coordinates: Coordinates::new(latitude, longitude) }
    }
}

impl From<Coordinates> for Point {
    fn from(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

/// An ordered, conceptually closed sequence of coordinates.
///
/// Closure is not enforced; the coordinates are kept exactly as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinates>", into = "Vec<Coordinates>")]
pub struct LinearRing {
    coordinates: Vec<Coordinates>,
}

impl LinearRing {
    /// Create a ring, rejecting an empty coordinate list
    pub fn new(coordinates: Vec<Coordinates>) -> Result<Self, DecodeError> {
        if coordinates.is_empty() {
            return Err(DecodeError::EmptyRing);
        }
        Ok(Self { coordinates })
    }

    pub fn coordinates(&self) -> &[Coordinates] {
        &self.coordinates
    }

    pub fn first(&self) -> Coordinates {
        self.coordinates[0]
    }

    /// Whether the first and last coordinates coincide
    pub fn is_closed(&self) -> bool {
        self.coordinates.first() == self.coordinates.last()
    }
}

impl TryFrom<Vec<Coordinates>> for LinearRing {
    type Error = DecodeError;

    fn try_from(coordinates: Vec<Coordinates>) -> Result<Self, Self::Error> {
        Self::new(coordinates)
    }
}

impl From<LinearRing> for Vec<Coordinates> {
    fn from(ring: LinearRing) -> Self {
        ring.coordinates
    }
}

/// A polygon with one outer shell and zero or more holes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub shell: LinearRing,
    #[serde(default)]
    pub holes: Vec<LinearRing>,
}

impl Polygon {
    pub fn new(shell: LinearRing, holes: Vec<LinearRing>) -> Self {
        Self { shell, holes }
    }

    /// Build a hole-less polygon from drawn vertices
    pub fn from_vertices(vertices: &[Point]) -> Result<Self, DecodeError> {
        let shell = LinearRing::new(vertices.iter().map(|p| p.coordinates).collect())?;
        Ok(Self::new(shell, Vec::new()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPolygon {
    pub polygons: Vec<Polygon>,
}

/// Geometry stored against a location of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point(Point),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
}

impl Geometry {
    /// Discriminator string used by the document store
    pub fn geometry_type(&self) -> &'static str {
        match self {
            Geometry::Point(_) => POINT_TYPE,
            Geometry::Polygon(_) => POLYGON_TYPE,
            Geometry::MultiPolygon(_) => MULTI_POLYGON_TYPE,
        }
    }
}

pub const POINT_TYPE: &str = "Point";
pub const POLYGON_TYPE: &str = "Polygon";
pub const MULTI_POLYGON_TYPE: &str = "MultiPolygon";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ring_rejected() {
        assert!(matches!(LinearRing::new(vec![]), Err(DecodeError::EmptyRing)));
    }

    #[test]
    fn test_ring_closure_is_not_enforced() {
        let ring = LinearRing::new(vec![Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 1.0)])
            .unwrap();
        assert!(!ring.is_closed());
        assert_eq!(ring.coordinates().len(), 2);
    }

    #[test]
    fn test_geometry_serialization() {
        let point = Geometry::Point(Point::new(-42.121, 28.482));
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"]["latitude"], -42.121);

        let parsed: Geometry = serde_json::from_value(json).unwrap();
        assert_eq!(point, parsed);
    }

    #[test]
    fn test_empty_ring_fails_deserialization() {
        let json = r#"{"type":"Polygon","shell":[],"holes":[]}"#;
        assert!(serde_json::from_str::<Geometry>(json).is_err());
    }
}
