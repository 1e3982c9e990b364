//! Protobuf wire codec for geometries.

use prost::Message;

use crate::error::DecodeError;
use crate::models::geometry::{Coordinates, Geometry, LinearRing, MultiPolygon, Point, Polygon};

/// Protobuf messages exchanged with the sync backend.
pub mod proto {
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Coordinates {
        #[prost(double, tag = "1")]
        pub latitude: f64,
        #[prost(double, tag = "2")]
        pub longitude: f64,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Point {
        #[prost(message, optional, tag = "1")]
        pub coordinates: ::core::option::Option<Coordinates>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct LinearRing {
        #[prost(message, repeated, tag = "1")]
        pub coordinates: ::prost::alloc::vec::Vec<Coordinates>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Polygon {
        #[prost(message, optional, tag = "1")]
        pub shell: ::core::option::Option<LinearRing>,
        #[prost(message, repeated, tag = "2")]
        pub holes: ::prost::alloc::vec::Vec<LinearRing>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct MultiPolygon {
        #[prost(message, repeated, tag = "1")]
        pub polygons: ::prost::alloc::vec::Vec<Polygon>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Geometry {
        #[prost(oneof = "geometry::GeometryType", tags = "1, 2, 3")]
        pub geometry_type: ::core::option::Option<geometry::GeometryType>,
    }

    pub mod geometry {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum GeometryType {
            #[prost(message, tag = "1")]
            Point(super::Point),
            #[prost(message, tag = "2")]
            Polygon(super::Polygon),
            #[prost(message, tag = "3")]
            MultiPolygon(super::MultiPolygon),
        }
    }
}

use proto::geometry::GeometryType;

/// Convert a wire geometry into its in-memory value
pub fn wire_to_geometry(message: &proto::Geometry) -> Result<Geometry, DecodeError> {
    match &message.geometry_type {
        Some(GeometryType::Point(point)) => Ok(Geometry::Point(point_from_wire(point)?)),
        Some(GeometryType::Polygon(polygon)) => Ok(Geometry::Polygon(polygon_from_wire(polygon)?)),
        Some(GeometryType::MultiPolygon(multi)) => {
            let polygons = multi.polygons.iter().map(polygon_from_wire).collect::<Result<_, _>>()?;
            Ok(Geometry::MultiPolygon(MultiPolygon { polygons }))
        }
        None => Err(DecodeError::GeometryNotSet),
    }
}

/// Convert an in-memory geometry into its wire message
pub fn geometry_to_wire(geometry: &Geometry) -> proto::Geometry {
    let geometry_type = match geometry {
        Geometry::Point(point) => GeometryType::Point(point_to_wire(point)),
        Geometry::Polygon(polygon) => GeometryType::Polygon(polygon_to_wire(polygon)),
        Geometry::MultiPolygon(multi) => GeometryType::MultiPolygon(proto::MultiPolygon {
            polygons: multi.polygons.iter().map(polygon_to_wire).collect(),
        }),
    };
    proto::Geometry { geometry_type: Some(geometry_type) }
}

/// Serialize a geometry to protobuf bytes
pub fn encode_geometry(geometry: &Geometry) -> Vec<u8> {
    geometry_to_wire(geometry).encode_to_vec()
}

/// Parse protobuf bytes into a geometry
pub fn decode_geometry(bytes: &[u8]) -> Result<Geometry, DecodeError> {
    let message = proto::Geometry::decode(bytes)?;
    wire_to_geometry(&message)
}

fn coordinates_from_wire(coordinates: &proto::Coordinates) -> Coordinates {
    Coordinates::new(coordinates.latitude, coordinates.longitude)
}

fn coordinates_to_wire(coordinates: &Coordinates) -> proto::Coordinates {
    proto::Coordinates { latitude: coordinates.latitude, longitude: coordinates.longitude }
}

fn point_from_wire(point: &proto::Point) -> Result<Point, DecodeError> {
    let coordinates = point
        .coordinates
        .as_ref()
        .ok_or(DecodeError::MissingField { message: "Point", field: "coordinates" })?;
    Ok(Point::from(coordinates_from_wire(coordinates)))
}

fn point_to_wire(point: &Point) -> proto::Point {
    proto::Point { coordinates: Some(coordinates_to_wire(&point.coordinates)) }
}

fn ring_from_wire(ring: &proto::LinearRing) -> Result<LinearRing, DecodeError> {
    LinearRing::new(ring.coordinates.iter().map(coordinates_from_wire).collect())
}

fn ring_to_wire(ring: &LinearRing) -> proto::LinearRing {
    proto::LinearRing { coordinates: ring.coordinates().iter().map(coordinates_to_wire).collect() }
}

fn polygon_from_wire(polygon: &proto::Polygon) -> Result<Polygon, DecodeError> {
    let shell = polygon
        .shell
        .as_ref()
        .ok_or(DecodeError::MissingField { message: "Polygon", field: "shell" })?;
    let holes = polygon.holes.iter().map(ring_from_wire).collect::<Result<_, _>>()?;
    Ok(Polygon::new(ring_from_wire(shell)?, holes))
}

fn polygon_to_wire(polygon: &Polygon) -> proto::Polygon {
    proto::Polygon {
        shell: Some(ring_to_wire(&polygon.shell)),
        holes: polygon.holes.iter().map(ring_to_wire).collect(),
    }
}
