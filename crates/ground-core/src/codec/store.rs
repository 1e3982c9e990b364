//! Document-store codec for geometries.
//!
//! The document database has no list type that survives nesting, so ordered
//! collections are stored as maps keyed by `"0"`, `"1"`, `"2"`, ... A geometry
//! is persisted as `{"type": <discriminator>, "coordinates": <nested value>}`:
//!
//! - `Point`: a single geo-point
//! - `Polygon`: index -> ring, shell at `"0"`, holes after it
//! - `MultiPolygon`: index -> polygon
//!
//! where a ring is index -> geo-point.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DecodeError;
use crate::models::geometry::{
    Coordinates, Geometry, LinearRing, MultiPolygon, Point, Polygon, MULTI_POLYGON_TYPE,
    POINT_TYPE, POLYGON_TYPE,
};

pub const TYPE_KEY: &str = "type";
pub const COORDINATES_KEY: &str = "coordinates";

/// Native geo-point value of the document database
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A value as held by the document database.
///
/// Serialized untagged so that stored documents read naturally as JSON; an
/// object with exactly `latitude` and `longitude` is a geo-point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    GeoPoint(GeoPoint),
    Map(BTreeMap<String, StoreValue>),
}

impl StoreValue {
    /// Short name of the value kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            StoreValue::Null => "null",
            StoreValue::Bool(_) => "bool",
            StoreValue::Number(_) => "number",
            StoreValue::String(_) => "string",
            StoreValue::GeoPoint(_) => "geo-point",
            StoreValue::Map(_) => "map",
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, StoreValue>> {
        match self {
            StoreValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Encode a geometry as a store map
pub fn to_store_map(geometry: &Geometry) -> StoreValue {
    let coordinates = match geometry {
        Geometry::Point(point) => geo_point(&point.coordinates),
        Geometry::Polygon(polygon) => polygon_to_map(polygon),
        Geometry::MultiPolygon(multi) => indexed(multi.polygons.iter().map(polygon_to_map)),
    };

    let mut map = BTreeMap::new();
    map.insert(TYPE_KEY.to_string(), StoreValue::String(geometry.geometry_type().to_string()));
    map.insert(COORDINATES_KEY.to_string(), coordinates);
    StoreValue::Map(map)
}

/// Decode a store map back into a geometry
pub fn from_store_map(value: Option<&StoreValue>) -> Result<Geometry, DecodeError> {
    let map = match value {
        None | Some(StoreValue::Null) => return Err(DecodeError::MissingMap),
        Some(StoreValue::Map(map)) => map,
        Some(_) => {
            return Err(DecodeError::UnexpectedValue { path: String::new(), expected: "map" })
        }
    };

    let geometry_type = match map.get(TYPE_KEY) {
        None | Some(StoreValue::Null) => return Err(DecodeError::MissingType),
        Some(StoreValue::String(s)) => s.as_str(),
        Some(other) => {
            return Err(DecodeError::InvalidType { found: other.kind().to_string() })
        }
    };

    let coordinates = map.get(COORDINATES_KEY).ok_or(DecodeError::MissingCoordinates)?;
    let path = COORDINATES_KEY.to_string();

    match geometry_type {
        POINT_TYPE => Ok(Geometry::Point(Point::from(coordinates_from(coordinates, &path)?))),
        POLYGON_TYPE => Ok(Geometry::Polygon(polygon_from(coordinates, &path)?)),
        MULTI_POLYGON_TYPE => {
            let polygons = elements(coordinates, &path)?
                .into_iter()
                .map(|(child, value)| polygon_from(value, &child))
                .collect::<Result<_, _>>()?;
            Ok(Geometry::MultiPolygon(MultiPolygon { polygons }))
        }
        other => Err(DecodeError::UnknownType(other.to_string())),
    }
}

fn geo_point(coordinates: &Coordinates) -> StoreValue {
    StoreValue::GeoPoint(GeoPoint::new(coordinates.latitude, coordinates.longitude))
}

fn indexed(values: impl Iterator<Item = StoreValue>) -> StoreValue {
    StoreValue::Map(values.enumerate().map(|(i, v)| (i.to_string(), v)).collect())
}

fn ring_to_map(ring: &LinearRing) -> StoreValue {
    indexed(ring.coordinates().iter().map(geo_point))
}

fn polygon_to_map(polygon: &Polygon) -> StoreValue {
    indexed(std::iter::once(&polygon.shell).chain(&polygon.holes).map(ring_to_map))
}

fn non_null<'a>(value: &'a StoreValue, path: &str) -> Result<&'a StoreValue, DecodeError> {
    match value {
        StoreValue::Null => Err(DecodeError::NullElement { path: path.to_string() }),
        value => Ok(value),
    }
}

fn coordinates_from(value: &StoreValue, path: &str) -> Result<Coordinates, DecodeError> {
    match non_null(value, path)? {
        StoreValue::GeoPoint(point) => Ok(Coordinates::new(point.latitude, point.longitude)),
        _ => Err(DecodeError::UnexpectedValue { path: path.to_string(), expected: "geo-point" }),
    }
}

/// Unpack an index-keyed map into its elements in index order, paired with
/// the path of each element.
///
/// Keys must be the canonical decimal strings of `0..n`; anything else is
/// rejected rather than reordered.
fn elements<'a>(
    value: &'a StoreValue,
    path: &str,
) -> Result<Vec<(String, &'a StoreValue)>, DecodeError> {
    let map = non_null(value, path)?
        .as_map()
        .ok_or_else(|| DecodeError::UnexpectedValue { path: path.to_string(), expected: "map" })?;

    let mut entries = map
        .iter()
        .map(|(key, value)| {
            key.parse::<u32>()
                .map(|index| (index, key, value))
                .map_err(|_| DecodeError::NonNumericIndex { key: key.clone() })
        })
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|(index, _, _)| *index);

    let sequential = entries
        .iter()
        .enumerate()
        .all(|(position, (index, key, _))| *index as usize == position && **key == index.to_string());
    if !sequential {
        return Err(DecodeError::InvalidIndexSequence {
            keys: entries.iter().map(|(_, key, _)| (*key).clone()).collect(),
        });
    }

    entries
        .into_iter()
        .map(|(_, key, value)| {
            let child = format!("{}.{}", path, key);
            non_null(value, &child)?;
            Ok((child, value))
        })
        .collect()
}

fn ring_from(value: &StoreValue, path: &str) -> Result<LinearRing, DecodeError> {
    let coordinates = elements(value, path)?
        .into_iter()
        .map(|(child, value)| coordinates_from(value, &child))
        .collect::<Result<Vec<_>, _>>()?;
    LinearRing::new(coordinates)
}

fn polygon_from(value: &StoreValue, path: &str) -> Result<Polygon, DecodeError> {
    let mut rings = elements(value, path)?
        .into_iter()
        .map(|(child, value)| ring_from(value, &child))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let shell = rings.next().ok_or(DecodeError::EmptyRing)?;
    Ok(Polygon::new(shell, rings.collect()))
}
