//! Drawable map features produced while a polygon is being drawn.

use serde::{Deserialize, Serialize};

use super::feature::Style;
use super::geometry::Point;

/// A polygon being rendered on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPolygon {
    pub id: String,
    pub vertices: Vec<Point>,
    pub style: Style,
}

impl MapPolygon {
    pub fn first_vertex(&self) -> Option<Point> {
        self.vertices.first().copied()
    }

    /// More than two vertices and the last one sits on the first.
    pub fn is_polygon_complete(&self) -> bool {
        self.vertices.len() > 2 && self.vertices.first() == self.vertices.last()
    }
}

/// A marker pinned to a single vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPin {
    pub id: String,
    pub position: Point,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum MapFeature {
    Polygon(MapPolygon),
    Pin(MapPin),
}

/// Features to render for an unsaved polygon: the polygon itself followed by
/// one pin per distinct vertex, in vertex order.
pub fn unsaved_features_from_polygon(polygon: &MapPolygon) -> Vec<MapFeature> {
    if polygon.vertices.is_empty() {
        return Vec::new();
    }

    let mut features = Vec::with_capacity(polygon.vertices.len() + 1);
    features.push(MapFeature::Polygon(polygon.clone()));
    for vertex in &polygon.vertices {
        let pin = MapFeature::Pin(MapPin {
            id: polygon.id.clone(),
            position: *vertex,
            style: polygon.style.clone(),
        });
        // Closing vertex repeats the first one; set semantics keep a single pin.
        if !features.contains(&pin) {
            features.push(pin);
        }
    }
    features
}
