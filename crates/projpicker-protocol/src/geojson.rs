//! GeoJSON types for user-drawn geometry.
//!
//! Coordinates follow GeoJSON order, `[longitude, latitude]`, exactly as the
//! drawing layer exports them. Features round-trip unchanged so the structured
//! payload can pass them through as-is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GeoJSON FeatureCollection of drawn features.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    pub features: Vec<Feature>,

    /// Foreign members such as `bbox`, kept so the collection is sent as drawn.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Add a feature to the collection.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Add multiple features to the collection.
    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A single drawn feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Feature identifier, string or number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Properties attached by the drawing layer; passed through untouched.
    /// `null` and a missing member both read as `None`.
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,

    /// The geometry of this feature.
    pub geometry: Geometry,

    /// Foreign members such as `bbox`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            properties: Some(Map::new()),
            geometry,
            extra: Map::new(),
        }
    }

    /// Create a point feature.
    pub fn point(lon: f64, lat: f64) -> Self {
        Self::new(Geometry::point(lon, lat))
    }

    /// Create a polygon feature from an outer ring of `[lon, lat]` vertices.
    ///
    /// The ring is closed if its last vertex differs from its first.
    pub fn polygon(ring: Vec<[f64; 2]>) -> Self {
        Self::new(Geometry::polygon(ring))
    }

    /// Set a property.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }
}

/// Geometry types the drawing tools produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A point geometry.
    Point {
        /// Coordinates as [longitude, latitude].
        coordinates: [f64; 2],
    },

    /// A polygon geometry.
    Polygon {
        /// Linear rings (first is exterior, rest are holes) of
        /// [longitude, latitude] pairs.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
}

impl Geometry {
    /// Create a point geometry.
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point {
            coordinates: [lon, lat],
        }
    }

    /// Create a polygon geometry with a single, closed outer ring.
    pub fn polygon(mut ring: Vec<[f64; 2]>) -> Self {
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if first != last {
                ring.push(first);
            }
        }
        Geometry::Polygon {
            coordinates: vec![ring],
        }
    }

    /// Every `[lon, lat]` position in the geometry, holes included.
    pub fn positions(&self) -> Vec<[f64; 2]> {
        match self {
            Geometry::Point { coordinates } => vec![*coordinates],
            Geometry::Polygon { coordinates } => coordinates.iter().flatten().copied().collect(),
        }
    }
}
