//! Drawn GeoJSON features as exported by a Leaflet-style drawing layer.

use serde_json::{json, Value};

/// A marker at `[lon, lat]`.
pub fn point_feature(lon: f64, lat: f64) -> Value {
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": { "type": "Point", "coordinates": [lon, lat] }
    })
}

/// A polygon from a closed outer ring of `[lon, lat]` vertices.
pub fn polygon_feature(ring: &[[f64; 2]]) -> Value {
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": { "type": "Polygon", "coordinates": [ring] }
    })
}

/// A drawn rectangle, exported as a closed five-vertex polygon.
pub fn rectangle_feature(west: f64, south: f64, east: f64, north: f64) -> Value {
    polygon_feature(&[
        [west, south],
        [west, north],
        [east, north],
        [east, south],
        [west, south],
    ])
}

pub fn feature_collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

/// A point in Atlanta and a rectangle around it.
pub fn atlanta_features() -> Vec<Value> {
    vec![
        point_feature(-84.388, 33.749),
        rectangle_feature(-84.6, 33.6, -84.2, 33.9),
    ]
}
