//! Tests for query serialization in both payload styles.

use projpicker_protocol::{
    media_types, serialize, FeatureCollection, LogicalOperator, Query, SerializationMode,
};
use serde_json::json;
use test_utils::{atlanta_features, feature_collection, point_feature, polygon_feature};

fn drawn(features: Vec<serde_json::Value>) -> FeatureCollection {
    serde_json::from_value(feature_collection(features)).unwrap()
}

// ============================================================================
// Empty geometry
// ============================================================================

#[test]
fn test_empty_line_protocol_body() {
    let query = serialize(
        &FeatureCollection::new(),
        LogicalOperator::Or,
        SerializationMode::LineProtocol,
    );
    assert_eq!(query.to_body_string().unwrap(), "or\n");
    assert_eq!(query.content_type(), media_types::TEXT);
}

#[test]
fn test_empty_structured_body() {
    let query = serialize(
        &FeatureCollection::new(),
        LogicalOperator::Or,
        SerializationMode::Structured,
    );
    let body: serde_json::Value = serde_json::from_slice(&query.to_body().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({ "type": "FeatureCollection", "features": [], "logicalOperator": "or" })
    );
    assert_eq!(query.content_type(), media_types::JSON);
}

// ============================================================================
// Structured mode
// ============================================================================

#[test]
fn test_structured_passes_features_through() {
    let features = vec![
        point_feature(-84.388, 33.749).as_object().cloned().map(|mut f| {
            f.insert("properties".into(), json!({ "label": "office" }));
            serde_json::Value::Object(f)
        }).unwrap(),
        polygon_feature(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]),
    ];
    let expected_features = features.clone();

    let query = serialize(&drawn(features), LogicalOperator::Xor, SerializationMode::Structured);
    let body: serde_json::Value = serde_json::from_str(&query.to_body_string().unwrap()).unwrap();

    assert_eq!(body["logicalOperator"], "xor");
    assert_eq!(body["type"], "FeatureCollection");
    assert_eq!(body["features"], json!(expected_features));
}

#[test]
fn test_structured_keeps_foreign_members() {
    let exported = json!({
        "type": "FeatureCollection",
        "bbox": [-84.6, 33.6, -84.2, 33.9],
        "features": [
            {
                "type": "Feature",
                "id": 7,
                "properties": null,
                "geometry": { "type": "Point", "coordinates": [-84.388, 33.749] }
            },
            {
                "type": "Feature",
                "id": "drawn-2",
                "properties": { "shape": "rectangle" },
                "bbox": [-84.6, 33.6, -84.2, 33.9],
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-84.6, 33.6], [-84.6, 33.9], [-84.2, 33.9], [-84.2, 33.6], [-84.6, 33.6]]]
                }
            }
        ]
    });
    let collection: FeatureCollection = serde_json::from_value(exported.clone()).unwrap();

    let query = serialize(&collection, LogicalOperator::Or, SerializationMode::Structured);
    let mut body: serde_json::Value = serde_json::from_slice(&query.to_body().unwrap()).unwrap();
    assert_eq!(body["logicalOperator"], "or");

    body.as_object_mut().unwrap().remove("logicalOperator");
    assert_eq!(body, exported);
}

#[test]
fn test_structured_keeps_lon_lat_order() {
    let query = serialize(
        &drawn(vec![point_feature(-84.0, 34.0)]),
        LogicalOperator::And,
        SerializationMode::Structured,
    );
    let body: serde_json::Value = serde_json::from_slice(&query.to_body().unwrap()).unwrap();
    assert_eq!(body["features"][0]["geometry"]["coordinates"], json!([-84.0, 34.0]));
}

// ============================================================================
// Line protocol
// ============================================================================

#[test]
fn test_line_protocol_swaps_to_lat_lon() {
    let query = serialize(
        &drawn(atlanta_features()),
        LogicalOperator::And,
        SerializationMode::LineProtocol,
    );
    let Query::LineProtocol(text) = query else {
        panic!("expected line protocol");
    };
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "and");
    assert_eq!(lines[1], "point 33.749,-84.388");
    assert_eq!(
        lines[2],
        "poly 33.6,-84.6 33.9,-84.6 33.9,-84.2 33.6,-84.2 33.6,-84.6"
    );
    assert_eq!(lines.len(), 3);
    assert!(text.ends_with('\n'));
}

#[test]
fn test_line_protocol_ignores_polygon_holes() {
    let feature = json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [
                [[0, 0], [10, 0], [10, 10], [0, 0]],
                [[2, 2], [3, 2], [3, 3], [2, 2]]
            ]
        }
    });
    let query = serialize(&drawn(vec![feature]), LogicalOperator::Or, SerializationMode::LineProtocol);
    assert_eq!(query.to_body_string().unwrap(), "or\npoly 0,0 0,10 10,10 0,0\n");
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_serialization_is_deterministic() {
    let collection = drawn(atlanta_features());
    for mode in [SerializationMode::Structured, SerializationMode::LineProtocol] {
        for op in LogicalOperator::ALL {
            let first = serialize(&collection, op, mode);
            let second = serialize(&collection, op, mode);
            assert_eq!(first, second);
            assert_eq!(first.to_body().unwrap(), second.to_body().unwrap());
            assert_eq!(first.mode(), mode);
        }
    }
}
