//! Tests for decoding search responses.

use projpicker_protocol::{decode_results, ProtocolError, ResponseShape};
use serde_json::json;
use test_utils::{
    array_response, fiji_1986, map_response, nad83_georgia_east, ordered_map_response_text,
    record_id, record_value, sample_records, wgs84,
};

#[test]
fn test_map_response_keeps_document_order() {
    let records = sample_records();
    let body = ordered_map_response_text(&records);
    let results = decode_results(body.as_bytes()).unwrap();

    assert_eq!(results.shape, ResponseShape::Map);
    let ids: Vec<String> = results.ids().map(|id| id.to_string()).collect();
    let expected: Vec<String> = records.iter().map(record_id).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_array_response_sorted_by_identifier() {
    let body = array_response(&[wgs84(), nad83_georgia_east(), fiji_1986()]).to_string();
    let results = decode_results(body.as_bytes()).unwrap();

    assert_eq!(results.shape, ResponseShape::Array);
    let ids: Vec<&str> = results.ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["EPSG:2239", "EPSG:3460", "EPSG:4326"]);
}

#[test]
fn test_id_set_matches_response() {
    let records = sample_records();
    let body = map_response(&records).to_string();
    let results = decode_results(body.as_bytes()).unwrap();

    let mut ids: Vec<String> = results.ids().map(|id| id.to_string()).collect();
    let mut expected: Vec<String> = records.iter().map(record_id).collect();
    ids.sort();
    expected.sort();
    assert_eq!(ids, expected);
}

#[test]
fn test_empty_responses() {
    assert!(decode_results(b"{}").unwrap().is_empty());
    assert!(decode_results(b"[]").unwrap().is_empty());
}

#[test]
fn test_duplicate_array_entries_keep_last() {
    let mut renamed = wgs84();
    renamed.crs_name = "WGS 84 (renamed)".to_string();
    let body = array_response(&[wgs84(), renamed]).to_string();

    let results = decode_results(body.as_bytes()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results.records[0].1.crs_name, "WGS 84 (renamed)");
}

#[test]
fn test_optional_columns_are_decoded() {
    let mut value = record_value(&wgs84());
    value["usage_auth_name"] = json!("EPSG");
    value["usage_code"] = json!("1262");
    value["bottom"] = json!(-90.0);
    let body = json!({ "EPSG:4326": value }).to_string();

    let results = decode_results(body.as_bytes()).unwrap();
    let record = &results.records[0].1;
    assert_eq!(record.usage_code.as_deref(), Some("1262"));
    assert_eq!(record.bottom, Some(-90.0));
    assert_eq!(record.top, None);
}

// ============================================================================
// Malformed responses
// ============================================================================

#[test]
fn test_each_required_field_is_enforced() {
    let required = [
        "crs_name",
        "crs_auth_name",
        "crs_code",
        "proj_table",
        "unit",
        "south_lat",
        "north_lat",
        "west_lon",
        "east_lon",
        "area_sqkm",
    ];

    for field in required {
        let mut value = record_value(&wgs84());
        value.as_object_mut().unwrap().remove(field);
        let body = json!({ "EPSG:4326": value }).to_string();
        let err = decode_results(body.as_bytes()).unwrap_err();
        assert!(
            matches!(err, ProtocolError::InvalidBody(_)),
            "missing {} should be rejected, got {:?}",
            field,
            err
        );
        assert!(err.to_string().contains(field));
    }
}

#[test]
fn test_invalid_json_is_rejected() {
    assert!(matches!(
        decode_results(b"<html>502 Bad Gateway</html>"),
        Err(ProtocolError::InvalidBody(_))
    ));
}

#[test]
fn test_scalar_body_is_rejected() {
    assert!(decode_results(b"42").is_err());
    assert!(decode_results(br#""EPSG:4326""#).is_err());
}

#[test]
fn test_inverted_latitudes_are_rejected() {
    let mut record = wgs84();
    record.south_lat = 50.0;
    record.north_lat = 10.0;
    let body = map_response(&[record]).to_string();
    assert!(matches!(
        decode_results(body.as_bytes()),
        Err(ProtocolError::InvalidBbox { .. })
    ));
}

#[test]
fn test_antimeridian_record_is_accepted() {
    let body = map_response(&[fiji_1986()]).to_string();
    let results = decode_results(body.as_bytes()).unwrap();
    assert!(results.records[0].1.bbox().crosses_antimeridian());
}
