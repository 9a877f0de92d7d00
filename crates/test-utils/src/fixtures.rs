//! Common CRS fixtures for projpicker-web tests.
//!
//! Records mirror rows of the ProjPicker bbox table for a handful of real
//! CRSs, including one whose area of use crosses the antimeridian.

use projpicker_common::CrsRecord;
use serde_json::{json, Map, Value};

/// Common `(south, north, west, east)` boxes for testing.
pub mod bbox {
    /// Whole world
    pub const GLOBAL: (f64, f64, f64, f64) = (-90.0, 90.0, -180.0, 180.0);

    /// Continental United States
    pub const CONUS: (f64, f64, f64, f64) = (24.41, 49.38, -124.79, -66.91);

    /// Georgia, USA (east zone)
    pub const GEORGIA_EAST: (f64, f64, f64, f64) = (30.36, 34.68, -83.47, -80.77);

    /// Fiji, crosses the antimeridian
    pub const FIJI: (f64, f64, f64, f64) = (-20.81, -12.42, 176.81, -178.15);

    /// Simple crossing box used in examples
    pub const PACIFIC: (f64, f64, f64, f64) = (10.0, 20.0, 170.0, -170.0);
}

/// Build a record with the required fields set.
pub fn crs_record(
    auth: &str,
    code: &str,
    name: &str,
    proj_table: &str,
    (south, north, west, east): (f64, f64, f64, f64),
    unit: &str,
    area_sqkm: f64,
) -> CrsRecord {
    CrsRecord {
        proj_table: proj_table.to_string(),
        crs_name: name.to_string(),
        crs_auth_name: auth.to_string(),
        crs_code: code.to_string(),
        usage_auth_name: None,
        usage_code: None,
        extent_auth_name: None,
        extent_code: None,
        south_lat: south,
        north_lat: north,
        west_lon: west,
        east_lon: east,
        bottom: None,
        top: None,
        left: None,
        right: None,
        unit: unit.to_string(),
        area_sqkm,
    }
}

pub fn wgs84() -> CrsRecord {
    crs_record(
        "EPSG",
        "4326",
        "WGS 84",
        "geodetic_crs",
        bbox::GLOBAL,
        "degree",
        510065621.710287,
    )
}

pub fn nad83_georgia_east() -> CrsRecord {
    crs_record(
        "EPSG",
        "2239",
        "NAD83 / Georgia East (ftUS)",
        "projected_crs",
        bbox::GEORGIA_EAST,
        "US survey foot",
        120823.56,
    )
}

pub fn nad83_conus_albers() -> CrsRecord {
    crs_record(
        "EPSG",
        "5070",
        "NAD83 / Conus Albers",
        "projected_crs",
        bbox::CONUS,
        "metre",
        8081724.2,
    )
}

pub fn fiji_1986() -> CrsRecord {
    crs_record(
        "EPSG",
        "3460",
        "Fiji 1986 / Fiji Map Grid",
        "projected_crs",
        bbox::FIJI,
        "metre",
        530178.4,
    )
}

/// All fixture records, in the order the map-shaped response lists them.
pub fn sample_records() -> Vec<CrsRecord> {
    vec![
        nad83_georgia_east(),
        nad83_conus_albers(),
        wgs84(),
        fiji_1986(),
    ]
}

/// Identifier of a record as `AUTH:CODE`.
pub fn record_id(record: &CrsRecord) -> String {
    format!("{}:{}", record.crs_auth_name, record.crs_code)
}

/// Canonical response body: an object keyed by identifier.
pub fn map_response(records: &[CrsRecord]) -> Value {
    let mut map = Map::new();
    for record in records {
        map.insert(record_id(record), record_value(record));
    }
    Value::Object(map)
}

/// Legacy response body: a bare array of records.
pub fn array_response(records: &[CrsRecord]) -> Value {
    Value::Array(records.iter().map(record_value).collect())
}

/// Map-shaped response text with keys written in slice order.
///
/// `serde_json::Map` sorts its keys, so bodies whose key order matters are
/// assembled as text.
pub fn ordered_map_response_text(records: &[CrsRecord]) -> String {
    let entries: Vec<String> = records
        .iter()
        .map(|record| {
            format!(
                "{}:{}",
                Value::String(record_id(record)),
                record_value(record)
            )
        })
        .collect();
    format!("{{{}}}", entries.join(","))
}

pub fn record_value(record: &CrsRecord) -> Value {
    serde_json::to_value(record).unwrap_or_else(|_| json!({}))
}
