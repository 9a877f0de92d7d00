//! CRS identifiers and search result records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bbox::CrsBbox;
use crate::error::PickerError;

/// A CRS identifier in `AUTHORITY:CODE` form, e.g. `EPSG:4326`.
///
/// Ordering is plain string ordering, which is what list views sort by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CrsId(String);

impl CrsId {
    /// Build an identifier from an authority name and a code.
    pub fn new(auth: &str, code: &str) -> Self {
        Self(format!("{}:{}", auth, code))
    }

    /// Parse an identifier, splitting on the first colon.
    ///
    /// Both the authority and the code must be non-empty.
    pub fn parse(s: &str) -> Result<Self, PickerError> {
        match s.split_once(':') {
            Some((auth, code)) if !auth.is_empty() && !code.is_empty() => Ok(Self(s.to_string())),
            _ => Err(PickerError::InvalidCrsId(s.to_string())),
        }
    }

    pub fn authority(&self) -> &str {
        self.0.split_once(':').map_or("", |(auth, _)| auth)
    }

    pub fn code(&self) -> &str {
        self.0.split_once(':').map_or("", |(_, code)| code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CrsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CrsId {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CrsId {
    type Error = PickerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<CrsId> for String {
    fn from(id: CrsId) -> Self {
        id.0
    }
}

/// One candidate CRS returned by the search endpoint.
///
/// The ten non-optional fields are required in every response; a record
/// missing any of them fails to deserialize. The optional fields are extra
/// bbox table columns some servers include.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsRecord {
    pub proj_table: String,
    pub crs_name: String,
    pub crs_auth_name: String,
    pub crs_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_auth_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent_auth_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent_code: Option<String>,

    pub south_lat: f64,
    pub north_lat: f64,
    pub west_lon: f64,
    pub east_lon: f64,

    /// Projected bounds in CRS units, when the server provides them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,

    pub unit: String,
    pub area_sqkm: f64,
}

impl CrsRecord {
    /// The identifier this record describes itself with.
    pub fn id(&self) -> CrsId {
        CrsId::new(&self.crs_auth_name, &self.crs_code)
    }

    /// Human CRS type derived from the projection table name.
    ///
    /// `projected_crs` becomes `Projected`, `geodetic_crs` becomes `Geodetic`.
    pub fn crs_type(&self) -> String {
        let base = self
            .proj_table
            .strip_suffix("_crs")
            .unwrap_or(&self.proj_table);
        let mut chars = base.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn bbox(&self) -> CrsBbox {
        CrsBbox::new(self.south_lat, self.north_lat, self.west_lon, self.east_lon)
    }

    /// Display-ready fields for a detail panel.
    pub fn details(&self, id: &CrsId) -> CrsDetails {
        CrsDetails {
            id: id.clone(),
            name: self.crs_name.clone(),
            crs_type: self.crs_type(),
            unit: self.unit.clone(),
            south: self.south_lat,
            north: self.north_lat,
            west: self.west_lon,
            east: self.east_lon,
            area_sqkm: self.area_sqkm,
        }
    }

    /// Plain-text dump of every present field as aligned `key: value` lines.
    pub fn info_text(&self) -> String {
        let text = |v: &str| Some(v.to_string());
        let opt_text = |v: &Option<String>| v.clone();
        let num = |v: f64| Some(v.to_string());
        let opt_num = |v: Option<f64>| v.map(|v| v.to_string());

        let fields = [
            ("proj_table", text(&self.proj_table)),
            ("crs_name", text(&self.crs_name)),
            ("crs_auth_name", text(&self.crs_auth_name)),
            ("crs_code", text(&self.crs_code)),
            ("usage_auth_name", opt_text(&self.usage_auth_name)),
            ("usage_code", opt_text(&self.usage_code)),
            ("extent_auth_name", opt_text(&self.extent_auth_name)),
            ("extent_code", opt_text(&self.extent_code)),
            ("south_lat", num(self.south_lat)),
            ("north_lat", num(self.north_lat)),
            ("west_lon", num(self.west_lon)),
            ("east_lon", num(self.east_lon)),
            ("bottom", opt_num(self.bottom)),
            ("top", opt_num(self.top)),
            ("left", opt_num(self.left)),
            ("right", opt_num(self.right)),
            ("unit", text(&self.unit)),
            ("area_sqkm", num(self.area_sqkm)),
        ];

        let present: Vec<(&str, String)> = fields
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();
        let width = present.iter().map(|(key, _)| key.len()).max().unwrap_or(0) + 1;

        let mut txt = String::new();
        for (key, value) in present {
            txt.push_str(&format!("{:width$} {}\n", format!("{}:", key), value));
        }
        txt
    }
}

/// Fields shown in the detail panel for the selected CRS.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrsDetails {
    pub id: CrsId,
    pub name: String,
    pub crs_type: String,
    pub unit: String,
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
    /// Unrounded area; see [`CrsDetails::rounded_area`] for display.
    pub area_sqkm: f64,
}

impl CrsDetails {
    /// Area rounded to the nearest whole square kilometer.
    pub fn rounded_area(&self) -> u64 {
        self.area_sqkm.max(0.0).round() as u64
    }

    /// Labelled rows in panel order, with units appended.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("CRS ID", self.id.to_string()),
            ("CRS Type", self.crs_type.clone()),
            ("Unit", self.unit.clone()),
            ("South", format!("{}\u{00b0}", self.south)),
            ("North", format!("{}\u{00b0}", self.north)),
            ("West", format!("{}\u{00b0}", self.west)),
            ("East", format!("{}\u{00b0}", self.east)),
            (
                "Area",
                format!("{} km\u{00b2}", group_thousands(self.rounded_area())),
            ),
        ]
    }
}

/// Format an integer with comma thousands separators.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
