//! Initial map view settings.
//!
//! The starting center and zoom can be overridden through environment
//! variables. Values are clamped to what a Web Mercator tile map can show.

use serde::{Deserialize, Serialize};

use crate::error::{PickerError, PickerResult};

pub const LATITUDE_ENV: &str = "PROJPICKER_LATITUDE";
pub const LONGITUDE_ENV: &str = "PROJPICKER_LONGITUDE";
pub const ZOOM_ENV: &str = "PROJPICKER_ZOOM";
pub const DZOOM_ENV: &str = "PROJPICKER_DZOOM";

/// Latitude limit of Web Mercator tiles.
pub const MAX_MERCATOR_LAT: f64 = 85.0511;
pub const MAX_ZOOM: u8 = 18;

/// Where the map starts and how far one zoom step moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialView {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
    /// Zoom delta applied per zoom in/out action.
    pub dzoom: f64,
}

impl Default for InitialView {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            zoom: 0,
            dzoom: 1.0,
        }
    }
}

impl InitialView {
    /// Build a view, clamping every value into its valid range.
    pub fn new(lat: f64, lon: f64, zoom: i64, dzoom: f64) -> Self {
        Self {
            lat: lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT),
            lon: lon.clamp(-180.0, 180.0),
            zoom: zoom.clamp(0, MAX_ZOOM as i64) as u8,
            dzoom: dzoom.clamp(-(MAX_ZOOM as f64), MAX_ZOOM as f64),
        }
    }

    /// Read the view variables through `lookup`; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> PickerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().overlay(lookup)
    }

    /// Override fields of this view with any variables `lookup` finds.
    pub fn overlay<F>(self, lookup: F) -> PickerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lat = parse_var(&lookup, LATITUDE_ENV)?.unwrap_or(self.lat);
        let lon = parse_var(&lookup, LONGITUDE_ENV)?.unwrap_or(self.lon);
        let zoom = parse_var(&lookup, ZOOM_ENV)?.unwrap_or(self.zoom as i64);
        let dzoom = parse_var(&lookup, DZOOM_ENV)?.unwrap_or(self.dzoom);
        Ok(Self::new(lat, lon, zoom, dzoom))
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> PickerResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PickerError::Config(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(None),
    }
}
