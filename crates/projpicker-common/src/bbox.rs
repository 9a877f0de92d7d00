//! Bounding box types and operations.
//!
//! CRS validity areas are stored as `south, north, west, east` in decimal
//! degrees. A box whose west longitude is greater than its east longitude
//! wraps across the ±180° meridian and has to be drawn as two rings.

use serde::{Deserialize, Serialize};

/// Longitude of the antimeridian in degrees.
pub const ANTIMERIDIAN: f64 = 180.0;

/// Amount a zero-width or zero-height extent is widened on each side.
pub const DEGENERATE_PAD: f64 = 0.0001;

/// Geographic validity area of a CRS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrsBbox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl CrsBbox {
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    /// Parse a `south,north,west,east` string.
    pub fn parse(s: &str) -> Result<Self, BboxError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| BboxError::InvalidNumber(part.to_string()))?;
        }

        let bbox = Self::new(values[0], values[1], values[2], values[3]);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check latitude/longitude ranges and `south <= north`.
    ///
    /// `west > east` is valid and marks an antimeridian crossing.
    pub fn validate(&self) -> Result<(), BboxError> {
        for lat in [self.south, self.north] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(BboxError::OutOfRange(format!(
                    "latitude {} outside [-90, 90]",
                    lat
                )));
            }
        }
        for lon in [self.west, self.east] {
            if !(-ANTIMERIDIAN..=ANTIMERIDIAN).contains(&lon) {
                return Err(BboxError::OutOfRange(format!(
                    "longitude {} outside [-180, 180]",
                    lon
                )));
            }
        }
        if self.south > self.north {
            return Err(BboxError::OutOfRange(format!(
                "south {} is greater than north {}",
                self.south, self.north
            )));
        }
        Ok(())
    }

    /// True when the box wraps across the ±180° meridian.
    ///
    /// Equal longitudes (including `-180`/`180` for a global CRS) do not cross.
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Longitudinal width in degrees, measured eastward from `west`.
    pub fn lon_span(&self) -> f64 {
        if self.crosses_antimeridian() {
            (ANTIMERIDIAN - self.west) + (self.east + ANTIMERIDIAN)
        } else {
            self.east - self.west
        }
    }

    /// Polygon rings that draw this box on a flat map.
    ///
    /// One ring normally; two rings split at the antimeridian when the box
    /// crosses it, so neither ring wraps the wrong way round the globe.
    pub fn rings(&self) -> Vec<Ring> {
        if self.crosses_antimeridian() {
            vec![
                Ring::from_edges(self.west, ANTIMERIDIAN, self.south, self.north),
                Ring::from_edges(-ANTIMERIDIAN, self.east, self.south, self.north),
            ]
        } else {
            vec![Ring::from_edges(
                self.west, self.east, self.south, self.north,
            )]
        }
    }
}

/// A rectangular ring of four `[lon, lat]` vertices.
///
/// Vertex order is north-west, north-east, south-east, south-west. The ring is
/// closed implicitly; use [`Ring::closed`] for GeoJSON output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring(pub [[f64; 2]; 4]);

impl Ring {
    pub fn from_edges(west: f64, east: f64, south: f64, north: f64) -> Self {
        Ring([[west, north], [east, north], [east, south], [west, south]])
    }

    pub fn vertices(&self) -> &[[f64; 2]; 4] {
        &self.0
    }

    /// Vertices with the first one repeated at the end.
    pub fn closed(&self) -> Vec<[f64; 2]> {
        let mut coords = self.0.to_vec();
        coords.push(self.0[0]);
        coords
    }

    pub fn extent(&self) -> Extent {
        let mut extent = Extent::from_point(self.0[0][0], self.0[0][1]);
        for [lon, lat] in &self.0[1..] {
            extent.include(*lon, *lat);
        }
        extent
    }
}

/// Planar lon/lat extent used to fit the map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Extent {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    pub fn from_point(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, lon, lat)
    }

    /// Combined extent of all rings, or `None` for an empty slice.
    pub fn of_rings(rings: &[Ring]) -> Option<Self> {
        rings
            .iter()
            .map(Ring::extent)
            .reduce(|acc, extent| acc.union(&extent))
    }

    /// Grow this extent to contain a point.
    pub fn include(&mut self, lon: f64, lat: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lon = self.max_lon.max(lon);
        self.max_lat = self.max_lat.max(lat);
    }

    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    /// Widen a zero-width or zero-height extent so a map can fit to it.
    pub fn expand_degenerate(mut self) -> Extent {
        if self.min_lat == self.max_lat {
            self.min_lat -= DEGENERATE_PAD;
            self.max_lat += DEGENERATE_PAD;
        }
        if self.min_lon == self.max_lon {
            self.min_lon -= DEGENERATE_PAD;
            self.max_lon += DEGENERATE_PAD;
        }
        self
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxError {
    #[error("Invalid bbox format: {0}. Expected 'south,north,west,east'")]
    InvalidFormat(String),

    #[error("Invalid number in bbox: {0}")]
    InvalidNumber(String),

    #[error("Bbox out of range: {0}")]
    OutOfRange(String),
}
