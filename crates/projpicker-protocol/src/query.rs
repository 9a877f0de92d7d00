//! Query serialization.
//!
//! A query is built fresh from the drawing layer on every trigger. Both
//! encoders are pure: the same features and operator always give the same
//! query, and an empty feature set still gives a valid query.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::errors::ProtocolError;
use crate::geojson::{Feature, FeatureCollection, Geometry};
use crate::media_types;
use crate::operator::LogicalOperator;

/// Which request body format the endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SerializationMode {
    /// GeoJSON FeatureCollection plus a `logicalOperator` field.
    #[default]
    Structured,
    /// Newline-delimited `point`/`poly` text with lat/lon order.
    LineProtocol,
}

impl fmt::Display for SerializationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationMode::Structured => f.write_str("structured"),
            SerializationMode::LineProtocol => f.write_str("line-protocol"),
        }
    }
}

impl FromStr for SerializationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "structured" | "json" | "geojson" => Ok(SerializationMode::Structured),
            "line-protocol" | "line" | "text" => Ok(SerializationMode::LineProtocol),
            other => Err(format!(
                "unknown serialization mode '{}', expected structured or line-protocol",
                other
            )),
        }
    }
}

/// Structured request body: the drawn collection with the operator added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredQuery {
    #[serde(flatten)]
    pub collection: FeatureCollection,

    #[serde(rename = "logicalOperator")]
    pub logical_operator: LogicalOperator,
}

/// An outbound search query in one of the two payload styles.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Structured(StructuredQuery),
    LineProtocol(String),
}

impl Query {
    pub fn mode(&self) -> SerializationMode {
        match self {
            Query::Structured(_) => SerializationMode::Structured,
            Query::LineProtocol(_) => SerializationMode::LineProtocol,
        }
    }

    /// Content-Type header for the request body.
    pub fn content_type(&self) -> &'static str {
        match self {
            Query::Structured(_) => media_types::JSON,
            Query::LineProtocol(_) => media_types::TEXT,
        }
    }

    /// Request body as text.
    pub fn to_body_string(&self) -> Result<String, ProtocolError> {
        match self {
            Query::Structured(query) => {
                serde_json::to_string(query).map_err(|e| ProtocolError::Encode(e.to_string()))
            }
            Query::LineProtocol(text) => Ok(text.clone()),
        }
    }

    /// Request body as bytes.
    pub fn to_body(&self) -> Result<Vec<u8>, ProtocolError> {
        self.to_body_string().map(String::into_bytes)
    }
}

/// Build the query for the current drawn features and operator.
pub fn serialize(
    collection: &FeatureCollection,
    operator: LogicalOperator,
    mode: SerializationMode,
) -> Query {
    match mode {
        SerializationMode::Structured => Query::Structured(StructuredQuery {
            collection: collection.clone(),
            logical_operator: operator,
        }),
        SerializationMode::LineProtocol => {
            Query::LineProtocol(encode_line_protocol(&collection.features, operator))
        }
    }
}

/// Encode features as line-protocol text.
///
/// The operator keyword is the first line. Each feature follows on its own
/// line with coordinates swapped to `lat,lon`; only the outer ring of a
/// polygon is sent. Every line, including the last, ends with `\n`.
pub fn encode_line_protocol(features: &[Feature], operator: LogicalOperator) -> String {
    let mut out = String::new();
    out.push_str(operator.keyword());
    out.push('\n');

    for feature in features {
        match &feature.geometry {
            Geometry::Point {
                coordinates: [lon, lat],
            } => {
                let _ = writeln!(out, "point {},{}", lat, lon);
            }
            Geometry::Polygon { coordinates } => {
                out.push_str("poly");
                for [lon, lat] in coordinates.first().into_iter().flatten() {
                    let _ = write!(out, " {},{}", lat, lon);
                }
                out.push('\n');
            }
        }
    }

    out
}
