//! ProjPicker CRS search protocol
//!
//! This crate turns user-drawn geometry into the request body the ProjPicker
//! search endpoint expects, and decodes the candidate CRS records it returns.
//!
//! # Payload styles
//!
//! - `structured`: the GeoJSON FeatureCollection from the drawing layer with an
//!   extra top-level `logicalOperator` field
//! - `line-protocol`: newline-delimited text, operator keyword first, then one
//!   `point lat,lon` or `poly lat,lon lat,lon ...` line per feature
//!
//! # Example
//!
//! ```rust
//! use projpicker_protocol::{serialize, Feature, FeatureCollection, LogicalOperator, SerializationMode};
//!
//! let drawn = FeatureCollection::new().with_feature(Feature::point(-84.0, 34.2));
//! let query = serialize(&drawn, LogicalOperator::And, SerializationMode::LineProtocol);
//! assert_eq!(query.to_body_string().unwrap(), "and\npoint 34.2,-84\n");
//! ```

pub mod errors;
pub mod geojson;
pub mod operator;
pub mod query;
pub mod response;

pub use errors::ProtocolError;
pub use geojson::{Feature, FeatureCollection, Geometry};
pub use operator::LogicalOperator;
pub use query::{serialize, Query, SerializationMode, StructuredQuery};
pub use response::{decode_results, DecodedResults, ResponseShape};

/// Path of the search endpoint relative to the server root.
pub const DEFAULT_QUERY_PATH: &str = "/query";

/// Media types used on the wire
pub mod media_types {
    /// Structured (GeoJSON) request bodies and all responses
    pub const JSON: &str = "application/json";
    /// Line-protocol request bodies
    pub const TEXT: &str = "text/plain; charset=utf-8";
}
