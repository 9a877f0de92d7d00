//! Protocol error types.

use thiserror::Error;

use projpicker_common::PickerError;

/// Errors raised while encoding a query or decoding a response.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Response body is not the expected JSON shape or misses a required field.
    #[error("Invalid response body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// A map key is not an `AUTHORITY:CODE` identifier.
    #[error("Invalid CRS identifier in response: {0}")]
    InvalidIdentifier(String),

    /// A record carries an impossible bounding box.
    #[error("Invalid bounding box for {id}: {message}")]
    InvalidBbox { id: String, message: String },

    /// The query could not be encoded.
    #[error("Failed to encode query: {0}")]
    Encode(String),
}

impl From<ProtocolError> for PickerError {
    fn from(err: ProtocolError) -> Self {
        PickerError::MalformedResponse(err.to_string())
    }
}
