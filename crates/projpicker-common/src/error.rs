//! Error types for the ProjPicker web client.

use thiserror::Error;

use crate::bbox::BboxError;

/// Result type alias using PickerError.
pub type PickerResult<T> = Result<T, PickerError>;

/// Primary error type for widget operations.
///
/// None of these are fatal: every failure leaves the widget in the state it
/// had before the failing operation started.
#[derive(Debug, Error)]
pub enum PickerError {
    // === Query Errors ===
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // === Selection Errors ===
    #[error("CRS not found in current results: {0}")]
    CrsNotFound(String),

    #[error("Stale selection: {0} belongs to an earlier result set")]
    StaleSelection(String),

    // === Input Errors ===
    #[error("Invalid CRS identifier: {0}")]
    InvalidCrsId(String),

    #[error("Invalid bounding box: {0}")]
    InvalidBbox(String),

    #[error("Invalid feature edit: {0}")]
    InvalidFeature(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PickerError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PickerError::TransportFailure(_) => "TransportFailure",
            PickerError::MalformedResponse(_) => "MalformedResponse",
            PickerError::CrsNotFound(_) => "CrsNotFound",
            PickerError::StaleSelection(_) => "StaleSelection",
            PickerError::InvalidCrsId(_) => "InvalidCrsId",
            PickerError::InvalidBbox(_) => "InvalidBbox",
            PickerError::InvalidFeature(_) => "InvalidFeature",
            PickerError::Config(_) => "Config",
        }
    }

    /// Whether the UI should surface this error to the user.
    ///
    /// A stale selection is the expected consequence of re-querying and is
    /// cleared silently.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, PickerError::StaleSelection(_))
    }
}

impl From<BboxError> for PickerError {
    fn from(err: BboxError) -> Self {
        PickerError::InvalidBbox(err.to_string())
    }
}

impl From<serde_json::Error> for PickerError {
    fn from(err: serde_json::Error) -> Self {
        PickerError::MalformedResponse(format!("JSON error: {}", err))
    }
}
