//! Common types and utilities shared across the ProjPicker web client crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod view;

pub use bbox::{BboxError, CrsBbox, Extent, Ring};
pub use crs::{CrsDetails, CrsId, CrsRecord};
pub use error::{PickerError, PickerResult};
pub use view::InitialView;
