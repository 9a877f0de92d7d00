//! CRS selection: record lookup, display fields and highlight geometry.

use projpicker_common::{CrsDetails, CrsId, CrsRecord, Extent, PickerResult, Ring};

use crate::store::ResultStore;

/// Everything the UI needs to show a selected CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub generation: u64,
    pub id: CrsId,
    pub details: CrsDetails,
    /// One ring, or two when the bbox crosses the antimeridian.
    pub rings: Vec<Ring>,
    /// Combined extent of `rings`, for fitting the viewport.
    pub extent: Extent,
}

/// Resolve `id` against the current store and build its selection.
///
/// An identifier missing from the store is a caller error: list views only
/// ever offer identifiers from the current generation.
pub fn select(store: &ResultStore, id: &CrsId) -> PickerResult<Selection> {
    let record = store.lookup(id)?;
    Ok(selection_for(store.generation(), id, record))
}

pub(crate) fn selection_for(generation: u64, id: &CrsId, record: &CrsRecord) -> Selection {
    let bbox = record.bbox();
    let rings = bbox.rings();
    let extent = Extent::of_rings(&rings)
        .unwrap_or_else(|| Extent::new(bbox.west, bbox.south, bbox.east, bbox.north));

    Selection {
        generation,
        id: id.clone(),
        details: record.details(id),
        rings,
        extent,
    }
}
