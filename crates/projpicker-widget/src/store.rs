//! Result store for the most recent search response.

use serde::Serialize;
use std::collections::HashMap;

use projpicker_common::{CrsId, CrsRecord, PickerError, PickerResult};
use projpicker_protocol::{DecodedResults, ResponseShape};

/// One row of the identifier list, tagged with the store generation it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    pub generation: u64,
    pub id: CrsId,
    pub name: String,
}

impl ListEntry {
    /// List label, `name (id)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

/// Replace-only map from CRS identifier to record.
///
/// Every [`ResultStore::replace`] discards the previous contents and bumps the
/// generation, so list entries from an earlier response can be told apart.
/// Generation 0 means no response has been applied yet.
#[derive(Debug, Default)]
pub struct ResultStore {
    generation: u64,
    shape: Option<ResponseShape>,
    order: Vec<CrsId>,
    records: HashMap<CrsId, CrsRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Layout of the response the current contents came from.
    pub fn shape(&self) -> Option<ResponseShape> {
        self.shape
    }

    /// Replace all contents with a decoded response. Returns the new generation.
    pub fn replace(&mut self, results: DecodedResults) -> u64 {
        self.generation += 1;
        self.shape = Some(results.shape);
        self.order = Vec::with_capacity(results.records.len());
        self.records = HashMap::with_capacity(results.records.len());

        for (id, record) in results.records {
            if self.records.insert(id.clone(), record).is_none() {
                self.order.push(id);
            }
        }
        self.generation
    }

    /// Identifiers in list order.
    pub fn ids(&self) -> &[CrsId] {
        &self.order
    }

    /// List rows for the identifier list view.
    pub fn entries(&self) -> Vec<ListEntry> {
        self.order
            .iter()
            .filter_map(|id| {
                self.records.get(id).map(|record| ListEntry {
                    generation: self.generation,
                    id: id.clone(),
                    name: record.crs_name.clone(),
                })
            })
            .collect()
    }

    /// Look up a record by identifier in the current generation.
    pub fn lookup(&self, id: &CrsId) -> PickerResult<&CrsRecord> {
        self.records
            .get(id)
            .ok_or_else(|| PickerError::CrsNotFound(id.to_string()))
    }

    /// Look up the record behind a list row.
    ///
    /// Fails with [`PickerError::StaleSelection`] when the row was built from
    /// an earlier generation, even if the same identifier is present again.
    pub fn lookup_entry(&self, entry: &ListEntry) -> PickerResult<&CrsRecord> {
        if entry.generation != self.generation {
            return Err(PickerError::StaleSelection(entry.id.to_string()));
        }
        self.lookup(&entry.id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
