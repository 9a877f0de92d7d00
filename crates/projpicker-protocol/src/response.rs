//! Search response decoding.
//!
//! The canonical response is a JSON object mapping CRS identifiers to
//! records, kept in the order the server wrote them. Older servers answer
//! with a bare array of records; each record then names itself through its
//! authority and code, and the decoded list is sorted by identifier.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use projpicker_common::{CrsId, CrsRecord};

use crate::errors::ProtocolError;

/// Which of the two response layouts the server used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// `{ "AUTH:CODE": record, ... }`
    Map,
    /// `[ record, ... ]` (legacy)
    Array,
}

/// Decoded candidate CRSs with unique identifiers, in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedResults {
    pub shape: ResponseShape,
    pub records: Vec<(CrsId, CrsRecord)>,
}

impl DecodedResults {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &CrsId> {
        self.records.iter().map(|(id, _)| id)
    }
}

/// Decode a response body.
///
/// Fails on invalid JSON, on a missing required record field, on a map key
/// that is not `AUTHORITY:CODE`, and on a record with `south_lat > north_lat`
/// or coordinates out of range.
pub fn decode_results(body: &[u8]) -> Result<DecodedResults, ProtocolError> {
    let raw: RawResults = serde_json::from_slice(body)?;

    let (shape, entries) = match raw {
        RawResults::Map(entries) => {
            let mut parsed = Vec::with_capacity(entries.len());
            for (key, record) in entries {
                let id = CrsId::parse(&key)
                    .map_err(|_| ProtocolError::InvalidIdentifier(key.clone()))?;
                parsed.push((id, record));
            }
            (ResponseShape::Map, parsed)
        }
        RawResults::Array(records) => {
            let parsed = records
                .into_iter()
                .map(|record| (record.id(), record))
                .collect();
            (ResponseShape::Array, parsed)
        }
    };

    for (id, record) in &entries {
        record
            .bbox()
            .validate()
            .map_err(|e| ProtocolError::InvalidBbox {
                id: id.to_string(),
                message: e.to_string(),
            })?;
    }

    let mut records = dedup_last_wins(entries);
    if shape == ResponseShape::Array {
        records.sort_by(|(a, _), (b, _)| a.cmp(b));
    }

    Ok(DecodedResults { shape, records })
}

/// Keep the first position of each id but the last record written for it.
fn dedup_last_wins(entries: Vec<(CrsId, CrsRecord)>) -> Vec<(CrsId, CrsRecord)> {
    let mut index: HashMap<CrsId, usize> = HashMap::with_capacity(entries.len());
    let mut out: Vec<(CrsId, CrsRecord)> = Vec::with_capacity(entries.len());

    for (id, record) in entries {
        match index.get(&id) {
            Some(&pos) => out[pos].1 = record,
            None => {
                index.insert(id.clone(), out.len());
                out.push((id, record));
            }
        }
    }
    out
}

/// Either response layout, with map entries in document order.
enum RawResults {
    Map(Vec<(String, CrsRecord)>),
    Array(Vec<CrsRecord>),
}

impl<'de> Deserialize<'de> for RawResults {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawResultsVisitor)
    }
}

struct RawResultsVisitor;

impl<'de> Visitor<'de> for RawResultsVisitor {
    type Value = RawResults;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object of CRS records keyed by identifier or an array of CRS records")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, record)) = map.next_entry::<String, CrsRecord>()? {
            entries.push((key, record));
        }
        Ok(RawResults::Map(entries))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut records = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(record) = seq.next_element::<CrsRecord>()? {
            records.push(record);
        }
        Ok(RawResults::Array(records))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(E::custom("response body is null"))
    }
}
