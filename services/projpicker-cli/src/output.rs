//! Terminal output for query results, details and rings.

use clap::ValueEnum;
use serde_json::{json, Value};

use projpicker_common::{CrsDetails, Ring};
use projpicker_protocol::ResponseShape;
use projpicker_widget::ListEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// One `name (id)` line per result.
pub fn format_list(entries: &[ListEntry]) -> String {
    if entries.is_empty() {
        return "No matching CRS found".to_string();
    }
    entries
        .iter()
        .map(ListEntry::label)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detail rows with labels padded to a common width.
pub fn format_details(details: &CrsDetails) -> String {
    let rows = details.rows();
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, value)| format!("{:<width$}  {}", label, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ring vertices as `lon,lat` pairs, one ring per line.
pub fn format_rings(rings: &[Ring]) -> String {
    rings
        .iter()
        .enumerate()
        .map(|(i, ring)| {
            let vertices: Vec<String> = ring
                .vertices()
                .iter()
                .map(|[lon, lat]| format!("{},{}", lon, lat))
                .collect();
            format!("ring {}: {}", i + 1, vertices.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full query report for `--output json`.
pub fn query_report(
    entries: &[ListEntry],
    shape: Option<ResponseShape>,
    selected: Option<(&CrsDetails, Option<Value>)>,
) -> Value {
    let results: Vec<Value> = entries
        .iter()
        .map(|entry| json!({ "id": entry.id, "name": entry.name }))
        .collect();

    let mut report = json!({ "shape": shape, "count": results.len(), "results": results });
    if let Some((details, highlight)) = selected {
        report["selected"] = json!({ "details": details, "highlight": highlight });
    }
    report
}
