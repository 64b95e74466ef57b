use std::path::Path;

use serde_json::Value;

use crate::error::JournalError;

/// Columns of the CSV export, in output order. Keys match the JSON field
/// names used by the journal records.
pub const EXPORT_COLUMNS: [&str; 15] = [
    "ts",
    "action",
    "type",
    "symbol",
    "side",
    "qty",
    "price",
    "stopPrice",
    "limitPrice",
    "tif",
    "orderId",
    "linkId",
    "result",
    "sliceIndex",
    "totalSlices",
];

/// Exports the JSON-lines journal at `journal_path` to a CSV file at
/// `out_path`, projecting each record onto [`EXPORT_COLUMNS`]. Lines that
/// fail to parse as JSON are skipped. Returns the number of records
/// written; when the journal holds no parseable records, no output file is
/// created and `Ok(0)` is returned.
pub fn export_csv(journal_path: &Path, out_path: &Path) -> Result<usize, JournalError> {
    let contents = std::fs::read_to_string(journal_path)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Ok(record) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        rows.push(EXPORT_COLUMNS.iter().map(|key| cell(record.get(*key))).collect());
    }

    if rows.is_empty() {
        return Ok(0);
    }

    let mut writer = csv::Writer::from_path(out_path)?;
    writer.write_record(EXPORT_COLUMNS)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(JournalError::Io)?;

    Ok(rows.len())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
