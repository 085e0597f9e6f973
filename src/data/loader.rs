use std::path::Path;

use serde_json::Value as JsonValue;

use super::model::{CellValue, ObservationTable};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an observation table and check that `required` columns are present.
/// Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-delimited with a header row
/// * `.tsv`          – tab-delimited with a header row
/// * `.json`         – `[{ "square_footage": 1500, "price_thousands": 260 }, ...]`
///
/// Extra columns are kept but otherwise ignored downstream.
pub fn load_table(path: &Path, required: &[String]) -> Result<ObservationTable, DataError> {
    if !path.is_file() {
        return Err(DataError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    log::info!("Loading data from {}", path.display());
    let table = match ext.as_str() {
        "csv" | "txt" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string())),
    };

    let missing: Vec<String> = required
        .iter()
        .filter(|c| table.column_index(c).is_none())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns { columns: missing });
    }

    log::debug!(
        "Loaded {} rows with columns [{}]",
        table.len(),
        table.columns.join(", ")
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

/// Cells stay as text; an empty cell becomes `Null`.
fn load_delimited(path: &Path, delimiter: u8) -> Result<ObservationTable, DataError> {
    let csv_err = |source: csv::Error| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let row = record
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::Text(cell.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(ObservationTable { columns, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`).
/// Columns are the union of keys across records; a key absent from a record is `Null`.
fn load_json(path: &Path) -> Result<ObservationTable, DataError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let records = root.as_array().ok_or_else(|| DataError::MalformedRecord {
        row: 0,
        reason: "expected a top-level JSON array".into(),
    })?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DataError::MalformedRecord {
            row: i,
            reason: "not a JSON object".into(),
        })?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok(ObservationTable { columns, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Number(n) => n.as_f64().map_or(CellValue::Null, CellValue::Number),
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}
