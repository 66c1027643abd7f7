//! HIS structure-attribute workbook.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use polegrid_recon::config::HisColumns;
use polegrid_recon::model::{HisRecord, ScalarSource};
use polegrid_recon::sequence::{normalize, SequenceKey};
use polegrid_recon::ReconError;

use crate::error::SourceError;
use crate::Parsed;

pub const SOURCE: &str = "his";

/// Read the first worksheet of an xlsx/xls/ods workbook.
pub fn load_his(
    path: &Path,
    columns: &HisColumns,
) -> Result<Parsed<ScalarSource<HisRecord>>, SourceError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| SourceError::Workbook(format!("failed to open {}: {e}", path.display())))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SourceError::EmptyWorkbook)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SourceError::Workbook(format!("failed to read sheet '{sheet_name}': {e}")))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    parse_his_rows(&rows, columns)
}

/// Select the configured columns from a string grid whose first row is the
/// header. Rows with an empty sequence cell are ignored.
pub fn parse_his_rows(
    rows: &[Vec<String>],
    columns: &HisColumns,
) -> Result<Parsed<ScalarSource<HisRecord>>, SourceError> {
    let header = rows.first().ok_or(SourceError::EmptyWorkbook)?;

    let position = |name: &str| {
        header
            .iter()
            .position(|h| h.trim() == name.trim())
            .ok_or_else(|| SourceError::MissingColumn { column: name.to_string() })
    };
    let seq_col = position(&columns.sequence)?;
    let facility_col = position(&columns.facility_id)?;
    let transformers_col = position(&columns.existing_transformers)?;
    let primary_col = position(&columns.primary_riser)?;
    let secondary_col = position(&columns.secondary_riser)?;

    let mut parsed = Parsed::<ScalarSource<HisRecord>>::default();

    for row in &rows[1..] {
        let cell = |idx: usize| -> String {
            let value = row.get(idx).map(|s| s.trim()).unwrap_or("");
            if value == "None" {
                String::new()
            } else {
                value.to_string()
            }
        };

        let raw = cell(seq_col);
        if raw.is_empty() {
            continue;
        }

        match sequence_key(&raw) {
            Ok(key) => parsed.data.insert(
                key,
                HisRecord {
                    facility_id: cell(facility_col),
                    existing_transformers: cell(transformers_col),
                    primary_riser: cell(primary_col),
                    secondary_riser: cell(secondary_col),
                },
            ),
            Err(e) => parsed.skip(SOURCE, e),
        }
    }

    log::debug!("[{SOURCE}] {} structures", parsed.data.len());
    Ok(parsed)
}

/// Numeric sequence cells lose their leading zeros in Excel; pad them back.
fn sequence_key(raw: &str) -> Result<SequenceKey, ReconError> {
    if raw.len() < 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = raw.parse::<u64>() {
            return SequenceKey::from_number(n);
        }
    }
    normalize(raw)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
