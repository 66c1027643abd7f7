// CSV export of the reconciled table

use std::io::Write;
use std::path::Path;

use polegrid_recon::model::{OutputRow, COLUMNS};

use crate::error::SourceError;

pub fn export(rows: &[OutputRow], path: &Path) -> Result<usize, SourceError> {
    let file = std::fs::File::create(path).map_err(|e| SourceError::io(path, e))?;
    let written = write_rows(rows, file)?;
    log::info!("wrote {} rows to {}", written, path.display());
    Ok(written)
}

/// Header plus one record per row, in column order.
pub fn write_rows<W: Write>(rows: &[OutputRow], writer: W) -> Result<usize, SourceError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(COLUMNS)
        .map_err(|e| SourceError::Write(e.to_string()))?;
    for row in rows {
        wtr.write_record(row.cells())
            .map_err(|e| SourceError::Write(e.to_string()))?;
    }
    wtr.flush().map_err(|e| SourceError::Write(e.to_string()))?;

    Ok(rows.len())
}
