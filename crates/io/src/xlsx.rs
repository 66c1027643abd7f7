// XLSX export of the reconciled table

use std::path::Path;
use std::time::Instant;

use polegrid_recon::config::{NEUTRAL_STRINGING_SHEET, PRIMARY_STRINGING_SHEET};
use polegrid_recon::model::{FillBand, OutputRow, COLUMNS};
use rust_xlsxwriter::{Color, Format, Workbook as XlsxWorkbook};

use crate::error::SourceError;
use crate::stringing::{StringingReport, NEUTRAL_HEADERS, PRIMARY_HEADERS};

/// Header row background.
pub const HEADER_FILL: u32 = 0xFFFF00;
/// Row background for [`FillBand::Light`] blocks.
pub const LIGHT_FILL: u32 = 0xF5F5F5;
/// Row background for [`FillBand::Shaded`] blocks.
pub const SHADED_FILL: u32 = 0xD3D3D3;

#[derive(Debug, Default)]
pub struct ExportResult {
    pub rows_exported: usize,
    /// Section rows across both stringing sheets.
    pub stringing_rows_exported: usize,
    pub cells_exported: usize,
    pub export_duration_ms: u128,
}

pub fn band_fill(band: FillBand) -> u32 {
    match band {
        FillBand::Light => LIGHT_FILL,
        FillBand::Shaded => SHADED_FILL,
    }
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL))
}

/// Write the rows to the main sheet: bold header on yellow, one background
/// per sequence block, frozen header, autofit columns. Each stringing chart
/// with sections gets a sheet of its own after it.
pub fn export(
    rows: &[OutputRow],
    stringing: &StringingReport,
    path: &Path,
    sheet_name: &str,
) -> Result<ExportResult, SourceError> {
    let start_time = Instant::now();
    let mut result = ExportResult::default();

    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|e| SourceError::Write(format!("Failed to create sheet '{}': {}", sheet_name, e)))?;

    let header_format = header_format();
    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *name, &header_format)
            .map_err(|e| SourceError::Write(format!("Failed to write header: {}", e)))?;
    }

    let band_format = |band| Format::new().set_background_color(Color::RGB(band_fill(band)));
    let light = band_format(FillBand::Light);
    let shaded = band_format(FillBand::Shaded);

    for (idx, row) in rows.iter().enumerate() {
        let row32 = (idx + 1) as u32;
        let format = match row.band {
            FillBand::Light => &light,
            FillBand::Shaded => &shaded,
        };

        for (col, value) in row.cells().iter().enumerate() {
            let col16 = col as u16;
            // Blank cells still carry the band fill
            let written = if value.is_empty() {
                worksheet.write_blank(row32, col16, format)
            } else {
                worksheet.write_string_with_format(row32, col16, *value, format)
            };
            written.map_err(|e| SourceError::Write(format!("Failed to write row {}: {}", row32 + 1, e)))?;
            result.cells_exported += 1;
        }
        result.rows_exported += 1;
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| SourceError::Write(format!("Failed to set freeze panes: {}", e)))?;
    worksheet.autofit();

    if !stringing.primary.is_empty() {
        let cells: Vec<_> = stringing.primary.iter().map(|r| r.cells()).collect();
        write_plain_sheet(&mut workbook, PRIMARY_STRINGING_SHEET, &PRIMARY_HEADERS, &cells)?;
        result.stringing_rows_exported += cells.len();
    }
    if !stringing.neutral.is_empty() {
        let cells: Vec<_> = stringing.neutral.iter().map(|r| r.cells()).collect();
        write_plain_sheet(&mut workbook, NEUTRAL_STRINGING_SHEET, &NEUTRAL_HEADERS, &cells)?;
        result.stringing_rows_exported += cells.len();
    }

    workbook
        .save(path)
        .map_err(|e| SourceError::Write(format!("Failed to save XLSX file: {}", e)))?;

    result.export_duration_ms = start_time.elapsed().as_millis();
    log::info!("wrote {} rows to {}", result.rows_exported, path.display());
    Ok(result)
}

/// Header on yellow, plain text rows, autofit columns.
fn write_plain_sheet<const N: usize>(
    workbook: &mut XlsxWorkbook,
    name: &str,
    headers: &[&str; N],
    rows: &[[String; N]],
) -> Result<(), SourceError> {
    let worksheet = workbook
        .add_worksheet()
        .set_name(name)
        .map_err(|e| SourceError::Write(format!("Failed to create sheet '{}': {}", name, e)))?;

    let header_format = header_format();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| SourceError::Write(format!("Failed to write header: {}", e)))?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let row32 = (idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write_string(row32, col as u16, value.as_str())
                .map_err(|e| SourceError::Write(format!("Failed to write row {} of '{}': {}", row32 + 1, name, e)))?;
        }
    }
    worksheet.autofit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_auto, Data, Reader};
    use polegrid_recon::model::UnifiedRecord;
    use polegrid_recon::render::render_block;
    use polegrid_recon::sequence::normalize;

    use crate::stringing::{NeutralStringingRow, PrimaryStringingRow};

    fn sample_rows() -> Vec<OutputRow> {
        let record = UnifiedRecord {
            facility_id: "F-12".into(),
            pole_type: "WOOD-45".into(),
            taps: vec!["NEW 65T".into(), "EXISTING 40K".into()],
            ..Default::default()
        };
        let mut rows = render_block(&normalize("0012").unwrap(), &record, FillBand::Light);
        rows.extend(render_block(
            &normalize("0013").unwrap(),
            &UnifiedRecord::default(),
            FillBand::Shaded,
        ));
        rows
    }

    #[test]
    fn test_export_basic() {
        let temp_dir = tempfile::tempdir().unwrap();
        let export_path = temp_dir.path().join("report.xlsx");

        let result = export(&sample_rows(), &StringingReport::default(), &export_path, "Data Report").unwrap();
        assert_eq!(result.rows_exported, 3);
        assert_eq!(result.cells_exported, 3 * COLUMNS.len());
        assert!(export_path.exists());

        let mut workbook = open_workbook_auto(&export_path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Data Report".to_string()]);
        let range = workbook.worksheet_range("Data Report").unwrap();

        let cell = |r: u32, c: u32| match range.get_value((r, c)) {
            Some(Data::String(s)) => s.clone(),
            _ => String::new(),
        };
        assert_eq!(cell(0, 0), "sequence");
        assert_eq!(cell(0, 18), "description");
        assert_eq!(cell(1, 0), "0012");
        assert_eq!(cell(1, 1), "F-12");
        assert_eq!(cell(1, 5), "NEW 65T");
        assert_eq!(cell(2, 0), "0012");
        assert_eq!(cell(2, 1), "");
        assert_eq!(cell(2, 5), "EXISTING 40K");
        assert_eq!(cell(3, 0), "0013");
    }

    #[test]
    fn test_export_empty_table_writes_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let export_path = temp_dir.path().join("empty.xlsx");

        let result = export(&[], &StringingReport::default(), &export_path, "Data Report").unwrap();
        assert_eq!(result.rows_exported, 0);

        let mut workbook = open_workbook_auto(&export_path).unwrap();
        let range = workbook.worksheet_range("Data Report").unwrap();
        assert_eq!(range.height(), 1);
    }

    #[test]
    fn test_export_bad_sheet_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = export(&[], &StringingReport::default(), &temp_dir.path().join("x.xlsx"), "bad[name]").unwrap_err();
        assert!(matches!(err, SourceError::Write(_)));
    }

    #[test]
    fn test_export_stringing_sheets() {
        let temp_dir = tempfile::tempdir().unwrap();
        let export_path = temp_dir.path().join("stringing.xlsx");
        let stringing = StringingReport {
            primary: vec![PrimaryStringingRow {
                section: "1".into(),
                structures: "0001 -> 0003".into(),
                circuit_type: "3PH 477 ACSR".into(),
                circuit_value: 3,
                span_length: 250.75,
                result: 752.25,
                sequences: "0001, 0002, 0003".into(),
            }],
            neutral: vec![
                NeutralStringingRow {
                    section: "4".into(),
                    sequences: "0001 - 0003".into(),
                    total_span_length: 250.75,
                    circuit_type: "Neutral 1/0".into(),
                },
                NeutralStringingRow {
                    section: "6".into(),
                    sequences: "0003 - 0004".into(),
                    total_span_length: 80.0,
                    circuit_type: "Neutral 1/0".into(),
                },
            ],
        };

        let result = export(&sample_rows(), &stringing, &export_path, "Data Report").unwrap();
        assert_eq!(result.rows_exported, 3);
        assert_eq!(result.stringing_rows_exported, 3);

        let mut workbook = open_workbook_auto(&export_path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            vec![
                "Data Report".to_string(),
                "Primary Stringing Data".to_string(),
                "Neutral Span Stringing Data".to_string(),
            ]
        );

        let primary = workbook.worksheet_range("Primary Stringing Data").unwrap();
        let text = |range: &calamine::Range<Data>, r: u32, c: u32| match range.get_value((r, c)) {
            Some(Data::String(s)) => s.clone(),
            _ => String::new(),
        };
        assert_eq!(text(&primary, 0, 1), "Structure -> Structure");
        assert_eq!(text(&primary, 0, 6), "Sequences");
        assert_eq!(text(&primary, 1, 1), "0001 -> 0003");
        assert_eq!(text(&primary, 1, 3), "3");
        assert_eq!(text(&primary, 1, 5), "752.25");

        let neutral = workbook.worksheet_range("Neutral Span Stringing Data").unwrap();
        assert_eq!(neutral.height(), 3);
        assert_eq!(text(&neutral, 0, 2), "Total Span Length");
        assert_eq!(text(&neutral, 2, 1), "0003 - 0004");
        assert_eq!(text(&neutral, 2, 2), "80.00");
    }

    #[test]
    fn band_colors() {
        assert_eq!(band_fill(FillBand::Light), 0xF5F5F5);
        assert_eq!(band_fill(FillBand::Shaded), 0xD3D3D3);
    }
}
