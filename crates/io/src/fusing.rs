//! Pasted fusing coordination report: one tab-separated line per tap.

use polegrid_recon::model::ListSource;
use polegrid_recon::sequence::normalize;

use crate::Parsed;

pub const SOURCE: &str = "fusing";

/// Parse the pasted report. The first line is a header.
///
/// The sequence is the first four characters of the first field; the tap
/// text is the third field, kept even when blank so the tap still takes a
/// row. Lines with fewer than three fields are ignored.
pub fn parse_fusing(text: &str) -> Parsed<ListSource<String>> {
    let mut parsed = Parsed::<ListSource<String>>::default();

    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    for (idx, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::warn!("[{SOURCE}] line {}: {e}", idx + 2);
                continue;
            }
        };

        let (Some(first), Some(tap)) = (record.get(0), record.get(2)) else {
            log::debug!("[{SOURCE}] line {}: fewer than 3 fields", idx + 2);
            continue;
        };
        let tap = tap.trim();

        let raw: String = first.trim().chars().take(4).collect();
        match normalize(&raw) {
            Ok(key) => parsed.data.push(key, tap.to_string()),
            Err(e) => parsed.skip(SOURCE, e),
        }
    }

    log::debug!(
        "[{SOURCE}] {} taps across {} sequences",
        parsed.data.entry_count(),
        parsed.data.len()
    );
    parsed
}
