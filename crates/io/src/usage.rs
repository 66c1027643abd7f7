//! Structure usage XML: maximum usage of guy and cable elements.

use polegrid_recon::model::{GuyUsage, ListSource};
use polegrid_recon::sequence::normalize;

use crate::error::SourceError;
use crate::xml::{extract_records, field};
use crate::Parsed;

pub const SOURCE: &str = "guy_usage";

/// Both names the usage summary has been exported under.
pub const USAGE_ELEMENTS: [&str; 2] = [
    "summary_of_maximum_element_usages_for_structure_range",
    "summary_of_maximum_usages_by_load_case_for_structure_range",
];

/// Element types that show up in the report; everything else is dropped.
pub const KEPT_ELEMENT_TYPES: [&str; 2] = ["Guy", "Cable"];

pub fn parse_usage(xml: &str) -> Result<Parsed<ListSource<GuyUsage>>, SourceError> {
    let records = extract_records(xml, &USAGE_ELEMENTS)?;
    let mut parsed = Parsed::<ListSource<GuyUsage>>::default();

    for record in &records {
        let element_type = field(record, "element_type");
        if !KEPT_ELEMENT_TYPES.contains(&element_type) {
            continue;
        }

        match normalize(field(record, "str_no")) {
            Ok(key) => parsed.data.push(
                key,
                GuyUsage {
                    element_label: field(record, "element_label").to_string(),
                    element_type: element_type.to_string(),
                    max_usage: field(record, "maximum_usage").to_string(),
                },
            ),
            Err(e) => parsed.skip(SOURCE, e),
        }
    }

    log::debug!(
        "[{SOURCE}] {} elements across {} structures",
        parsed.data.entry_count(),
        parsed.data.len()
    );
    Ok(parsed)
}
