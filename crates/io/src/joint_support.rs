//! Joint support reactions XML: worst shear/bending reaction per structure.

use std::collections::BTreeMap;

use polegrid_recon::sequence::{normalize, SequenceKey};

use crate::error::SourceError;
use crate::xml::{extract_records, field};
use crate::Parsed;

pub const SOURCE: &str = "max_force";
pub const JOINT_SUPPORT_ELEMENT: &str =
    "summary_of_joint_support_reactions_for_all_load_cases_for_structure_range";

/// Maximum of shear force and bending moment across all load cases.
pub fn parse_joint_support(xml: &str) -> Result<Parsed<BTreeMap<SequenceKey, f64>>, SourceError> {
    let records = extract_records(xml, &[JOINT_SUPPORT_ELEMENT])?;
    let mut parsed = Parsed::<BTreeMap<SequenceKey, f64>>::default();

    for record in &records {
        let key = match normalize(field(record, "str_no")) {
            Ok(key) => key,
            Err(e) => {
                parsed.skip(SOURCE, e);
                continue;
            }
        };

        let number = |name: &str| field(record, name).parse::<f64>().ok().filter(|v| v.is_finite());
        let force = match (number("shear_force"), number("bending_moment")) {
            (Some(shear), Some(bending)) => shear.max(bending),
            (Some(v), None) | (None, Some(v)) => v,
            (None, None) => {
                log::warn!("[{SOURCE}] structure {key}: no numeric reaction; load case skipped");
                continue;
            }
        };

        parsed
            .data
            .entry(key)
            .and_modify(|max| *max = max.max(force))
            .or_insert(force);
    }

    log::debug!("[{SOURCE}] reactions for {} structures", parsed.data.len());
    Ok(parsed)
}
