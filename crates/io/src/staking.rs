//! Construction staking report XML: staked points per structure, plus the
//! pole type recorded on each structure's base point.

use std::sync::OnceLock;

use polegrid_recon::geometry::REFERENCE_MARKER;
use polegrid_recon::model::{ListSource, ScalarSource, StakePoint};
use polegrid_recon::sequence::normalize;
use regex::Regex;

use crate::error::SourceError;
use crate::xml::{extract_records, field};
use crate::Parsed;

pub const SOURCE: &str = "staking";
pub const POLE_TYPE_SOURCE: &str = "pole_type";
pub const STAKING_ELEMENT: &str = "construction_staking_report";

#[derive(Debug, Clone, Default)]
pub struct StakingReport {
    pub points: ListSource<StakePoint>,
    pub pole_types: ScalarSource<String>,
}

pub fn parse_staking(xml: &str) -> Result<Parsed<StakingReport>, SourceError> {
    let records = extract_records(xml, &[STAKING_ELEMENT])?;
    let mut parsed = Parsed::<StakingReport>::default();

    for record in &records {
        let raw_sequence = field(record, "structure_number");
        let key = match normalize(raw_sequence) {
            Ok(key) => key,
            Err(e) => {
                parsed.skip(SOURCE, e);
                continue;
            }
        };

        let stake_description = field(record, "stake_description");
        if stake_description.contains(REFERENCE_MARKER) {
            parsed
                .data
                .pole_types
                .insert(key.clone(), field(record, "pole_property_label").to_string());
        }

        parsed.data.points.push(
            key,
            StakePoint {
                stake_description: stake_description.to_string(),
                framing: clean_framing(field(record, "structure_name"), raw_sequence),
                latitude: field(record, "latitude").to_string(),
                longitude: field(record, "longitude").to_string(),
                x_easting: field(record, "x_easting").to_string(),
                y_northing: field(record, "y_northing").to_string(),
            },
        );
    }

    log::debug!(
        "[{SOURCE}] {} points across {} structures, {} pole types",
        parsed.data.points.entry_count(),
        parsed.data.points.len(),
        parsed.data.pole_types.len()
    );
    Ok(parsed)
}

fn station_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+ST\d+\.\d+(?:\s+ST\d+\.\d+)*$").expect("static pattern"))
}

/// Reduce a structure name to its framing unit.
///
/// `"SEQ 0012 C1-3.POL ST50.01"` -> `"C1-3"`. For shared stakes the part
/// after `&` is kept.
pub fn clean_framing(structure_name: &str, raw_sequence: &str) -> String {
    let raw = raw_sequence.trim();
    let label = if raw.starts_with("SEQ") {
        raw.to_string()
    } else {
        format!("SEQ {raw}")
    };

    let mut framing = structure_name.replace(&label, "").trim().to_string();
    if let Some((_, rest)) = framing.split_once('&') {
        framing = rest.trim().to_string();
    }
    let framing = framing.replace(".POL", "");
    station_suffix().replace(framing.trim(), "").trim().to_string()
}
