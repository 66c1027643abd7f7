//! Pasted soil class table, merged with joint support reactions into the
//! max-force source.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use polegrid_recon::model::{MaxForceRecord, ScalarSource};
use polegrid_recon::sequence::SequenceKey;
use polegrid_recon::ReconError;
use regex::Regex;

use crate::Parsed;

pub const SOURCE: &str = "soil";

/// Soil class for structures the soil table does not mention.
pub const UNKNOWN_SOIL_CLASS: &str = "N/A";

/// Highest structure number a four-digit key can hold.
const MAX_SEQUENCE: u64 = 9999;

#[derive(Debug, Clone, PartialEq)]
pub struct SoilEntry {
    pub soil_class: String,
    pub description: String,
}

fn soil_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)(?:-(\d+))?\s+(\d+)\s+(.*)$").expect("static pattern"))
}

/// Parse lines of `START[-END] CLASS DESCRIPTION`. Ranges are inclusive;
/// later lines overwrite earlier ones. Lines that don't match are ignored.
pub fn parse_soil(text: &str) -> Parsed<BTreeMap<SequenceKey, SoilEntry>> {
    let mut parsed = Parsed::<BTreeMap<SequenceKey, SoilEntry>>::default();

    for line in text.lines() {
        let line = line.trim();
        let Some(caps) = soil_line().captures(line) else {
            if !line.is_empty() {
                log::debug!("[{SOURCE}] ignoring line '{line}'");
            }
            continue;
        };

        let start = caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok());
        let end = match caps.get(2) {
            Some(m) => m.as_str().parse::<u64>().ok(),
            None => start,
        };
        let (Some(start), Some(end)) = (start, end) else {
            parsed.skip(SOURCE, ReconError::MalformedKey { raw: line.to_string() });
            continue;
        };
        if start > MAX_SEQUENCE || end > MAX_SEQUENCE {
            parsed.skip(SOURCE, ReconError::MalformedKey { raw: line.to_string() });
            continue;
        }

        let entry = SoilEntry {
            soil_class: caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default(),
            description: caps.get(4).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
        };
        for n in start..=end {
            match SequenceKey::from_number(n) {
                Ok(key) => {
                    parsed.data.insert(key, entry.clone());
                }
                Err(e) => parsed.skip(SOURCE, e),
            }
        }
    }

    log::debug!("[{SOURCE}] soil class for {} structures", parsed.data.len());
    parsed
}

/// Build the max-force source.
///
/// Every structure with a reaction gets its force (two decimals) and the
/// soil class from the table, or `N/A`. The soil table only annotates
/// structures that have a force; its ranges never add structures.
pub fn merge_max_force(
    forces: &BTreeMap<SequenceKey, f64>,
    soil: &BTreeMap<SequenceKey, SoilEntry>,
) -> ScalarSource<MaxForceRecord> {
    let mut merged = ScalarSource::new();

    for (key, force) in forces {
        let (soil_class, description) = match soil.get(key) {
            Some(entry) => (entry.soil_class.clone(), entry.description.clone()),
            None => (UNKNOWN_SOIL_CLASS.to_string(), String::new()),
        };
        merged.insert(
            key.clone(),
            MaxForceRecord {
                max_force: format!("{force:.2}"),
                soil_class,
                description,
            },
        );
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u64) -> SequenceKey {
        SequenceKey::from_number(n).unwrap()
    }

    const PASTED: &str = "\
Structure  Class  Description
1-3   4   Stiff clay
5 2 Dense sand and gravel
  8-7 3 backwards range
20000 1 out of range
";

    #[test]
    fn ranges_expand_inclusive() {
        let parsed = parse_soil(PASTED);
        for n in 1..=3 {
            assert_eq!(parsed.data[&key(n)].soil_class, "4");
            assert_eq!(parsed.data[&key(n)].description, "Stiff clay");
        }
        assert!(!parsed.data.contains_key(&key(4)));
        assert_eq!(parsed.data[&key(5)].description, "Dense sand and gravel");
        // 8-7 is an empty range
        assert!(!parsed.data.contains_key(&key(7)));
        assert_eq!(parsed.data.len(), 4);
        assert_eq!(parsed.diagnostics.len(), 1);
    }

    #[test]
    fn later_lines_overwrite() {
        let parsed = parse_soil("1-2 4 clay\n2 5 rock\n");
        assert_eq!(parsed.data[&key(1)].soil_class, "4");
        assert_eq!(parsed.data[&key(2)].soil_class, "5");
    }

    #[test]
    fn merge_defaults_unknown_soil() {
        let mut forces = BTreeMap::new();
        forces.insert(key(1), 1832.4);
        forces.insert(key(9), 15.0);
        let soil = parse_soil("1 4 clay\n12 2 sand\n").data;

        let merged = merge_max_force(&forces, &soil);
        assert_eq!(merged.len(), 2);

        let one = merged.get(&key(1)).unwrap();
        assert_eq!(one.max_force, "1832.40");
        assert_eq!(one.soil_class, "4");
        assert_eq!(one.description, "clay");

        let nine = merged.get(&key(9)).unwrap();
        assert_eq!(nine.soil_class, UNKNOWN_SOIL_CLASS);
        assert_eq!(nine.description, "");

        // Soil-only structure is not added
        assert!(merged.get(&key(12)).is_none());
    }

    #[test]
    fn wide_soil_range_adds_no_structures() {
        let mut forces = BTreeMap::new();
        forces.insert(key(1), 1200.0);
        let soil = parse_soil("1-500 3 Stiff clay\n").data;
        assert_eq!(soil.len(), 500);

        let merged = merge_max_force(&forces, &soil);
        assert_eq!(merged.len(), 1);
        let one = merged.get(&key(1)).unwrap();
        assert_eq!(one.max_force, "1200.00");
        assert_eq!(one.soil_class, "3");
        assert_eq!(one.description, "Stiff clay");
    }
}
