use std::collections::{BTreeSet, HashMap};

use crate::model::{SourceSet, UnifiedRecord};
use crate::sequence::SequenceKey;

/// Every sequence any source mentions.
pub fn key_union(sources: &SourceSet) -> BTreeSet<SequenceKey> {
    let mut keys = BTreeSet::new();
    keys.extend(sources.his.keys().cloned());
    keys.extend(sources.fusing.keys().cloned());
    keys.extend(sources.anchors.keys().cloned());
    keys.extend(sources.pole_types.keys().cloned());
    keys.extend(sources.guy_usage.keys().cloned());
    keys.extend(sources.max_force.keys().cloned());
    keys
}

/// Join the six partial sources into one record per sequence.
///
/// Absent scalars become empty strings and absent lists empty vectors; a
/// sequence known to a single source still gets a complete record. No
/// cross-source checks are made.
pub fn combine(sources: &SourceSet) -> HashMap<SequenceKey, UnifiedRecord> {
    key_union(sources)
        .into_iter()
        .map(|key| {
            let record = unify(sources, &key);
            (key, record)
        })
        .collect()
}

fn unify(sources: &SourceSet, key: &SequenceKey) -> UnifiedRecord {
    let his = sources.his.get(key).cloned().unwrap_or_default();
    let force = sources.max_force.get(key).cloned().unwrap_or_default();

    UnifiedRecord {
        facility_id: his.facility_id,
        existing_transformers: his.existing_transformers,
        primary_riser: his.primary_riser,
        secondary_riser: his.secondary_riser,
        taps: sources.fusing.get(key).to_vec(),
        anchors: sources.anchors.get(key).to_vec(),
        pole_type: sources.pole_types.get(key).cloned().unwrap_or_default(),
        guy_usage: sources.guy_usage.get(key).to_vec(),
        max_force: force.max_force,
        soil_class: force.soil_class,
        description: force.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GuyUsage, HisRecord, MaxForceRecord};
    use crate::sequence::normalize;

    fn key(raw: &str) -> SequenceKey {
        normalize(raw).unwrap()
    }

    #[test]
    fn pole_type_only_sequence_gets_full_record() {
        let mut sources = SourceSet::default();
        sources.pole_types.insert(key("0042"), "DIST-S-02.9-C1-50-0".into());

        let combined = combine(&sources);
        assert_eq!(combined.len(), 1);
        let rec = &combined[&key("0042")];
        assert_eq!(rec.pole_type, "DIST-S-02.9-C1-50-0");
        assert_eq!(rec.facility_id, "");
        assert_eq!(rec.max_force, "");
        assert!(rec.taps.is_empty());
        assert!(rec.anchors.is_empty());
        assert!(rec.guy_usage.is_empty());
    }

    #[test]
    fn union_of_all_sources() {
        let mut sources = SourceSet::default();
        sources.his.insert(key("0001"), HisRecord::default());
        sources.fusing.push(key("0002"), "EXISTING".into());
        sources.guy_usage.push(
            key("0003"),
            GuyUsage {
                element_label: "G1".into(),
                element_type: "Guy".into(),
                max_usage: "41.2".into(),
            },
        );
        sources.max_force.insert(key("0004"), MaxForceRecord::default());
        sources.his.insert(key("0001"), HisRecord::default());

        let combined = combine(&sources);
        let mut keys: Vec<_> = combined.keys().map(|k| k.as_str().to_string()).collect();
        keys.sort();
        assert_eq!(keys, vec!["0001", "0002", "0003", "0004"]);
    }

    #[test]
    fn scalars_last_write_wins_lists_append() {
        let mut sources = SourceSet::default();
        sources.his.insert(
            key("0010"),
            HisRecord { facility_id: "old".into(), ..Default::default() },
        );
        sources.his.insert(
            key("SEQ 0010"),
            HisRecord { facility_id: "new".into(), ..Default::default() },
        );
        sources.fusing.push(key("0010"), "T1".into());
        sources.fusing.push(key("0010"), "T2".into());

        let rec = &combine(&sources)[&key("0010")];
        assert_eq!(rec.facility_id, "new");
        assert_eq!(rec.taps, vec!["T1", "T2"]);
    }

    #[test]
    fn empty_sources_combine_to_nothing() {
        assert!(combine(&SourceSet::default()).is_empty());
    }
}
