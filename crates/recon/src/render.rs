//! Row expansion of reconciled records.
//!
//! A structure with several taps, anchors or guy usages becomes a block of
//! rows. Scalar columns are printed on the first row of the block only;
//! list columns are laid out by index.

use std::collections::HashMap;

use crate::model::{FillBand, OutputRow, UnifiedRecord};
use crate::sequence::SequenceKey;

/// Expand records into table rows, ordered by sequence number.
pub fn render(records: &HashMap<SequenceKey, UnifiedRecord>) -> Vec<OutputRow> {
    let mut keys: Vec<&SequenceKey> = records.keys().collect();
    keys.sort();

    let mut rows = Vec::new();
    let mut band = FillBand::Shaded;

    for key in keys {
        band = band.toggled();
        rows.extend(render_block(key, &records[key], band));
    }

    rows
}

/// Rows for a single record; always at least one.
pub fn render_block(key: &SequenceKey, record: &UnifiedRecord, band: FillBand) -> Vec<OutputRow> {
    (0..record.row_count())
        .map(|i| {
            let first = i == 0;
            let scalar = |value: &str| if first { value.to_string() } else { String::new() };
            let tap = record.taps.get(i).cloned().unwrap_or_default();
            let anchor = record.anchors.get(i);
            let guy = record.guy_usage.get(i);

            OutputRow {
                sequence: key.clone(),
                row_index: i,
                band,
                facility_id: scalar(&record.facility_id),
                existing_transformers: scalar(&record.existing_transformers),
                primary_riser: scalar(&record.primary_riser),
                secondary_riser: scalar(&record.secondary_riser),
                tap,
                anchor_type: anchor.map(|a| a.anchor_type.clone()).unwrap_or_default(),
                latitude: anchor.map(|a| a.latitude.clone()).unwrap_or_default(),
                longitude: anchor.map(|a| a.longitude.clone()).unwrap_or_default(),
                framing: anchor.map(|a| a.framing.clone()).unwrap_or_default(),
                anchor_direction: anchor
                    .map(|a| a.direction_label().to_string())
                    .unwrap_or_default(),
                lead_length: anchor.map(|a| a.lead_length_label()).unwrap_or_default(),
                pole_type: scalar(&record.pole_type),
                element_label: guy.map(|g| g.element_label.clone()).unwrap_or_default(),
                element_type: guy.map(|g| g.element_type.clone()).unwrap_or_default(),
                max_usage: guy.map(|g| g.max_usage.clone()).unwrap_or_default(),
                max_force: scalar(&record.max_force),
                soil_class: scalar(&record.soil_class),
                description: scalar(&record.description),
            }
        })
        .collect()
}
