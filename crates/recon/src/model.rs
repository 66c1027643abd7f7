use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Diagnostic;
use crate::geometry::Compass;
use crate::sequence::SequenceKey;

// ---------------------------------------------------------------------------
// Partial records
// ---------------------------------------------------------------------------

/// Source with at most one record per sequence. Re-inserting a key replaces
/// the earlier record (last write wins).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSource<T> {
    records: BTreeMap<SequenceKey, T>,
}

impl<T> ScalarSource<T> {
    pub fn new() -> Self {
        Self { records: BTreeMap::new() }
    }

    pub fn insert(&mut self, key: SequenceKey, record: T) {
        self.records.insert(key, record);
    }

    pub fn get(&self, key: &SequenceKey) -> Option<&T> {
        self.records.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &SequenceKey> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SequenceKey, &T)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Default for ScalarSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(SequenceKey, T)> for ScalarSource<T> {
    fn from_iter<I: IntoIterator<Item = (SequenceKey, T)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (key, record) in iter {
            source.insert(key, record);
        }
        source
    }
}

/// Source with an ordered, append-only list of records per sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSource<T> {
    records: BTreeMap<SequenceKey, Vec<T>>,
}

impl<T> ListSource<T> {
    pub fn new() -> Self {
        Self { records: BTreeMap::new() }
    }

    pub fn push(&mut self, key: SequenceKey, record: T) {
        self.records.entry(key).or_default().push(record);
    }

    pub fn extend(&mut self, key: SequenceKey, records: impl IntoIterator<Item = T>) {
        self.records.entry(key).or_default().extend(records);
    }

    pub fn get(&self, key: &SequenceKey) -> &[T] {
        self.records.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &SequenceKey> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SequenceKey, &[T])> {
        self.records.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of sequences (not entries).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total entries across all sequences.
    pub fn entry_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

impl<T> Default for ListSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(SequenceKey, T)> for ListSource<T> {
    fn from_iter<I: IntoIterator<Item = (SequenceKey, T)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (key, record) in iter {
            source.push(key, record);
        }
        source
    }
}

/// Structure attributes from the HIS workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HisRecord {
    pub facility_id: String,
    pub existing_transformers: String,
    pub primary_riser: String,
    pub secondary_riser: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuyUsage {
    pub element_label: String,
    pub element_type: String,
    pub max_usage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaxForceRecord {
    pub max_force: String,
    pub soil_class: String,
    pub description: String,
}

/// One raw point from the construction staking report.
///
/// Coordinates stay as report text; the anchor resolver decides whether they
/// are usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StakePoint {
    pub stake_description: String,
    pub framing: String,
    pub latitude: String,
    pub longitude: String,
    pub x_easting: String,
    pub y_northing: String,
}

/// Resolved guy/anchor row for one structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorCandidate {
    pub sequence: SequenceKey,
    /// `"P1 to <description>"`, or `"P1"` for a pole with no measured anchor.
    pub anchor_type: String,
    pub latitude: String,
    pub longitude: String,
    pub framing: String,
    pub anchor_direction: Option<Compass>,
    /// Feet from the pole base point.
    pub lead_length: f64,
}

impl AnchorCandidate {
    pub fn is_degenerate(&self) -> bool {
        self.anchor_direction.is_none() && self.lead_length == 0.0 && self.anchor_type == "P1"
    }

    pub fn direction_label(&self) -> &'static str {
        self.anchor_direction.map(|d| d.label()).unwrap_or("")
    }

    pub fn lead_length_label(&self) -> String {
        format!("{:.2}", self.lead_length)
    }
}

/// The six sequence-keyed partial datasets the reconciler joins.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    pub his: ScalarSource<HisRecord>,
    pub fusing: ListSource<String>,
    pub anchors: ListSource<AnchorCandidate>,
    pub pole_types: ScalarSource<String>,
    pub guy_usage: ListSource<GuyUsage>,
    pub max_force: ScalarSource<MaxForceRecord>,
}

/// Parser output before anchor geometry has been resolved.
///
/// Staking points are grouped by sequence in report order; everything else
/// is already in its final partial form.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub his: ScalarSource<HisRecord>,
    pub fusing: ListSource<String>,
    pub staking: ListSource<StakePoint>,
    pub pole_types: ScalarSource<String>,
    pub guy_usage: ListSource<GuyUsage>,
    pub max_force: ScalarSource<MaxForceRecord>,
    /// Records the parsers skipped.
    pub diagnostics: Vec<Diagnostic>,
}

impl ReconInput {
    /// True when no source contributed a single record.
    pub fn is_empty(&self) -> bool {
        self.his.is_empty()
            && self.fusing.is_empty()
            && self.staking.is_empty()
            && self.pole_types.is_empty()
            && self.guy_usage.is_empty()
            && self.max_force.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reconciled
// ---------------------------------------------------------------------------

/// Everything known about one structure after the join.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnifiedRecord {
    pub facility_id: String,
    pub existing_transformers: String,
    pub primary_riser: String,
    pub secondary_riser: String,
    pub taps: Vec<String>,
    pub anchors: Vec<AnchorCandidate>,
    pub pole_type: String,
    pub guy_usage: Vec<GuyUsage>,
    pub max_force: String,
    pub soil_class: String,
    pub description: String,
}

impl UnifiedRecord {
    /// Rows this record expands to; never less than one.
    pub fn row_count(&self) -> usize {
        self.taps
            .len()
            .max(self.anchors.len())
            .max(self.guy_usage.len())
            .max(1)
    }
}

// ---------------------------------------------------------------------------
// Rendered
// ---------------------------------------------------------------------------

/// Alternating background band; flips at each new sequence block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillBand {
    Light,
    Shaded,
}

impl FillBand {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Shaded,
            Self::Shaded => Self::Light,
        }
    }
}

/// Column order handed to table writers.
pub const COLUMNS: [&str; 19] = [
    "sequence",
    "facility_id",
    "existing_transformers",
    "primary_riser",
    "secondary_riser",
    "tap",
    "anchor_type",
    "latitude",
    "longitude",
    "framing",
    "anchor_direction",
    "lead_length",
    "pole_type",
    "element_label",
    "element_type",
    "max_usage",
    "max_force",
    "soil_class",
    "description",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub sequence: SequenceKey,
    /// Position within the sequence's block.
    pub row_index: usize,
    pub band: FillBand,
    pub facility_id: String,
    pub existing_transformers: String,
    pub primary_riser: String,
    pub secondary_riser: String,
    pub tap: String,
    pub anchor_type: String,
    pub latitude: String,
    pub longitude: String,
    pub framing: String,
    pub anchor_direction: String,
    pub lead_length: String,
    pub pole_type: String,
    pub element_label: String,
    pub element_type: String,
    pub max_usage: String,
    pub max_force: String,
    pub soil_class: String,
    pub description: String,
}

impl OutputRow {
    pub fn is_block_start(&self) -> bool {
        self.row_index == 0
    }

    /// Cell values in [`COLUMNS`] order.
    pub fn cells(&self) -> [&str; 19] {
        [
            self.sequence.as_str(),
            &self.facility_id,
            &self.existing_transformers,
            &self.primary_riser,
            &self.secondary_riser,
            &self.tap,
            &self.anchor_type,
            &self.latitude,
            &self.longitude,
            &self.framing,
            &self.anchor_direction,
            &self.lead_length,
            &self.pole_type,
            &self.element_label,
            &self.element_type,
            &self.max_usage,
            &self.max_force,
            &self.soil_class,
            &self.description,
        ]
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

/// Number of sequences each source contributed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceCoverage {
    pub his: usize,
    pub fusing: usize,
    pub staking: usize,
    pub pole_type: usize,
    pub guy_usage: usize,
    pub max_force: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub sequences: usize,
    pub rows: usize,
    pub anchors: usize,
    pub degenerate_anchors: usize,
    pub coverage: SourceCoverage,
    pub diagnostics: usize,
    pub diagnostic_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub project_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub rows: Vec<OutputRow>,
    pub diagnostics: Vec<Diagnostic>,
}
