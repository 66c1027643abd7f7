use std::collections::{BTreeMap, BTreeSet};

use crate::error::Diagnostic;
use crate::model::{ListSource, OutputRow, ReconSummary, SourceCoverage, SourceSet, StakePoint};

/// Compute summary statistics for a finished run.
pub fn compute_summary(
    sources: &SourceSet,
    staking: &ListSource<StakePoint>,
    rows: &[OutputRow],
    diagnostics: &[Diagnostic],
) -> ReconSummary {
    let mut diagnostic_counts: BTreeMap<String, usize> = BTreeMap::new();
    for d in diagnostics {
        *diagnostic_counts.entry(d.source.clone()).or_insert(0) += 1;
    }

    let mut anchors = 0;
    let mut degenerate_anchors = 0;
    for (_, list) in sources.anchors.iter() {
        for a in list {
            anchors += 1;
            if a.is_degenerate() {
                degenerate_anchors += 1;
            }
        }
    }

    let sequences: BTreeSet<_> = rows.iter().map(|r| &r.sequence).collect();

    ReconSummary {
        sequences: sequences.len(),
        rows: rows.len(),
        anchors,
        degenerate_anchors,
        coverage: SourceCoverage {
            his: sources.his.len(),
            fusing: sources.fusing.len(),
            staking: staking.len(),
            pole_type: sources.pole_types.len(),
            guy_usage: sources.guy_usage.len(),
            max_force: sources.max_force.len(),
        },
        diagnostics: diagnostics.len(),
        diagnostic_counts,
    }
}
