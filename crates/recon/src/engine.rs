use crate::config::ProjectConfig;
use crate::error::{Diagnostic, ReconError};
use crate::geometry::{resolve_anchors, CompassScheme, GuyMarkers};
use crate::model::{AnchorCandidate, ListSource, ReconInput, ReconMeta, ReconResult, SourceSet, StakePoint};
use crate::reconcile::combine;
use crate::render::render;
use crate::summary::compute_summary;

/// Source label used on anchor diagnostics.
pub const STAKING_SOURCE: &str = "staking";

/// Run the whole pipeline: resolve anchors, join, expand rows.
///
/// Never fails: skipped records end up in `diagnostics`, and a run with no
/// measurable anchors still yields one row per known structure.
pub fn run(config: &ProjectConfig, input: ReconInput) -> ReconResult {
    let ReconInput {
        his,
        fusing,
        staking,
        pole_types,
        guy_usage,
        max_force,
        mut diagnostics,
    } = input;

    let (anchors, anchor_diagnostics) =
        resolve_all(&staking, &config.anchors.markers(), config.anchors.compass);
    diagnostics.extend(anchor_diagnostics);

    let sources = SourceSet {
        his,
        fusing,
        anchors,
        pole_types,
        guy_usage,
        max_force,
    };

    for (name, empty) in source_availability(&sources, &staking) {
        if empty {
            let e = ReconError::SourceUnavailable { source: name.to_string() };
            log::debug!("{e}");
        }
    }

    let records = combine(&sources);
    let rows = render(&records);
    let summary = compute_summary(&sources, &staking, &rows, &diagnostics);

    log::info!(
        "project '{}': {} sequences, {} rows, {} diagnostics",
        config.name,
        summary.sequences,
        summary.rows,
        summary.diagnostics
    );

    ReconResult {
        meta: ReconMeta {
            project_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        rows,
        diagnostics,
    }
}

/// Resolve anchors for every staked sequence.
pub fn resolve_all(
    staking: &ListSource<StakePoint>,
    markers: &GuyMarkers,
    scheme: CompassScheme,
) -> (ListSource<AnchorCandidate>, Vec<Diagnostic>) {
    let mut anchors = ListSource::new();
    let mut diagnostics = Vec::new();

    for (sequence, points) in staking.iter() {
        let resolution = resolve_anchors(sequence, points, markers, scheme);
        diagnostics.extend(
            resolution
                .warnings
                .into_iter()
                .map(|e| Diagnostic::new(STAKING_SOURCE, e)),
        );
        if !resolution.anchors.is_empty() {
            anchors.extend(sequence.clone(), resolution.anchors);
        }
    }

    (anchors, diagnostics)
}

fn source_availability(sources: &SourceSet, staking: &ListSource<StakePoint>) -> [(&'static str, bool); 6] {
    [
        ("his", sources.his.is_empty()),
        ("fusing", sources.fusing.is_empty()),
        (STAKING_SOURCE, staking.is_empty()),
        ("pole_type", sources.pole_types.is_empty()),
        ("guy_usage", sources.guy_usage.is_empty()),
        ("max_force", sources.max_force.is_empty()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FillBand, HisRecord};
    use crate::sequence::normalize;

    fn point(desc: &str, x: &str, y: &str) -> StakePoint {
        StakePoint {
            stake_description: desc.into(),
            framing: "TAN".into(),
            latitude: "40.0".into(),
            longitude: "-111.0".into(),
            x_easting: x.into(),
            y_northing: y.into(),
        }
    }

    #[test]
    fn anchors_flow_into_rows() {
        let mut input = ReconInput::default();
        let k = normalize("0005").unwrap();
        input.staking.push(k.clone(), point("P1", "1000.0", "2000.0"));
        input.staking.push(k.clone(), point("PG1", "1000.0", "2050.0"));
        input.his.insert(k.clone(), HisRecord { facility_id: "F5".into(), ..Default::default() });

        let result = run(&ProjectConfig::named("t"), input);
        assert_eq!(result.rows.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row.anchor_type, "P1 to PG1");
        assert_eq!(row.anchor_direction, "N");
        assert_eq!(row.lead_length, "50.00");
        assert_eq!(row.facility_id, "F5");
        assert_eq!(row.band, FillBand::Light);
        assert_eq!(result.summary.anchors, 1);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn staked_sequence_without_base_still_renders_from_other_sources() {
        let mut input = ReconInput::default();
        let k = normalize("0006").unwrap();
        input.staking.push(k.clone(), point("PG1", "0", "0"));
        input.fusing.push(k.clone(), "NEW".into());

        let result = run(&ProjectConfig::named("t"), input);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].anchor_type, "");
        assert_eq!(result.rows[0].tap, "NEW");
    }

    #[test]
    fn skipped_points_become_diagnostics() {
        let mut input = ReconInput::default();
        let k = normalize("0007").unwrap();
        input.staking.push(k.clone(), point("P1", "0", "0"));
        input.staking.push(k.clone(), point("PG1", "", ""));
        input
            .diagnostics
            .push(Diagnostic::new("fusing", ReconError::MalformedKey { raw: "x".into() }));

        let result = run(&ProjectConfig::named("t"), input);
        assert_eq!(result.diagnostics.len(), 2);
        assert_eq!(result.diagnostics[1].source, STAKING_SOURCE);
        assert_eq!(result.summary.degenerate_anchors, 1);
        assert_eq!(result.rows[0].anchor_type, "P1");
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let input = ReconInput::default();
        assert!(input.is_empty());
        let result = run(&ProjectConfig::named("t"), input);
        assert!(result.rows.is_empty());
        assert_eq!(result.summary.sequences, 0);
        assert_eq!(result.meta.project_name, "t");
    }
}
