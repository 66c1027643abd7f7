use polegrid_recon::config::ProjectConfig;
use polegrid_recon::engine::run;
use polegrid_recon::model::{
    FillBand, GuyUsage, HisRecord, MaxForceRecord, ReconInput, ReconResult, StakePoint, COLUMNS,
};
use polegrid_recon::sequence::{normalize, SequenceKey};
use polegrid_recon::CompassScheme;

const PROJECT: &str = r#"
name = "Circuit 12 rebuild"

[sources]
staking = "staking.xml"
usage = "staking.xml"
fusing = "fusing.txt"
"#;

fn key(raw: &str) -> SequenceKey {
    normalize(raw).unwrap()
}

fn point(desc: &str, framing: &str, x: f64, y: f64) -> StakePoint {
    StakePoint {
        stake_description: desc.into(),
        framing: framing.into(),
        latitude: "40.76".into(),
        longitude: "-111.89".into(),
        x_easting: x.to_string(),
        y_northing: y.to_string(),
    }
}

fn guy(label: &str) -> GuyUsage {
    GuyUsage {
        element_label: label.into(),
        element_type: "Guy".into(),
        max_usage: "62.5".into(),
    }
}

fn run_input(input: ReconInput) -> ReconResult {
    let config = ProjectConfig::from_toml(PROJECT).unwrap();
    run(&config, input)
}

fn column(name: &str) -> usize {
    COLUMNS.iter().position(|c| *c == name).unwrap()
}

// -------------------------------------------------------------------------
// Single-source structures
// -------------------------------------------------------------------------

#[test]
fn pole_type_only_structure_renders_one_row() {
    let mut input = ReconInput::default();
    input.pole_types.insert(key("0042"), "DIST-S-02.9-C1-50-0".into());

    let result = run_input(input);
    assert_eq!(result.rows.len(), 1);

    let cells = result.rows[0].cells();
    for (i, value) in cells.iter().enumerate() {
        match COLUMNS[i] {
            "sequence" => assert_eq!(*value, "0042"),
            "pole_type" => assert_eq!(*value, "DIST-S-02.9-C1-50-0"),
            other => assert_eq!(*value, "", "column {other} should be empty"),
        }
    }
    assert_eq!(result.summary.coverage.pole_type, 1);
    assert_eq!(result.summary.coverage.his, 0);
}

// -------------------------------------------------------------------------
// Block expansion
// -------------------------------------------------------------------------

#[test]
fn taps_anchors_and_guys_expand_to_longest_list() {
    let k = key("0007");
    let mut input = ReconInput::default();
    input.his.insert(
        k.clone(),
        HisRecord {
            facility_id: "F-77".into(),
            existing_transformers: "1".into(),
            primary_riser: "Y".into(),
            secondary_riser: String::new(),
        },
    );
    input.fusing.push(k.clone(), "T-100K".into());
    input.fusing.push(k.clone(), "T-65K".into());
    input.staking.push(k.clone(), point("P1", "C1", 1000.0, 2000.0));
    input.staking.push(k.clone(), point("PG1", "C1", 1000.0, 2050.0));
    input.guy_usage.extend(k.clone(), [guy("G1"), guy("G2"), guy("G3")]);
    input.max_force.insert(
        k.clone(),
        MaxForceRecord {
            max_force: "1832.40".into(),
            soil_class: "4".into(),
            description: "Clay".into(),
        },
    );

    let result = run_input(input);
    let rows = &result.rows;
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].tap, "T-100K");
    assert_eq!(rows[0].anchor_type, "P1 to PG1");
    assert_eq!(rows[0].element_label, "G1");
    assert_eq!(rows[0].facility_id, "F-77");
    assert_eq!(rows[0].max_force, "1832.40");
    assert_eq!(rows[0].soil_class, "4");

    assert_eq!(rows[1].tap, "T-65K");
    assert_eq!(rows[1].anchor_type, "");
    assert_eq!(rows[1].element_label, "G2");
    assert_eq!(rows[1].facility_id, "");
    assert_eq!(rows[1].max_force, "");

    assert_eq!(rows[2].tap, "");
    assert_eq!(rows[2].anchor_type, "");
    assert_eq!(rows[2].element_label, "G3");
    assert_eq!(rows[2].soil_class, "");

    assert!(rows.iter().all(|r| r.sequence.as_str() == "0007"));
    assert!(rows[0].is_block_start());
    assert!(!rows[1].is_block_start());
}

// -------------------------------------------------------------------------
// Anchor geometry
// -------------------------------------------------------------------------

#[test]
fn due_north_anchor() {
    let k = key("0003");
    let mut input = ReconInput::default();
    input.staking.push(k.clone(), point("P1", "TAN", 1000.0, 2000.0));
    input.staking.push(k.clone(), point("PG1", "TAN", 1000.0, 2050.0));

    let row = &run_input(input).rows[0];
    assert_eq!(row.anchor_direction, "N");
    assert_eq!(row.lead_length, "50.00");
    assert_eq!(row.cells()[column("lead_length")], "50.00");
}

#[test]
fn shallow_bearing_is_east() {
    let k = key("0004");
    let mut input = ReconInput::default();
    input.staking.push(k.clone(), point("P1", "TAN", 0.0, 0.0));
    input.staking.push(k.clone(), point("NG1", "TAN", 100.0, 3.0));

    let row = &run_input(input).rows[0];
    assert_eq!(row.anchor_direction, "E");
    assert_eq!(row.lead_length, "100.04");
}

#[test]
fn octant_scheme_from_config() {
    let toml = format!("{PROJECT}\n[anchors]\ncompass = \"octant\"\n");
    let config = ProjectConfig::from_toml(&toml).unwrap();
    assert_eq!(config.anchors.compass, CompassScheme::Octant);

    // 20 degrees: NE under the staking partition, E under uniform octants.
    let k = key("0005");
    let theta = 20f64.to_radians();
    let mut input = ReconInput::default();
    input.staking.push(k.clone(), point("P1", "TAN", 0.0, 0.0));
    input
        .staking
        .push(k.clone(), point("PG1", "TAN", 100.0 * theta.cos(), 100.0 * theta.sin()));

    let octant = run(&config, input.clone());
    assert_eq!(octant.rows[0].anchor_direction, "E");

    let staking = run_input(input);
    assert_eq!(staking.rows[0].anchor_direction, "NE");
}

#[test]
fn unmeasurable_structure_still_gets_degenerate_row() {
    let k = key("0011");
    let mut input = ReconInput::default();
    input.staking.push(k.clone(), point("P1", "DE-3", 0.0, 0.0));
    input.staking.push(
        k.clone(),
        StakePoint {
            x_easting: "n/a".into(),
            ..point("PG1", "DE-3", 0.0, 0.0)
        },
    );

    let result = run_input(input);
    assert_eq!(result.rows.len(), 1);
    let row = &result.rows[0];
    assert_eq!(row.anchor_type, "P1");
    assert_eq!(row.framing, "DE-3");
    assert_eq!(row.lead_length, "0.00");
    assert_eq!(row.anchor_direction, "");
    assert_eq!(result.summary.degenerate_anchors, 1);
    assert_eq!(result.summary.diagnostic_counts["staking"], 1);
}

// -------------------------------------------------------------------------
// Ordering + bands
// -------------------------------------------------------------------------

#[test]
fn numeric_ordering_across_sources() {
    let mut input = ReconInput::default();
    input.pole_types.insert(SequenceKey::new("10").unwrap(), "B".into());
    input.pole_types.insert(key("0009"), "A".into());
    input.fusing.push(key("0100"), "C".into());

    let result = run_input(input);
    let seqs: Vec<&str> = result.rows.iter().map(|r| r.sequence.as_str()).collect();
    assert_eq!(seqs, vec!["0009", "10", "0100"]);
}

#[test]
fn bands_alternate_by_block() {
    let mut input = ReconInput::default();
    input.fusing.extend(key("0001"), ["a".to_string(), "b".to_string()]);
    input.fusing.push(key("0002"), "c".into());
    input.fusing.push(key("0003"), "d".into());

    let bands: Vec<FillBand> = run_input(input).rows.iter().map(|r| r.band).collect();
    assert_eq!(
        bands,
        vec![FillBand::Light, FillBand::Light, FillBand::Shaded, FillBand::Light]
    );
}

// -------------------------------------------------------------------------
// Serialization
// -------------------------------------------------------------------------

#[test]
fn result_serializes_to_json() {
    let mut input = ReconInput::default();
    input.pole_types.insert(key("0042"), "WOOD-45".into());

    let result = run_input(input);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["meta"]["project_name"], "Circuit 12 rebuild");
    assert_eq!(json["rows"][0]["sequence"], "0042");
    assert_eq!(json["rows"][0]["pole_type"], "WOOD-45");
    assert_eq!(json["summary"]["rows"], 1);
}
