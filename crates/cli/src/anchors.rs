//! `polegrid anchors` — resolve guy anchors straight from a staking report.

use std::path::PathBuf;

use clap::ValueEnum;
use polegrid_io::project::read_file_as_utf8;
use polegrid_io::staking::parse_staking;
use polegrid_recon::engine::resolve_all;
use polegrid_recon::{CompassScheme, GuyMarkers};

use crate::exit_codes::EXIT_NO_DATA;
use crate::CliError;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CompassArg {
    /// Narrow cardinal windows, diagonals take the rest
    Staking,
    /// Uniform 45° octants
    Octant,
}

impl From<CompassArg> for CompassScheme {
    fn from(arg: CompassArg) -> Self {
        match arg {
            CompassArg::Staking => CompassScheme::Staking,
            CompassArg::Octant => CompassScheme::Octant,
        }
    }
}

pub fn cmd_anchors(
    staking_xml: PathBuf,
    compass: CompassArg,
    markers: Vec<String>,
    json_output: bool,
) -> Result<(), CliError> {
    if markers.iter().any(|m| m.trim().is_empty()) {
        return Err(CliError::args("--marker must not be blank"));
    }
    let markers = if markers.is_empty() {
        GuyMarkers::default()
    } else {
        GuyMarkers::new(markers)
    };

    let xml = read_file_as_utf8(&staking_xml).map_err(CliError::source)?;
    let report = parse_staking(&xml).map_err(CliError::source)?;
    let mut diagnostics = report.diagnostics;
    let points = report.data.points;
    if points.is_empty() {
        return Err(CliError::new(
            EXIT_NO_DATA,
            format!("no staking points in {}", staking_xml.display()),
        ));
    }

    let (anchors, anchor_diagnostics) = resolve_all(&points, &markers, compass.into());
    diagnostics.extend(anchor_diagnostics);

    if json_output {
        let list: Vec<_> = anchors.iter().flat_map(|(_, list)| list).collect();
        let value = serde_json::json!({
            "anchors": list,
            "diagnostics": diagnostics,
        });
        let json_str = serde_json::to_string_pretty(&value)
            .map_err(|e| CliError::error(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        println!("sequence\tanchor_type\tanchor_direction\tlead_length\tframing");
        for (sequence, list) in anchors.iter() {
            for a in list {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    sequence.as_str(),
                    a.anchor_type,
                    a.direction_label(),
                    a.lead_length_label(),
                    a.framing
                );
            }
        }
    }

    for d in &diagnostics {
        eprintln!("warning: {d}");
    }
    eprintln!(
        "{} structures, {} anchors, {} skipped points",
        anchors.len(),
        anchors.entry_count(),
        diagnostics.len()
    );
    Ok(())
}
