//! `polegrid build` / `polegrid validate` — config-driven project runs.

use std::path::{Path, PathBuf};

use polegrid_recon::{ProjectConfig, ReconResult};

use crate::exit_codes::{EXIT_CONFIG, EXIT_IO, EXIT_NO_DATA};
use crate::CliError;

fn load_config(config_path: &Path) -> Result<ProjectConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        CliError::new(EXIT_IO, format!("cannot read config {}: {e}", config_path.display()))
    })?;
    ProjectConfig::from_toml(&config_str).map_err(|e| {
        CliError::new(EXIT_CONFIG, e.to_string())
            .with_hint(format!("check {}", config_path.display()))
    })
}

/// Report paths in the config are relative to the config file's directory.
fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

pub fn cmd_build(
    config_path: PathBuf,
    xlsx: Option<PathBuf>,
    csv: Option<PathBuf>,
    json_output: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base_dir = base_dir(&config_path);

    // Flags win over the config; flag paths stay relative to the cwd.
    let xlsx_path = xlsx.or_else(|| config.output.xlsx.as_ref().map(|p| base_dir.join(p)));
    let csv_path = csv.or_else(|| config.output.csv.as_ref().map(|p| base_dir.join(p)));
    if let (Some(x), Some(c)) = (&xlsx_path, &csv_path) {
        if x == c {
            return Err(CliError::args(format!(
                "xlsx and csv outputs both point at {}",
                x.display()
            )));
        }
    }

    let mut input = polegrid_io::load_input(&config, base_dir).map_err(CliError::source)?;
    let stringing = polegrid_io::load_stringing(&config, base_dir).map_err(CliError::source)?;
    if input.is_empty() && stringing.data.is_empty() {
        return Err(CliError::new(EXIT_NO_DATA, "no data parsed from any configured source")
            .with_hint("check that the report paths in [sources] point at the right files"));
    }

    input.diagnostics.extend(stringing.diagnostics);
    let stringing = stringing.data;

    let result = polegrid_recon::run(&config, input);

    if let Some(ref path) = xlsx_path {
        let export =
            polegrid_io::xlsx::export(&result.rows, &stringing, path, &config.output.sheet_name)
                .map_err(CliError::source)?;
        eprintln!(
            "wrote {} ({} rows, {} stringing sections, {}ms)",
            path.display(),
            export.rows_exported,
            export.stringing_rows_exported,
            export.export_duration_ms
        );
    }

    if let Some(ref path) = csv_path {
        let rows = polegrid_io::csv::export(&result.rows, path).map_err(CliError::source)?;
        eprintln!("wrote {} ({rows} rows)", path.display());
    }

    if json_output {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::error(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    print_summary(&result);
    Ok(())
}

/// Human summary to stderr.
fn print_summary(result: &ReconResult) {
    let s = &result.summary;
    eprintln!(
        "{}: {} structures, {} rows, {} anchors ({} without a measured guy)",
        result.meta.project_name, s.sequences, s.rows, s.anchors, s.degenerate_anchors,
    );

    let c = &s.coverage;
    eprintln!(
        "coverage: his {}, fusing {}, staking {}, pole type {}, guy usage {}, max force {}",
        c.his, c.fusing, c.staking, c.pole_type, c.guy_usage, c.max_force,
    );

    if s.diagnostics > 0 {
        let parts: Vec<String> =
            s.diagnostic_counts.iter().map(|(src, n)| format!("{src} {n}")).collect();
        eprintln!("skipped records: {} ({})", s.diagnostics, parts.join(", "));
    }
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base_dir = base_dir(&config_path);

    let sources = &config.sources;
    let configured = [
        ("his", &sources.his),
        ("fusing", &sources.fusing),
        ("staking", &sources.staking),
        ("usage", &sources.usage),
        ("joint_support", &sources.joint_support),
        ("soil", &sources.soil),
        ("stringing_primary", &sources.stringing_primary),
        ("stringing_neutral", &sources.stringing_neutral),
    ];

    for (name, path) in configured {
        if let Some(path) = path {
            let full = base_dir.join(path);
            if !full.is_file() {
                return Err(CliError::new(
                    EXIT_IO,
                    format!("sources.{name}: {} does not exist", full.display()),
                ));
            }
        }
    }

    eprintln!(
        "ok: '{}' ({} sources, compass {:?})",
        config.name,
        sources.configured(),
        config.anchors.compass
    );
    Ok(())
}
