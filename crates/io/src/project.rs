//! Load every configured report of a project into a [`ReconInput`].

use std::path::Path;

use polegrid_recon::config::ProjectConfig;
use polegrid_recon::model::ReconInput;
use polegrid_recon::{Diagnostic, ReconError};

use crate::error::SourceError;
use crate::stringing::{self, StringingReport};
use crate::{fusing, his, joint_support, soil, staking, usage, Parsed};

/// Read file and convert to UTF-8 if needed (pasted reports saved from
/// Windows tools are often Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| SourceError::io(path, e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Parse every source named in `config`, resolving paths against
/// `base_dir`.
///
/// Unreadable or malformed files fail the load. A configured source that
/// yields no records is kept as a `SourceUnavailable` diagnostic.
pub fn load_input(config: &ProjectConfig, base_dir: &Path) -> Result<ReconInput, SourceError> {
    let sources = &config.sources;
    let mut input = ReconInput::default();

    if let Some(path) = &sources.his {
        let parsed = his::load_his(&base_dir.join(path), &config.his_columns)?;
        input.his = take(parsed, &mut input.diagnostics);
        check_available(his::SOURCE, input.his.is_empty(), &mut input.diagnostics);
    }

    if let Some(path) = &sources.fusing {
        let text = read_file_as_utf8(&base_dir.join(path))?;
        input.fusing = take(fusing::parse_fusing(&text), &mut input.diagnostics);
        check_available(fusing::SOURCE, input.fusing.is_empty(), &mut input.diagnostics);
    }

    if let Some(path) = &sources.staking {
        let xml = read_file_as_utf8(&base_dir.join(path))?;
        let report = take(staking::parse_staking(&xml)?, &mut input.diagnostics);
        input.staking = report.points;
        input.pole_types = report.pole_types;
        check_available(staking::SOURCE, input.staking.is_empty(), &mut input.diagnostics);
    }

    if let Some(path) = &sources.usage {
        let xml = read_file_as_utf8(&base_dir.join(path))?;
        input.guy_usage = take(usage::parse_usage(&xml)?, &mut input.diagnostics);
        check_available(usage::SOURCE, input.guy_usage.is_empty(), &mut input.diagnostics);
    }

    if sources.joint_support.is_some() || sources.soil.is_some() {
        let forces = match &sources.joint_support {
            Some(path) => {
                let xml = read_file_as_utf8(&base_dir.join(path))?;
                take(joint_support::parse_joint_support(&xml)?, &mut input.diagnostics)
            }
            None => Default::default(),
        };
        let soil_table = match &sources.soil {
            Some(path) => {
                let text = read_file_as_utf8(&base_dir.join(path))?;
                take(soil::parse_soil(&text), &mut input.diagnostics)
            }
            None => Default::default(),
        };
        input.max_force = soil::merge_max_force(&forces, &soil_table);
        check_available(joint_support::SOURCE, input.max_force.is_empty(), &mut input.diagnostics);
    }

    Ok(input)
}

/// Parse the stringing charts named in `config`. They feed their own
/// workbook sheets rather than the reconciled table.
pub fn load_stringing(
    config: &ProjectConfig,
    base_dir: &Path,
) -> Result<Parsed<StringingReport>, SourceError> {
    let sources = &config.sources;
    let mut parsed = Parsed::<StringingReport>::default();

    if let Some(path) = &sources.stringing_primary {
        let text = read_file_as_utf8(&base_dir.join(path))?;
        parsed.data.primary = take(stringing::parse_primary(&text), &mut parsed.diagnostics);
        check_available(
            stringing::PRIMARY_SOURCE,
            parsed.data.primary.is_empty(),
            &mut parsed.diagnostics,
        );
    }

    if let Some(path) = &sources.stringing_neutral {
        let text = read_file_as_utf8(&base_dir.join(path))?;
        parsed.data.neutral = take(stringing::parse_neutral(&text), &mut parsed.diagnostics);
        check_available(
            stringing::NEUTRAL_SOURCE,
            parsed.data.neutral.is_empty(),
            &mut parsed.diagnostics,
        );
    }

    Ok(parsed)
}

fn take<T>(parsed: Parsed<T>, diagnostics: &mut Vec<Diagnostic>) -> T {
    diagnostics.extend(parsed.diagnostics);
    parsed.data
}

fn check_available(source: &str, empty: bool, diagnostics: &mut Vec<Diagnostic>) {
    if empty {
        let error = ReconError::SourceUnavailable { source: source.to_string() };
        log::warn!("{error}");
        diagnostics.push(Diagnostic::new(source, error));
    }
}
