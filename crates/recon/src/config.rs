use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ReconError;
use crate::geometry::{CompassScheme, GuyMarkers, DEFAULT_GUY_MARKERS};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// One project: which reports to read and how to render the result.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub sources: SourcePaths,
    #[serde(default)]
    pub his_columns: HisColumns,
    #[serde(default)]
    pub anchors: AnchorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Report files, relative to the config file. A missing entry means the
/// source is unavailable and contributes nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcePaths {
    /// Structure attribute workbook (xlsx/xls).
    #[serde(default)]
    pub his: Option<String>,
    /// Pasted fusing coordination report (tab separated).
    #[serde(default)]
    pub fusing: Option<String>,
    /// Construction staking XML.
    #[serde(default)]
    pub staking: Option<String>,
    /// Structure usage XML. May point at the same file as `staking`.
    #[serde(default)]
    pub usage: Option<String>,
    /// Joint support reactions XML.
    #[serde(default)]
    pub joint_support: Option<String>,
    /// Pasted soil class table.
    #[serde(default)]
    pub soil: Option<String>,
    /// Pasted primary conductor stringing chart.
    #[serde(default)]
    pub stringing_primary: Option<String>,
    /// Pasted neutral / span guy stringing chart.
    #[serde(default)]
    pub stringing_neutral: Option<String>,
}

impl SourcePaths {
    pub fn configured(&self) -> usize {
        [
            &self.his,
            &self.fusing,
            &self.staking,
            &self.usage,
            &self.joint_support,
            &self.soil,
            &self.stringing_primary,
            &self.stringing_neutral,
        ]
        .iter()
        .filter(|p| p.is_some())
        .count()
    }
}

/// Header names of the HIS workbook columns to keep.
#[derive(Debug, Clone, Deserialize)]
pub struct HisColumns {
    #[serde(default = "default_sequence_column")]
    pub sequence: String,
    #[serde(default = "default_facility_id_column")]
    pub facility_id: String,
    #[serde(default = "default_existing_transformers_column")]
    pub existing_transformers: String,
    #[serde(default = "default_primary_riser_column")]
    pub primary_riser: String,
    #[serde(default = "default_secondary_riser_column")]
    pub secondary_riser: String,
}

fn default_sequence_column() -> String {
    "Sequence".into()
}

fn default_facility_id_column() -> String {
    "Facility ID".into()
}

fn default_existing_transformers_column() -> String {
    "Existing Transformers".into()
}

fn default_primary_riser_column() -> String {
    "Primary Riser".into()
}

fn default_secondary_riser_column() -> String {
    "Secondary Riser".into()
}

impl Default for HisColumns {
    fn default() -> Self {
        Self {
            sequence: default_sequence_column(),
            facility_id: default_facility_id_column(),
            existing_transformers: default_existing_transformers_column(),
            primary_riser: default_primary_riser_column(),
            secondary_riser: default_secondary_riser_column(),
        }
    }
}

impl HisColumns {
    pub fn all(&self) -> [&str; 5] {
        [
            &self.sequence,
            &self.facility_id,
            &self.existing_transformers,
            &self.primary_riser,
            &self.secondary_riser,
        ]
    }
}

// ---------------------------------------------------------------------------
// Anchors + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AnchorConfig {
    #[serde(default = "default_guy_markers")]
    pub guy_markers: Vec<String>,
    #[serde(default)]
    pub compass: CompassScheme,
}

fn default_guy_markers() -> Vec<String> {
    DEFAULT_GUY_MARKERS.iter().map(|m| m.to_string()).collect()
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            guy_markers: default_guy_markers(),
            compass: CompassScheme::default(),
        }
    }
}

impl AnchorConfig {
    pub fn markers(&self) -> GuyMarkers {
        GuyMarkers::new(self.guy_markers.iter().cloned())
    }
}

/// Workbook sheets for the stringing charts, next to the main table.
pub const PRIMARY_STRINGING_SHEET: &str = "Primary Stringing Data";
pub const NEUTRAL_STRINGING_SHEET: &str = "Neutral Span Stringing Data";

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub xlsx: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

fn default_sheet_name() -> String {
    "Data Report".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            xlsx: None,
            csv: None,
            sheet_name: default_sheet_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ProjectConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ProjectConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config for ad-hoc runs that have no project file.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: SourcePaths::default(),
            his_columns: HisColumns::default(),
            anchors: AnchorConfig::default(),
            output: OutputConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("project name must not be empty".into()));
        }

        if self.sources.configured() == 0 {
            return Err(ReconError::ConfigValidation(
                "at least one source report is required".into(),
            ));
        }

        if self.anchors.guy_markers.is_empty() {
            return Err(ReconError::ConfigValidation(
                "anchors.guy_markers must list at least one marker".into(),
            ));
        }
        if self.anchors.guy_markers.iter().any(|m| m.trim().is_empty()) {
            // A blank marker would match every stake description.
            return Err(ReconError::ConfigValidation(
                "anchors.guy_markers must not contain blank entries".into(),
            ));
        }

        let mut seen = HashSet::new();
        for column in self.his_columns.all() {
            if column.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "his_columns entries must not be empty".into(),
                ));
            }
            if !seen.insert(column) {
                return Err(ReconError::ConfigValidation(format!(
                    "his_columns: column '{column}' is mapped twice"
                )));
            }
        }

        if self.output.sheet_name.trim().is_empty() || self.output.sheet_name.chars().count() > 31 {
            return Err(ReconError::ConfigValidation(
                "output.sheet_name must be 1-31 characters".into(),
            ));
        }
        if [PRIMARY_STRINGING_SHEET, NEUTRAL_STRINGING_SHEET].contains(&self.output.sheet_name.as_str()) {
            return Err(ReconError::ConfigValidation(format!(
                "output.sheet_name '{}' is reserved for a stringing chart",
                self.output.sheet_name
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
