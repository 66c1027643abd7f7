use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconError {
    /// Raw identifier does not reduce to a canonical 4-digit sequence.
    MalformedKey { raw: String },
    /// Staking point without numeric easting/northing.
    MissingCoordinate { sequence: String, stake_description: String },
    /// Sequence has staking points but none marked "P1".
    NoReferencePoint { sequence: String },
    /// Stringing chart section whose circuit type has no `<n>PH` phase count.
    MissingPhaseCount { section: String, circuit: String },
    /// A whole source contributed nothing (absent file, empty report).
    SourceUnavailable { source: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (blank marker, duplicate column, etc.).
    ConfigValidation(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedKey { raw } => {
                write!(f, "malformed sequence '{raw}': expected a 4-digit structure number")
            }
            Self::MissingCoordinate { sequence, stake_description } => write!(
                f,
                "sequence {sequence}: point '{stake_description}' has no numeric easting/northing"
            ),
            Self::NoReferencePoint { sequence } => {
                write!(f, "sequence {sequence}: no P1 reference point")
            }
            Self::MissingPhaseCount { section, circuit } => {
                write!(f, "section {section}: circuit '{circuit}' has no phase count")
            }
            Self::SourceUnavailable { source } => write!(f, "source '{source}' contributed no data"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

/// A recovered per-record failure, tagged with the source it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub source: String,
    pub error: ReconError,
}

impl Diagnostic {
    pub fn new(source: impl Into<String>, error: ReconError) -> Self {
        Self { source: source.into(), error }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.source, self.error)
    }
}
