use std::fmt;
use std::path::Path;

/// Failure to read a whole source report or to write the output table.
///
/// Per-record problems never surface here; parsers turn those into
/// [`polegrid_recon::Diagnostic`]s and keep going.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// File could not be read or created.
    Io { path: String, message: String },
    /// calamine could not open or read the workbook.
    Workbook(String),
    /// Report XML is not well formed.
    Xml(String),
    /// A configured HIS header is not in the first row.
    MissingColumn { column: String },
    /// Workbook has no sheets, or its first sheet has no rows.
    EmptyWorkbook,
    /// rust_xlsxwriter / csv writer failure.
    Write(String),
}

impl SourceError {
    pub fn io(path: &Path, err: impl fmt::Display) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{path}: {message}"),
            Self::Workbook(msg) => write!(f, "workbook error: {msg}"),
            Self::Xml(msg) => write!(f, "XML error: {msg}"),
            Self::MissingColumn { column } => {
                write!(f, "column '{column}' not found in the header row")
            }
            Self::EmptyWorkbook => write!(f, "workbook contains no data"),
            Self::Write(msg) => write!(f, "write error: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}
