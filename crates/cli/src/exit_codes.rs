//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success                                             |
//! | 1    | General error (malformed report, write failure)     |
//! | 2    | CLI usage error (bad args)                          |
//! | 3    | I/O error (report or output file unreadable)        |
//! | 4    | Project config invalid                              |
//! | 5    | No data parsed from any configured source           |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError` or the command that raises it

use polegrid_io::SourceError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - a report could be read but not parsed, or an output
/// table could not be written.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Project (3-5)
// =============================================================================

/// A report, config or output path could not be read or created.
pub const EXIT_IO: u8 = 3;

/// Project config failed to parse or validate.
pub const EXIT_CONFIG: u8 = 4;

/// Every configured source came back empty.
pub const EXIT_NO_DATA: u8 = 5;

/// Map a source load/write failure to its exit code.
pub fn source_exit_code(err: &SourceError) -> u8 {
    match err {
        SourceError::Io { .. } => EXIT_IO,
        SourceError::Workbook(_)
        | SourceError::Xml(_)
        | SourceError::MissingColumn { .. }
        | SourceError::EmptyWorkbook
        | SourceError::Write(_) => EXIT_ERROR,
    }
}
