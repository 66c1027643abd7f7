//! `polegrid-io` — Report parsers and table writers.
//!
//! Each parser turns one engineering report into a sequence-keyed partial
//! source for `polegrid-recon`; the stringing charts become their own
//! workbook sheets. Bad records are skipped and reported as
//! diagnostics; only unreadable files fail.

pub mod csv;
pub mod error;
pub mod fusing;
pub mod his;
pub mod joint_support;
pub mod project;
pub mod soil;
pub mod staking;
pub mod stringing;
pub mod usage;
pub mod xlsx;
pub mod xml;

pub use error::SourceError;
pub use project::{load_input, load_stringing};

use polegrid_recon::{Diagnostic, ReconError};

/// Parser output: the partial source plus the records it had to skip.
#[derive(Debug, Clone, Default)]
pub struct Parsed<T> {
    pub data: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Parsed<T> {
    pub(crate) fn skip(&mut self, source: &str, error: ReconError) {
        log::warn!("[{source}] {error}; record skipped");
        self.diagnostics.push(Diagnostic::new(source, error));
    }
}
