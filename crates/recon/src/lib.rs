//! `polegrid-recon` — Multi-report reconciliation of utility pole structures.
//!
//! Pure engine crate: receives pre-parsed, sequence-keyed records, returns
//! rendered rows. No file or workbook IO.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod model;
pub mod reconcile;
pub mod render;
pub mod sequence;
pub mod summary;

pub use config::ProjectConfig;
pub use engine::run;
pub use error::{Diagnostic, ReconError};
pub use geometry::{resolve_anchors, Compass, CompassScheme, GuyMarkers};
pub use model::{OutputRow, ReconInput, ReconResult, COLUMNS};
pub use sequence::{normalize, SequenceKey};
