//! Export of curated HPOA working copies.
//!
//! - **TSV**: the `phenotype.hpoa` layout, metadata lines included
//! - **JSON**: an array of annotation objects keyed by column name
//!
//! Exports read only the working copy; exporting does not change a
//! session's state.

mod error;
mod format;
mod json;
mod tsv;
mod write;

pub use error::ExportError;
pub use format::{ExportFormat, ExportOptions};
pub use json::write_json;
pub use tsv::{PROVENANCE_KEY, write_tsv};
pub use write::{export, write_export};
