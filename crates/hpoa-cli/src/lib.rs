//! CLI library components for HPOA curation.

pub mod config;
pub mod edits;
pub mod logging;
