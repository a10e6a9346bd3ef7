use std::path::PathBuf;

use hpoa_core::{ApplySummary, EditRecord, SessionState};
use hpoa_output::ExportFormat;

/// Outcome of one editing run.
#[derive(Debug)]
pub struct SessionReport {
    pub source: PathBuf,
    pub master_rows: usize,
    pub copy_rows: usize,
    pub state: SessionState,
    pub diff: Vec<EditRecord>,
    pub export: Option<ExportReport>,
}

#[derive(Debug)]
pub struct ExportReport {
    pub path: PathBuf,
    pub format: ExportFormat,
}

#[derive(Debug)]
pub struct ApplyReport {
    pub summary: ApplySummary,
    pub suggestions: usize,
    pub session: SessionReport,
}
