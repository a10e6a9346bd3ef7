//! Edit session controller.
//!
//! A session pairs a master table with one working copy and is the only
//! path through which edits are made. State is derived from content:
//! `Clean` when the copy equals the master, `Dirty` otherwise. Exporting
//! reads the copy and leaves the state alone.

use tracing::{debug, info, info_span, warn};

use hpoa_model::{AnnotationRecord, AnnotationRow, AnnotationTable, Column, RowId, SessionId};

use crate::copy::{CellEdit, EditRecord, WorkingCopy};
use crate::error::EditError;
use crate::filter::{FilterCriteria, View};
use crate::store::MasterTable;
use crate::suggest::{ApplyOptions, ApplySummary, SuggestionBatch, SuggestionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Clean,
    Dirty,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    id: SessionId,
    master: MasterTable,
    copy: WorkingCopy,
    /// Ordinal for the next row created in this session.
    next_row: u64,
}

impl EditSession {
    pub fn begin(id: SessionId, master: &MasterTable) -> Self {
        debug!(session = %id, rows = master.len(), "session started");
        Self {
            id,
            master: master.clone(),
            copy: WorkingCopy::from_master(master),
            next_row: 1,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn master(&self) -> &MasterTable {
        &self.master
    }

    pub fn working_copy(&self) -> &WorkingCopy {
        &self.copy
    }

    pub fn view<'a>(&'a self, criteria: &'a FilterCriteria) -> View<'a> {
        View::new(&self.copy, criteria)
    }

    pub fn state(&self) -> SessionState {
        if self.is_dirty() {
            SessionState::Dirty
        } else {
            SessionState::Clean
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.copy.is_dirty(&self.master)
    }

    pub fn diff(&self) -> Vec<EditRecord> {
        self.copy.diff(&self.master)
    }

    /// Set `field` of row `row` to `value`.
    pub fn edit(
        &mut self,
        row: RowId,
        field: &str,
        value: impl Into<String>,
    ) -> Result<CellEdit, EditError> {
        let edit = self.copy.edit(row, field, value)?;
        debug!(session = %self.id, row = %edit.row, column = %edit.column, "cell edited");
        Ok(edit)
    }

    pub fn edit_column(
        &mut self,
        row: RowId,
        column: Column,
        value: impl Into<String>,
    ) -> Result<CellEdit, EditError> {
        let edit = self.copy.set_cell(row, column, value)?;
        debug!(session = %self.id, row = %edit.row, column = %edit.column, "cell edited");
        Ok(edit)
    }

    /// Append a new row and return its id.
    pub fn add_row(&mut self, record: AnnotationRecord) -> Result<RowId, EditError> {
        let id = self.allocate_row_id();
        self.copy.push_row(AnnotationRow::new(id, record))?;
        debug!(session = %self.id, row = %id, "row added");
        Ok(id)
    }

    pub fn remove_row(&mut self, row: RowId) -> Result<AnnotationRow, EditError> {
        let removed = self.copy.remove_row(row)?;
        debug!(session = %self.id, row = %row, "row removed");
        Ok(removed)
    }

    /// Drop every edit; the copy equals the master afterwards.
    pub fn discard(&mut self) {
        let pending = self.diff().len();
        self.copy.reset(&self.master);
        info!(session = %self.id, discarded = pending, "session reset to master");
    }

    /// Same as [`EditSession::discard`].
    pub fn reset(&mut self) {
        self.discard();
    }

    /// Owned snapshot of the working copy for export.
    pub fn snapshot(&self) -> AnnotationTable {
        self.copy.to_table()
    }

    /// Accept a batch of suggestions. All of it applies, or none of it.
    pub fn apply_suggestions(
        &mut self,
        batch: &SuggestionBatch,
        options: &ApplyOptions,
    ) -> Result<ApplySummary, EditError> {
        let span = info_span!("apply_suggestions", session = %self.id, suggestions = batch.len());
        let _guard = span.enter();

        let mut staged = self.copy.clone();
        let mut next_row = self.next_row;
        let mut summary = ApplySummary::default();

        for suggestion in batch {
            match suggestion.status {
                SuggestionStatus::Removed => {
                    let key = suggestion.record.key();
                    let matching: Vec<RowId> = staged
                        .rows()
                        .filter(|row| row.record.key() == key)
                        .map(|row| row.id)
                        .collect();
                    if matching.is_empty() {
                        summary.unmatched_removals += 1;
                    }
                    for id in matching {
                        staged.remove_row(id)?;
                        summary.removed += 1;
                    }
                }
                SuggestionStatus::Changed => match staged.find_by_key(&suggestion.record) {
                    Some(id) => {
                        let existing = staged
                            .get(id)
                            .map(|row| row.get(Column::Biocuration).to_string())
                            .unwrap_or_default();
                        let record = stamped_record(&suggestion.record, &existing, options);
                        // Blank suggested fields keep the existing value.
                        for (column, value) in record.iter().filter(|(_, value)| !value.is_empty())
                        {
                            staged.set_cell(id, column, value)?;
                        }
                        summary.changed += 1;
                    }
                    None => {
                        let record = stamped_record(&suggestion.record, "", options);
                        staged.push_row(AnnotationRow::new(
                            RowId::derive(&self.id.row_namespace(), next_row),
                            record,
                        ))?;
                        next_row += 1;
                        summary.added += 1;
                    }
                },
                SuggestionStatus::Added => {
                    let record = stamped_record(&suggestion.record, "", options);
                    staged.push_row(AnnotationRow::new(
                        RowId::derive(&self.id.row_namespace(), next_row),
                        record,
                    ))?;
                    next_row += 1;
                    summary.added += 1;
                }
            }
        }

        self.copy = staged;
        self.next_row = next_row;
        if summary.unmatched_removals > 0 {
            warn!(
                unmatched = summary.unmatched_removals,
                "removal suggestions matched no row"
            );
        }
        info!(
            added = summary.added,
            changed = summary.changed,
            removed = summary.removed,
            unmatched = summary.unmatched_removals,
            "suggestions applied"
        );
        Ok(summary)
    }

    fn allocate_row_id(&mut self) -> RowId {
        let id = RowId::derive(&self.id.row_namespace(), self.next_row);
        self.next_row += 1;
        id
    }
}

/// Suggested values with the curator's biocuration entry added. A blank
/// suggested biocuration keeps `existing`.
fn stamped_record(
    suggested: &AnnotationRecord,
    existing: &str,
    options: &ApplyOptions,
) -> AnnotationRecord {
    let mut record = suggested.clone();
    let base = if suggested.is_missing(Column::Biocuration) {
        existing.to_string()
    } else {
        suggested.get(Column::Biocuration).to_string()
    };
    record.set(Column::Biocuration, options.stamped(&base));
    record
}
