//! Per-session mutable copy of a master table.

use std::collections::HashMap;
use std::sync::Arc;

use hpoa_model::{AnnotationRecord, AnnotationRow, AnnotationTable, Column, HeaderMetadata, RowId};

use crate::error::EditError;
use crate::store::MasterTable;

/// Working copy of a master table.
///
/// Rows start out shared with the master; `Arc::make_mut` clones a row the
/// first time it is written, so no write is ever visible through the master
/// or through another copy.
#[derive(Debug, Clone)]
pub struct WorkingCopy {
    source_id: String,
    metadata: HeaderMetadata,
    fingerprint: Option<String>,
    rows: Vec<Arc<AnnotationRow>>,
    index: HashMap<RowId, usize>,
}

/// One field of one row that was overwritten.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CellEdit {
    pub row: RowId,
    pub column: Column,
    pub previous: String,
    pub current: String,
}

/// A difference between a working copy and its master.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditRecord {
    CellChanged {
        row: RowId,
        column: Column,
        original: String,
        current: String,
    },
    RowAdded {
        row: AnnotationRow,
    },
    RowRemoved {
        row: AnnotationRow,
    },
}

impl EditRecord {
    pub fn row_id(&self) -> RowId {
        match self {
            EditRecord::CellChanged { row, .. } => *row,
            EditRecord::RowAdded { row } | EditRecord::RowRemoved { row } => row.id,
        }
    }
}

impl WorkingCopy {
    pub fn from_master(master: &MasterTable) -> Self {
        let rows = master.shared_rows().to_vec();
        Self {
            source_id: master.source_id().to_string(),
            metadata: master.metadata().clone(),
            fingerprint: master.fingerprint().map(str::to_string),
            index: build_index(&rows),
            rows,
        }
    }

    /// Drop every edit and share the master's rows again.
    pub fn reset(&mut self, master: &MasterTable) {
        *self = Self::from_master(master);
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn metadata(&self) -> &HeaderMetadata {
        &self.metadata
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: RowId) -> Option<&AnnotationRow> {
        self.index
            .get(&id)
            .map(|position| self.rows[*position].as_ref())
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &AnnotationRow> + '_ {
        self.rows.iter().map(Arc::as_ref)
    }

    /// First row whose `(database_id, hpo_id)` matches `record`.
    pub fn find_by_key(&self, record: &AnnotationRecord) -> Option<RowId> {
        let key = record.key();
        self.rows()
            .find(|row| row.record.key() == key)
            .map(|row| row.id)
    }

    /// Set one field by column name. The row is checked before the field.
    pub fn edit(
        &mut self,
        id: RowId,
        field: &str,
        value: impl Into<String>,
    ) -> Result<CellEdit, EditError> {
        if !self.contains(id) {
            return Err(EditError::RowNotFound { row: id });
        }
        let column: Column = field.parse().map_err(|_| EditError::UnknownField {
            field: field.to_string(),
        })?;
        self.set_cell(id, column, value)
    }

    /// Set one field of one row, returning what it replaced.
    pub fn set_cell(
        &mut self,
        id: RowId,
        column: Column,
        value: impl Into<String>,
    ) -> Result<CellEdit, EditError> {
        let position = *self
            .index
            .get(&id)
            .ok_or(EditError::RowNotFound { row: id })?;
        let value = value.into();
        let row = Arc::make_mut(&mut self.rows[position]);
        let previous = row.record.set(column, value.clone());
        Ok(CellEdit {
            row: id,
            column,
            previous,
            current: value,
        })
    }

    /// Append a row. Fails if its id is already present.
    pub fn push_row(&mut self, row: AnnotationRow) -> Result<(), EditError> {
        if self.contains(row.id) {
            return Err(EditError::DuplicateRow { row: row.id });
        }
        self.index.insert(row.id, self.rows.len());
        self.rows.push(Arc::new(row));
        Ok(())
    }

    /// Remove a row, returning it.
    pub fn remove_row(&mut self, id: RowId) -> Result<AnnotationRow, EditError> {
        let position = self
            .index
            .remove(&id)
            .ok_or(EditError::RowNotFound { row: id })?;
        let removed = self.rows.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Ok(Arc::unwrap_or_clone(removed))
    }

    /// True iff the contents differ from `master`: any field, any row added
    /// or removed.
    pub fn is_dirty(&self, master: &MasterTable) -> bool {
        let original = master.shared_rows();
        if original.len() != self.rows.len() {
            return true;
        }
        original.iter().zip(&self.rows).any(|(before, after)| {
            !Arc::ptr_eq(before, after) && (before.id != after.id || before.record != after.record)
        })
    }

    /// Every difference from `master`: changed cells and removed rows in
    /// master order, then added rows in working-copy order.
    pub fn diff(&self, master: &MasterTable) -> Vec<EditRecord> {
        let mut records = Vec::new();
        for original in master.rows() {
            match self.get(original.id) {
                None => records.push(EditRecord::RowRemoved {
                    row: original.clone(),
                }),
                Some(current) => {
                    for column in original.record.changed_columns(&current.record) {
                        records.push(EditRecord::CellChanged {
                            row: original.id,
                            column,
                            original: original.get(column).to_string(),
                            current: current.get(column).to_string(),
                        });
                    }
                }
            }
        }
        for row in self.rows() {
            if !master.contains(row.id) {
                records.push(EditRecord::RowAdded { row: row.clone() });
            }
        }
        records
    }

    /// Owned snapshot for export.
    pub fn to_table(&self) -> AnnotationTable {
        AnnotationTable {
            source_id: self.source_id.clone(),
            metadata: self.metadata.clone(),
            rows: self.rows().cloned().collect(),
            fingerprint: self.fingerprint.clone(),
        }
    }

    pub(crate) fn shared_rows(&self) -> &[Arc<AnnotationRow>] {
        &self.rows
    }
}

fn build_index(rows: &[Arc<AnnotationRow>]) -> HashMap<RowId, usize> {
    let mut index = HashMap::with_capacity(rows.len());
    for (position, row) in rows.iter().enumerate() {
        index.entry(row.id).or_insert(position);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> MasterTable {
        let mut table = AnnotationTable::new("copy.hpoa");
        for ordinal in 1..=3u64 {
            table.push_row(AnnotationRow::new(
                RowId::derive("copy.hpoa", ordinal),
                AnnotationRecord::new()
                    .with(Column::DatabaseId, format!("OMIM:{ordinal}"))
                    .with(Column::HpoId, format!("HP:000000{ordinal}")),
            ));
        }
        MasterTable::from_table(table)
    }

    #[test]
    fn untouched_rows_stay_shared() {
        let master = master();
        let mut copy = WorkingCopy::from_master(&master);
        let edited = RowId::derive("copy.hpoa", 2);
        copy.set_cell(edited, Column::Onset, "HP:0003577").unwrap();

        assert!(Arc::ptr_eq(&copy.rows[0], &master.shared_rows()[0]));
        assert!(!Arc::ptr_eq(&copy.rows[1], &master.shared_rows()[1]));
        assert!(Arc::ptr_eq(&copy.rows[2], &master.shared_rows()[2]));
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let master = master();
        let mut copy = WorkingCopy::from_master(&master);
        let first = RowId::derive("copy.hpoa", 1);
        let third = RowId::derive("copy.hpoa", 3);

        let removed = copy.remove_row(first).unwrap();
        assert_eq!(removed.database_id(), "OMIM:1");
        assert_eq!(copy.get(third).map(AnnotationRow::database_id), Some("OMIM:3"));
        copy.set_cell(third, Column::Sex, "female").unwrap();
        assert_eq!(copy.get(third).unwrap().get(Column::Sex), "female");
    }

    #[test]
    fn restoring_a_value_makes_the_copy_clean_again() {
        let master = master();
        let mut copy = WorkingCopy::from_master(&master);
        let id = RowId::derive("copy.hpoa", 1);
        copy.set_cell(id, Column::Onset, "HP:0003593").unwrap();
        assert!(copy.is_dirty(&master));
        copy.set_cell(id, Column::Onset, "").unwrap();
        assert!(!copy.is_dirty(&master));
        assert!(copy.diff(&master).is_empty());
    }

    #[test]
    fn push_rejects_duplicate_ids() {
        let master = master();
        let mut copy = WorkingCopy::from_master(&master);
        let existing = master.rows().next().unwrap().clone();
        assert_eq!(
            copy.push_row(existing.clone()),
            Err(EditError::DuplicateRow { row: existing.id })
        );
        assert_eq!(copy.len(), 3);
    }
}
