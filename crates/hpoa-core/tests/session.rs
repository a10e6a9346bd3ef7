//! Edit session behavior against a master table.

use hpoa_core::{
    DatasetStore, EditError, EditRecord, FilterCriteria, MasterTable, SessionState, WorkingCopy,
    begin_session, reset_session,
};
use hpoa_model::{AnnotationRecord, AnnotationRow, AnnotationTable, Column, RowId};

const SOURCE: &str = "scenario.hpoa";

fn row_id(ordinal: u64) -> RowId {
    RowId::derive(SOURCE, ordinal)
}

/// `[{id:"D1", onset:"infantile"}, {id:"D2", onset:"adult"}]`
fn scenario_master() -> MasterTable {
    let mut table = AnnotationTable::new(SOURCE);
    for (ordinal, (disease, onset)) in [("D1", "infantile"), ("D2", "adult")].iter().enumerate() {
        table.push_row(AnnotationRow::new(
            row_id(ordinal as u64 + 1),
            AnnotationRecord::new()
                .with(Column::DatabaseId, *disease)
                .with(Column::Onset, *onset),
        ));
    }
    MasterTable::from_table(table)
}

fn onsets(copy: &WorkingCopy) -> Vec<(String, String)> {
    copy.rows()
        .map(|row| {
            (
                row.database_id().to_string(),
                row.get(Column::Onset).to_string(),
            )
        })
        .collect()
}

fn pairs(values: &[(&str, &str)]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

#[test]
fn onset_scenario() {
    let store = DatasetStore::new(scenario_master());
    let mut session = store.begin_session();
    assert_eq!(session.state(), SessionState::Clean);

    let d1 = session
        .view(&FilterCriteria::new().with_disease_id("D1"))
        .row_ids()[0];
    let edit = session.edit(d1, "onset", "juvenile").expect("edit D1");
    assert_eq!(edit.previous, "infantile");

    assert_eq!(
        onsets(session.working_copy()),
        pairs(&[("D1", "juvenile"), ("D2", "adult")])
    );
    let master: Vec<(String, String)> = store
        .master()
        .rows()
        .map(|row| (row.database_id().to_string(), row.get(Column::Onset).to_string()))
        .collect();
    assert_eq!(master, pairs(&[("D1", "infantile"), ("D2", "adult")]));
    assert!(session.is_dirty());
    assert_eq!(session.state(), SessionState::Dirty);

    session.discard();
    assert_eq!(
        onsets(session.working_copy()),
        pairs(&[("D1", "infantile"), ("D2", "adult")])
    );
    assert!(!session.is_dirty());
    assert_eq!(session.state(), SessionState::Clean);
}

#[test]
fn edit_then_read_back() {
    let master = scenario_master();
    let mut copy = begin_session(&master);
    copy.edit(row_id(2), "frequency", "HP:0040282").unwrap();
    assert_eq!(
        copy.get(row_id(2)).unwrap().get(Column::Frequency),
        "HP:0040282"
    );
}

#[test]
fn missing_row_fails_without_mutation() {
    let master = scenario_master();
    let mut copy = begin_session(&master);
    let before = copy.to_table();
    let ghost = RowId::derive(SOURCE, 99);

    let err = copy.edit(ghost, "onset", "adult").unwrap_err();
    assert_eq!(err, EditError::RowNotFound { row: ghost });
    assert_eq!(copy.to_table(), before);
    assert!(!copy.is_dirty(&master));
}

#[test]
fn unknown_field_fails_without_mutation() {
    let master = scenario_master();
    let mut copy = begin_session(&master);
    let before = copy.to_table();

    let err = copy.edit(row_id(1), "status", "added").unwrap_err();
    assert_eq!(
        err,
        EditError::UnknownField {
            field: "status".to_string()
        }
    );
    assert_eq!(copy.to_table(), before);
}

#[test]
fn row_is_checked_before_field() {
    let master = scenario_master();
    let mut copy = begin_session(&master);
    let ghost = RowId::derive(SOURCE, 99);
    assert!(matches!(
        copy.edit(ghost, "status", "x"),
        Err(EditError::RowNotFound { .. })
    ));
}

#[test]
fn sessions_are_isolated() {
    let store = DatasetStore::new(scenario_master());
    let mut first = store.begin_session();
    let second = store.begin_session();

    first.edit(row_id(1), "onset", "neonatal").unwrap();
    first.remove_row(row_id(2)).unwrap();

    assert_eq!(
        onsets(second.working_copy()),
        pairs(&[("D1", "infantile"), ("D2", "adult")])
    );
    assert!(!second.is_dirty());
    assert_eq!(store.master().len(), 2);
}

#[test]
fn reset_restores_structural_equality() {
    let master = scenario_master();
    let mut copy = begin_session(&master);
    copy.edit(row_id(1), "sex", "male").unwrap();
    copy.remove_row(row_id(2)).unwrap();
    assert!(copy.is_dirty(&master));

    reset_session(&mut copy, &master);
    assert!(!copy.is_dirty(&master));
    assert_eq!(copy.to_table(), master.to_table());
}

#[test]
fn diff_reports_changes_additions_and_removals() {
    let store = DatasetStore::new(scenario_master());
    let mut session = store.begin_session();
    session.edit(row_id(1), "onset", "juvenile").unwrap();
    session.remove_row(row_id(2)).unwrap();
    let added = session
        .add_row(
            AnnotationRecord::new()
                .with(Column::DatabaseId, "D3")
                .with(Column::HpoId, "HP:0001250"),
        )
        .unwrap();

    let diff = session.diff();
    assert_eq!(diff.len(), 3);
    assert_eq!(
        diff[0],
        EditRecord::CellChanged {
            row: row_id(1),
            column: Column::Onset,
            original: "infantile".to_string(),
            current: "juvenile".to_string(),
        }
    );
    assert!(matches!(&diff[1], EditRecord::RowRemoved { row } if row.database_id() == "D2"));
    assert!(matches!(&diff[2], EditRecord::RowAdded { row } if row.id == added));
    assert!(!store.master().contains(added));
}

#[test]
fn added_row_ids_are_unique_within_a_session() {
    let store = DatasetStore::new(scenario_master());
    let mut session = store.begin_session();
    let a = session.add_row(AnnotationRecord::new()).unwrap();
    let b = session.add_row(AnnotationRecord::new()).unwrap();
    assert_ne!(a, b);
    assert_eq!(session.working_copy().len(), 4);
}

#[test]
fn snapshot_is_independent_of_master() {
    let store = DatasetStore::new(scenario_master());
    let mut session = store.begin_session();
    session.edit_column(row_id(2), Column::Onset, "late").unwrap();
    let mut snapshot = session.snapshot();
    snapshot.rows[0].record.set(Column::Onset, "changed in snapshot");

    assert_eq!(
        store.master().get(row_id(1)).unwrap().get(Column::Onset),
        "infantile"
    );
    assert_eq!(
        session.working_copy().get(row_id(1)).unwrap().get(Column::Onset),
        "infantile"
    );
    assert_eq!(snapshot.rows[1].get(Column::Onset), "late");
}
