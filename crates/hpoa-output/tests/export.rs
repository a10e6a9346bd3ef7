use std::fs;

use hpoa_core::{DatasetStore, MasterTable};
use hpoa_ingest::{load_bytes, read_hpoa_str};
use hpoa_model::{AnnotationRecord, Column};
use hpoa_output::{
    ExportError, ExportFormat, ExportOptions, PROVENANCE_KEY, export, write_export,
};

const FIXTURE: &str = "#description: \"HPO annotations for rare diseases\"
#version: 2025-05-06
database_id\tdisease_name\tqualifier\thpo_id\treference\tevidence\tonset\tfrequency\tsex\tmodifier\taspect\tbiocuration
OMIM:301500\tFabry disease\t\tHP:0000963\tOMIM:301500\tIEA\t\tHP:0040282\t\t\tP\tHPO:probinson[2009-02-17]
OMIM:301500\tFabry disease\t\tHP:0004322\tPMID:39292930\tPCS\t\t\t\t\tP\tHPO:probinson[2009-02-17]
";

fn store() -> DatasetStore {
    let table = read_hpoa_str(FIXTURE, "export.hpoa").expect("parse fixture");
    DatasetStore::new(MasterTable::from_table(table))
}

#[test]
fn tsv_layout_after_edit() {
    let store = store();
    let mut session = store.begin_session();
    let first = store.master().rows().next().unwrap().id;
    let second = store.master().rows().nth(1).unwrap().id;
    session.edit(first, "onset", "HP:0003577").unwrap();
    session.remove_row(second).unwrap();
    session
        .add_row(
            AnnotationRecord::new()
                .with(Column::DatabaseId, "OMIM:301500")
                .with(Column::DiseaseName, "Fabry disease")
                .with(Column::HpoId, "HP:0001945")
                .with(Column::Reference, "PMID:12345")
                .with(Column::Evidence, "PCS")
                .with(Column::Aspect, "P"),
        )
        .unwrap();

    let bytes = export(session.working_copy(), &ExportOptions::default()).unwrap();
    let tsv = String::from_utf8(bytes).unwrap();
    insta::assert_snapshot!(tsv);
}

#[test]
fn export_leaves_session_state_alone() {
    let store = store();
    let mut session = store.begin_session();
    let first = store.master().rows().next().unwrap().id;
    session.edit(first, "sex", "female").unwrap();
    export(session.working_copy(), &ExportOptions::default()).unwrap();
    assert!(session.is_dirty());

    session.discard();
    export(session.working_copy(), &ExportOptions::default()).unwrap();
    assert!(!session.is_dirty());
}

#[test]
fn clean_export_reloads_to_the_same_rows() {
    let store = store();
    let session = store.begin_session();
    let bytes = export(
        session.working_copy(),
        &ExportOptions::default().with_provenance(false),
    )
    .unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text, FIXTURE);

    let reloaded = read_hpoa_str(&text, "export.hpoa").unwrap();
    assert_eq!(reloaded, store.master().to_table());
}

#[test]
fn edited_and_added_values_reload_unchanged() {
    let store = store();
    let mut session = store.begin_session();
    let first = store.master().rows().next().unwrap().id;
    let second = store.master().rows().nth(1).unwrap().id;
    session.edit(first, "database_id", "#OMIM:301500").unwrap();
    session.edit(second, "disease_name", " padded ").unwrap();
    session
        .add_row(
            AnnotationRecord::new()
                .with(Column::DatabaseId, "#ORPHA:324")
                .with(Column::Modifier, "  "),
        )
        .unwrap();

    let bytes = export(session.working_copy(), &ExportOptions::default()).unwrap();
    let reloaded = read_hpoa_str(&String::from_utf8(bytes).unwrap(), "export.hpoa").unwrap();

    let expected: Vec<&AnnotationRecord> =
        session.working_copy().rows().map(|row| &row.record).collect();
    let actual: Vec<&AnnotationRecord> = reloaded.rows.iter().map(|row| &row.record).collect();
    assert_eq!(actual, expected);
    assert_eq!(reloaded.metadata.lines().len(), 2);
}

#[test]
fn only_row_starting_with_hash_survives_reload() {
    let store = store();
    let mut session = store.begin_session();
    let ids: Vec<_> = store.master().rows().map(|row| row.id).collect();
    session.edit(ids[0], "database_id", "#OMIM:301500").unwrap();
    session.remove_row(ids[1]).unwrap();

    let bytes = export(
        session.working_copy(),
        &ExportOptions::default().with_provenance(false),
    )
    .unwrap();
    let reloaded = read_hpoa_str(&String::from_utf8(bytes).unwrap(), "export.hpoa").unwrap();
    assert_eq!(reloaded.rows.len(), 1);
    assert_eq!(reloaded.rows[0].get(Column::DatabaseId), "#OMIM:301500");
    assert_eq!(reloaded.metadata, store.master().metadata().clone());
}

#[test]
fn provenance_line_names_the_master_bytes() {
    let table = load_bytes(FIXTURE.as_bytes(), "export.hpoa").unwrap();
    let fingerprint = table.fingerprint.clone().unwrap();
    let store = DatasetStore::new(MasterTable::from_table(table));
    let session = store.begin_session();

    let text = String::from_utf8(export(session.working_copy(), &ExportOptions::default()).unwrap())
        .unwrap();
    let line = format!("#{PROVENANCE_KEY}: {fingerprint}");
    assert_eq!(text.lines().nth(2), Some(line.as_str()));

    // A re-exported export keeps its first provenance line only.
    let again = load_bytes(text.as_bytes(), "export-2.hpoa").unwrap();
    let store = DatasetStore::new(MasterTable::from_table(again));
    let session = store.begin_session();
    let text = String::from_utf8(export(session.working_copy(), &ExportOptions::default()).unwrap())
        .unwrap();
    assert_eq!(text.matches(PROVENANCE_KEY).count(), 1);
    assert!(text.contains(&line));
}

#[test]
fn json_export_is_an_array_of_records() {
    let store = store();
    let session = store.begin_session();
    let bytes = export(session.working_copy(), &ExportOptions::new(ExportFormat::Json)).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let rows = value.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["hpo_id"], "HP:0000963");
    assert_eq!(rows[1]["evidence"], "PCS");
    assert_eq!(rows[1]["onset"], "");
    assert_eq!(rows[0].as_object().unwrap().len(), Column::COUNT);
}

#[test]
fn write_export_replaces_the_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("curated.hpoa");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "stale").unwrap();

    let store = store();
    let session = store.begin_session();
    write_export(
        session.working_copy(),
        &path,
        &ExportOptions::default().with_provenance(false),
    )
    .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), FIXTURE);
    let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("curated.hpoa")]);
}

#[test]
fn rejected_export_keeps_the_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curated.hpoa");
    fs::write(&path, "previous").unwrap();

    let store = store();
    let mut session = store.begin_session();
    let first = store.master().rows().next().unwrap().id;
    session.edit(first, "modifier", "a\tb").unwrap();

    let err = write_export(session.working_copy(), &path, &ExportOptions::default()).unwrap_err();
    assert!(matches!(err, ExportError::InvalidCell { column: Column::Modifier, .. }));
    assert!(err.suggestion().is_some());
    assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
}
