//! Tests for hpoa-model types.

use hpoa_model::{AnnotationRecord, AnnotationRow, Column, ModelError, RowId};

fn fabry() -> AnnotationRecord {
    AnnotationRecord::new()
        .with(Column::DatabaseId, "OMIM:301500")
        .with(Column::DiseaseName, "Fabry disease")
        .with(Column::HpoId, "HP:0000963")
        .with(Column::Reference, "OMIM:301500")
        .with(Column::Evidence, "IEA")
        .with(Column::Aspect, "P")
}

#[test]
fn record_serializes_in_file_column_order() {
    let json = serde_json::to_string(&fabry()).expect("serialize record");
    let database = json.find("\"database_id\"").expect("database_id key");
    let hpo = json.find("\"hpo_id\"").expect("hpo_id key");
    let biocuration = json.find("\"biocuration\"").expect("biocuration key");
    assert!(database < hpo);
    assert!(hpo < biocuration);
}

#[test]
fn record_deserializes_nulls_as_missing() {
    let json = r#"{
        "database_id": "OMIM:301500",
        "disease_name": "Fabry disease",
        "qualifier": null,
        "hpo_id": "HP:0004322",
        "onset": null
    }"#;
    let record: AnnotationRecord = serde_json::from_str(json).expect("deserialize record");
    assert_eq!(record.get(Column::HpoId), "HP:0004322");
    assert!(record.is_missing(Column::Qualifier));
    assert!(record.is_missing(Column::Onset));
}

#[test]
fn record_rejects_unknown_keys() {
    let json = r#"{"database_id": "OMIM:1", "status": "added"}"#;
    let err = serde_json::from_str::<AnnotationRecord>(json).unwrap_err();
    assert!(err.to_string().contains("unknown annotation column: status"));
}

#[test]
fn from_pairs_reports_the_offending_column() {
    let err = AnnotationRecord::from_pairs([("hpo_id", "HP:1"), ("phenotype", "x")]).unwrap_err();
    assert_eq!(err, ModelError::UnknownColumn("phenotype".to_string()));
}

#[test]
fn row_round_trips_through_json() {
    let row = AnnotationRow::new(RowId::derive("phenotype.hpoa", 1), fabry());
    let json = serde_json::to_string(&row).expect("serialize row");
    let round: AnnotationRow = serde_json::from_str(&json).expect("deserialize row");
    assert_eq!(round, row);
    assert_eq!(round.database_id(), "OMIM:301500");
    assert_eq!(round.disease_name(), "Fabry disease");
}

#[test]
fn key_pairs_disease_and_phenotype() {
    let record = fabry();
    let key = record.key();
    assert_eq!(key.database_id, "OMIM:301500");
    assert_eq!(key.hpo_id, "HP:0000963");
    assert_ne!(key, fabry().with(Column::HpoId, "HP:0004322").key());
}
