use hpoa_core::{DatasetStore, EditSession, MasterTable};
use hpoa_ingest::read_hpoa_str;
use hpoa_model::{AnnotationRecord, AnnotationRow, AnnotationTable, Column, RowId};
use hpoa_output::{ExportOptions, export};
use proptest::prelude::*;
use proptest::test_runner::Config;

/// Any text TSV can carry: no tabs or line breaks.
const CELL: &str = "[^\t\n\r]{0,10}";

#[derive(Debug, Clone)]
enum Op {
    Edit { row: usize, column: usize, value: String },
    Remove { row: usize },
    Add { values: Vec<String> },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..8, 0usize..Column::COUNT, CELL)
            .prop_map(|(row, column, value)| Op::Edit { row, column, value }),
        1 => (0usize..8).prop_map(|row| Op::Remove { row }),
        1 => prop::collection::vec(CELL, Column::COUNT).prop_map(|values| Op::Add { values }),
    ]
}

fn master(rows: usize) -> MasterTable {
    let mut table = AnnotationTable::new("roundtrip.hpoa");
    table.metadata.push("#version: 2025-05-06");
    for ordinal in 0..rows {
        table.push_row(AnnotationRow::new(
            RowId::derive("roundtrip.hpoa", ordinal as u64 + 1),
            AnnotationRecord::new()
                .with(Column::DatabaseId, format!("OMIM:{}", 100 + ordinal))
                .with(Column::HpoId, format!("HP:{ordinal:07}"))
                .with(Column::Aspect, "P"),
        ));
    }
    MasterTable::from_table(table)
}

fn run(session: &mut EditSession, op: &Op) {
    let ids: Vec<_> = session.working_copy().rows().map(|row| row.id).collect();
    match op {
        Op::Edit { row, column, value } => {
            if let Some(id) = ids.get(*row) {
                session
                    .edit(*id, Column::ALL[*column].name(), value.clone())
                    .expect("edit existing row");
            }
        }
        Op::Remove { row } => {
            if let Some(id) = ids.get(*row) {
                session.remove_row(*id).expect("remove existing row");
            }
        }
        Op::Add { values } => {
            let record = Column::ALL
                .iter()
                .zip(values)
                .fold(AnnotationRecord::new(), |record, (column, value)| {
                    record.with(*column, value.clone())
                });
            session.add_row(record).expect("add row");
        }
    }
}

proptest! {
    #![proptest_config(Config::with_cases(64))]

    #[test]
    fn tsv_export_reloads_to_the_working_copy(
        rows in 0usize..6,
        ops in prop::collection::vec(op(), 0..16),
    ) {
        let store = DatasetStore::new(master(rows));
        let mut session = store.begin_session();
        for op in &ops {
            run(&mut session, op);
        }

        let bytes = export(session.working_copy(), &ExportOptions::default())
            .expect("export");
        let text = String::from_utf8(bytes).expect("utf-8 export");
        let reloaded = read_hpoa_str(&text, "roundtrip.hpoa").expect("reload export");

        let expected: Vec<&AnnotationRecord> =
            session.working_copy().rows().map(|row| &row.record).collect();
        let actual: Vec<&AnnotationRecord> =
            reloaded.rows.iter().map(|row| &row.record).collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(&reloaded.metadata, session.working_copy().metadata());
    }
}
