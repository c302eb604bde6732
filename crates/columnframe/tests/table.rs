use columnframe::{
    AnyColumn, Column, ColumnError, ColumnSchema, ElementKind, Table, TableOptions, Value,
};
use pretty_assertions::assert_eq;

fn build_table() -> Table {
    let ids: AnyColumn = Column::from_values(vec![1i64, 2, 3])
        .unwrap()
        .named("id")
        .unwrap()
        .into();
    let names: AnyColumn = Column::from_values(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        .unwrap()
        .named("name")
        .unwrap()
        .into();
    let scores: AnyColumn = Column::from_options(vec![Some(1.5f64), None, Some(3.0)])
        .unwrap()
        .named("score")
        .unwrap()
        .into();
    Table::new(vec![ids, names, scores]).unwrap()
}

#[test]
fn insert_row_fans_out_to_every_column() {
    let mut table = build_table();
    table
        .insert_row(
            1,
            &[
                Value::Int64(9),
                Value::String("x".into()),
                Value::Null,
            ],
        )
        .unwrap();

    assert_eq!(table.row_count(), 4);
    assert_eq!(
        table.column("name").unwrap().to_values(),
        vec![
            Value::String("a".into()),
            Value::String("x".into()),
            Value::String("b".into()),
            Value::String("c".into()),
        ]
    );
    assert_eq!(
        table.row(1).unwrap(),
        vec![Value::Int64(9), Value::String("x".into()), Value::Null]
    );
    assert_eq!(
        table.row(2).unwrap(),
        vec![Value::Int64(2), Value::String("b".into()), Value::Null]
    );
    for column in table.columns() {
        assert_eq!(column.len(), 4);
    }
}

#[test]
fn insert_then_remove_restores_rows() {
    let mut table = build_table();
    let before: Vec<Vec<Value>> = (0..3).map(|r| table.row(r).unwrap()).collect();

    table
        .insert_row(0, &[Value::Int64(0), Value::Null, Value::Float64(0.5)])
        .unwrap();
    table.remove_row(0).unwrap();

    let after: Vec<Vec<Value>> = (0..3).map(|r| table.row(r).unwrap()).collect();
    assert_eq!(after, before);
}

#[test]
fn remove_rows_closes_gap() {
    let mut table = build_table();
    table.remove_rows(0, 2).unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(
        table.row(0).unwrap(),
        vec![
            Value::Int64(3),
            Value::String("c".into()),
            Value::Float64(3.0)
        ]
    );
    assert_eq!(
        table.remove_rows(0, 2),
        Err(ColumnError::IndexOutOfRange { index: 2, len: 1 })
    );
}

#[test]
fn mismatched_lengths_are_rejected() {
    let short: AnyColumn = Column::from_values(vec![1i8]).unwrap().named("short").unwrap().into();
    let mut table = build_table();
    assert_eq!(
        table.add_column(short),
        Err(ColumnError::ColumnLengthMismatch {
            column: "short".to_string(),
            expected: 3,
            actual: 1,
        })
    );
    let dup: AnyColumn = Column::from_values(vec![1i8, 2, 3]).unwrap().named("id").unwrap().into();
    assert_eq!(
        table.add_column(dup),
        Err(ColumnError::DuplicateColumn {
            column: "id".to_string()
        })
    );
}

#[test]
fn convert_column_keeps_name_and_position() {
    let mut table = build_table();
    table
        .convert_column("id", ElementKind::String.non_nullable())
        .unwrap();
    assert_eq!(table.column_index("id"), Some(0));
    assert_eq!(table.get(2, "id"), Ok(Value::String("3".into())));
    assert_eq!(table.row_count(), 3);

    let before = table.clone();
    assert!(table
        .convert_column("name", ElementKind::Int32.non_nullable())
        .is_err());
    assert_eq!(table, before);
}

#[test]
fn typed_column_access() {
    let table = build_table();
    let scores = table.typed_column::<f64>("score").unwrap();
    assert_eq!(scores.null_count(), 1);
    assert!(table.typed_column::<i32>("score").is_none());
}

#[test]
fn schema_tables_grow_and_shrink() {
    let schema = vec![
        ColumnSchema::new("flag", ElementKind::Boolean.nullable()),
        ColumnSchema::new("blob", ElementKind::Binary.non_nullable()),
    ];
    let mut table = Table::with_schema(&schema, TableOptions::default()).unwrap();
    assert_eq!(table.schema(), schema);

    for i in 0..20u8 {
        table
            .append_row(&[Value::Boolean(i % 2 == 0), Value::Binary(vec![i])])
            .unwrap();
    }
    assert_eq!(table.column("blob").unwrap().capacity(), 32);

    table.shrink_to_fit();
    for column in table.columns() {
        assert_eq!(column.capacity(), 20);
        assert_eq!(column.len(), 20);
    }
    // 20 one-byte booleans plus 20 one-byte blobs with a framing byte each.
    assert_eq!(table.memory_usage(), 20 + 40);
}

#[test]
fn set_and_get_by_name() {
    let mut table = build_table();
    table.set(1, "score", Value::Float64(2.0)).unwrap();
    assert_eq!(table.get(1, "score"), Ok(Value::Float64(2.0)));
    assert_eq!(
        table.get(0, "missing"),
        Err(ColumnError::UnknownColumn {
            column: "missing".to_string()
        })
    );
    assert_eq!(
        table.get(3, "id"),
        Err(ColumnError::IndexOutOfRange { index: 3, len: 3 })
    );
}
