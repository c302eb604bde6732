use columnframe::{AnyColumn, Column, ColumnError, ColumnType, ElementKind, Value};
use pretty_assertions::assert_eq;

fn int32s(values: Vec<i32>) -> AnyColumn {
    Column::from_values(values).unwrap().named("n").unwrap().into()
}

#[test]
fn nullable_int_to_string_propagates_absence() {
    let column: AnyColumn = Column::from_options(vec![Some(1i32), None, Some(3)])
        .unwrap()
        .named("ids")
        .unwrap()
        .into();

    let converted = column.convert_to(ElementKind::String.nullable()).unwrap();
    assert_eq!(converted.name(), Some("ids"));
    assert_eq!(
        converted.to_values(),
        vec![
            Value::String("1".into()),
            Value::Null,
            Value::String("3".into())
        ]
    );
}

#[test]
fn nullable_to_non_nullable_substitutes_defaults() {
    let column: AnyColumn = Column::from_options(vec![Some(1i32), None]).unwrap().into();

    let ints = column.convert_to(ElementKind::Int64.non_nullable()).unwrap();
    assert_eq!(ints.to_values(), vec![Value::Int64(1), Value::Int64(0)]);

    let strings = column.convert_to(ElementKind::String.non_nullable()).unwrap();
    assert_eq!(
        strings.to_values(),
        vec![Value::String("1".into()), Value::String("n/a".into())]
    );
}

#[test]
fn non_nullable_to_nullable_never_introduces_absence() {
    let column = int32s(vec![0, 5]);
    let converted = column.convert_to(ElementKind::Int16.nullable()).unwrap();
    assert_eq!(converted.null_count(), 0);
    assert_eq!(converted.to_values(), vec![Value::Int16(0), Value::Int16(5)]);
}

#[test]
fn string_to_boolean_uses_truth_sets() {
    let column: AnyColumn = Column::from_values(vec!["yes".to_string(), "OFF".to_string()])
        .unwrap()
        .into();
    let converted = column.convert_to(ElementKind::Boolean.non_nullable()).unwrap();
    assert_eq!(
        converted.to_values(),
        vec![Value::Boolean(true), Value::Boolean(false)]
    );

    let bad: AnyColumn = Column::from_values(vec!["yes".to_string(), "maybe".to_string()])
        .unwrap()
        .into();
    assert_eq!(
        bad.convert_to(ElementKind::Boolean.nullable()),
        Err(ColumnError::Conversion {
            value: "maybe".to_string(),
            target: ElementKind::Boolean.nullable(),
        })
    );
}

#[test]
fn unparsable_numeric_text_aborts_conversion() {
    let column: AnyColumn = Column::from_values(vec!["12".to_string(), "1x".to_string()])
        .unwrap()
        .into();
    let err = column
        .convert_to(ElementKind::Int32.non_nullable())
        .unwrap_err();
    assert!(matches!(err, ColumnError::Conversion { .. }));
}

#[test]
fn int32_to_binary_is_big_endian() {
    let converted = int32s(vec![0x0102_0304])
        .convert_to(ElementKind::Binary.non_nullable())
        .unwrap();
    assert_eq!(converted.to_values(), vec![Value::Binary(vec![1, 2, 3, 4])]);
    assert_eq!(converted.tag(), 19);
}

#[test]
fn numeric_round_trip_through_wider_kinds() {
    let original = int32s(vec![i32::MIN, -1, 0, 1, i32::MAX]);
    for wider in [
        ElementKind::Int64,
        ElementKind::Float64,
        ElementKind::String,
        ElementKind::Binary,
    ] {
        for nullable in [false, true] {
            let there = original.convert_to(ColumnType::new(wider, nullable)).unwrap();
            let back = there.convert_to(ElementKind::Int32.non_nullable()).unwrap();
            assert_eq!(back, original, "via {wider} (nullable {nullable})");
        }
    }

    let small: AnyColumn = Column::from_values(vec![i8::MIN, 0, i8::MAX]).unwrap().into();
    let back = small
        .convert_to(ElementKind::Float32.non_nullable())
        .unwrap()
        .convert_to(ElementKind::Int8.non_nullable())
        .unwrap();
    assert_eq!(back, small);
}

#[test]
fn narrowing_truncates_twos_complement() {
    let converted = int32s(vec![0x1_0080, -129])
        .convert_to(ElementKind::Int8.non_nullable())
        .unwrap();
    assert_eq!(converted.to_values(), vec![Value::Int8(-128), Value::Int8(127)]);
}

#[test]
fn same_type_conversion_is_an_independent_clone() {
    let original = int32s(vec![1, 2]);
    let mut copy = original.convert_to(original.column_type()).unwrap();
    assert_eq!(copy, original);
    copy.set(0, Value::Int32(9)).unwrap();
    assert_eq!(original.get(0), Ok(Value::Int32(1)));
}

#[test]
fn every_pair_is_defined_for_default_values() {
    // Every kind's default converts to every column type: the matrix is total over defaults,
    // except that defaults with no representation in the target (e.g. "n/a" as a number) fail
    // with a conversion error rather than any other kind of error.
    for source in ColumnType::all() {
        let column = AnyColumn::with_len(source, 2);
        for target in ColumnType::all() {
            match column.convert_to(target) {
                Ok(converted) => {
                    assert_eq!(converted.column_type(), target);
                    assert_eq!(converted.len(), 2);
                }
                Err(ColumnError::Conversion { .. }) => {}
                Err(other) => panic!("{source} -> {target}: unexpected {other:?}"),
            }
        }
    }
}

#[test]
fn unknown_target_tag_is_unsupported() {
    assert_eq!(
        int32s(vec![1]).convert_to_tag(0),
        Err(ColumnError::UnsupportedConversion { tag: 0 })
    );
}

#[test]
fn char_and_boolean_conversions() {
    let chars: AnyColumn = Column::from_options(vec![Some('A'), None, Some('y')]).unwrap().into();
    assert_eq!(
        chars.convert_to(ElementKind::Int32.nullable()).unwrap().to_values(),
        vec![Value::Int32(65), Value::Null, Value::Int32(121)]
    );
    assert!(chars.convert_to(ElementKind::Boolean.nullable()).is_err());

    let flags: AnyColumn = Column::from_values(vec![true, false]).unwrap().into();
    assert_eq!(
        flags.convert_to(ElementKind::String.non_nullable()).unwrap().to_values(),
        vec![Value::String("true".into()), Value::String("false".into())]
    );
    assert_eq!(
        flags.convert_to(ElementKind::Binary.nullable()).unwrap().to_values(),
        vec![Value::Binary(vec![1]), Value::Binary(vec![0])]
    );
}
