//! Binary column encoding.
//!
//! Layout, big-endian throughout:
//!
//! ```text
//! tag:u8  name_flag:u8  [name_len:u32  name:utf8]  rows:u32  row*
//! row := [present:u8]  payload        (presence byte only for nullable types;
//!                                      absent rows carry no payload)
//! payload := fixed-width bit pattern | len:u32 bytes
//! ```
//!
//! Tables are a `u32` column count followed by each encoded column.

use crate::any_column::AnyColumn;
use crate::column::Column;
use crate::element::Element;
use crate::error::{ColumnError, Result};
use crate::table::Table;
use crate::types::{ColumnType, ElementKind};
use bytes::{Buf, BufMut};

fn remaining<B: Buf>(buf: &B, needed: usize, what: &str) -> Result<()> {
    if buf.remaining() < needed {
        return Err(ColumnError::Decode(format!("unexpected end of input reading {what}")));
    }
    Ok(())
}

fn encode_typed<T: Element, B: BufMut>(column: &Column<T>, buf: &mut B) {
    buf.put_u8(column.column_type().tag());
    match column.name() {
        Some(name) => {
            buf.put_u8(1);
            buf.put_u32(name.len() as u32);
            buf.put_slice(name.as_bytes());
        }
        None => buf.put_u8(0),
    }
    buf.put_u32(column.len() as u32);

    let nullable = column.is_nullable();
    for entry in column.iter() {
        match entry {
            Some(value) => {
                if nullable {
                    buf.put_u8(1);
                }
                value.encode(buf);
            }
            None => buf.put_u8(0),
        }
    }
}

fn decode_typed<T: Element, B: Buf>(
    column_type: ColumnType,
    buf: &mut B,
) -> Result<Column<T>> {
    remaining(buf, 1, "name flag")?;
    let name = match buf.get_u8() {
        0 => None,
        1 => {
            remaining(buf, 4, "name length")?;
            let len = buf.get_u32() as usize;
            if len == 0 {
                return Err(ColumnError::Decode("column name flagged but empty".to_string()));
            }
            remaining(buf, len, "name")?;
            let mut bytes = vec![0u8; len];
            buf.copy_to_slice(&mut bytes);
            Some(String::from_utf8(bytes).map_err(|err| {
                ColumnError::Decode(format!("column name is not UTF-8: {err}"))
            })?)
        }
        other => return Err(ColumnError::Decode(format!("invalid name flag {other}"))),
    };

    remaining(buf, 4, "row count")?;
    let rows = buf.get_u32() as usize;
    let nullable = column_type.nullable;
    // Cap the preallocation: a corrupt row count must not trigger a huge allocation up front.
    let mut column = Column::<T>::with_capacity(rows.min(buf.remaining()), nullable);
    for _ in 0..rows {
        let present = if nullable {
            remaining(buf, 1, "presence byte")?;
            match buf.get_u8() {
                0 => false,
                1 => true,
                other => {
                    return Err(ColumnError::Decode(format!("invalid presence byte {other}")))
                }
            }
        } else {
            true
        };
        let value = if present { Some(T::decode(buf)?) } else { None };
        column
            .push(value)
            .map_err(|err| ColumnError::Decode(format!("invalid entry: {err}")))?;
    }

    if let Some(name) = name {
        column.set_name(name)?;
    }
    Ok(column)
}

/// Append the encoding of `column` to `buf`.
pub fn write_column<B: BufMut>(column: &AnyColumn, buf: &mut B) {
    match column {
        AnyColumn::Int8(c) => encode_typed(c, buf),
        AnyColumn::Int16(c) => encode_typed(c, buf),
        AnyColumn::Int32(c) => encode_typed(c, buf),
        AnyColumn::Int64(c) => encode_typed(c, buf),
        AnyColumn::Float32(c) => encode_typed(c, buf),
        AnyColumn::Float64(c) => encode_typed(c, buf),
        AnyColumn::Char(c) => encode_typed(c, buf),
        AnyColumn::Boolean(c) => encode_typed(c, buf),
        AnyColumn::String(c) => encode_typed(c, buf),
        AnyColumn::Binary(c) => encode_typed(c, buf),
    }
}

/// Read one column from the front of `buf`, dispatching on its leading type tag.
pub fn read_column<B: Buf>(buf: &mut B) -> Result<AnyColumn> {
    remaining(buf, 1, "type tag")?;
    let tag = buf.get_u8();
    let column_type = ColumnType::from_tag(tag).ok_or(ColumnError::UnsupportedConversion { tag })?;
    Ok(match column_type.kind {
        ElementKind::Int8 => decode_typed::<i8, _>(column_type, buf)?.into(),
        ElementKind::Int16 => decode_typed::<i16, _>(column_type, buf)?.into(),
        ElementKind::Int32 => decode_typed::<i32, _>(column_type, buf)?.into(),
        ElementKind::Int64 => decode_typed::<i64, _>(column_type, buf)?.into(),
        ElementKind::Float32 => decode_typed::<f32, _>(column_type, buf)?.into(),
        ElementKind::Float64 => decode_typed::<f64, _>(column_type, buf)?.into(),
        ElementKind::Char => decode_typed::<char, _>(column_type, buf)?.into(),
        ElementKind::Boolean => decode_typed::<bool, _>(column_type, buf)?.into(),
        ElementKind::String => decode_typed::<String, _>(column_type, buf)?.into(),
        ElementKind::Binary => decode_typed::<Vec<u8>, _>(column_type, buf)?.into(),
    })
}

pub fn encode_column(column: &AnyColumn) -> Vec<u8> {
    let mut out = Vec::with_capacity(column.memory_usage() + 16);
    write_column(column, &mut out);
    out
}

/// Decode a single column; trailing bytes are an error.
pub fn decode_column(bytes: &[u8]) -> Result<AnyColumn> {
    let mut buf = bytes;
    let column = read_column(&mut buf)?;
    if buf.has_remaining() {
        return Err(ColumnError::Decode(format!(
            "{} trailing bytes after column",
            buf.remaining()
        )));
    }
    Ok(column)
}

pub fn encode_table(table: &Table) -> Vec<u8> {
    let mut out = Vec::with_capacity(table.memory_usage() + 16 * table.column_count() + 4);
    out.put_u32(table.column_count() as u32);
    for column in table.columns() {
        write_column(column, &mut out);
    }
    out
}

pub fn decode_table(bytes: &[u8]) -> Result<Table> {
    let mut buf = bytes;
    remaining(&buf, 4, "column count")?;
    let count = buf.get_u32() as usize;
    let mut columns = Vec::with_capacity(count.min(buf.remaining()));
    for _ in 0..count {
        columns.push(read_column(&mut buf)?);
    }
    if buf.has_remaining() {
        return Err(ColumnError::Decode(format!(
            "{} trailing bytes after table",
            buf.remaining()
        )));
    }
    log::debug!("decoded table with {} columns", columns.len());
    Table::new(columns).map_err(|err| ColumnError::Decode(format!("invalid table: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn int32_column_layout() {
        let column: AnyColumn = Column::from_values(vec![0x0102_0304i32])
            .unwrap()
            .named("n")
            .unwrap()
            .into();
        assert_eq!(
            encode_column(&column),
            vec![3, 1, 0, 0, 0, 1, b'n', 0, 0, 0, 1, 1, 2, 3, 4]
        );
    }

    #[test]
    fn absence_is_distinct_from_short_values() {
        let column: AnyColumn = Column::from_options(vec![None, Some(vec![7u8])])
            .unwrap()
            .into();
        let bytes = encode_column(&column);
        assert_eq!(bytes, vec![20, 0, 0, 0, 0, 2, 0, 1, 0, 0, 0, 1, 7]);
        assert_eq!(decode_column(&bytes), Ok(column));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            decode_column(&[99, 0, 0, 0, 0, 0]),
            Err(ColumnError::UnsupportedConversion { tag: 99 })
        );
    }

    #[test]
    fn truncated_input_is_a_decode_error() {
        assert!(matches!(
            decode_column(&[3, 0, 0, 0, 0, 2, 0, 0]),
            Err(ColumnError::Decode(_))
        ));
    }

    #[test]
    fn empty_name_is_a_decode_error() {
        // Int32 column, name flag set with a zero name length, no rows.
        assert!(matches!(
            decode_column(&[3, 1, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(ColumnError::Decode(_))
        ));
    }

    #[test]
    fn inconsistent_tables_are_decode_errors() {
        let a: AnyColumn = Column::from_values(vec![1i8]).unwrap().named("a").unwrap().into();
        let b: AnyColumn = Column::from_values(vec![1i8, 2]).unwrap().named("b").unwrap().into();

        let mut duplicate = Vec::new();
        duplicate.put_u32(2);
        write_column(&a, &mut duplicate);
        write_column(&a, &mut duplicate);
        assert!(matches!(decode_table(&duplicate), Err(ColumnError::Decode(_))));

        let mut mismatched = Vec::new();
        mismatched.put_u32(2);
        write_column(&a, &mut mismatched);
        write_column(&b, &mut mismatched);
        assert!(matches!(decode_table(&mismatched), Err(ColumnError::Decode(_))));
    }

    #[test]
    fn zero_length_string_payload_is_rejected() {
        // Non-nullable string column with one zero-length entry.
        assert!(matches!(
            decode_column(&[5, 0, 0, 0, 0, 1, 0, 0, 0, 0]),
            Err(ColumnError::Decode(_))
        ));
    }
}
