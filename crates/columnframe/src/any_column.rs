use crate::column::Column;
use crate::convert::convert_column;
use crate::element::Element;
use crate::error::{ColumnError, Result};
use crate::types::{ColumnType, ElementKind, Value};

/// A column of any element kind.
///
/// Tables hold columns of mixed kinds through this enum; each variant wraps the generic
/// [`Column`] instantiated for one kind, with nullability carried by the column itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnyColumn {
    Int8(Column<i8>),
    Int16(Column<i16>),
    Int32(Column<i32>),
    Int64(Column<i64>),
    Float32(Column<f32>),
    Float64(Column<f64>),
    Char(Column<char>),
    Boolean(Column<bool>),
    String(Column<String>),
    Binary(Column<Vec<u8>>),
}

macro_rules! dispatch {
    ($self:expr, $col:ident => $body:expr) => {
        match $self {
            AnyColumn::Int8($col) => $body,
            AnyColumn::Int16($col) => $body,
            AnyColumn::Int32($col) => $body,
            AnyColumn::Int64($col) => $body,
            AnyColumn::Float32($col) => $body,
            AnyColumn::Float64($col) => $body,
            AnyColumn::Char($col) => $body,
            AnyColumn::Boolean($col) => $body,
            AnyColumn::String($col) => $body,
            AnyColumn::Binary($col) => $body,
        }
    };
}

impl<T: Element> From<Column<T>> for AnyColumn {
    fn from(column: Column<T>) -> Self {
        T::into_any(column)
    }
}

impl AnyColumn {
    /// An empty column of `column_type` with room for `capacity` rows.
    pub fn with_capacity(column_type: ColumnType, capacity: usize) -> Self {
        let nullable = column_type.nullable;
        match column_type.kind {
            ElementKind::Int8 => Column::<i8>::with_capacity(capacity, nullable).into(),
            ElementKind::Int16 => Column::<i16>::with_capacity(capacity, nullable).into(),
            ElementKind::Int32 => Column::<i32>::with_capacity(capacity, nullable).into(),
            ElementKind::Int64 => Column::<i64>::with_capacity(capacity, nullable).into(),
            ElementKind::Float32 => Column::<f32>::with_capacity(capacity, nullable).into(),
            ElementKind::Float64 => Column::<f64>::with_capacity(capacity, nullable).into(),
            ElementKind::Char => Column::<char>::with_capacity(capacity, nullable).into(),
            ElementKind::Boolean => Column::<bool>::with_capacity(capacity, nullable).into(),
            ElementKind::String => Column::<String>::with_capacity(capacity, nullable).into(),
            ElementKind::Binary => Column::<Vec<u8>>::with_capacity(capacity, nullable).into(),
        }
    }

    /// A column of `len` rows holding defaults (or absence, when nullable).
    pub fn with_len(column_type: ColumnType, len: usize) -> Self {
        let mut column = Self::with_capacity(column_type, len);
        column.match_length(len);
        column
    }

    /// Build a column of `column_type` from dynamic values.
    pub fn from_values(column_type: ColumnType, values: Vec<Value>) -> Result<Self> {
        let mut column = Self::with_capacity(column_type, values.len());
        for value in values {
            column.push(value)?;
        }
        Ok(column)
    }

    pub fn name(&self) -> Option<&str> {
        dispatch!(self, c => c.name())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        dispatch!(self, c => c.set_name(name))
    }

    pub fn clear_name(&mut self) {
        dispatch!(self, c => c.clear_name())
    }

    pub fn column_type(&self) -> ColumnType {
        dispatch!(self, c => c.column_type())
    }

    pub fn kind(&self) -> ElementKind {
        self.column_type().kind
    }

    pub fn tag(&self) -> u8 {
        self.column_type().tag()
    }

    pub fn is_nullable(&self) -> bool {
        dispatch!(self, c => c.is_nullable())
    }

    pub fn len(&self) -> usize {
        dispatch!(self, c => c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        dispatch!(self, c => c.capacity())
    }

    pub fn get(&self, index: usize) -> Result<Value> {
        dispatch!(self, c => c.get_value(index))
    }

    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        dispatch!(self, c => c.set_value(index, value))
    }

    pub fn is_value_present(&self, index: usize) -> Result<bool> {
        dispatch!(self, c => c.is_value_present(index))
    }

    pub fn null_count(&self) -> usize {
        dispatch!(self, c => c.null_count())
    }

    pub fn push(&mut self, value: Value) -> Result<()> {
        dispatch!(self, c => c.push(from_value(value)?))
    }

    pub fn resize(&mut self) {
        dispatch!(self, c => c.resize())
    }

    pub fn insert_value_at(&mut self, index: usize, end: usize, value: Value) -> Result<()> {
        dispatch!(self, c => c.insert_value_at(index, end, from_value(value)?))
    }

    pub fn remove(&mut self, from: usize, to: usize, end: usize) -> Result<()> {
        dispatch!(self, c => c.remove(from, to, end))
    }

    pub fn match_length(&mut self, len: usize) {
        dispatch!(self, c => c.match_length(len))
    }

    pub fn memory_usage(&self) -> usize {
        dispatch!(self, c => c.memory_usage())
    }

    /// Logical entries as dynamic values; absent entries become [`Value::Null`].
    pub fn to_values(&self) -> Vec<Value> {
        dispatch!(self, c => c
            .iter()
            .map(|entry| entry.map(Element::to_value).unwrap_or(Value::Null))
            .collect())
    }

    /// Check that `value` could be written to this column without mutating anything.
    pub fn validate(&self, value: &Value) -> Result<()> {
        match value {
            Value::Null => Ok(()),
            Value::String(s) if s.is_empty() => Err(ColumnError::InvalidValue(
                "zero-length String value; use absence instead".to_string(),
            )),
            Value::Binary(b) if b.is_empty() => Err(ColumnError::InvalidValue(
                "zero-length Binary value; use absence instead".to_string(),
            )),
            other if other.kind() != Some(self.kind()) => Err(ColumnError::InvalidValue(format!(
                "expected {} value, got {other:?}",
                self.kind()
            ))),
            _ => Ok(()),
        }
    }

    /// Convert into `target`, keeping the name. Converting to the column's own type clones it.
    pub fn convert_to(&self, target: ColumnType) -> Result<AnyColumn> {
        if target == self.column_type() {
            return Ok(self.clone());
        }
        log::debug!(
            "converting column {:?} ({} rows) from {} to {}",
            self.name(),
            self.len(),
            self.column_type(),
            target
        );
        dispatch!(self, c => convert_column(c, target))
    }

    /// Convert into the column type identified by a wire tag.
    pub fn convert_to_tag(&self, tag: u8) -> Result<AnyColumn> {
        let target =
            ColumnType::from_tag(tag).ok_or(ColumnError::UnsupportedConversion { tag })?;
        self.convert_to(target)
    }

    pub fn as_column<T: Element>(&self) -> Option<&Column<T>> {
        T::from_any(self)
    }

    pub fn as_column_mut<T: Element>(&mut self) -> Option<&mut Column<T>> {
        T::from_any_mut(self)
    }
}

fn from_value<T: Element>(value: Value) -> Result<Option<T>> {
    T::from_value(value)
}
