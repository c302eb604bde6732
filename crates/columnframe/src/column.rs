use crate::bitmap::ValidityMask;
use crate::element::Element;
use crate::error::{check_index, ColumnError, Result};
use crate::types::{ColumnType, Value};
use std::hash::{Hash, Hasher};

/// A named, homogeneously typed column backed by one contiguous buffer.
///
/// The buffer has a physical `capacity` and the column tracks a logical `len <= capacity`.
/// Slots past `len` always hold the kind default (and are marked absent for nullable columns).
///
/// Nullability is a property of the instance: nullable columns carry a presence bitmap sized to
/// the buffer, non-nullable columns substitute [`Element::default_value`] wherever an absent
/// value is written.
#[derive(Clone, Debug)]
pub struct Column<T: Element> {
    name: Option<String>,
    values: Box<[T]>,
    validity: Option<ValidityMask>,
    len: usize,
}

fn default_buffer<T: Element>(len: usize) -> Box<[T]> {
    std::iter::repeat_with(T::default_value).take(len).collect()
}

impl<T: Element> Column<T> {
    pub fn new(nullable: bool) -> Self {
        Self::with_capacity(0, nullable)
    }

    /// An empty column whose buffer is preallocated to `capacity` slots.
    pub fn with_capacity(capacity: usize, nullable: bool) -> Self {
        Self {
            name: None,
            values: default_buffer(capacity),
            validity: nullable.then(|| ValidityMask::with_len_all_false(capacity)),
            len: 0,
        }
    }

    /// A column of `len` rows, each holding the kind default (or absent, when nullable).
    pub fn with_len(len: usize, nullable: bool) -> Self {
        let mut column = Self::with_capacity(len, nullable);
        column.len = len;
        column
    }

    /// A non-nullable column holding `values`.
    pub fn from_values(values: Vec<T>) -> Result<Self> {
        if let Some(idx) = values.iter().position(Element::is_zero_length) {
            return Err(zero_length_error::<T>(idx));
        }
        let len = values.len();
        Ok(Self {
            name: None,
            values: values.into_boxed_slice(),
            validity: None,
            len,
        })
    }

    /// A nullable column where `None` entries are absent.
    pub fn from_options(values: Vec<Option<T>>) -> Result<Self> {
        let mut column = Self::with_capacity(values.len(), true);
        for (idx, value) in values.into_iter().enumerate() {
            column.check_value(idx, &value)?;
            column.store(idx, value);
        }
        column.len = column.values.len();
        Ok(column)
    }

    pub fn named(mut self, name: impl Into<String>) -> Result<Self> {
        self.set_name(name)?;
        Ok(self)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(ColumnError::InvalidArgument(
                "column name must not be empty".to_string(),
            ));
        }
        self.name = Some(name);
        Ok(())
    }

    pub fn clear_name(&mut self) {
        self.name = None;
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::new(T::KIND, self.is_nullable())
    }

    pub fn is_nullable(&self) -> bool {
        self.validity.is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Entry at `index`: `None` only for an absent slot of a nullable column.
    pub fn get(&self, index: usize) -> Result<Option<&T>> {
        check_index(index, self.len)?;
        Ok(self.entry(index))
    }

    pub fn get_value(&self, index: usize) -> Result<Value> {
        Ok(self
            .get(index)?
            .map(Element::to_value)
            .unwrap_or(Value::Null))
    }

    pub fn is_value_present(&self, index: usize) -> Result<bool> {
        check_index(index, self.len)?;
        Ok(self.present(index))
    }

    /// Write `value` at `index`. Absence in a non-nullable column stores the kind default.
    pub fn set(&mut self, index: usize, value: Option<T>) -> Result<()> {
        check_index(index, self.len)?;
        self.check_value(index, &value)?;
        self.store(index, value);
        Ok(())
    }

    pub fn set_value(&mut self, index: usize, value: Value) -> Result<()> {
        self.set(index, T::from_value(value)?)
    }

    /// Append one entry, growing the buffer when it is full.
    pub fn push(&mut self, value: Option<T>) -> Result<()> {
        self.check_value(self.len, &value)?;
        if self.len == self.capacity() {
            self.resize();
        }
        let idx = self.len;
        self.store(idx, value);
        self.len += 1;
        Ok(())
    }

    /// Double the physical capacity (to at least 2), keeping every entry at its index.
    pub fn resize(&mut self) {
        let new_capacity = (self.capacity() * 2).max(2);
        log::trace!(
            "growing {} column {:?} from {} to {} slots",
            self.column_type(),
            self.name,
            self.capacity(),
            new_capacity
        );
        self.reallocate(new_capacity);
    }

    /// Shift `[index, end)` one slot right and write `value` at `index`.
    ///
    /// `end` is the caller's logical end and must not exceed [`Column::len`]; the buffer must
    /// already have room for one more entry past it (call [`Column::resize`] first if not).
    pub fn insert_value_at(&mut self, index: usize, end: usize, value: Option<T>) -> Result<()> {
        if end > self.len {
            return Err(ColumnError::InvalidArgument(format!(
                "logical end {end} exceeds column length {}",
                self.len
            )));
        }
        if end >= self.capacity() {
            return Err(ColumnError::InvalidArgument(format!(
                "no free slot past logical end {end} (capacity {})",
                self.capacity()
            )));
        }
        if index > end {
            return Err(ColumnError::IndexOutOfRange {
                index,
                len: end + 1,
            });
        }
        self.check_value(index, &value)?;

        self.values[index..=end].rotate_right(1);
        if let Some(validity) = &mut self.validity {
            validity.insert(index, end, false);
        }
        self.store(index, value);
        self.len = self.len.max(end + 1);
        Ok(())
    }

    /// Remove `[from, to)`, shifting `[to, end)` down and clearing the vacated tail.
    pub fn remove(&mut self, from: usize, to: usize, end: usize) -> Result<()> {
        if end > self.len {
            return Err(ColumnError::InvalidArgument(format!(
                "logical end {end} exceeds column length {}",
                self.len
            )));
        }
        if from > to {
            return Err(ColumnError::InvalidArgument(format!(
                "invalid range {from}..{to}"
            )));
        }
        if to > end {
            return Err(ColumnError::IndexOutOfRange { index: to, len: end });
        }

        let count = to - from;
        if count == 0 {
            return Ok(());
        }
        self.values[from..end].rotate_left(count);
        for slot in &mut self.values[end - count..end] {
            *slot = T::default_value();
        }
        if let Some(validity) = &mut self.validity {
            validity.remove(from, to, end);
        }
        if end == self.len {
            self.len -= count;
        }
        Ok(())
    }

    /// Reallocate to exactly `len` slots, truncating or padding with defaults/absence.
    pub fn match_length(&mut self, len: usize) {
        if len == self.len && len == self.capacity() {
            return;
        }
        log::trace!(
            "matching {} column {:?} to length {} (len {}, capacity {})",
            self.column_type(),
            self.name,
            len,
            self.len,
            self.capacity()
        );
        // Slots past `self.len` already hold defaults, so padding from a larger buffer is safe.
        self.reallocate(len);
        self.len = len;
    }

    /// Borrow the whole backing buffer, including slots past the logical length.
    ///
    /// Absent entries of nullable columns hold the kind default here; consult
    /// [`Column::is_value_present`] to tell them apart.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable access to the backing buffer. Writing a zero-length value to a variable-width
    /// column through this alias breaks the column's invariants.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn null_count(&self) -> usize {
        match &self.validity {
            Some(validity) => self.len - validity.count_ones_before(self.len),
            None => 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        (0..self.len).map(move |idx| self.entry(idx))
    }

    /// Estimated encoded size of the logical entries in bytes.
    pub fn memory_usage(&self) -> usize {
        if T::KIND.is_fixed_width() {
            return T::KIND.byte_width() * self.len;
        }
        let absent_cost = T::default_value().encoded_len();
        self.iter()
            .map(|entry| entry.map_or(absent_cost, Element::encoded_len))
            .sum()
    }

    fn present(&self, index: usize) -> bool {
        self.validity.as_ref().map_or(true, |v| v.get(index))
    }

    fn entry(&self, index: usize) -> Option<&T> {
        self.present(index).then(|| &self.values[index])
    }

    fn check_value(&self, index: usize, value: &Option<T>) -> Result<()> {
        match value {
            Some(v) if v.is_zero_length() => Err(zero_length_error::<T>(index)),
            _ => Ok(()),
        }
    }

    fn store(&mut self, index: usize, value: Option<T>) {
        let present = value.is_some();
        self.values[index] = value.unwrap_or_else(T::default_value);
        if let Some(validity) = &mut self.validity {
            validity.set(index, present);
        }
    }

    fn reallocate(&mut self, capacity: usize) {
        let old = std::mem::take(&mut self.values);
        self.values = old
            .into_vec()
            .into_iter()
            .chain(std::iter::repeat_with(T::default_value))
            .take(capacity)
            .collect();
        if let Some(validity) = &mut self.validity {
            validity.resize(capacity);
        }
        self.len = self.len.min(capacity);
    }
}

fn zero_length_error<T: Element>(index: usize) -> ColumnError {
    ColumnError::InvalidValue(format!(
        "zero-length {} value at index {index}; use absence instead",
        T::KIND
    ))
}

impl<T: Element> PartialEq for Column<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.is_nullable() == other.is_nullable()
            && self.len == other.len
            && self.iter().zip(other.iter()).all(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => a.element_eq(b),
                (None, None) => true,
                _ => false,
            })
    }
}

impl<T: Element> Eq for Column<T> {}

impl<T: Element> Hash for Column<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.is_nullable().hash(state);
        self.len.hash(state);
        for entry in self.iter() {
            match entry {
                Some(v) => {
                    1u8.hash(state);
                    v.hash_element(state);
                }
                None => 0u8.hash(state),
            }
        }
    }
}
