#![forbid(unsafe_code)]

use crate::any_column::AnyColumn;
use crate::column::Column;
use crate::element::Element;
use crate::error::{check_index, ColumnError, Result};
use crate::types::{ColumnType, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct TableOptions {
    /// Buffer size given to every column of a table built from a schema.
    pub initial_capacity: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Uniquely named columns sharing one row count.
///
/// Row `i` of every column belongs to the same record. Row insertion and removal validate
/// against every column before touching any of them, so a failed call leaves the table as it
/// was.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<AnyColumn>,
    column_index: HashMap<String, usize>,
    rows: usize,
}

fn column_name(column: &AnyColumn) -> Result<String> {
    column
        .name()
        .map(str::to_string)
        .ok_or_else(|| ColumnError::InvalidArgument("table columns must be named".to_string()))
}

impl Table {
    /// Assemble a table from named, equally long columns.
    pub fn new(columns: Vec<AnyColumn>) -> Result<Self> {
        let mut table = Self {
            columns: Vec::with_capacity(columns.len()),
            column_index: HashMap::new(),
            rows: 0,
        };
        for column in columns {
            table.add_column(column)?;
        }
        Ok(table)
    }

    /// An empty table with one column per schema entry.
    pub fn with_schema(schema: &[ColumnSchema], options: TableOptions) -> Result<Self> {
        let columns = schema
            .iter()
            .map(|col| {
                let mut column = AnyColumn::with_capacity(col.column_type, options.initial_capacity);
                column.set_name(col.name.as_str())?;
                Ok(column)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(columns)
    }

    pub fn schema(&self) -> Vec<ColumnSchema> {
        self.columns
            .iter()
            .map(|c| ColumnSchema {
                name: c.name().unwrap_or_default().to_string(),
                column_type: c.column_type(),
            })
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().filter_map(AnyColumn::name)
    }

    pub fn columns(&self) -> &[AnyColumn] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<AnyColumn> {
        self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    pub fn column(&self, name: &str) -> Option<&AnyColumn> {
        self.columns.get(self.column_index(name)?)
    }

    pub fn column_at(&self, idx: usize) -> Option<&AnyColumn> {
        self.columns.get(idx)
    }

    /// Typed view of a column, if it stores elements of kind `T`.
    pub fn typed_column<T: Element>(&self, name: &str) -> Option<&Column<T>> {
        self.column(name)?.as_column::<T>()
    }

    fn require_index(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ColumnError::UnknownColumn {
                column: name.to_string(),
            })
    }

    pub fn get(&self, row: usize, column: &str) -> Result<Value> {
        let idx = self.require_index(column)?;
        self.columns[idx].get(row)
    }

    pub fn set(&mut self, row: usize, column: &str, value: Value) -> Result<()> {
        let idx = self.require_index(column)?;
        self.columns[idx].set(row, value)
    }

    /// All values of one row, in column order.
    pub fn row(&self, row: usize) -> Result<Vec<Value>> {
        check_index(row, self.rows)?;
        self.columns.iter().map(|c| c.get(row)).collect()
    }

    pub fn append_row(&mut self, values: &[Value]) -> Result<()> {
        self.insert_row(self.rows, values)
    }

    /// Insert a record at `index`, shifting later rows down.
    ///
    /// `Value::Null` is stored as absence in nullable columns and as the kind default elsewhere.
    pub fn insert_row(&mut self, index: usize, values: &[Value]) -> Result<()> {
        if self.columns.is_empty() {
            return Err(ColumnError::InvalidArgument(
                "cannot insert a row into a table without columns".to_string(),
            ));
        }
        if values.len() != self.columns.len() {
            return Err(ColumnError::InvalidArgument(format!(
                "row has {} values but table has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        if index > self.rows {
            return Err(ColumnError::IndexOutOfRange {
                index,
                len: self.rows,
            });
        }
        for (column, value) in self.columns.iter().zip(values) {
            column.validate(value)?;
        }

        log::debug!(
            "inserting row at {index} across {} columns ({} rows)",
            self.columns.len(),
            self.rows
        );
        let end = self.rows;
        for (column, value) in self.columns.iter_mut().zip(values) {
            if column.len() == column.capacity() {
                column.resize();
            }
            column.insert_value_at(index, end, value.clone())?;
        }
        self.rows += 1;
        Ok(())
    }

    /// Remove rows `[from, to)` from every column.
    pub fn remove_rows(&mut self, from: usize, to: usize) -> Result<()> {
        if from > to {
            return Err(ColumnError::InvalidArgument(format!(
                "invalid row range {from}..{to}"
            )));
        }
        if to > self.rows {
            return Err(ColumnError::IndexOutOfRange {
                index: to,
                len: self.rows,
            });
        }
        if from == to {
            return Ok(());
        }

        log::debug!(
            "removing rows {from}..{to} across {} columns ({} rows)",
            self.columns.len(),
            self.rows
        );
        let end = self.rows;
        for column in &mut self.columns {
            column.remove(from, to, end)?;
        }
        self.rows -= to - from;
        Ok(())
    }

    pub fn remove_row(&mut self, index: usize) -> Result<()> {
        check_index(index, self.rows)?;
        self.remove_rows(index, index + 1)
    }

    /// Append a named column. The first column of an empty table sets the row count.
    pub fn add_column(&mut self, column: AnyColumn) -> Result<()> {
        let name = column_name(&column)?;
        if self.column_index.contains_key(&name) {
            return Err(ColumnError::DuplicateColumn { column: name });
        }
        if !self.columns.is_empty() && column.len() != self.rows {
            return Err(ColumnError::ColumnLengthMismatch {
                column: name,
                expected: self.rows,
                actual: column.len(),
            });
        }

        if self.columns.is_empty() {
            self.rows = column.len();
        }
        self.column_index.insert(name, self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Result<AnyColumn> {
        let idx = self.require_index(name)?;
        let column = self.columns.remove(idx);
        self.rebuild_index();
        if self.columns.is_empty() {
            self.rows = 0;
        }
        Ok(column)
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        let idx = self.require_index(from)?;
        if from == to {
            return Ok(());
        }
        if self.column_index.contains_key(to) {
            return Err(ColumnError::DuplicateColumn {
                column: to.to_string(),
            });
        }
        self.columns[idx].set_name(to)?;
        self.rebuild_index();
        Ok(())
    }

    /// Replace a column with its conversion to `target`, keeping its name and position.
    ///
    /// A failed conversion leaves the original column in place.
    pub fn convert_column(&mut self, name: &str, target: ColumnType) -> Result<()> {
        let idx = self.require_index(name)?;
        let converted = self.columns[idx].convert_to(target)?;
        self.columns[idx] = converted;
        Ok(())
    }

    /// Trim every column buffer to exactly the row count.
    pub fn shrink_to_fit(&mut self) {
        for column in &mut self.columns {
            column.match_length(self.rows);
        }
    }

    pub fn memory_usage(&self) -> usize {
        self.columns.iter().map(AnyColumn::memory_usage).sum()
    }

    fn rebuild_index(&mut self) {
        self.column_index = self
            .columns
            .iter()
            .enumerate()
            .filter_map(|(idx, c)| Some((c.name()?.to_string(), idx)))
            .collect();
    }
}
