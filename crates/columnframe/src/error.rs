use crate::types::ColumnType;

pub type Result<T, E = ColumnError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColumnError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot convert {value:?} to {target}")]
    Conversion { value: String, target: ColumnType },

    #[error("unsupported conversion to unknown type tag {tag}")]
    UnsupportedConversion { tag: u8 },

    #[error("duplicate column: {column}")]
    DuplicateColumn { column: String },

    #[error("unknown column: {column}")]
    UnknownColumn { column: String },

    #[error("column length mismatch for {column}: expected {expected} rows, got {actual}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("decode error: {0}")]
    Decode(String),
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(ColumnError::IndexOutOfRange { index, len });
    }
    Ok(())
}
