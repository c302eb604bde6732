//! In-memory, statically typed columnar tables.
//!
//! This crate focuses on:
//! - One generic growable column ([`Column`]) instantiated per element kind, in nullable and
//!   non-nullable flavours.
//! - A total conversion matrix between every pair of column types ([`AnyColumn::convert_to`]).
//! - Row-aligned tables whose insert/remove fan out to every column ([`Table`]).
//! - A compact binary encoding keyed by a one-byte type tag per column ([`codec`]).

#![forbid(unsafe_code)]

mod any_column;
mod bitmap;
pub mod codec;
mod column;
mod convert;
mod element;
mod error;
mod table;
mod types;

pub use crate::any_column::AnyColumn;
pub use crate::column::Column;
pub use crate::convert::{parse_bool, ConvertTo};
pub use crate::element::Element;
pub use crate::error::{ColumnError, Result};
pub use crate::table::{ColumnSchema, Table, TableOptions};
pub use crate::types::{ColumnType, ElementKind, Value, DEFAULT_BINARY, DEFAULT_STRING};
