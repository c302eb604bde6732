use crate::any_column::AnyColumn;
use crate::column::Column;
use crate::convert::ConvertTo;
use crate::error::{ColumnError, Result};
use crate::types::{ElementKind, Value, DEFAULT_BINARY, DEFAULT_STRING};
use bytes::{Buf, BufMut};
use ordered_float::OrderedFloat;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Per-kind behaviour shared by every column instantiation.
///
/// Each implementor describes one [`ElementKind`]: its default, how much space an entry takes,
/// how entries compare and hash, how they are written to and read from the wire, and how they
/// convert into every other kind (via the [`ConvertTo`] supertraits).
pub trait Element:
    Clone
    + fmt::Debug
    + 'static
    + ConvertTo<i8>
    + ConvertTo<i16>
    + ConvertTo<i32>
    + ConvertTo<i64>
    + ConvertTo<f32>
    + ConvertTo<f64>
    + ConvertTo<char>
    + ConvertTo<bool>
    + ConvertTo<String>
    + ConvertTo<Vec<u8>>
{
    const KIND: ElementKind;

    fn default_value() -> Self;

    /// Variable-width kinds refuse concrete zero-length entries.
    fn is_zero_length(&self) -> bool {
        false
    }

    /// Bytes accounted to this entry: the fixed width, or the payload plus one framing byte.
    fn encoded_len(&self) -> usize {
        Self::KIND.byte_width()
    }

    fn element_eq(&self, other: &Self) -> bool;

    fn hash_element<H: Hasher>(&self, state: &mut H);

    fn to_value(&self) -> Value;

    /// Extract a concrete entry from a dynamic value. `Value::Null` maps to `None`.
    fn from_value(value: Value) -> Result<Option<Self>>;

    fn encode<B: BufMut>(&self, buf: &mut B);

    fn decode<B: Buf>(buf: &mut B) -> Result<Self>;

    fn into_any(column: Column<Self>) -> AnyColumn;

    fn from_any(column: &AnyColumn) -> Option<&Column<Self>>;

    fn from_any_mut(column: &mut AnyColumn) -> Option<&mut Column<Self>>;
}

fn mismatch(expected: ElementKind, value: &Value) -> ColumnError {
    ColumnError::InvalidValue(format!("expected {expected} value, got {value:?}"))
}

fn ensure_remaining<B: Buf>(buf: &B, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(ColumnError::Decode(format!(
            "unexpected end of input: needed {needed} bytes, {} remaining",
            buf.remaining()
        )));
    }
    Ok(())
}

fn decode_len_prefixed<B: Buf>(buf: &mut B) -> Result<Vec<u8>> {
    ensure_remaining(buf, 4)?;
    let len = buf.get_u32() as usize;
    ensure_remaining(buf, len)?;
    let mut out = vec![0u8; len];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

macro_rules! impl_integer_element {
    ($ty:ty, $kind:ident, $put:ident, $get:ident) => {
        impl Element for $ty {
            const KIND: ElementKind = ElementKind::$kind;

            fn default_value() -> Self {
                0
            }

            fn element_eq(&self, other: &Self) -> bool {
                self == other
            }

            fn hash_element<H: Hasher>(&self, state: &mut H) {
                self.hash(state);
            }

            fn to_value(&self) -> Value {
                Value::$kind(*self)
            }

            fn from_value(value: Value) -> Result<Option<Self>> {
                match value {
                    Value::Null => Ok(None),
                    Value::$kind(v) => Ok(Some(v)),
                    other => Err(mismatch(Self::KIND, &other)),
                }
            }

            fn encode<B: BufMut>(&self, buf: &mut B) {
                buf.$put(*self);
            }

            fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
                ensure_remaining(buf, Self::KIND.byte_width())?;
                Ok(buf.$get())
            }

            fn into_any(column: Column<Self>) -> AnyColumn {
                AnyColumn::$kind(column)
            }

            fn from_any(column: &AnyColumn) -> Option<&Column<Self>> {
                match column {
                    AnyColumn::$kind(c) => Some(c),
                    _ => None,
                }
            }

            fn from_any_mut(column: &mut AnyColumn) -> Option<&mut Column<Self>> {
                match column {
                    AnyColumn::$kind(c) => Some(c),
                    _ => None,
                }
            }
        }
    };
}

impl_integer_element!(i8, Int8, put_i8, get_i8);
impl_integer_element!(i16, Int16, put_i16, get_i16);
impl_integer_element!(i32, Int32, put_i32, get_i32);
impl_integer_element!(i64, Int64, put_i64, get_i64);

macro_rules! impl_float_element {
    ($ty:ty, $kind:ident, $put:ident, $get:ident) => {
        impl Element for $ty {
            const KIND: ElementKind = ElementKind::$kind;

            fn default_value() -> Self {
                0.0
            }

            fn element_eq(&self, other: &Self) -> bool {
                OrderedFloat(*self) == OrderedFloat(*other)
            }

            fn hash_element<H: Hasher>(&self, state: &mut H) {
                OrderedFloat(*self).hash(state);
            }

            fn to_value(&self) -> Value {
                Value::$kind(*self)
            }

            fn from_value(value: Value) -> Result<Option<Self>> {
                match value {
                    Value::Null => Ok(None),
                    Value::$kind(v) => Ok(Some(v)),
                    other => Err(mismatch(Self::KIND, &other)),
                }
            }

            fn encode<B: BufMut>(&self, buf: &mut B) {
                buf.$put(*self);
            }

            fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
                ensure_remaining(buf, Self::KIND.byte_width())?;
                Ok(buf.$get())
            }

            fn into_any(column: Column<Self>) -> AnyColumn {
                AnyColumn::$kind(column)
            }

            fn from_any(column: &AnyColumn) -> Option<&Column<Self>> {
                match column {
                    AnyColumn::$kind(c) => Some(c),
                    _ => None,
                }
            }

            fn from_any_mut(column: &mut AnyColumn) -> Option<&mut Column<Self>> {
                match column {
                    AnyColumn::$kind(c) => Some(c),
                    _ => None,
                }
            }
        }
    };
}

impl_float_element!(f32, Float32, put_f32, get_f32);
impl_float_element!(f64, Float64, put_f64, get_f64);

impl Element for char {
    const KIND: ElementKind = ElementKind::Char;

    fn default_value() -> Self {
        '\0'
    }

    fn element_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_element<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }

    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    fn from_value(value: Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Char(v) => Ok(Some(v)),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32(u32::from(*self));
    }

    fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
        ensure_remaining(buf, 4)?;
        let code = buf.get_u32();
        char::from_u32(code)
            .ok_or_else(|| ColumnError::Decode(format!("invalid Unicode scalar value {code:#x}")))
    }

    fn into_any(column: Column<Self>) -> AnyColumn {
        AnyColumn::Char(column)
    }

    fn from_any(column: &AnyColumn) -> Option<&Column<Self>> {
        match column {
            AnyColumn::Char(c) => Some(c),
            _ => None,
        }
    }

    fn from_any_mut(column: &mut AnyColumn) -> Option<&mut Column<Self>> {
        match column {
            AnyColumn::Char(c) => Some(c),
            _ => None,
        }
    }
}

impl Element for bool {
    const KIND: ElementKind = ElementKind::Boolean;

    fn default_value() -> Self {
        false
    }

    fn element_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_element<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    fn from_value(value: Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Boolean(v) => Ok(Some(v)),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(*self));
    }

    fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
        ensure_remaining(buf, 1)?;
        match buf.get_u8() {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ColumnError::Decode(format!("invalid boolean byte {other}"))),
        }
    }

    fn into_any(column: Column<Self>) -> AnyColumn {
        AnyColumn::Boolean(column)
    }

    fn from_any(column: &AnyColumn) -> Option<&Column<Self>> {
        match column {
            AnyColumn::Boolean(c) => Some(c),
            _ => None,
        }
    }

    fn from_any_mut(column: &mut AnyColumn) -> Option<&mut Column<Self>> {
        match column {
            AnyColumn::Boolean(c) => Some(c),
            _ => None,
        }
    }
}

impl Element for String {
    const KIND: ElementKind = ElementKind::String;

    fn default_value() -> Self {
        DEFAULT_STRING.to_string()
    }

    fn is_zero_length(&self) -> bool {
        self.is_empty()
    }

    fn encoded_len(&self) -> usize {
        self.len() + 1
    }

    fn element_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_element<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(v) => Ok(Some(v)),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32(self.len() as u32);
        buf.put_slice(self.as_bytes());
    }

    fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
        let bytes = decode_len_prefixed(buf)?;
        String::from_utf8(bytes).map_err(|err| ColumnError::Decode(format!("invalid UTF-8: {err}")))
    }

    fn into_any(column: Column<Self>) -> AnyColumn {
        AnyColumn::String(column)
    }

    fn from_any(column: &AnyColumn) -> Option<&Column<Self>> {
        match column {
            AnyColumn::String(c) => Some(c),
            _ => None,
        }
    }

    fn from_any_mut(column: &mut AnyColumn) -> Option<&mut Column<Self>> {
        match column {
            AnyColumn::String(c) => Some(c),
            _ => None,
        }
    }
}

impl Element for Vec<u8> {
    const KIND: ElementKind = ElementKind::Binary;

    fn default_value() -> Self {
        DEFAULT_BINARY.to_vec()
    }

    fn is_zero_length(&self) -> bool {
        self.is_empty()
    }

    fn encoded_len(&self) -> usize {
        self.len() + 1
    }

    fn element_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_element<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }

    fn to_value(&self) -> Value {
        Value::Binary(self.clone())
    }

    fn from_value(value: Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Binary(v) => Ok(Some(v)),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32(self.len() as u32);
        buf.put_slice(self);
    }

    fn decode<B: Buf>(buf: &mut B) -> Result<Self> {
        decode_len_prefixed(buf)
    }

    fn into_any(column: Column<Self>) -> AnyColumn {
        AnyColumn::Binary(column)
    }

    fn from_any(column: &AnyColumn) -> Option<&Column<Self>> {
        match column {
            AnyColumn::Binary(c) => Some(c),
            _ => None,
        }
    }

    fn from_any_mut(column: &mut AnyColumn) -> Option<&mut Column<Self>> {
        match column {
            AnyColumn::Binary(c) => Some(c),
            _ => None,
        }
    }
}
