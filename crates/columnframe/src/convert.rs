//! The conversion matrix between element kinds.
//!
//! Every ordered pair of kinds has a [`ConvertTo`] implementation returning `None` when a
//! concrete value has no representation in the target kind. Column-level conversion layers the
//! nullability rules on top: absence propagates into nullable targets and becomes the kind
//! default in non-nullable ones, and only concrete entries go through the per-value rule.

use crate::any_column::AnyColumn;
use crate::column::Column;
use crate::element::Element;
use crate::error::{ColumnError, Result};
use crate::types::{ColumnType, ElementKind};

/// Conversion of one concrete value into another element kind.
pub trait ConvertTo<U> {
    fn convert(&self) -> Option<U>;
}

const TRUE_TOKENS: [&str; 6] = ["true", "t", "1", "yes", "y", "on"];
const FALSE_TOKENS: [&str; 6] = ["false", "f", "0", "no", "n", "off"];

/// Case-insensitive boolean parsing over the fixed truth and falsity sets.
pub fn parse_bool(text: &str) -> Option<bool> {
    if TRUE_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(text)) {
        Some(true)
    } else if FALSE_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(text)) {
        Some(false)
    } else {
        None
    }
}

fn char_from_code(code: u32) -> Option<char> {
    char::from_u32(code)
}

macro_rules! int_conversions {
    ($($src:ty),*) => {$(
        impl ConvertTo<i8> for $src {
            fn convert(&self) -> Option<i8> {
                Some(*self as i8)
            }
        }
        impl ConvertTo<i16> for $src {
            fn convert(&self) -> Option<i16> {
                Some(*self as i16)
            }
        }
        impl ConvertTo<i32> for $src {
            fn convert(&self) -> Option<i32> {
                Some(*self as i32)
            }
        }
        impl ConvertTo<i64> for $src {
            fn convert(&self) -> Option<i64> {
                Some(*self as i64)
            }
        }
        impl ConvertTo<f32> for $src {
            fn convert(&self) -> Option<f32> {
                Some(*self as f32)
            }
        }
        impl ConvertTo<f64> for $src {
            fn convert(&self) -> Option<f64> {
                Some(*self as f64)
            }
        }
        impl ConvertTo<char> for $src {
            fn convert(&self) -> Option<char> {
                u32::try_from(*self).ok().and_then(char_from_code)
            }
        }
        impl ConvertTo<bool> for $src {
            fn convert(&self) -> Option<bool> {
                Some(*self != 0)
            }
        }
        impl ConvertTo<String> for $src {
            fn convert(&self) -> Option<String> {
                Some(self.to_string())
            }
        }
        impl ConvertTo<Vec<u8>> for $src {
            fn convert(&self) -> Option<Vec<u8>> {
                Some(self.to_be_bytes().to_vec())
            }
        }
    )*};
}

int_conversions!(i8, i16, i32, i64);

// Float to integer casts truncate toward zero, saturate at the target range and map NaN to 0.
macro_rules! float_conversions {
    ($($src:ty),*) => {$(
        impl ConvertTo<i8> for $src {
            fn convert(&self) -> Option<i8> {
                Some(*self as i8)
            }
        }
        impl ConvertTo<i16> for $src {
            fn convert(&self) -> Option<i16> {
                Some(*self as i16)
            }
        }
        impl ConvertTo<i32> for $src {
            fn convert(&self) -> Option<i32> {
                Some(*self as i32)
            }
        }
        impl ConvertTo<i64> for $src {
            fn convert(&self) -> Option<i64> {
                Some(*self as i64)
            }
        }
        impl ConvertTo<f32> for $src {
            fn convert(&self) -> Option<f32> {
                Some(*self as f32)
            }
        }
        impl ConvertTo<f64> for $src {
            fn convert(&self) -> Option<f64> {
                Some(*self as f64)
            }
        }
        impl ConvertTo<char> for $src {
            fn convert(&self) -> Option<char> {
                let truncated = self.trunc();
                if truncated >= 0.0 && (truncated as f64) <= u32::MAX as f64 {
                    char_from_code(truncated as u32)
                } else {
                    None
                }
            }
        }
        impl ConvertTo<bool> for $src {
            fn convert(&self) -> Option<bool> {
                Some(*self != 0.0)
            }
        }
        impl ConvertTo<String> for $src {
            fn convert(&self) -> Option<String> {
                Some(self.to_string())
            }
        }
        impl ConvertTo<Vec<u8>> for $src {
            fn convert(&self) -> Option<Vec<u8>> {
                Some(self.to_be_bytes().to_vec())
            }
        }
    )*};
}

float_conversions!(f32, f64);

// Char and boolean sources into the six numeric kinds, through their integer code.
macro_rules! numeric_targets {
    (@one $src:ty, |$v:ident| $code:expr, $($dst:ty),*) => {$(
        impl ConvertTo<$dst> for $src {
            fn convert(&self) -> Option<$dst> {
                let $v = self;
                Some($code as $dst)
            }
        }
    )*};
    ($src:ty, |$v:ident| $code:expr) => {
        numeric_targets!(@one $src, |$v| $code, i8, i16, i32, i64, f32, f64);
    };
}

numeric_targets!(char, |v| u32::from(*v));
numeric_targets!(bool, |v| u8::from(*v));

impl ConvertTo<char> for char {
    fn convert(&self) -> Option<char> {
        Some(*self)
    }
}

impl ConvertTo<bool> for char {
    fn convert(&self) -> Option<bool> {
        parse_bool(self.encode_utf8(&mut [0u8; 4]))
    }
}

impl ConvertTo<String> for char {
    fn convert(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl ConvertTo<Vec<u8>> for char {
    fn convert(&self) -> Option<Vec<u8>> {
        Some(u32::from(*self).to_be_bytes().to_vec())
    }
}

impl ConvertTo<char> for bool {
    fn convert(&self) -> Option<char> {
        Some(if *self { '1' } else { '0' })
    }
}

impl ConvertTo<bool> for bool {
    fn convert(&self) -> Option<bool> {
        Some(*self)
    }
}

impl ConvertTo<String> for bool {
    fn convert(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl ConvertTo<Vec<u8>> for bool {
    fn convert(&self) -> Option<Vec<u8>> {
        Some(vec![u8::from(*self)])
    }
}

macro_rules! parse_targets {
    ($($dst:ty),*) => {$(
        impl ConvertTo<$dst> for String {
            fn convert(&self) -> Option<$dst> {
                self.parse::<$dst>().ok()
            }
        }
    )*};
}

parse_targets!(i8, i16, i32, i64, f32, f64);

impl ConvertTo<char> for String {
    fn convert(&self) -> Option<char> {
        let mut chars = self.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl ConvertTo<bool> for String {
    fn convert(&self) -> Option<bool> {
        parse_bool(self)
    }
}

impl ConvertTo<String> for String {
    fn convert(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl ConvertTo<Vec<u8>> for String {
    fn convert(&self) -> Option<Vec<u8>> {
        Some(self.as_bytes().to_vec())
    }
}

macro_rules! be_targets {
    ($($dst:ty),*) => {$(
        impl ConvertTo<$dst> for Vec<u8> {
            fn convert(&self) -> Option<$dst> {
                let bytes = self.as_slice().try_into().ok()?;
                Some(<$dst>::from_be_bytes(bytes))
            }
        }
    )*};
}

be_targets!(i8, i16, i32, i64, f32, f64);

impl ConvertTo<char> for Vec<u8> {
    fn convert(&self) -> Option<char> {
        let bytes: [u8; 4] = self.as_slice().try_into().ok()?;
        char_from_code(u32::from_be_bytes(bytes))
    }
}

impl ConvertTo<bool> for Vec<u8> {
    fn convert(&self) -> Option<bool> {
        match self.as_slice() {
            [b] => Some(*b != 0),
            _ => None,
        }
    }
}

impl ConvertTo<String> for Vec<u8> {
    fn convert(&self) -> Option<String> {
        String::from_utf8(self.clone()).ok()
    }
}

impl ConvertTo<Vec<u8>> for Vec<u8> {
    fn convert(&self) -> Option<Vec<u8>> {
        Some(self.clone())
    }
}

impl<T: Element> Column<T> {
    /// Convert every entry into kind `U`, producing a new column with the same name.
    ///
    /// The first entry that cannot be represented aborts the whole conversion.
    pub fn convert_to<U: Element>(&self, nullable: bool) -> Result<Column<U>>
    where
        T: ConvertTo<U>,
    {
        let target = ColumnType::new(U::KIND, nullable);
        let mut out = Column::<U>::with_capacity(self.len(), nullable);
        for entry in self.iter() {
            let converted = match entry {
                Some(value) => Some(<T as ConvertTo<U>>::convert(value).ok_or_else(|| {
                    ColumnError::Conversion {
                        value: value.to_value().to_string(),
                        target,
                    }
                })?),
                None => None,
            };
            out.push(converted)?;
        }
        if let Some(name) = self.name() {
            out.set_name(name)?;
        }
        Ok(out)
    }
}

/// Dispatch a typed column to the conversion for `target`.
pub(crate) fn convert_column<T: Element>(
    column: &Column<T>,
    target: ColumnType,
) -> Result<AnyColumn> {
    let nullable = target.nullable;
    Ok(match target.kind {
        ElementKind::Int8 => column.convert_to::<i8>(nullable)?.into(),
        ElementKind::Int16 => column.convert_to::<i16>(nullable)?.into(),
        ElementKind::Int32 => column.convert_to::<i32>(nullable)?.into(),
        ElementKind::Int64 => column.convert_to::<i64>(nullable)?.into(),
        ElementKind::Float32 => column.convert_to::<f32>(nullable)?.into(),
        ElementKind::Float64 => column.convert_to::<f64>(nullable)?.into(),
        ElementKind::Char => column.convert_to::<char>(nullable)?.into(),
        ElementKind::Boolean => column.convert_to::<bool>(nullable)?.into(),
        ElementKind::String => column.convert_to::<String>(nullable)?.into(),
        ElementKind::Binary => column.convert_to::<Vec<u8>>(nullable)?.into(),
    })
}
