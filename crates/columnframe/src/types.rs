use std::fmt;

/// Primitive element kinds a column can store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Char,
    Boolean,
    String,
    Binary,
}

impl ElementKind {
    pub const ALL: [ElementKind; 10] = [
        ElementKind::Int8,
        ElementKind::Int16,
        ElementKind::Int32,
        ElementKind::Int64,
        ElementKind::Float32,
        ElementKind::Float64,
        ElementKind::Char,
        ElementKind::Boolean,
        ElementKind::String,
        ElementKind::Binary,
    ];

    /// Encoded width of one element in bytes, or `0` for variable-width kinds.
    pub fn byte_width(self) -> usize {
        match self {
            ElementKind::Int8 | ElementKind::Boolean => 1,
            ElementKind::Int16 => 2,
            ElementKind::Int32 | ElementKind::Float32 | ElementKind::Char => 4,
            ElementKind::Int64 | ElementKind::Float64 => 8,
            ElementKind::String | ElementKind::Binary => 0,
        }
    }

    pub fn is_fixed_width(self) -> bool {
        self.byte_width() != 0
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ElementKind::Int8
                | ElementKind::Int16
                | ElementKind::Int32
                | ElementKind::Int64
                | ElementKind::Float32
                | ElementKind::Float64
        )
    }

    /// Value substituted for absence in non-nullable columns.
    pub fn default_value(self) -> Value {
        match self {
            ElementKind::Int8 => Value::Int8(0),
            ElementKind::Int16 => Value::Int16(0),
            ElementKind::Int32 => Value::Int32(0),
            ElementKind::Int64 => Value::Int64(0),
            ElementKind::Float32 => Value::Float32(0.0),
            ElementKind::Float64 => Value::Float64(0.0),
            ElementKind::Char => Value::Char('\0'),
            ElementKind::Boolean => Value::Boolean(false),
            ElementKind::String => Value::String(DEFAULT_STRING.to_string()),
            ElementKind::Binary => Value::Binary(DEFAULT_BINARY.to_vec()),
        }
    }

    pub fn non_nullable(self) -> ColumnType {
        ColumnType::new(self, false)
    }

    pub fn nullable(self) -> ColumnType {
        ColumnType::new(self, true)
    }
}

/// Placeholder stored by non-nullable string columns in place of an absent value.
pub const DEFAULT_STRING: &str = "n/a";

/// Placeholder stored by non-nullable binary columns in place of an absent value.
pub const DEFAULT_BINARY: &[u8] = &[0];

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Int8 => "Int8",
            ElementKind::Int16 => "Int16",
            ElementKind::Int32 => "Int32",
            ElementKind::Int64 => "Int64",
            ElementKind::Float32 => "Float32",
            ElementKind::Float64 => "Float64",
            ElementKind::Char => "Char",
            ElementKind::Boolean => "Boolean",
            ElementKind::String => "String",
            ElementKind::Binary => "Binary",
        };
        f.write_str(name)
    }
}

/// An element kind together with its nullability: the full type of a column.
///
/// Every combination has a stable one-byte tag used as the wire discriminant when a column is
/// persisted. Tags are never reused across kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColumnType {
    pub kind: ElementKind,
    pub nullable: bool,
}

impl ColumnType {
    pub const fn new(kind: ElementKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }

    pub fn tag(self) -> u8 {
        match (self.kind, self.nullable) {
            (ElementKind::Int8, false) => 1,
            (ElementKind::Int16, false) => 2,
            (ElementKind::Int32, false) => 3,
            (ElementKind::Int64, false) => 4,
            (ElementKind::String, false) => 5,
            (ElementKind::Float32, false) => 6,
            (ElementKind::Float64, false) => 7,
            (ElementKind::Char, false) => 8,
            (ElementKind::Boolean, false) => 9,
            (ElementKind::Int8, true) => 10,
            (ElementKind::Int16, true) => 11,
            (ElementKind::Int32, true) => 12,
            (ElementKind::Int64, true) => 13,
            (ElementKind::String, true) => 14,
            (ElementKind::Float32, true) => 15,
            (ElementKind::Float64, true) => 16,
            (ElementKind::Char, true) => 17,
            (ElementKind::Boolean, true) => 18,
            (ElementKind::Binary, false) => 19,
            (ElementKind::Binary, true) => 20,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        let (kind, nullable) = match tag {
            1 => (ElementKind::Int8, false),
            2 => (ElementKind::Int16, false),
            3 => (ElementKind::Int32, false),
            4 => (ElementKind::Int64, false),
            5 => (ElementKind::String, false),
            6 => (ElementKind::Float32, false),
            7 => (ElementKind::Float64, false),
            8 => (ElementKind::Char, false),
            9 => (ElementKind::Boolean, false),
            10 => (ElementKind::Int8, true),
            11 => (ElementKind::Int16, true),
            12 => (ElementKind::Int32, true),
            13 => (ElementKind::Int64, true),
            14 => (ElementKind::String, true),
            15 => (ElementKind::Float32, true),
            16 => (ElementKind::Float64, true),
            17 => (ElementKind::Char, true),
            18 => (ElementKind::Boolean, true),
            19 => (ElementKind::Binary, false),
            20 => (ElementKind::Binary, true),
            _ => return None,
        };
        Some(Self::new(kind, nullable))
    }

    /// All twenty column types in tag order.
    pub fn all() -> impl Iterator<Item = ColumnType> {
        (1..=20u8).filter_map(ColumnType::from_tag)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "nullable {}", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// A dynamically typed cell value, used where a column's element type is not statically known.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Char(char),
    Boolean(bool),
    String(String),
    Binary(Vec<u8>),
}

impl Value {
    /// The element kind of a concrete value, or `None` for [`Value::Null`].
    pub fn kind(&self) -> Option<ElementKind> {
        Some(match self {
            Value::Null => return None,
            Value::Int8(_) => ElementKind::Int8,
            Value::Int16(_) => ElementKind::Int16,
            Value::Int32(_) => ElementKind::Int32,
            Value::Int64(_) => ElementKind::Int64,
            Value::Float32(_) => ElementKind::Float32,
            Value::Float64(_) => ElementKind::Float64,
            Value::Char(_) => ElementKind::Char,
            Value::Boolean(_) => ElementKind::Boolean,
            Value::String(_) => ElementKind::String,
            Value::Binary(_) => ElementKind::Binary,
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Binary(v) => {
                for b in v {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}
