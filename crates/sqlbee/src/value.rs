//! Literal values bound as statement parameters.
//!
//! A [`Value`] is an opaque payload ([`Datum`]) plus an optional declared
//! [`ValueType`]. The declared type is advisory: callers use it to tell apart
//! an integer `2` from a string `"2"` downstream, the renderer never looks at
//! it.
//!
//! ```
//! use sqlbee::{Value, ValueType};
//!
//! let year = Value::typed(2015, ValueType::Int);
//! assert_eq!(year, 2015);
//! assert_eq!(year.declared_type(), Some(ValueType::Int));
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed payload carried by a [`Value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Datum {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
}

/// Declared type tag of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Text,
    Bytes,
    Date,
    DateTime,
    Timestamp,
    Uuid,
    Json,
    Decimal,
}

impl Datum {
    /// The type tag matching this payload, `None` for NULL.
    pub fn value_type(&self) -> Option<ValueType> {
        Some(match self {
            Datum::Null => return None,
            Datum::Bool(_) => ValueType::Bool,
            Datum::Int(_) => ValueType::Int,
            Datum::Float(_) => ValueType::Float,
            Datum::Text(_) => ValueType::Text,
            Datum::Bytes(_) => ValueType::Bytes,
            Datum::Date(_) => ValueType::Date,
            Datum::DateTime(_) => ValueType::DateTime,
            Datum::Timestamp(_) => ValueType::Timestamp,
            Datum::Uuid(_) => ValueType::Uuid,
            Datum::Json(_) => ValueType::Json,
            #[cfg(feature = "rust_decimal")]
            Datum::Decimal(_) => ValueType::Decimal,
        })
    }
}

/// A literal operand: rendered as `?` and appended to the parameter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    datum: Datum,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    declared: Option<ValueType>,
}

impl Value {
    /// Create an untyped literal.
    pub fn new(datum: impl Into<Datum>) -> Self {
        Self {
            datum: datum.into(),
            declared: None,
        }
    }

    /// Create a literal with a declared type tag.
    pub fn typed(datum: impl Into<Datum>, ty: ValueType) -> Self {
        Self {
            datum: datum.into(),
            declared: Some(ty),
        }
    }

    /// A NULL literal.
    pub fn null() -> Self {
        Self::new(Datum::Null)
    }

    pub fn datum(&self) -> &Datum {
        &self.datum
    }

    pub fn into_datum(self) -> Datum {
        self.datum
    }

    /// The type tag given at construction, if any.
    pub fn declared_type(&self) -> Option<ValueType> {
        self.declared
    }

    /// Declared type, falling back to the payload's own type.
    pub fn value_type(&self) -> Option<ValueType> {
        self.declared.or_else(|| self.datum.value_type())
    }

    pub fn is_null(&self) -> bool {
        matches!(self.datum, Datum::Null)
    }
}

impl From<Datum> for Value {
    fn from(datum: Datum) -> Self {
        Value::new(datum)
    }
}

macro_rules! impl_datum_from {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for Datum {
                fn from(v: $ty) -> Self {
                    Datum::$variant(v $(as $cast)?)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::new(Datum::from(v))
                }
            }
        )*
    };
}

impl_datum_from! {
    bool => Bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int,
    u8 => Int as i64,
    u16 => Int as i64,
    u32 => Int as i64,
    f32 => Float as f64,
    f64 => Float,
    String => Text,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<Utc> => Timestamp,
    Uuid => Uuid,
    serde_json::Value => Json,
}

#[cfg(feature = "rust_decimal")]
impl_datum_from! {
    rust_decimal::Decimal => Decimal,
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Text(v.to_string())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::new(Datum::from(v))
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(v: Option<T>) -> Self {
        v.map_or(Datum::Null, Into::into)
    }
}

// Payload comparisons, ignoring the declared type.

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        matches!(self.datum, Datum::Int(v) if v == *other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        *self == i64::from(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        matches!(self.datum, Datum::Bool(v) if v == *other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        matches!(&self.datum, Datum::Text(v) if v == other)
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        *self == other.as_str()
    }
}
