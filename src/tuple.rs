//! Typed tuple values.
//!
//! A [`Tuple`] is a fixed-arity row of [`Value`]s whose positions line up with
//! a [`Schema`]. Tuples carry no attribute names of their own: names live in
//! the schema, so renaming a relation never touches tuples already produced.
//!
//! Equality and hashing are structural over every field. Floating point cells
//! are wrapped in [`OrderedFloat`] so that tuples containing them still form a
//! total `Eq + Hash` and can sit in the deduplication set.

use crate::error::{RelCsvError, Result};
use crate::schema::{FieldKind, Schema};
use ordered_float::OrderedFloat;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value as Json};
use std::fmt;

/// One decoded cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    Str(String),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(OrderedFloat<f32>),
    F64(OrderedFloat<f64>),
}

impl Value {
    /// The kind this value was decoded as.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Str(_) => FieldKind::Str,
            Self::Bool(_) => FieldKind::Bool,
            Self::I8(_) => FieldKind::I8,
            Self::I16(_) => FieldKind::I16,
            Self::I32(_) => FieldKind::I32,
            Self::I64(_) => FieldKind::I64,
            Self::U8(_) => FieldKind::U8,
            Self::U16(_) => FieldKind::U16,
            Self::U32(_) => FieldKind::U32,
            Self::U64(_) => FieldKind::U64,
            Self::F32(_) => FieldKind::F32,
            Self::F64(_) => FieldKind::F64,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any signed or unsigned integer that fits in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::I8(v) => Some(v.into()),
            Self::I16(v) => Some(v.into()),
            Self::I32(v) => Some(v.into()),
            Self::I64(v) => Some(v),
            Self::U8(v) => Some(v.into()),
            Self::U16(v) => Some(v.into()),
            Self::U32(v) => Some(v.into()),
            Self::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Any unsigned integer, or a non-negative signed one.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::U8(v) => Some(v.into()),
            Self::U16(v) => Some(v.into()),
            Self::U32(v) => Some(v.into()),
            Self::U64(v) => Some(v),
            Self::I8(_) | Self::I16(_) | Self::I32(_) | Self::I64(_) => {
                self.as_i64().and_then(|v| u64::try_from(v).ok())
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::F32(v) => Some(f64::from(v.0)),
            Self::F64(v) => Some(v.0),
            _ => None,
        }
    }

    /// JSON form, used for typed extraction. Non-finite floats become `null`.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::Str(s) => Json::String(s.clone()),
            Self::Bool(b) => Json::Bool(*b),
            Self::U8(_) | Self::U16(_) | Self::U32(_) | Self::U64(_) => {
                self.as_u64().map_or(Json::Null, |v| Json::Number(v.into()))
            }
            Self::I8(_) | Self::I16(_) | Self::I32(_) | Self::I64(_) => {
                self.as_i64().map_or(Json::Null, |v| Json::Number(v.into()))
            }
            Self::F32(_) | Self::F64(_) => self
                .as_f64()
                .and_then(Number::from_f64)
                .map_or(Json::Null, Json::Number),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{}", v.0),
            Self::F64(v) => write!(f, "{}", v.0),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(OrderedFloat(v))
    }
}

/// An immutable row of values, positionally aligned with a [`Schema`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tuple(Box<[Value]>);

impl Tuple {
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self(values.into_boxed_slice())
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Look a value up by attribute name.
    #[must_use]
    pub fn get_named<'a>(&'a self, schema: &Schema, name: &str) -> Option<&'a Value> {
        schema.index_of(name).and_then(|i| self.0.get(i))
    }

    /// Values of the named attributes, in the order given.
    ///
    /// # Errors
    /// [`RelCsvError::KeyValidation`] if a name is not in `schema`.
    pub fn project<S: AsRef<str>>(&self, schema: &Schema, names: &[S]) -> Result<Vec<Value>> {
        names
            .iter()
            .map(|n| {
                self.get_named(schema, n.as_ref()).cloned().ok_or_else(|| {
                    RelCsvError::KeyValidation(format!("unknown attribute {}", n.as_ref()))
                })
            })
            .collect()
    }

    /// JSON object keyed by the schema's attribute names.
    #[must_use]
    pub fn to_json(&self, schema: &Schema) -> Json {
        let map = schema
            .names()
            .zip(self.0.iter())
            .map(|(n, v)| (n.to_string(), v.to_json()))
            .collect::<Map<_, _>>();
        Json::Object(map)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.0.into_vec()
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl Schema {
    /// Deserialize a tuple into a user type whose fields are named after the
    /// schema's attributes.
    ///
    /// ```
    /// use relcsv::schema::{FieldKind, Schema};
    /// use relcsv::tuple::{Tuple, Value};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// #[allow(non_snake_case)]
    /// struct Supplier { SNO: i64, City: String }
    ///
    /// let schema = Schema::new([("SNO", FieldKind::I64), ("City", FieldKind::Str)]).unwrap();
    /// let t = Tuple::new(vec![Value::I64(1), Value::from("London")]);
    /// let s: Supplier = schema.decode_tuple(&t).unwrap();
    /// assert_eq!(s.SNO, 1);
    /// assert_eq!(s.City, "London");
    /// ```
    ///
    /// # Errors
    /// [`RelCsvError::FieldMismatch`] if the tuple's arity differs from the
    /// schema's, or [`RelCsvError::Config`] if `T` does not match the shape.
    pub fn decode_tuple<T: DeserializeOwned>(&self, tuple: &Tuple) -> Result<T> {
        if tuple.arity() != self.arity() {
            return Err(RelCsvError::FieldMismatch {
                expected: self.arity(),
                found: tuple.arity(),
            });
        }
        Ok(serde_json::from_value(tuple.to_json(self))?)
    }
}
