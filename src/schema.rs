//! Tuple shape descriptors.
//!
//! A [`Schema`] is the ordered list of `(attribute name, primitive kind)` pairs
//! that every tuple of a relation conforms to. It is declared once by the
//! caller, either in code or through a serialized [`RelationConfig`](crate::config::RelationConfig),
//! and checked at construction time: attribute names must be non-empty and
//! unique, and every kind must be one the [decoder](crate::decode) supports.
//!
//! ```
//! use relcsv::schema::{FieldKind, Schema};
//!
//! let s = Schema::parse([("SNO", "int"), ("SName", "string")]).unwrap();
//! assert_eq!(s.kinds().collect::<Vec<_>>(), vec![FieldKind::I64, FieldKind::Str]);
//! assert_eq!(s.heading(), "SNO, SName");
//! ```

use crate::error::{RelCsvError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Primitive kinds a cell can be decoded into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldKind {
    Str,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl FieldKind {
    /// Every supported kind, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Str,
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
    ];

    /// Canonical name, also the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Bit width for numeric kinds, `None` for strings and booleans.
    #[must_use]
    pub const fn bits(self) -> Option<u32> {
        match self {
            Self::I8 | Self::U8 => Some(8),
            Self::I16 | Self::U16 => Some(16),
            Self::I32 | Self::U32 | Self::F32 => Some(32),
            Self::I64 | Self::U64 | Self::F64 => Some(64),
            Self::Str | Self::Bool => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = RelCsvError;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Self::Str,
            "bool" | "boolean" => Self::Bool,
            "i8" | "int8" => Self::I8,
            "i16" | "int16" => Self::I16,
            "i32" | "int32" => Self::I32,
            "i64" | "int64" | "int" => Self::I64,
            "u8" | "uint8" => Self::U8,
            "u16" | "uint16" => Self::U16,
            "u32" | "uint32" => Self::U32,
            "u64" | "uint64" | "uint" => Self::U64,
            "f32" | "float32" => Self::F32,
            "f64" | "float64" | "float" | "double" => Self::F64,
            _ => {
                return Err(RelCsvError::UnsupportedType {
                    kind: s.to_string(),
                });
            }
        };
        Ok(kind)
    }
}

impl TryFrom<String> for FieldKind {
    type Error = RelCsvError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.name().to_string()
    }
}

/// One named, typed attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered `(name, kind)` description of a relation's tuples.
///
/// Immutable once built; [`Relation::rename`](crate::relation::Relation::rename)
/// swaps in a whole new schema after checking it with [`Schema::rename_map`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Build a schema from `(name, kind)` pairs.
    ///
    /// # Errors
    /// [`RelCsvError::InvalidSchema`] if there are no fields, or a name is
    /// empty or repeated.
    pub fn new<I, N>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, FieldKind)>,
        N: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(name, kind)| Field::new(name, kind))
            .collect::<Vec<_>>();
        Self::try_from(fields)
    }

    /// Build a schema from `(name, kind name)` pairs, e.g. `("SNO", "int")`.
    ///
    /// # Errors
    /// [`RelCsvError::UnsupportedType`] for an unknown kind name, plus the
    /// errors of [`Schema::new`].
    pub fn parse<I, N, K>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, K)>,
        N: Into<String>,
        K: AsRef<str>,
    {
        let fields = fields
            .into_iter()
            .map(|(name, kind)| Ok((name, kind.as_ref().parse::<FieldKind>()?)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(fields)
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of attributes (the relation's degree).
    #[must_use]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn kinds(&self) -> impl Iterator<Item = FieldKind> + '_ {
        self.fields.iter().map(|f| f.kind)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Comma separated attribute names, e.g. `SNO, SName, Status, City`.
    #[must_use]
    pub fn heading(&self) -> String {
        self.names().collect::<Vec<_>>().join(", ")
    }

    /// Positional old-name to new-name correspondence for renaming `self` into `to`.
    ///
    /// # Errors
    /// [`RelCsvError::ShapeMismatch`] if `to` has a different arity or a
    /// different kind at any position.
    pub fn rename_map(&self, to: &Self) -> Result<HashMap<String, String>> {
        if self.arity() != to.arity() {
            return Err(RelCsvError::ShapeMismatch(format!(
                "cannot rename {} attributes to {}",
                self.arity(),
                to.arity()
            )));
        }
        let mut map = HashMap::with_capacity(self.arity());
        for (i, (old, new)) in self.fields.iter().zip(&to.fields).enumerate() {
            if old.kind != new.kind {
                return Err(RelCsvError::ShapeMismatch(format!(
                    "attribute #{i} {} is {} but rename target {} is {}",
                    old.name, old.kind, new.name, new.kind
                )));
            }
            map.insert(old.name.clone(), new.name.clone());
        }
        Ok(map)
    }
}

impl TryFrom<Vec<Field>> for Schema {
    type Error = RelCsvError;

    fn try_from(fields: Vec<Field>) -> Result<Self> {
        if fields.is_empty() {
            return Err(RelCsvError::InvalidSchema("schema has no fields".into()));
        }
        let mut seen = HashSet::with_capacity(fields.len());
        for f in &fields {
            if f.name.is_empty() {
                return Err(RelCsvError::InvalidSchema("empty attribute name".into()));
            }
            if !seen.insert(f.name.as_str()) {
                return Err(RelCsvError::InvalidSchema(format!(
                    "duplicate attribute {}",
                    f.name
                )));
            }
        }
        Ok(Self { fields })
    }
}

impl From<Schema> for Vec<Field> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field.name, field.kind)?;
        }
        write!(f, "}}")
    }
}
