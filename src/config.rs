//! Relation configuration.
//!
//! A [`RelationConfig`] is the serializable form of everything needed to build
//! a [`CsvRelation`](crate::relation::CsvRelation) apart from the source
//! itself: the schema, declared candidate keys, whether the source is already
//! distinct, the handoff buffer size, and CSV dialect options.
//!
//! ```
//! use relcsv::config::RelationConfig;
//!
//! let cfg = RelationConfig::from_json_str(r#"{
//!     "schema": [
//!         {"name": "SNO", "kind": "int"},
//!         {"name": "SName", "kind": "string"}
//!     ],
//!     "candidate_keys": [["SNO"]],
//!     "source_distinct": true
//! }"#).unwrap();
//! assert_eq!(cfg.schema.arity(), 2);
//! assert_eq!(cfg.channel_capacity, 1);
//! ```

use crate::error::{RelCsvError, Result};
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default number of tuples that may wait in the handoff channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

/// Declarative description of a relation over a record source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationConfig {
    /// Tuple shape.
    pub schema: Schema,

    /// Declared candidate keys; empty means "every attribute".
    #[serde(default)]
    pub candidate_keys: Vec<Vec<String>>,

    /// Caller's assertion that the source holds no duplicate records. When
    /// `true` the deduplication stage is skipped. Independent of
    /// `candidate_keys`.
    #[serde(default)]
    pub source_distinct: bool,

    /// Tuples buffered between producer and consumer (minimum 1).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Dialect used when the source is a CSV file.
    #[serde(default)]
    pub csv: CsvOptions,
}

impl RelationConfig {
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            candidate_keys: Vec::new(),
            source_distinct: false,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            csv: CsvOptions::default(),
        }
    }

    #[must_use]
    pub fn with_candidate_keys<I, K, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidate_keys = keys
            .into_iter()
            .map(|k| k.into_iter().map(Into::into).collect())
            .collect();
        self
    }

    #[must_use]
    pub const fn with_source_distinct(mut self, distinct: bool) -> Self {
        self.source_distinct = distinct;
        self
    }

    #[must_use]
    pub const fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_csv(mut self, csv: CsvOptions) -> Self {
        self.csv = csv;
        self
    }

    /// # Errors
    /// [`RelCsvError::Config`] if the document is malformed or its schema is
    /// rejected (unknown kind names, duplicate attributes).
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    /// [`RelCsvError::Io`] if the file cannot be opened, otherwise as
    /// [`RelationConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| RelCsvError::Config(format!("{}: {e}", path.display())))
    }

    /// # Errors
    /// [`RelCsvError::Config`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// CSV dialect knobs passed through to `csv::ReaderBuilder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field separator byte.
    pub delimiter: u8,
    /// Skip the first record as a header row.
    pub has_headers: bool,
    /// Quote byte.
    pub quote: u8,
    /// Trim whitespace around fields.
    pub trim: bool,
    /// Lines starting with this byte are ignored.
    pub comment: Option<u8>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
            quote: b'"',
            trim: false,
            comment: None,
        }
    }
}
