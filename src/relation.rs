//! The relation façade handed to a relational engine.
//!
//! [`Relation`] is the contract a downstream engine consumes: a heading
//! ([`Schema`]), a set of [`CandidateKeys`], a one-shot tuple stream, an
//! error accessor, and rename. [`CsvRelation`] implements it over any
//! [`RecordSource`].
//!
//! ```
//! use relcsv::relation::{CsvRelation, Relation};
//! use relcsv::schema::Schema;
//! use relcsv::source::VecSource;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let schema = Schema::parse([("SNO", "int"), ("SName", "string"), ("Status", "int"), ("City", "string")])?;
//! let source = VecSource::from_lines("1,Smith,20,London\n2,Jones,10,Paris\n1,Smith,20,London", ',');
//! let mut rel = CsvRelation::new(source, schema, Vec::<Vec<&str>>::new())?;
//! assert_eq!(rel.to_string(), "Relation(SNO, SName, Status, City)");
//!
//! let (stream, _cancel) = rel.tuples()?;
//! let tuples = stream.try_collect().await?;
//! assert_eq!(tuples.len(), 2);
//! assert!(rel.err().is_none());
//! # Ok(())
//! # }
//! ```

use crate::config::{DEFAULT_CHANNEL_CAPACITY, RelationConfig};
use crate::dedup::Deduplicator;
use crate::error::{RelCsvError, Result};
use crate::keys::CandidateKeys;
use crate::schema::Schema;
use crate::source::RecordSource;
use crate::stream::{CancelHandle, Producer, ProducerState, RunState, StreamStats, TupleStream};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;

/// What a relational engine needs from a tuple source.
pub trait Relation {
    /// Attribute names and kinds, in tuple order.
    fn schema(&self) -> &Schema;

    fn candidate_keys(&self) -> &CandidateKeys;

    /// Number of attributes.
    fn degree(&self) -> usize {
        self.schema().arity()
    }

    /// Start producing tuples. May be called once.
    ///
    /// # Errors
    /// [`RelCsvError::AlreadyConsumed`] on a second call, or
    /// [`RelCsvError::NoRuntime`] outside a tokio runtime.
    fn tuples(&mut self) -> Result<(TupleStream, CancelHandle)>;

    /// The first error of the production run, if any.
    fn err(&self) -> Option<RelCsvError>;

    /// Adopt the names of `to`, which must match this relation's arity and kinds.
    ///
    /// # Errors
    /// [`RelCsvError::ShapeMismatch`] or [`RelCsvError::KeyValidation`].
    fn rename(&mut self, to: Schema) -> Result<()>;
}

/// A relation whose tuples are parsed from a single-use record source.
pub struct CsvRelation<S = Box<dyn RecordSource>> {
    source: Option<S>,
    schema: Schema,
    keys: CandidateKeys,
    source_distinct: bool,
    channel_capacity: usize,
    run: Arc<RunState>,
}

impl<S: RecordSource> CsvRelation<S> {
    /// Build a relation over `source`.
    ///
    /// An empty `keys` declaration makes the full attribute set the sole
    /// candidate key. Deduplication is on unless
    /// [`with_source_distinct`](Self::with_source_distinct) says otherwise,
    /// whether or not keys were declared.
    ///
    /// # Errors
    /// [`RelCsvError::KeyValidation`] if a declared key is empty or names an
    /// unknown attribute.
    pub fn new<I, K, N>(source: S, schema: Schema, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let keys = CandidateKeys::declare(&schema, keys)?;
        Ok(Self {
            source: Some(source),
            schema,
            keys,
            source_distinct: false,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            run: Arc::new(RunState::default()),
        })
    }

    /// Build a relation from a [`RelationConfig`].
    ///
    /// # Errors
    /// As [`CsvRelation::new`].
    pub fn from_config(source: S, config: &RelationConfig) -> Result<Self> {
        Ok(Self::new(source, config.schema.clone(), &config.candidate_keys)?
            .with_source_distinct(config.source_distinct)
            .with_channel_capacity(config.channel_capacity))
    }

    /// Assert that the source holds no duplicate records, skipping deduplication.
    /// A duplicate in a source declared distinct is not detected.
    #[must_use]
    pub const fn with_source_distinct(mut self, distinct: bool) -> Self {
        self.source_distinct = distinct;
        self
    }

    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub const fn source_distinct(&self) -> bool {
        self.source_distinct
    }

    /// Producer state; `Idle` until [`Relation::tuples`] is called.
    #[must_use]
    pub fn state(&self) -> ProducerState {
        self.run.state()
    }

    #[must_use]
    pub fn stats(&self) -> StreamStats {
        self.run.stats()
    }

    /// Start producing on an explicit runtime handle.
    ///
    /// # Errors
    /// [`RelCsvError::AlreadyConsumed`] if tuples were already requested.
    pub fn tuples_on(&mut self, handle: &Handle) -> Result<(TupleStream, CancelHandle)> {
        let source = self.source.take().ok_or(RelCsvError::AlreadyConsumed)?;
        let producer = Producer {
            source,
            schema: self.schema.clone(),
            dedup: (!self.source_distinct).then(Deduplicator::new),
            capacity: self.channel_capacity,
            run: Arc::clone(&self.run),
        };
        let (stream, cancel, _join) = producer.spawn(handle);
        Ok((stream, cancel))
    }
}

impl<S: RecordSource> Relation for CsvRelation<S> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn candidate_keys(&self) -> &CandidateKeys {
        &self.keys
    }

    fn tuples(&mut self) -> Result<(TupleStream, CancelHandle)> {
        let handle = Handle::try_current().map_err(|_| RelCsvError::NoRuntime)?;
        self.tuples_on(&handle)
    }

    fn err(&self) -> Option<RelCsvError> {
        self.run.error().cloned()
    }

    /// Renames in place: the source and any running stream are untouched, and
    /// the candidate keys follow the positional old-to-new name mapping.
    fn rename(&mut self, to: Schema) -> Result<()> {
        let mapping = self.schema.rename_map(&to)?;
        let keys = self.keys.remap(&mapping)?;
        tracing::debug!(from = %self.schema.heading(), to = %to.heading(), "renamed relation");
        self.schema = to;
        self.keys = keys;
        Ok(())
    }
}

#[cfg(feature = "io-csv")]
impl CsvRelation<crate::io::csv::CsvSource<Box<dyn std::io::Read + Send>>> {
    /// Open a (possibly compressed) CSV file as a relation.
    ///
    /// # Errors
    /// [`RelCsvError::Io`] if the file cannot be opened, otherwise as
    /// [`CsvRelation::from_config`].
    pub fn open(path: impl AsRef<std::path::Path>, config: &RelationConfig) -> Result<Self> {
        let source = crate::io::csv::CsvSource::from_path(path, &config.csv)?;
        Self::from_config(source, config)
    }
}

impl<S> fmt::Display for CsvRelation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relation({})", self.schema.heading())
    }
}

impl<S> fmt::Debug for CsvRelation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvRelation")
            .field("schema", &self.schema)
            .field("candidate_keys", &self.keys)
            .field("source_distinct", &self.source_distinct)
            .field("consumed", &self.source.is_none())
            .field("state", &self.run.state())
            .finish()
    }
}
