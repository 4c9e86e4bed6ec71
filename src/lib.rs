//! # relcsv
//!
//! Typed, streaming **relations over delimited-text records**. `relcsv` turns a
//! source of raw records (one ordered list of text cells per call) into a
//! cancellable, optionally deduplicated stream of typed tuples, ready to be fed
//! to a relational engine.
//!
//! ## Key Features
//!
//! - **Declared schemas** - tuple shape is an explicit, serializable list of
//!   `(name, kind)` pairs checked at construction time
//! - **Width-checked decoding** - `i8`..`i64`, `u8`..`u64`, `f32`, `f64`,
//!   `bool` and `string` cells, with base prefixes for integers
//! - **Candidate keys** - validated, canonically ordered, carried through renames
//! - **Deduplication** - full-tuple set semantics unless the source is declared distinct
//! - **Streaming with cancellation** - one producer task per relation, a bounded
//!   handoff channel and a one-shot cancel signal
//! - **Latched errors** - the first failure ends the run and stays observable
//! - **File sources** - CSV via the `csv` crate, with transparent gzip / zstd
//!
//! ## Quick Start
//!
//! ```
//! use relcsv::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let schema = Schema::parse([
//!     ("SNO", "int"),
//!     ("SName", "string"),
//!     ("Status", "int"),
//!     ("City", "string"),
//! ])?;
//! let source = VecSource::from_lines("1,Smith,20,London\n2,Jones,10,Paris", ',');
//! let mut rel = CsvRelation::new(source, schema, [["SNO"]])?;
//!
//! let (mut stream, _cancel) = rel.tuples()?;
//! while let Some(t) = stream.next().await {
//!     println!("{t}");
//! }
//! // Always consult the error slot once the stream ends.
//! assert!(rel.err().is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Schema
//!
//! A [`Schema`] is the ordered `(name, kind)` heading of a relation. Build one
//! in code with [`Schema::new`] / [`Schema::parse`], or load a whole
//! [`RelationConfig`] from JSON.
//!
//! ### Tuple
//!
//! A [`Tuple`] is a fixed-arity row of [`Value`]s aligned with the schema.
//! Equality and hashing are structural over every field. Use
//! [`Schema::decode_tuple`] to map a tuple onto your own `Deserialize` type.
//!
//! ### Relation
//!
//! The [`Relation`] trait is the engine-facing contract; [`CsvRelation`]
//! implements it over any [`RecordSource`]. A relation is consumed once:
//! [`Relation::tuples`] spawns the producer and hands back a [`TupleStream`]
//! and a [`CancelHandle`].
//!
//! ### Errors
//!
//! All fallible calls return [`RelCsvError`]. Configuration problems (bad kind
//! names, unknown key attributes, incompatible renames) are reported
//! immediately. Data problems (arity mismatch, undecodable cells, source
//! failures) end the stream and are latched; read them with
//! [`Relation::err`] or [`TupleStream::try_collect`].
//!
//! ## Feature Flags
//!
//! - `io-csv` - Enable [`io::csv::CsvSource`] and [`CsvRelation::open`]
//! - `compression-gzip` - Transparent `.gz` decompression for file sources
//! - `compression-zstd` - Transparent `.zst` decompression for file sources
//!
//! ## Module Overview
//!
//! - [`schema`] - Field kinds and schemas
//! - [`decode`] - Cell decoding
//! - [`tuple`] - Values and tuples
//! - [`parse`] - Record parsing
//! - [`keys`] - Candidate key registry
//! - [`source`] - Record source trait and in-memory source
//! - [`io`] - CSV file sources and decompression
//! - [`dedup`] - Deduplication stage
//! - [`stream`] - Producer task, tuple stream, cancellation
//! - [`relation`] - Relation contract and the CSV relation
//! - [`config`] - Serializable relation configuration
//! - [`testing`] - Fixtures and temporary files for tests

pub mod config;
pub mod decode;
pub mod dedup;
pub mod error;
pub mod io;
pub mod keys;
pub mod parse;
pub mod relation;
pub mod schema;
pub mod source;
pub mod stream;
pub mod testing;
pub mod tuple;

// General re-exports
pub use config::{CsvOptions, RelationConfig};
pub use decode::decode;
pub use dedup::Deduplicator;
pub use error::{RelCsvError, Result};
pub use keys::{CandidateKey, CandidateKeys};
pub use parse::parse_record;
pub use relation::{CsvRelation, Relation};
pub use schema::{Field, FieldKind, Schema};
pub use source::{Record, RecordSource, VecSource};
pub use stream::{CancelHandle, ProducerState, StreamStats, TupleStream};
pub use tuple::{Tuple, Value};

// Gated re-exports
#[cfg(feature = "io-csv")]
pub use io::csv::CsvSource;
