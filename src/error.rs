//! Error taxonomy for relation construction and tuple production.
//!
//! Errors fall into two families:
//! - **Data errors** ([`FieldMismatch`](RelCsvError::FieldMismatch),
//!   [`Decode`](RelCsvError::Decode), [`SourceRead`](RelCsvError::SourceRead))
//!   are raised while records are being produced and are latched into the
//!   relation's terminal error slot.
//! - **Configuration errors** (everything else) are returned directly from the
//!   call that caused them: schema construction, key declaration, rename, or
//!   starting a stream.
//!
//! `RelCsvError` is `Clone` so the latched error can be handed out any number
//! of times; causes that are not themselves `Clone` are kept behind an `Arc`.

use crate::schema::FieldKind;
use std::sync::Arc;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = RelCsvError> = std::result::Result<T, E>;

/// Boxed cause of a source failure.
pub type SourceCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Error)]
pub enum RelCsvError {
    /// A record's cell count differs from the schema's arity.
    #[error("record fields mismatch: expected {expected} found {found}")]
    FieldMismatch { expected: usize, found: usize },

    /// A cell could not be coerced to its declared kind.
    #[error("cannot decode {text:?} as {kind}: {reason}")]
    Decode {
        kind: FieldKind,
        text: String,
        reason: String,
    },

    /// A declared field kind is not one the decoder understands.
    #[error("unsupported type: {kind}")]
    UnsupportedType { kind: String },

    /// The record source failed for a reason other than end of input.
    #[error("reading source record: {0}")]
    SourceRead(#[source] SourceCause),

    /// A candidate key is empty, names an unknown attribute, or cannot be
    /// carried through a rename.
    #[error("invalid candidate key: {0}")]
    KeyValidation(String),

    /// A rename target does not have the same arity and kinds as the current schema.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A schema was declared with empty or duplicate attribute names.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// The relation's tuples were already streamed; the source cannot be re-read.
    #[error("relation source already consumed")]
    AlreadyConsumed,

    /// No tokio runtime is available to drive the producer task.
    #[error("no tokio runtime available to drive the producer")]
    NoRuntime,

    /// A configuration document could not be parsed.
    #[error("config: {0}")]
    Config(String),

    /// A file backing a source or configuration could not be opened.
    #[error("io: {0}")]
    Io(#[source] Arc<std::io::Error>),
}

impl RelCsvError {
    /// Wrap any source failure.
    pub fn source_read<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::SourceRead(Arc::new(err))
    }

    /// `true` for failures caused by record contents or the record source.
    #[must_use]
    pub const fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::FieldMismatch { .. } | Self::Decode { .. } | Self::SourceRead(_)
        )
    }

    /// `true` for failures caused by how the relation was declared or driven.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        !self.is_data_error()
    }
}

impl From<std::io::Error> for RelCsvError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for RelCsvError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
