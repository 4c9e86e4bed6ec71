//! Record sources.
//!
//! A [`RecordSource`] yields one record (an ordered list of text cells) per
//! call, `Ok(None)` at end of input, or an error. Records are consumed
//! destructively; a source is never rewound.
//!
//! Lexing (quoting, escaping, line splitting) is the source's business. The
//! crate ships [`CsvSource`](crate::io::csv::CsvSource) over the `csv` crate
//! (feature `io-csv`) and the in-memory [`VecSource`] used by tests and by
//! callers that already hold split records.

use crate::error::{RelCsvError, Result};
use std::collections::VecDeque;

/// One raw record: cells in column order.
pub type Record = Vec<String>;

/// Pull-based supplier of raw records.
///
/// Implementations are moved into the producer task when streaming starts, so
/// they must be `Send + 'static`.
pub trait RecordSource: Send + 'static {
    /// Read the next record.
    ///
    /// # Errors
    /// Any failure other than end of input, typically
    /// [`RelCsvError::SourceRead`].
    fn read_record(&mut self) -> Result<Option<Record>>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn read_record(&mut self) -> Result<Option<Record>> {
        (**self).read_record()
    }
}

/// In-memory source over pre-split records, with optional injected failure.
#[derive(Debug, Default, Clone)]
pub struct VecSource {
    records: VecDeque<Record>,
    fail_after: Option<(usize, String)>,
    served: usize,
}

impl VecSource {
    pub fn new<I, R, S>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            records: records
                .into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
            fail_after: None,
            served: 0,
        }
    }

    /// Split each line on `delimiter` with no quoting rules.
    #[must_use]
    pub fn from_lines(text: &str, delimiter: char) -> Self {
        Self::new(
            text.lines()
                .filter(|l| !l.is_empty())
                .map(|l| l.split(delimiter).map(str::to_string).collect::<Vec<_>>()),
        )
    }

    /// Fail with a [`RelCsvError::SourceRead`] once `n` records have been served.
    #[must_use]
    pub fn fail_after(mut self, n: usize, message: impl Into<String>) -> Self {
        self.fail_after = Some((n, message.into()));
        self
    }

    /// Records not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl RecordSource for VecSource {
    fn read_record(&mut self) -> Result<Option<Record>> {
        if let Some((n, message)) = &self.fail_after
            && self.served >= *n
        {
            return Err(RelCsvError::source_read(std::io::Error::other(message.clone())));
        }
        let next = self.records.pop_front();
        if next.is_some() {
            self.served += 1;
        }
        Ok(next)
    }
}
