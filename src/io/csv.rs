//! CSV record source.
//!
//! [`CsvSource`] adapts a `csv::Reader` to [`RecordSource`]. The reader is
//! built `flexible`, so records with the wrong number of cells reach the
//! record parser and surface as
//! [`FieldMismatch`](crate::error::RelCsvError::FieldMismatch) rather than as
//! a lexer error.
//!
//! ```
//! use relcsv::config::CsvOptions;
//! use relcsv::io::csv::CsvSource;
//! use relcsv::source::RecordSource;
//!
//! let mut src = CsvSource::from_reader("1,\"Smith, J\"\n".as_bytes(), &CsvOptions::default());
//! assert_eq!(src.read_record().unwrap(), Some(vec!["1".to_string(), "Smith, J".to_string()]));
//! assert_eq!(src.read_record().unwrap(), None);
//! ```

use crate::config::CsvOptions;
use crate::error::{RelCsvError, Result};
use crate::io::compression::auto_detect_reader;
use crate::source::{Record, RecordSource};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Streaming CSV reader yielding one [`Record`] per call.
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    record: StringRecord,
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(reader: R, options: &CsvOptions) -> Self {
        let reader = builder(options).from_reader(reader);
        Self {
            reader,
            record: StringRecord::new(),
        }
    }

    /// Header row, when the dialect declares one.
    ///
    /// # Errors
    /// [`RelCsvError::SourceRead`] if the header cannot be read.
    pub fn headers(&mut self) -> Result<Option<Vec<String>>> {
        if !self.reader.has_headers() {
            return Ok(None);
        }
        let headers = self.reader.headers().map_err(RelCsvError::source_read)?;
        Ok(Some(headers.iter().map(str::to_string).collect()))
    }

    /// 1-based line number of the most recently read record.
    #[must_use]
    pub fn line(&self) -> u64 {
        self.reader.position().line()
    }
}

impl CsvSource<Box<dyn Read + Send>> {
    /// Open a CSV file, decompressing it when its name or leading bytes
    /// identify a supported codec.
    ///
    /// # Errors
    /// [`RelCsvError::Io`] if the file cannot be opened or the decoder
    /// cannot be initialised.
    pub fn from_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)?;
        let reader = auto_detect_reader(f, path)?;
        tracing::debug!(path = %path.display(), "opened csv source");
        Ok(Self::from_reader(reader, options))
    }
}

impl<R: Read + Send + 'static> RecordSource for CsvSource<R> {
    fn read_record(&mut self) -> Result<Option<Record>> {
        let more = self
            .reader
            .read_record(&mut self.record)
            .map_err(RelCsvError::source_read)?;
        if !more {
            return Ok(None);
        }
        Ok(Some(self.record.iter().map(str::to_string).collect()))
    }
}

fn builder(options: &CsvOptions) -> ReaderBuilder {
    let mut b = ReaderBuilder::new();
    b.delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .quote(options.quote)
        .comment(options.comment)
        .flexible(true)
        .trim(if options.trim { Trim::All } else { Trim::None });
    b
}
