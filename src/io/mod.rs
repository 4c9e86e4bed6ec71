//! File-backed record sources.
//!
//! - [`compression`]: transparent decompression of gzip / zstd inputs.
//! - [`csv`]: [`CsvSource`](csv::CsvSource), a [`RecordSource`](crate::source::RecordSource)
//!   over the `csv` crate's reader (feature `io-csv`).

pub mod compression;

#[cfg_attr(docsrs, doc(cfg(feature = "io-csv")))]
#[cfg(feature = "io-csv")]
pub mod csv;
