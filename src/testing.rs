//! Testing utilities for relations.
//!
//! - **Fixtures**: the classic suppliers / orders relations as CSV text and
//!   ready-made [`CsvRelation`](crate::relation::CsvRelation)s.
//! - **Mock I/O**: temporary (optionally compressed) CSV files.
//!
//! ```
//! use relcsv::relation::Relation;
//! use relcsv::testing::*;
//!
//! let rel = suppliers();
//! assert_eq!(rel.degree(), 4);
//! assert_eq!(rel.candidate_keys().to_string(), "{SNO}");
//! ```

pub mod fixtures;
pub mod mock_io;

pub use fixtures::*;
pub use mock_io::*;
