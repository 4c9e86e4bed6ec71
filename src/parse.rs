//! Record parser: one raw record to one [`Tuple`].

use crate::decode::decode;
use crate::error::{RelCsvError, Result};
use crate::schema::Schema;
use crate::tuple::Tuple;

/// Parse `record` against `schema`.
///
/// The cell count is checked before any cell is decoded. Cells are then
/// decoded left to right and the first failure is returned unchanged; no
/// partial tuple is ever produced.
///
/// # Errors
/// [`RelCsvError::FieldMismatch`] on an arity mismatch, otherwise whatever
/// [`decode`] reports for the first bad cell.
pub fn parse_record<S: AsRef<str>>(schema: &Schema, record: &[S]) -> Result<Tuple> {
    if record.len() != schema.arity() {
        return Err(RelCsvError::FieldMismatch {
            expected: schema.arity(),
            found: record.len(),
        });
    }
    let values = schema
        .kinds()
        .zip(record)
        .map(|(kind, cell)| decode(cell.as_ref(), kind))
        .collect::<Result<Vec<_>>>()?;
    Ok(Tuple::new(values))
}
