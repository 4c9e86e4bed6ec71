//! Pre-built relations for tests and examples.

use crate::relation::CsvRelation;
use crate::schema::{FieldKind, Schema};
use crate::source::VecSource;
use serde::{Deserialize, Serialize};

/// Five suppliers, one per line, no header.
pub const SUPPLIERS_CSV: &str = "1,Smith,20,London
2,Jones,10,Paris
3,Blake,30,Paris
4,Clark,20,London
5,Adams,30,Athens";

/// Twelve orders, one per line, no header.
pub const ORDERS_CSV: &str = "1,1,300
1,2,200
1,3,400
1,4,200
1,5,100
1,6,100
2,1,300
2,2,400
3,2,200
4,2,200
4,4,300
4,5,400";

/// Typed view of a supplier tuple, for [`Schema::decode_tuple`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct Supplier {
    pub SNO: i64,
    pub SName: String,
    pub Status: i64,
    pub City: String,
}

/// `(SNO: i64, SName: string, Status: i64, City: string)`.
#[must_use]
pub fn supplier_schema() -> Schema {
    Schema::new([
        ("SNO", FieldKind::I64),
        ("SName", FieldKind::Str),
        ("Status", FieldKind::I64),
        ("City", FieldKind::Str),
    ])
    .expect("static supplier schema")
}

/// `(PNO: i64, SNO: i64, Qty: i64)`.
#[must_use]
pub fn order_schema() -> Schema {
    Schema::new([
        ("PNO", FieldKind::I64),
        ("SNO", FieldKind::I64),
        ("Qty", FieldKind::I64),
    ])
    .expect("static order schema")
}

/// Suppliers keyed on `{SNO}`.
#[must_use]
pub fn suppliers() -> CsvRelation<VecSource> {
    CsvRelation::new(
        VecSource::from_lines(SUPPLIERS_CSV, ','),
        supplier_schema(),
        [["SNO"]],
    )
    .expect("static supplier keys")
}

/// Orders with no declared keys, so the full heading is the key and
/// deduplication is on.
#[must_use]
pub fn orders() -> CsvRelation<VecSource> {
    CsvRelation::new(
        VecSource::from_lines(ORDERS_CSV, ','),
        order_schema(),
        Vec::<Vec<&str>>::new(),
    )
    .expect("static order keys")
}

/// Relation over arbitrary lines with the supplier schema and no keys.
#[must_use]
pub fn suppliers_from(lines: &str) -> CsvRelation<VecSource> {
    CsvRelation::new(
        VecSource::from_lines(lines, ','),
        supplier_schema(),
        Vec::<Vec<&str>>::new(),
    )
    .expect("static supplier keys")
}
