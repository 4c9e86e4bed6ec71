use relcsv::testing::supplier_schema;
use relcsv::{FieldKind, RelCsvError, Schema};

#[test]
fn parse_kind_names_and_aliases() -> anyhow::Result<()> {
    let s = Schema::parse([
        ("a", "int"),
        ("b", "uint8"),
        ("c", "float32"),
        ("d", "boolean"),
        ("e", "string"),
        ("f", "f64"),
    ])?;
    assert_eq!(
        s.kinds().collect::<Vec<_>>(),
        vec![
            FieldKind::I64,
            FieldKind::U8,
            FieldKind::F32,
            FieldKind::Bool,
            FieldKind::Str,
            FieldKind::F64
        ]
    );
    Ok(())
}

#[test]
fn unsupported_kind_is_a_config_error() {
    let err = Schema::parse([("When", "datetime")]).unwrap_err();
    assert!(matches!(&err, RelCsvError::UnsupportedType { kind } if kind == "datetime"));
    assert!(err.is_config_error());
}

#[test]
fn empty_and_duplicate_names_rejected() {
    assert!(matches!(
        Schema::new(Vec::<(String, FieldKind)>::new()),
        Err(RelCsvError::InvalidSchema(_))
    ));
    assert!(matches!(
        Schema::new([("a", FieldKind::Str), ("a", FieldKind::I8)]),
        Err(RelCsvError::InvalidSchema(_))
    ));
    assert!(matches!(
        Schema::new([("", FieldKind::Str)]),
        Err(RelCsvError::InvalidSchema(_))
    ));
}

#[test]
fn construction_is_idempotent() {
    let a = supplier_schema();
    let b = supplier_schema();
    assert_eq!(a, b);
    assert_eq!(
        a.names().zip(a.kinds()).collect::<Vec<_>>(),
        b.names().zip(b.kinds()).collect::<Vec<_>>()
    );
}

#[test]
fn heading_and_lookup() {
    let s = supplier_schema();
    assert_eq!(s.arity(), 4);
    assert_eq!(s.heading(), "SNO, SName, Status, City");
    assert_eq!(s.index_of("Status"), Some(2));
    assert!(!s.contains("Qty"));
    assert_eq!(s.to_string(), "{SNO: i64, SName: string, Status: i64, City: string}");
}

#[test]
fn rename_map_is_positional() -> anyhow::Result<()> {
    let from = supplier_schema();
    let to = Schema::parse([("ID", "i64"), ("Name", "string"), ("Status", "i64"), ("City", "string")])?;
    let map = from.rename_map(&to)?;
    assert_eq!(map["SNO"], "ID");
    assert_eq!(map["SName"], "Name");
    assert_eq!(map["City"], "City");
    Ok(())
}

#[test]
fn rename_map_checks_shape() -> anyhow::Result<()> {
    let from = supplier_schema();
    let short = Schema::parse([("ID", "i64"), ("Name", "string"), ("Status", "i64")])?;
    assert!(matches!(from.rename_map(&short), Err(RelCsvError::ShapeMismatch(_))));

    let retyped = Schema::parse([("ID", "i32"), ("Name", "string"), ("Status", "i64"), ("City", "string")])?;
    assert!(matches!(from.rename_map(&retyped), Err(RelCsvError::ShapeMismatch(_))));
    Ok(())
}

#[test]
fn schema_serde_roundtrip_and_validation() -> anyhow::Result<()> {
    let s = supplier_schema();
    let json = serde_json::to_string(&s)?;
    assert!(json.contains(r#""kind":"i64""#));
    let back: Schema = serde_json::from_str(&json)?;
    assert_eq!(back, s);

    let bad = r#"[{"name": "x", "kind": "complex128"}]"#;
    let err = serde_json::from_str::<Schema>(bad).unwrap_err();
    assert!(err.to_string().contains("unsupported type"));

    let dup = r#"[{"name": "x", "kind": "int"}, {"name": "x", "kind": "int"}]"#;
    assert!(serde_json::from_str::<Schema>(dup).is_err());
    Ok(())
}
