use ordered_float::OrderedFloat;
use relcsv::{FieldKind, RelCsvError, Value, decode};

#[test]
fn strings_never_fail() -> anyhow::Result<()> {
    assert_eq!(decode("", FieldKind::Str)?, Value::Str(String::new()));
    assert_eq!(decode(" Smith, J ", FieldKind::Str)?, Value::from(" Smith, J "));
    Ok(())
}

#[test]
fn boolean_literals() -> anyhow::Result<()> {
    for t in ["1", "t", "T", "TRUE", "true", "True"] {
        assert_eq!(decode(t, FieldKind::Bool)?, Value::Bool(true), "{t}");
    }
    for f in ["0", "f", "F", "FALSE", "false", "False"] {
        assert_eq!(decode(f, FieldKind::Bool)?, Value::Bool(false), "{f}");
    }
    assert!(decode("yes", FieldKind::Bool).is_err());
    assert!(decode("tRUE", FieldKind::Bool).is_err());
    Ok(())
}

#[test]
fn signed_widths_are_enforced() -> anyhow::Result<()> {
    assert_eq!(decode("-128", FieldKind::I8)?, Value::I8(-128));
    assert_eq!(decode("127", FieldKind::I8)?, Value::I8(127));
    assert!(decode("128", FieldKind::I8).is_err());
    assert!(decode("-129", FieldKind::I8).is_err());
    assert_eq!(decode("32767", FieldKind::I16)?, Value::I16(32767));
    assert!(decode("32768", FieldKind::I16).is_err());
    assert_eq!(decode("-2147483648", FieldKind::I32)?, Value::I32(i32::MIN));
    assert!(decode("2147483648", FieldKind::I32).is_err());
    assert_eq!(decode("9223372036854775807", FieldKind::I64)?, Value::I64(i64::MAX));
    Ok(())
}

#[test]
fn unsigned_widths_are_enforced() -> anyhow::Result<()> {
    assert_eq!(decode("255", FieldKind::U8)?, Value::U8(255));
    assert!(decode("256", FieldKind::U8).is_err());
    assert!(decode("-1", FieldKind::U8).is_err());
    assert!(decode("+7", FieldKind::U32).is_err());
    assert!(decode("+0x10", FieldKind::U64).is_err());
    assert_eq!(decode("+7", FieldKind::I32)?, Value::I32(7));
    assert_eq!(decode("65535", FieldKind::U16)?, Value::U16(65535));
    assert_eq!(decode("0xffffffff", FieldKind::U32)?, Value::U32(u32::MAX));
    assert!(decode("0x100000000", FieldKind::U32).is_err());
    assert_eq!(decode("18446744073709551615", FieldKind::U64)?, Value::U64(u64::MAX));
    Ok(())
}

#[test]
fn integer_base_prefixes() -> anyhow::Result<()> {
    assert_eq!(decode("0x1F", FieldKind::I32)?, Value::I32(31));
    assert_eq!(decode("-0b11", FieldKind::I32)?, Value::I32(-3));
    assert_eq!(decode("0o777", FieldKind::U16)?, Value::U16(511));
    assert_eq!(decode("010", FieldKind::I64)?, Value::I64(8));
    assert_eq!(decode("1_000_000", FieldKind::I64)?, Value::I64(1_000_000));
    Ok(())
}

#[test]
fn floats() -> anyhow::Result<()> {
    assert_eq!(decode("1.5", FieldKind::F64)?, Value::F64(OrderedFloat(1.5)));
    assert_eq!(decode("-2e3", FieldKind::F32)?, Value::F32(OrderedFloat(-2000.0)));
    assert_eq!(decode("inf", FieldKind::F64)?, Value::F64(OrderedFloat(f64::INFINITY)));
    assert!(matches!(decode("NaN", FieldKind::F64)?, Value::F64(v) if v.is_nan()));
    assert!(decode("1e39", FieldKind::F32).is_err());
    assert!(decode("1e400", FieldKind::F64).is_err());
    assert!(decode("1.2.3", FieldKind::F64).is_err());
    Ok(())
}

#[test]
fn decode_error_names_kind_and_text() {
    let err = decode("abc", FieldKind::I64).unwrap_err();
    match &err {
        RelCsvError::Decode { kind, text, .. } => {
            assert_eq!(*kind, FieldKind::I64);
            assert_eq!(text, "abc");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.is_data_error());
    assert!(err.to_string().contains("\"abc\""));
    assert!(err.to_string().contains("i64"));
}
