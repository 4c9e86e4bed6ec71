use relcsv::testing::{order_schema, supplier_schema};
use relcsv::{CandidateKeys, RelCsvError};
use std::collections::HashMap;

#[test]
fn empty_declaration_is_the_full_heading() {
    let s = supplier_schema();
    let keys = CandidateKeys::declare(&s, Vec::<Vec<&str>>::new()).unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys, CandidateKeys::full(&s));
    assert_eq!(keys.to_string(), "{City, SNO, SName, Status}");
}

#[test]
fn keys_are_canonical() -> anyhow::Result<()> {
    let s = supplier_schema();
    let keys = CandidateKeys::declare(&s, [vec!["SName", "City"], vec!["SNO"], vec!["City", "SName"]])?;
    assert_eq!(keys.len(), 2);
    assert_eq!(keys.to_string(), "{SNO} {City, SName}");
    assert!(keys.contains(&["SNO"]));
    assert!(keys.contains(&["SName", "City"]));
    assert!(!keys.contains(&["City"]));
    Ok(())
}

#[test]
fn declaration_order_does_not_matter() -> anyhow::Result<()> {
    let s = order_schema();
    let a = CandidateKeys::declare(&s, [vec!["SNO", "PNO"], vec!["Qty"]])?;
    let b = CandidateKeys::declare(&s, [vec!["Qty"], vec!["PNO", "SNO"]])?;
    assert_eq!(a, b);
    assert_eq!(a.to_names(), vec![vec!["Qty".to_string()], vec!["PNO".into(), "SNO".into()]]);
    Ok(())
}

#[test]
fn unknown_attribute_is_rejected() {
    let err = CandidateKeys::declare(&supplier_schema(), [["PNO"]]).unwrap_err();
    assert!(matches!(&err, RelCsvError::KeyValidation(msg) if msg.contains("PNO")));
    assert!(err.is_config_error());
}

#[test]
fn empty_key_is_rejected() {
    let err = CandidateKeys::declare(&supplier_schema(), [Vec::<&str>::new()]).unwrap_err();
    assert!(matches!(err, RelCsvError::KeyValidation(_)));
}

#[test]
fn remap_follows_the_rename() -> anyhow::Result<()> {
    let s = supplier_schema();
    let keys = CandidateKeys::declare(&s, [vec!["SNO"], vec!["SName", "City"]])?;
    let mapping: HashMap<String, String> = [
        ("SNO", "ID"),
        ("SName", "Name"),
        ("Status", "Status"),
        ("City", "Town"),
    ]
    .into_iter()
    .map(|(a, b)| (a.to_string(), b.to_string()))
    .collect();
    let renamed = keys.remap(&mapping)?;
    assert_eq!(renamed.to_string(), "{ID} {Name, Town}");
    Ok(())
}

#[test]
fn remap_with_missing_image_fails() -> anyhow::Result<()> {
    let keys = CandidateKeys::declare(&supplier_schema(), [["SNO"]])?;
    let err = keys.remap(&HashMap::new()).unwrap_err();
    assert!(matches!(err, RelCsvError::KeyValidation(_)));
    Ok(())
}
