//! Field decoder: one text cell to one typed [`Value`].
//!
//! Coercion rules:
//! - **Strings** never fail; the cell is taken verbatim.
//! - **Booleans** accept `1 t T TRUE true True` and `0 f F FALSE false False`.
//! - **Integers** accept an optional sign (signed kinds only), then an
//!   optional base prefix (`0x`, `0o`, `0b`, or a bare leading `0` for
//!   octal), and `_` separators between digits. Values must fit the declared
//!   width, so an `i8` cell of `200` is rejected rather than wrapped.
//! - **Floats** use Rust's float grammar (including `inf` and `NaN`); a finite
//!   literal that overflows the declared width is rejected.
//!
//! Every failure is a [`RelCsvError::Decode`] naming the target kind and the
//! original text.

use crate::error::{RelCsvError, Result};
use crate::schema::FieldKind;
use crate::tuple::Value;
use ordered_float::OrderedFloat;

/// Decode `text` as `kind`.
///
/// ```
/// use relcsv::decode::decode;
/// use relcsv::schema::FieldKind;
/// use relcsv::tuple::Value;
///
/// assert_eq!(decode("0x1f", FieldKind::U8).unwrap(), Value::U8(31));
/// assert!(decode("128", FieldKind::I8).is_err());
/// ```
///
/// # Errors
/// [`RelCsvError::Decode`] when the text is not a valid literal of `kind`.
pub fn decode(text: &str, kind: FieldKind) -> Result<Value> {
    let value = match kind {
        FieldKind::Str => Value::Str(text.to_string()),
        FieldKind::Bool => {
            Value::Bool(parse_bool(text).ok_or_else(|| invalid(text, kind, "invalid syntax"))?)
        }
        FieldKind::I8 => Value::I8(narrow(text, kind, parse_signed(text, kind)?)?),
        FieldKind::I16 => Value::I16(narrow(text, kind, parse_signed(text, kind)?)?),
        FieldKind::I32 => Value::I32(narrow(text, kind, parse_signed(text, kind)?)?),
        FieldKind::I64 => Value::I64(narrow(text, kind, parse_signed(text, kind)?)?),
        FieldKind::U8 => Value::U8(narrow(text, kind, parse_unsigned(text, kind)?)?),
        FieldKind::U16 => Value::U16(narrow(text, kind, parse_unsigned(text, kind)?)?),
        FieldKind::U32 => Value::U32(narrow(text, kind, parse_unsigned(text, kind)?)?),
        FieldKind::U64 => Value::U64(parse_unsigned(text, kind)?),
        FieldKind::F32 => Value::F32(OrderedFloat(parse_float::<f32>(text, kind)?)),
        FieldKind::F64 => Value::F64(OrderedFloat(parse_float::<f64>(text, kind)?)),
    };
    Ok(value)
}

fn invalid(text: &str, kind: FieldKind, reason: &str) -> RelCsvError {
    RelCsvError::Decode {
        kind,
        text: text.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn narrow<T: TryFrom<W>, W>(text: &str, kind: FieldKind, wide: W) -> Result<T> {
    T::try_from(wide).map_err(|_| invalid(text, kind, "value out of range"))
}

/// Split off the base prefix and validate `_` placement, returning the radix
/// and the bare digits.
fn split_radix(body: &str) -> Option<(u32, String)> {
    let lower = body.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits, prefixed) = match lower.as_deref() {
        Some("0x") => (16, &body[2..], true),
        Some("0o") => (8, &body[2..], true),
        Some("0b") => (2, &body[2..], true),
        _ if body.len() > 1 && body.starts_with('0') => (8, &body[1..], true),
        _ => (10, body, false),
    };

    // An underscore may follow the prefix or sit between two digits.
    let bytes = digits.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let after_prefix = i == 0 && prefixed;
        let before_ok = after_prefix || (i > 0 && bytes[i - 1] != b'_');
        let after_ok = bytes.get(i + 1).is_some_and(|&n| n != b'_');
        if !before_ok || !after_ok {
            return None;
        }
    }
    let cleaned = digits.replace('_', "");
    if cleaned.is_empty() || cleaned.starts_with(['+', '-']) {
        return None;
    }
    Some((radix, cleaned))
}

/// Unsigned literals take no sign at all.
fn parse_unsigned(text: &str, kind: FieldKind) -> Result<u64> {
    if text.starts_with(['+', '-']) {
        return Err(invalid(text, kind, "invalid syntax"));
    }
    let (radix, digits) = split_radix(text).ok_or_else(|| invalid(text, kind, "invalid syntax"))?;
    u64::from_str_radix(&digits, radix).map_err(|e| invalid(text, kind, &e.to_string()))
}

fn parse_signed(text: &str, kind: FieldKind) -> Result<i64> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if body.starts_with(['+', '-']) {
        return Err(invalid(text, kind, "invalid syntax"));
    }
    let (radix, digits) = split_radix(body).ok_or_else(|| invalid(text, kind, "invalid syntax"))?;
    let magnitude =
        u64::from_str_radix(&digits, radix).map_err(|e| invalid(text, kind, &e.to_string()))?;
    let value = if negative {
        0i128 - i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    i64::try_from(value).map_err(|_| invalid(text, kind, "value out of range"))
}

trait Float: std::str::FromStr {
    fn is_infinite(&self) -> bool;
}

impl Float for f32 {
    fn is_infinite(&self) -> bool {
        f32::is_infinite(*self)
    }
}

impl Float for f64 {
    fn is_infinite(&self) -> bool {
        f64::is_infinite(*self)
    }
}

fn parse_float<F: Float>(text: &str, kind: FieldKind) -> Result<F> {
    let value = text
        .parse::<F>()
        .map_err(|_| invalid(text, kind, "invalid syntax"))?;
    if value.is_infinite() && !names_infinity(text) {
        return Err(invalid(text, kind, "value out of range"));
    }
    Ok(value)
}

fn names_infinity(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']).to_ascii_lowercase();
    unsigned == "inf" || unsigned == "infinity"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_prefixes() {
        assert_eq!(parse_signed("0x1F", FieldKind::I64).unwrap(), 31);
        assert_eq!(parse_signed("-0b101", FieldKind::I64).unwrap(), -5);
        assert_eq!(parse_signed("0o17", FieldKind::I64).unwrap(), 15);
        assert_eq!(parse_signed("017", FieldKind::I64).unwrap(), 15);
        assert_eq!(parse_signed("0", FieldKind::I64).unwrap(), 0);
        assert_eq!(parse_signed("1_000", FieldKind::I64).unwrap(), 1000);
        assert_eq!(parse_signed("0x_ff", FieldKind::I64).unwrap(), 255);
    }

    #[test]
    fn integer_syntax_errors() {
        for bad in ["", "-", "+-1", "1__0", "_1", "1_", "0x", "09", "12a", " 1"] {
            assert!(parse_signed(bad, FieldKind::I64).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn signed_extremes() {
        assert_eq!(
            parse_signed("-9223372036854775808", FieldKind::I64).unwrap(),
            i64::MIN
        );
        assert!(parse_signed("9223372036854775808", FieldKind::I64).is_err());
    }

    #[test]
    fn unsigned_rejects_any_sign() {
        assert!(parse_unsigned("-1", FieldKind::U64).is_err());
        assert!(parse_unsigned("+7", FieldKind::U64).is_err());
        assert_eq!(parse_unsigned("7", FieldKind::U64).unwrap(), 7);
        assert_eq!(
            parse_unsigned("18446744073709551615", FieldKind::U64).unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn infinity_literals() {
        assert!(names_infinity("-Inf"));
        assert!(names_infinity("+infinity"));
        assert!(!names_infinity("1e999"));
    }
}
