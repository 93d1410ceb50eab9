use std::cmp::Ordering;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::error::{TableError, TableResult};
use crate::types::{AttributeValue, KeyValue};

/// Compares two numeric attribute strings as arbitrary-precision decimals, so
/// that e.g. "4.2" and "4.200" compare equal regardless of formatting. Falls
/// back to a lexicographic compare if either string fails to parse (it
/// shouldn't, since values reach here only after key/type validation).
pub fn compare_numeric_strings(a: &str, b: &str) -> Ordering {
    match (BigDecimal::from_str(a), BigDecimal::from_str(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

pub fn numbers_equal(a: &str, b: &str) -> bool {
    compare_numeric_strings(a, b) == Ordering::Equal
}

pub fn add_numeric_strings(a: &str, b: &str) -> TableResult<String> {
    let a = BigDecimal::from_str(a)
        .map_err(|_| TableError::update_error(format!("invalid number: {a}")))?;
    let b = BigDecimal::from_str(b)
        .map_err(|_| TableError::update_error(format!("invalid number: {b}")))?;
    Ok((a + b).normalized().to_string())
}

/// Orders two key values of the same declared key type. Comparisons across
/// mismatched types fall back to comparing type names, which keeps the
/// ordering total (required for the backing sorted map) without implying
/// any real cross-type ordering.
pub fn compare_key_values(a: &KeyValue, b: &KeyValue) -> Ordering {
    match (a, b) {
        (KeyValue::N(a), KeyValue::N(b)) => compare_numeric_strings(a, b),
        (KeyValue::S(a), KeyValue::S(b)) => a.cmp(b),
        (KeyValue::B(a), KeyValue::B(b)) => a.cmp(b),
        _ => a.type_name().cmp(b.type_name()),
    }
}

/// Orders two scalar attribute values for condition/filter comparisons.
/// Unlike `compare_key_values`, this is fallible: comparing across
/// incompatible types (e.g. a string against a number) isn't a meaningful
/// ordering and is surfaced as a validation error instead of silently
/// picking one.
pub fn compare_values(a: &AttributeValue, b: &AttributeValue) -> TableResult<Ordering> {
    match (a, b) {
        (AttributeValue::N(a), AttributeValue::N(b)) => Ok(compare_numeric_strings(a, b)),
        (AttributeValue::S(a), AttributeValue::S(b)) => Ok(a.cmp(b)),
        (AttributeValue::B(a), AttributeValue::B(b)) => Ok(a.cmp(b)),
        _ => Err(TableError::validation(format!(
            "cannot compare {} with {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

pub fn escape_key_chars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '#' => result.push_str("\\#"),
            ':' => result.push_str("\\:"),
            '\\' => result.push_str("\\\\"),
            _ => result.push(c),
        }
    }
    result
}

pub fn base64_encode(data: &[u8]) -> String {
    const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut result = String::new();
    for chunk in data.chunks(3) {
        let b0 = chunk[0] as usize;
        let b1 = chunk.get(1).copied().unwrap_or(0) as usize;
        let b2 = chunk.get(2).copied().unwrap_or(0) as usize;

        result.push(ALPHABET[b0 >> 2] as char);
        result.push(ALPHABET[((b0 & 0x03) << 4) | (b1 >> 4)] as char);

        if chunk.len() > 1 {
            result.push(ALPHABET[((b1 & 0x0F) << 2) | (b2 >> 6)] as char);
        } else {
            result.push('=');
        }

        if chunk.len() > 2 {
            result.push(ALPHABET[b2 & 0x3F] as char);
        } else {
            result.push('=');
        }
    }
    result
}

pub fn base64_decode(input: &str) -> Option<Vec<u8>> {
    const DECODE: [i8; 128] = [
        -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
        -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 62, -1, -1,
        -1, 63, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, -1, -1, -1, -1, -1, -1, -1, 0, 1, 2, 3, 4,
        5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, -1, -1, -1,
        -1, -1, -1, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45,
        46, 47, 48, 49, 50, 51, -1, -1, -1, -1, -1,
    ];

    let input = input.trim_end_matches('=');
    let mut result = Vec::with_capacity(input.len() * 3 / 4);

    let chars: Vec<u8> = input
        .chars()
        .filter_map(|c| {
            let c = c as usize;
            if c < 128 {
                let val = DECODE[c];
                if val >= 0 {
                    return Some(val as u8);
                }
            }
            None
        })
        .collect();

    if chars.len() != input.len() {
        return None;
    }

    for chunk in chars.chunks(4) {
        match chunk.len() {
            4 => {
                result.push((chunk[0] << 2) | (chunk[1] >> 4));
                result.push((chunk[1] << 4) | (chunk[2] >> 2));
                result.push((chunk[2] << 6) | chunk[3]);
            }
            3 => {
                result.push((chunk[0] << 2) | (chunk[1] >> 4));
                result.push((chunk[1] << 4) | (chunk[2] >> 2));
            }
            2 => {
                result.push((chunk[0] << 2) | (chunk[1] >> 4));
            }
            _ => return None,
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_roundtrip() {
        let cases: &[&[u8]] = &[
            b"",
            b"f",
            b"fo",
            b"foo",
            b"foob",
            b"fooba",
            b"foobar",
            &[0, 1, 2, 3, 255, 254, 253],
        ];

        for case in cases {
            let encoded = base64_encode(case);
            let decoded = base64_decode(&encoded).unwrap();
            assert_eq!(*case, decoded.as_slice(), "roundtrip failed for {:?}", case);
        }
    }

    #[test]
    fn base64_known_values() {
        assert_eq!(base64_encode(b""), "");
        assert_eq!(base64_encode(b"f"), "Zg==");
        assert_eq!(base64_encode(b"fo"), "Zm8=");
        assert_eq!(base64_encode(b"foo"), "Zm9v");
        assert_eq!(base64_encode(b"foob"), "Zm9vYg==");
        assert_eq!(base64_encode(b"fooba"), "Zm9vYmE=");
        assert_eq!(base64_encode(b"foobar"), "Zm9vYmFy");
    }

    #[test]
    fn base64_decode_invalid() {
        assert!(base64_decode("!!!").is_none());
        assert!(base64_decode("abc!").is_none());
    }

    #[test]
    fn numeric_compare_ignores_formatting() {
        assert_eq!(compare_numeric_strings("4.200", "4.2"), Ordering::Equal);
        assert_eq!(compare_numeric_strings("-100", "-4"), Ordering::Less);
        assert_eq!(compare_numeric_strings("100", "50"), Ordering::Greater);
        assert!(numbers_equal("1e2", "100"));
    }

    #[test]
    fn add_numeric_strings_precise() {
        assert_eq!(add_numeric_strings("10", "5").unwrap(), "15");
        assert_eq!(add_numeric_strings("0.1", "0.2").unwrap(), "0.3");
    }

    #[test]
    fn compare_values_rejects_mismatched_types() {
        let err = compare_values(&AttributeValue::S("a".into()), &AttributeValue::N("1".into()))
            .unwrap_err();
        assert!(err.is_validation());
    }
}
