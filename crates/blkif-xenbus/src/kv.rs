//! Combinators for decoding flat attribute maps.
//!
//! An attribute map is the unordered set of `(key, value)` string pairs
//! observed under one store directory. Lookups are linear scans; the sets in
//! this protocol are a handful of keys.

use crate::error::KvError;

/// Look up `key` if present.
pub fn find<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Look up `key`, failing with the canonical "missing \<key\> key" error.
pub fn require<'a>(attrs: &'a [(String, String)], key: &str) -> Result<&'a str, KvError> {
    find(attrs, key).ok_or_else(|| KvError::MissingKey {
        key: key.to_owned(),
    })
}

/// Decimal parse for plain integer attributes (domids, event channels).
pub fn parse_int(raw: &str) -> Result<u32, KvError> {
    raw.parse().map_err(|_| KvError::NotAnInt {
        raw: raw.to_owned(),
    })
}

/// Decimal parse for 32-bit attributes (grant references).
pub fn parse_int32(raw: &str) -> Result<u32, KvError> {
    raw.parse().map_err(|_| KvError::NotAnInt32 {
        raw: raw.to_owned(),
    })
}

/// Decimal parse for 64-bit attributes (sector counts).
pub fn parse_int64(raw: &str) -> Result<u64, KvError> {
    raw.parse().map_err(|_| KvError::NotAnInt64 {
        raw: raw.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn require_names_the_missing_key() {
        let map = attrs(&[("present", "1")]);
        assert_eq!(require(&map, "present"), Ok("1"));
        let err = require(&map, "sectors").unwrap_err();
        assert_eq!(err.to_string(), "missing sectors key");
    }

    #[test]
    fn parse_errors_carry_the_raw_value() {
        assert_eq!(parse_int("512"), Ok(512));
        assert_eq!(
            parse_int("fast").unwrap_err().to_string(),
            "not an int: fast"
        );
        assert_eq!(
            parse_int32("-3").unwrap_err().to_string(),
            "not an int32: -3"
        );
        assert_eq!(
            parse_int64("12junk").unwrap_err().to_string(),
            "not an int64: 12junk"
        );
        assert_eq!(parse_int64("4294967296"), Ok(4_294_967_296));
    }

    #[test]
    fn find_ignores_ordering() {
        let map = attrs(&[("b", "2"), ("a", "1")]);
        assert_eq!(find(&map, "a"), Some("1"));
        assert_eq!(find(&map, "c"), None);
    }
}
