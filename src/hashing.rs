// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Content fingerprints for stored values.
//!
//! Hash = SHA256(canonical JSON), hex-encoded. Canonical means object keys
//! are emitted in sorted order regardless of how the map was built, so two
//! values with equal content always share a fingerprint.

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::instrument;

/// Length of a hex-encoded fingerprint.
pub const FINGERPRINT_LEN: usize = 64;

/// Compute the content fingerprint of a value.
#[instrument(skip(value))]
pub fn fingerprint(value: &Value) -> String {
    let mut buf = Vec::with_capacity(64);
    write_canonical(value, &mut buf);
    hex::encode(Sha256::digest(&buf))
}

/// Canonical JSON encoding of a value (sorted object keys, no whitespace).
pub fn canonical_json(value: &Value) -> String {
    let mut buf = Vec::new();
    write_canonical(value, &mut buf);
    // Only valid UTF-8 is ever written.
    String::from_utf8(buf).unwrap_or_default()
}

fn write_canonical(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push(b'{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_string(key, out);
                out.push(b':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical(item, out);
            }
            out.push(b']');
        }
        Value::String(s) => write_string(s, out),
        scalar => out.extend_from_slice(scalar.to_string().as_bytes()),
    }
}

fn write_string(s: &str, out: &mut Vec<u8>) {
    // serde_json's own escaping keeps us byte-compatible with `to_string`.
    out.extend_from_slice(Value::String(s.to_string()).to_string().as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fingerprint_deterministic() {
        let v = json!({"name": "Al", "tags": [1, 2, 3]});
        assert_eq!(fingerprint(&v), fingerprint(&v.clone()));
        assert_eq!(fingerprint(&v).len(), FINGERPRINT_LEN);
    }

    #[test]
    fn test_fingerprint_ignores_key_order() {
        let mut a = serde_json::Map::new();
        a.insert("b".into(), json!(2));
        a.insert("a".into(), json!(1));
        let mut b = serde_json::Map::new();
        b.insert("a".into(), json!(1));
        b.insert("b".into(), json!(2));

        assert_eq!(fingerprint(&Value::Object(a)), fingerprint(&Value::Object(b)));
    }

    #[test]
    fn test_fingerprint_respects_array_order() {
        assert_ne!(fingerprint(&json!([1, 2])), fingerprint(&json!([2, 1])));
    }

    #[test]
    fn test_fingerprint_distinguishes_types() {
        assert_ne!(fingerprint(&json!(1)), fingerprint(&json!("1")));
        assert_ne!(fingerprint(&json!(null)), fingerprint(&json!("null")));
    }

    #[test]
    fn test_canonical_json_sorted_and_escaped() {
        let v = json!({"z": "quote\"d", "a": {"y": null, "x": true}});
        assert_eq!(
            canonical_json(&v),
            r#"{"a":{"x":true,"y":null},"z":"quote\"d"}"#
        );
    }
}
