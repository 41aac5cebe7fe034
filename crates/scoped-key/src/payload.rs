//! Plaintext envelope: policy serialisation and timestamp injection.
//!
//! # Envelope
//!
//! The policy is serialised to JSON and a `timestamp` field is merged in:
//!
//! | Policy | Envelope |
//! |---|---|
//! | object | the object with `timestamp` set (any existing value is replaced) |
//! | `null` | `{"timestamp": ...}` |
//! | anything else | `{"policy": <value>, "timestamp": ...}` |
//!
//! Timestamps are RFC 3339 UTC strings with second precision, for example
//! `2026-10-19T08:30:00Z`. Object keys are emitted sorted, so one policy and
//! one instant always encode to the same bytes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Envelope field carrying the minting time.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Envelope field wrapping policies that are not JSON objects.
pub const POLICY_FIELD: &str = "policy";

/// Errors produced while building the plaintext envelope.
#[derive(Debug, Error)]
#[error("policy is not serialisable: {0}")]
pub struct PayloadError(#[from] serde_json::Error);

/// Source of the current time for envelope timestamps.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Serialise `policy` into the envelope and return its UTF-8 bytes.
///
/// # Errors
///
/// Returns [`PayloadError`] if `policy` cannot be represented as JSON (for
/// example a map with non-string keys).
pub fn encode<P>(policy: &P, clock: &dyn Clock) -> Result<Vec<u8>, PayloadError>
where
    P: Serialize + ?Sized,
{
    let mut envelope = match serde_json::to_value(policy)? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert(POLICY_FIELD.to_owned(), other);
            map
        }
    };
    envelope.insert(
        TIMESTAMP_FIELD.to_owned(),
        Value::String(format_timestamp(clock.now())),
    );

    Ok(serde_json::to_vec(&Value::Object(envelope))?)
}

/// Return decrypted plaintext bytes as text, without interpreting them.
///
/// Invalid UTF-8 sequences are replaced with `U+FFFD`, so garbage recovered
/// from a corrupted token still comes back as text.
pub fn decode(plaintext: &[u8]) -> String {
    String::from_utf8_lossy(plaintext).into_owned()
}

/// Render an instant in the envelope's timestamp format.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn fixed_clock() -> MockClock {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .return_const(Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap());
        clock
    }

    fn encode_to_value<P: Serialize + ?Sized>(policy: &P) -> Value {
        let bytes = encode(policy, &fixed_clock()).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn object_gains_timestamp() {
        let policy = json!({
            "filters": [{"property_name": "account_id", "operator": "eq", "property_value": 123}],
            "allowed_operations": ["read"]
        });
        let out = encode_to_value(&policy);
        assert_eq!(out["timestamp"], "2026-10-19T08:30:00Z");
        assert_eq!(out["allowed_operations"], policy["allowed_operations"]);
        assert_eq!(out["filters"], policy["filters"]);
        assert_eq!(out.as_object().unwrap().len(), 3);
    }

    #[test]
    fn existing_timestamp_is_replaced() {
        let out = encode_to_value(&json!({"timestamp": "yesterday"}));
        assert_eq!(out, json!({"timestamp": "2026-10-19T08:30:00Z"}));
    }

    #[test]
    fn null_becomes_timestamp_only() {
        let out = encode_to_value(&Value::Null);
        assert_eq!(out, json!({"timestamp": "2026-10-19T08:30:00Z"}));
        let none: Option<u8> = None;
        assert_eq!(encode_to_value(&none), out);
    }

    #[test]
    fn non_object_is_wrapped() {
        let out = encode_to_value(&["read", "write"]);
        assert_eq!(
            out,
            json!({"policy": ["read", "write"], "timestamp": "2026-10-19T08:30:00Z"})
        );
        assert_eq!(encode_to_value("scalar")["policy"], "scalar");
    }

    #[test]
    fn typed_structs_serialise() {
        #[derive(Serialize)]
        struct Policy {
            allowed_operations: Vec<&'static str>,
        }
        let out = encode_to_value(&Policy {
            allowed_operations: vec!["write"],
        });
        assert_eq!(out["allowed_operations"], json!(["write"]));
    }

    #[test]
    fn encoding_is_stable_for_fixed_clock() {
        let policy = json!({"b": 1, "a": [true, null]});
        let first = encode(&policy, &fixed_clock()).unwrap();
        let second = encode(&policy, &fixed_clock()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            String::from_utf8(first).unwrap(),
            r#"{"a":[true,null],"b":1,"timestamp":"2026-10-19T08:30:00Z"}"#
        );
    }

    #[test]
    fn unserialisable_policy_rejected() {
        let mut policy = BTreeMap::new();
        policy.insert(vec![1u8, 2], "non-string key");
        let mut clock = MockClock::new();
        clock.expect_now().never();
        assert!(encode(&policy, &clock).is_err());
    }

    #[test]
    fn decode_passes_text_through() {
        let text = r#"{"filters": [],"allowed_operations": [ "write" ]}"#;
        assert_eq!(decode(text.as_bytes()), text);
        assert_eq!(decode(b"not json"), "not json");
    }

    #[test]
    fn decode_tolerates_invalid_utf8() {
        assert_eq!(decode(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    }

    #[test]
    fn system_clock_timestamp_format() {
        let ts = format_timestamp(SystemClock.now());
        assert!(ts.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
