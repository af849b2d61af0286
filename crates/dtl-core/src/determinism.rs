//! Determinism utilities for byte-stable serialization and hashing.
//!
//! The evaluator itself never touches this module — it is pure ambient
//! tooling used by callers (chiefly the CLI driver) that want to prove two
//! evaluations were given byte-identical inputs without diffing the
//! dataset or program AST directly.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Precision for float normalization (1e-9 means 9 decimal places).
pub const FLOAT_PRECISION: f64 = 1e-9;

/// A deterministic fingerprint (SHA-256 hash in hex).
pub type Fingerprint = String;

/// Normalize a float value to a deterministic representation.
///
/// Uses a fixed precision (1e-9) to eliminate floating-point noise before
/// two scores or interval bounds are compared. `NaN` becomes `0.0`, and
/// infinities clamp to `f64::MAX`/`f64::MIN`.
pub fn float_normalize(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { f64::MAX } else { f64::MIN };
    }
    (value / FLOAT_PRECISION).round() * FLOAT_PRECISION
}

/// A canonical JSON value: sorted keys, normalized floats, order-preserving
/// arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
enum CanonicalValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<CanonicalValue>),
    Object(BTreeMap<String, CanonicalValue>),
}

impl CanonicalValue {
    fn from_json_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CanonicalValue::Null,
            serde_json::Value::Bool(b) => CanonicalValue::Bool(*b),
            serde_json::Value::Number(n) => {
                CanonicalValue::Number(float_normalize(n.as_f64().unwrap_or(0.0)))
            }
            serde_json::Value::String(s) => CanonicalValue::String(s.clone()),
            serde_json::Value::Array(arr) => {
                CanonicalValue::Array(arr.iter().map(Self::from_json_value).collect())
            }
            serde_json::Value::Object(obj) => {
                let mut map = BTreeMap::new();
                for (k, v) in obj {
                    map.insert(k.clone(), Self::from_json_value(v));
                }
                CanonicalValue::Object(map)
            }
        }
    }
}

/// Serialize a value to canonical JSON bytes: sorted object keys, floats
/// normalized to 9 decimal places, no trailing newline.
pub fn canonical_json<T: Serialize>(value: &T) -> Vec<u8> {
    let json_value = serde_json::to_value(value).expect("serialization failed");
    let canonical = CanonicalValue::from_json_value(&json_value);
    let mut bytes = serde_json::to_vec(&canonical).expect("canonical serialization failed");
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    bytes
}

/// SHA-256 hash of arbitrary bytes, hex-encoded.
pub fn stable_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Fingerprint a serializable value: canonical JSON, then SHA-256.
pub fn compute_fingerprint<T: Serialize>(value: &T) -> Fingerprint {
    stable_hash(&canonical_json(value))
}
