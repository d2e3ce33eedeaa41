//! Spec fingerprints for drift detection.

use sha2::{Digest, Sha256};

/// A spec hash for deterministic comparison.
///
/// Used to detect when a machine's provider spec has changed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecHash(String);

impl SpecHash {
    /// Compute a spec hash from canonical JSON.
    pub fn from_json(json: &serde_json::Value) -> Self {
        let canonical = canonical_json(json);
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let result = hasher.finalize();
        Self(format!("sha256:{}", hex::encode(&result[..16]))) // First 16 bytes (128 bits)
    }

    /// Get the hash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpecHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Produce canonical JSON (sorted keys, no extra whitespace).
fn canonical_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => {
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort_by_key(|(k, _)| *k);
            let inner: Vec<String> = pairs
                .iter()
                .map(|(k, v)| format!("{}:{}", quote(k), canonical_json(v)))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
        serde_json::Value::Array(arr) => {
            let inner: Vec<String> = arr.iter().map(canonical_json).collect();
            format!("[{}]", inner.join(","))
        }
        other => other.to_string(),
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spec_hash_ignores_key_order() {
        let a = serde_json::json!({"cpu": 2, "disk": {"size": "10Gi", "bus": "virtio"}});
        let b = serde_json::json!({"disk": {"bus": "virtio", "size": "10Gi"}, "cpu": 2});

        assert_eq!(SpecHash::from_json(&a), SpecHash::from_json(&b));
    }

    #[test]
    fn test_spec_hash_detects_change() {
        let a = serde_json::json!({"cpu": 2});
        let b = serde_json::json!({"cpu": 4});

        assert_ne!(SpecHash::from_json(&a), SpecHash::from_json(&b));
    }

    #[test]
    fn test_spec_hash_format() {
        let hash = SpecHash::from_json(&serde_json::Value::Null);
        assert!(hash.as_str().starts_with("sha256:"));
        assert_eq!(hash.as_str().len(), "sha256:".len() + 32);
    }

    #[test]
    fn test_canonical_json_escapes_keys() {
        let value = serde_json::json!({"a\"b": "line\nbreak"});
        assert_eq!(canonical_json(&value), r#"{"a\"b":"line\nbreak"}"#);
    }

    proptest! {
        #[test]
        fn prop_spec_hash_is_stable(cpu in 0u32..64, image in "[a-z]{1,12}") {
            let spec = serde_json::json!({"cpu": cpu, "image": image});
            prop_assert_eq!(SpecHash::from_json(&spec), SpecHash::from_json(&spec.clone()));
        }
    }
}
