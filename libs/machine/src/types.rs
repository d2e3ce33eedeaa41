//! Machine resource definition.

use serde::{Deserialize, Serialize};

use crate::SpecHash;

/// Identifying metadata for a machine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Unique name of the machine.
    pub name: String,

    /// Namespace the machine lives in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// A desired compute instance.
///
/// `spec` and `status` belong to the provider and are never inspected here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Machine {
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: serde_json::Value,

    #[serde(default)]
    pub status: serde_json::Value,
}

impl Machine {
    /// Create a machine with the given name and an empty spec.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                namespace: None,
            },
            spec: serde_json::Value::Null,
            status: serde_json::Value::Null,
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.metadata.namespace = Some(namespace.into());
        self
    }

    /// Set the provider spec.
    pub fn with_spec(mut self, spec: serde_json::Value) -> Self {
        self.spec = spec;
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    /// `namespace/name`, or just `name` for cluster-scoped machines.
    pub fn key(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{}/{}", ns, self.name()),
            None => self.name().to_string(),
        }
    }

    /// Fingerprint of the provider spec.
    pub fn spec_hash(&self) -> SpecHash {
        SpecHash::from_json(&self.spec)
    }
}

impl std::fmt::Display for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
