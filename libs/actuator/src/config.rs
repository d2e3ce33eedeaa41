//! Configuration for the actuator.

use anyhow::Result;

use crate::bypass::{BypassPolicy, DEFAULT_BYPASS_MARKER};

/// Actuator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorConfig {
    /// Which machines skip the provider.
    pub bypass: BypassPolicy,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            bypass: BypassPolicy::Disabled,
            log_level: "info".to_string(),
        }
    }
}

impl ActuatorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let log_level = lookup("CAPK_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let test_mode = lookup("CAPK_TEST_MODE")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let bypass = if test_mode {
            let marker =
                lookup("CAPK_BYPASS_MARKER").unwrap_or_else(|| DEFAULT_BYPASS_MARKER.to_string());
            BypassPolicy::name_contains(marker)?
        } else {
            BypassPolicy::Disabled
        };

        Ok(Self { bypass, log_level })
    }
}
