//! Test-mode bypass of provider interaction.
//!
//! When enabled, any machine whose name contains the marker substring is
//! reported as reconciled without the provider ever being called and without
//! any event being recorded. A production machine that happens to carry the
//! marker in its name would silently never be provisioned, so the policy is
//! off unless explicitly turned on.

use capk_machine::Machine;

use crate::error::ConfigError;

/// Marker used when test mode is enabled without an explicit marker.
pub const DEFAULT_BYPASS_MARKER: &str = "narg";

/// A non-empty substring that marks a machine for bypass.
///
/// The field is private so an empty marker, which would match every
/// machine, cannot be built:
///
/// ```compile_fail
/// use capk_actuator::bypass::{BypassMarker, BypassPolicy};
///
/// let policy = BypassPolicy::NameContains(BypassMarker(String::new()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BypassMarker(String);

impl BypassMarker {
    /// Validate a marker.
    pub fn new(marker: impl Into<String>) -> Result<Self, ConfigError> {
        let marker = marker.into();
        if marker.is_empty() {
            return Err(ConfigError::EmptyBypassMarker);
        }
        Ok(Self(marker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BypassMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which machines skip the provider entirely.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BypassPolicy {
    /// Every machine goes to the provider.
    #[default]
    Disabled,

    /// Machines whose name contains this substring (case-sensitive) are skipped.
    NameContains(BypassMarker),
}

impl BypassPolicy {
    /// Bypass machines whose name contains `marker`.
    pub fn name_contains(marker: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self::NameContains(BypassMarker::new(marker)?))
    }

    /// Test mode with [`DEFAULT_BYPASS_MARKER`].
    pub fn test_mode() -> Self {
        Self::NameContains(BypassMarker(DEFAULT_BYPASS_MARKER.to_string()))
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    pub fn marker(&self) -> Option<&str> {
        match self {
            Self::Disabled => None,
            Self::NameContains(marker) => Some(marker.as_str()),
        }
    }

    /// Whether this machine should skip the provider.
    pub fn should_bypass(&self, machine: &Machine) -> bool {
        match self {
            Self::Disabled => false,
            Self::NameContains(marker) => machine.name().contains(marker.as_str()),
        }
    }
}
