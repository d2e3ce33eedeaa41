//! Event classification types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Event Reason Constants
// =============================================================================

/// All event reasons as constants.
pub mod event_reasons {
    pub const CREATE: &str = "Create";
    pub const UPDATE: &str = "Update";
    pub const DELETE: &str = "Delete";

    pub const FAILED_CREATE: &str = "FailedCreate";
    pub const FAILED_UPDATE: &str = "FailedUpdate";
    pub const FAILED_DELETE: &str = "FailedDelete";
}

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Normal,
    Warning,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Normal => write!(f, "Normal"),
            EventType::Warning => write!(f, "Warning"),
        }
    }
}

/// The actuator operation that triggered an event.
///
/// `None` marks a failure that should not be reported as an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventAction {
    Create,
    Update,
    Delete,
    None,
}

impl EventAction {
    /// Reason for the Normal event announcing success.
    pub fn success_reason(&self) -> Option<&'static str> {
        match self {
            EventAction::Create => Some(event_reasons::CREATE),
            EventAction::Update => Some(event_reasons::UPDATE),
            EventAction::Delete => Some(event_reasons::DELETE),
            EventAction::None => None,
        }
    }

    /// Reason for the Warning event announcing failure.
    pub fn failure_reason(&self) -> Option<&'static str> {
        match self {
            EventAction::Create => Some(event_reasons::FAILED_CREATE),
            EventAction::Update => Some(event_reasons::FAILED_UPDATE),
            EventAction::Delete => Some(event_reasons::FAILED_DELETE),
            EventAction::None => None,
        }
    }

    /// Lowercase verb used in error messages ("create", "update", ...).
    pub fn verb(&self) -> &'static str {
        match self {
            EventAction::Create => "create",
            EventAction::Update => "update",
            EventAction::Delete => "delete",
            EventAction::None => "reconcile",
        }
    }
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.verb())
    }
}
