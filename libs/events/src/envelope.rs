//! Recorded event - what a sink keeps or forwards for each notification.

use capk_machine::Machine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::EventType;

/// A single event recorded against a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// `namespace/name` of the machine the event is about.
    pub subject: String,

    pub event_type: EventType,

    /// Short machine-readable reason (`Create`, `FailedDelete`, ...).
    pub reason: String,

    /// Human-readable message.
    pub message: String,

    pub timestamp: DateTime<Utc>,
}

impl RecordedEvent {
    /// Create a new event stamped with the current time.
    pub fn new(
        machine: &Machine,
        event_type: EventType,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subject: machine.key(),
            event_type,
            reason: reason.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.event_type == EventType::Warning
    }
}
