//! Event sinks.
//!
//! A sink receives every event the actuator emits. Recording never fails
//! from the caller's point of view: a sink that cannot deliver an event
//! drops it.

use std::sync::{Mutex, MutexGuard};

use capk_machine::Machine;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{EventType, RecordedEvent};

/// Destination for machine lifecycle events.
pub trait EventSink: Send + Sync {
    /// Record an event against a machine.
    fn record(&self, machine: &Machine, event_type: EventType, reason: &str, message: String);
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl MemoryEventSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedEvent>> {
        // A panicking recorder cannot leave the Vec half-written.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of all recorded events, oldest first.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Events of the given severity.
    pub fn of_type(&self, event_type: EventType) -> Vec<RecordedEvent> {
        self.lock()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Events with the given reason.
    pub fn with_reason(&self, reason: &str) -> Vec<RecordedEvent> {
        self.lock()
            .iter()
            .filter(|e| e.reason == reason)
            .cloned()
            .collect()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl EventSink for MemoryEventSink {
    fn record(&self, machine: &Machine, event_type: EventType, reason: &str, message: String) {
        self.lock()
            .push(RecordedEvent::new(machine, event_type, reason, message));
    }
}

/// Sink that writes events to the process-wide logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, machine: &Machine, event_type: EventType, reason: &str, message: String) {
        match event_type {
            EventType::Normal => info!(
                machine = %machine.key(),
                reason = %reason,
                message = %message,
                "Machine event"
            ),
            EventType::Warning => warn!(
                machine = %machine.key(),
                reason = %reason,
                message = %message,
                "Machine event"
            ),
        }
    }
}

/// Sink that forwards events to an async consumer.
///
/// Uses `try_send`, so recording never blocks the reconciling task. Events
/// are dropped when the channel is full or the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::Sender<RecordedEvent>,
}

impl ChannelEventSink {
    /// Create a sink and the receiving end of its channel.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<RecordedEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn record(&self, machine: &Machine, event_type: EventType, reason: &str, message: String) {
        let event = RecordedEvent::new(machine, event_type, reason, message);
        if let Err(e) = self.tx.try_send(event) {
            debug!(
                machine = %machine.key(),
                reason = %reason,
                error = %e,
                "Dropping machine event"
            );
        }
    }
}
