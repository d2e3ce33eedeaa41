//! # capk-events
//!
//! Event types and sinks for machine lifecycle notifications.
//!
//! ## Design Principles
//!
//! - Events are human-readable notes attached to a machine
//! - Recording is fire-and-forget: a sink never reports failure to its caller
//! - Sinks must be safe to share between reconciliation workers
//!
//! ## Event Classes
//!
//! - `Normal` events announce a completed transition (`Create`, `Update`, `Delete`)
//! - `Warning` events announce a failed one (`FailedCreate`, `FailedUpdate`, `FailedDelete`)
//!
//! ## Sinks
//!
//! - [`MemoryEventSink`]: keeps every event in memory (tests, debugging)
//! - [`TracingEventSink`]: writes events to the process-wide logger
//! - [`ChannelEventSink`]: hands events to an async consumer over a bounded channel

mod envelope;
mod sink;
mod types;

pub use envelope::RecordedEvent;
pub use sink::{ChannelEventSink, EventSink, MemoryEventSink, TracingEventSink};
pub use types::*;
