//! # capk-actuator
//!
//! The machine actuator sits between a declarative machine control loop and
//! a VM provider. The control loop calls one operation per reconciliation
//! pass until the observed state matches the desired state:
//!
//! ```text
//! control loop ──► Actuator ──► ProviderVm (create/exists/update/delete)
//!                     │
//!                     ├──► EventSink  (Normal / Warning events)
//!                     └──► tracing    (process-wide log)
//! ```
//!
//! ## Modules
//!
//! - `actuator`: the four operations and their error/event policy
//! - `provider`: the provider interface and an in-memory implementation
//! - `bypass`: opt-in test mode that skips the provider by machine name
//! - `config`: environment-driven configuration
//! - `telemetry`: subscriber setup

pub mod actuator;
pub mod bypass;
pub mod config;
pub mod error;
pub mod provider;
pub mod telemetry;

pub use actuator::{Actuator, MachineActuator};
pub use bypass::{BypassMarker, BypassPolicy, DEFAULT_BYPASS_MARKER};
pub use config::ActuatorConfig;
pub use error::{ActuatorError, ConfigError, ProviderError};
pub use provider::{MockProviderVm, ProviderVm};

pub use capk_events::{EventAction, EventSink, EventType};
pub use capk_machine::Machine;
