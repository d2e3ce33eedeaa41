//! Machine actuator.
//!
//! The actuator is what a machine control loop calls on every
//! reconciliation pass. For each operation it:
//! - Logs the call
//! - Skips the provider for bypassed machines
//! - Delegates to the provider
//! - Wraps provider failures with machine and action context
//! - Records Normal/Warning events for create, update and delete
//!
//! Existence checks only read provider state, so they are neither wrapped nor
//! recorded as events.
//! Retries belong to the control loop, which calls again on its own schedule.

use std::sync::Arc;

use async_trait::async_trait;
use capk_events::{EventAction, EventSink, EventType};
use capk_machine::Machine;
use tracing::{debug, error, info};

use crate::bypass::BypassPolicy;
use crate::config::ActuatorConfig;
use crate::error::ActuatorError;
use crate::provider::ProviderVm;

/// Operations a machine control loop drives.
#[async_trait]
pub trait MachineActuator: Send + Sync {
    /// Provision the machine. Safe to call again for an existing machine.
    async fn create(&self, machine: &Machine) -> Result<(), ActuatorError>;

    /// Check whether the machine exists. Provider errors are returned as-is.
    async fn exists(&self, machine: &Machine) -> anyhow::Result<bool>;

    /// Sync machine state with an existing instance.
    async fn update(&self, machine: &Machine) -> Result<(), ActuatorError>;

    /// Deprovision the machine.
    async fn delete(&self, machine: &Machine) -> Result<(), ActuatorError>;
}

/// Actuator backed by a VM provider and an event sink.
///
/// Holds no mutable state; share it across workers behind an `Arc`.
pub struct Actuator {
    provider: Arc<dyn ProviderVm>,
    events: Arc<dyn EventSink>,
    bypass: BypassPolicy,
}

impl Actuator {
    /// Create an actuator with bypass disabled.
    pub fn new(provider: Arc<dyn ProviderVm>, events: Arc<dyn EventSink>) -> Self {
        Self {
            provider,
            events,
            bypass: BypassPolicy::Disabled,
        }
    }

    /// Create an actuator from loaded configuration.
    pub fn with_config(
        provider: Arc<dyn ProviderVm>,
        events: Arc<dyn EventSink>,
        config: &ActuatorConfig,
    ) -> Self {
        Self::new(provider, events).with_bypass(config.bypass.clone())
    }

    /// Replace the bypass policy.
    pub fn with_bypass(mut self, bypass: BypassPolicy) -> Self {
        self.bypass = bypass;
        self
    }

    pub fn bypass_policy(&self) -> &BypassPolicy {
        &self.bypass
    }

    fn bypassed(&self, machine: &Machine, operation: &'static str) -> bool {
        if !self.bypass.should_bypass(machine) {
            return false;
        }
        debug!(
            machine = %machine.name(),
            operation,
            marker = self.bypass.marker().unwrap_or_default(),
            "Bypassing provider for test-mode machine"
        );
        true
    }

    /// Log a provider failure and record it as a Warning event.
    ///
    /// Returns the wrapped error so callers can `return Err(...)` directly.
    fn handle_machine_error(
        &self,
        machine: &Machine,
        action: EventAction,
        source: anyhow::Error,
    ) -> ActuatorError {
        let err = ActuatorError::provider(machine.name(), action, source);
        error!(machine = %machine.name(), error = %err, "Machine operation failed");

        if let Some(reason) = action.failure_reason() {
            self.events
                .record(machine, EventType::Warning, reason, err.to_string());
        }
        err
    }

    fn record_success(&self, machine: &Machine, action: EventAction, message: String) {
        if let Some(reason) = action.success_reason() {
            self.events.record(machine, EventType::Normal, reason, message);
        }
    }
}

#[async_trait]
impl MachineActuator for Actuator {
    async fn create(&self, machine: &Machine) -> Result<(), ActuatorError> {
        info!(machine = %machine.name(), operation = "create", "Actuator creating machine");
        if self.bypassed(machine, "create") {
            return Ok(());
        }

        if let Err(e) = self.provider.create(machine).await {
            return Err(self.handle_machine_error(machine, EventAction::Create, e));
        }

        self.record_success(
            machine,
            EventAction::Create,
            format!("Created Machine {}", machine.name()),
        );
        Ok(())
    }

    async fn exists(&self, machine: &Machine) -> anyhow::Result<bool> {
        info!(
            machine = %machine.name(),
            operation = "exists",
            "Actuator checking if machine exists"
        );
        if self.bypassed(machine, "exists") {
            return Ok(true);
        }

        self.provider.exists(machine).await
    }

    async fn update(&self, machine: &Machine) -> Result<(), ActuatorError> {
        info!(machine = %machine.name(), operation = "update", "Actuator updating machine");
        if self.bypassed(machine, "update") {
            return Ok(());
        }

        let was_updated = match self.provider.update(machine).await {
            Ok(was_updated) => was_updated,
            Err(e) => return Err(self.handle_machine_error(machine, EventAction::Update, e)),
        };

        // No-op passes stay silent.
        if was_updated {
            self.record_success(
                machine,
                EventAction::Update,
                format!("Updated Machine {}", machine.name()),
            );
        }
        Ok(())
    }

    async fn delete(&self, machine: &Machine) -> Result<(), ActuatorError> {
        info!(machine = %machine.name(), operation = "delete", "Actuator deleting machine");
        if self.bypassed(machine, "delete") {
            return Ok(());
        }

        if let Err(e) = self.provider.delete(machine).await {
            return Err(self.handle_machine_error(machine, EventAction::Delete, e));
        }

        self.record_success(
            machine,
            EventAction::Delete,
            format!("Deleted machine {}", machine.name()),
        );
        Ok(())
    }
}
