//! Error types for the actuator.

use capk_events::EventAction;
use thiserror::Error;

/// Errors returned by actuator operations.
#[derive(Debug, Error)]
pub enum ActuatorError {
    /// The provider failed to carry out a create, update or delete.
    ///
    /// The provider's error is kept as `source` so callers can downcast it.
    ///
    /// The message already ends with the provider's full context chain, and
    /// `source()` returns the same error. Reporters that walk the chain
    /// themselves (`{:#}` on an `anyhow::Error`, `Report`-style printers)
    /// will therefore print the provider's message twice. Render this error
    /// with `{}`, or walk `source()` starting from `provider_error()`.
    #[error("{machine}: provider failed to {action} machine: {}", chain(.source))]
    ProviderOperation {
        machine: String,
        action: EventAction,
        #[source]
        source: anyhow::Error,
    },
}

/// Render an error with its full context chain (`outer: inner`).
fn chain(err: &anyhow::Error) -> String {
    format!("{err:#}")
}

impl ActuatorError {
    pub(crate) fn provider(
        machine: impl Into<String>,
        action: EventAction,
        source: anyhow::Error,
    ) -> Self {
        Self::ProviderOperation {
            machine: machine.into(),
            action,
            source,
        }
    }

    /// Name of the machine the failed operation targeted.
    pub fn machine(&self) -> &str {
        match self {
            Self::ProviderOperation { machine, .. } => machine,
        }
    }

    /// The operation that failed.
    pub fn action(&self) -> EventAction {
        match self {
            Self::ProviderOperation { action, .. } => *action,
        }
    }

    /// The provider's original error.
    pub fn provider_error(&self) -> &anyhow::Error {
        match self {
            Self::ProviderOperation { source, .. } => source,
        }
    }
}

/// Errors raised by the bundled in-memory provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The machine is not known to the provider.
    #[error("machine {0} not found")]
    NotFound(String),

    /// The provider was built to fail every mutating call.
    #[error("injected failure during {0}")]
    Injected(&'static str),
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An empty marker would bypass every machine.
    #[error("bypass marker must not be empty")]
    EmptyBypassMarker,
}
