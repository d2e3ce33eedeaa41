//! VM provider interface and in-memory implementation.
//!
//! The provider interface abstracts the backend that actually provisions
//! machines:
//! - Creating, updating and deleting VMs
//! - Probing whether a VM exists
//!
//! Every call must be safe to repeat; "already in the desired state" is
//! success, not an error. An in-memory implementation is provided for
//! testing and development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use capk_machine::{Machine, SpecHash};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::ProviderError;

/// VM provider interface.
#[async_trait]
pub trait ProviderVm: Send + Sync {
    /// Provision the machine.
    async fn create(&self, machine: &Machine) -> Result<()>;

    /// Check whether the machine is provisioned.
    async fn exists(&self, machine: &Machine) -> Result<bool>;

    /// Converge an existing machine to its spec.
    ///
    /// Returns `true` if anything was changed.
    async fn update(&self, machine: &Machine) -> Result<bool>;

    /// Deprovision the machine.
    async fn delete(&self, machine: &Machine) -> Result<()>;
}

/// In-memory provider for testing and development.
///
/// Machines are keyed by `namespace/name` and remembered by spec hash, so
/// an update only reports a change when the spec actually differs.
pub struct MockProviderVm {
    /// Provisioned machines and the spec they were last converged to.
    machines: RwLock<HashMap<String, SpecHash>>,

    /// Number of provider calls served.
    calls: AtomicU64,

    /// Whether create/update/delete should "fail".
    fail_mutations: bool,
}

impl MockProviderVm {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self {
            machines: RwLock::new(HashMap::new()),
            calls: AtomicU64::new(0),
            fail_mutations: false,
        }
    }

    /// Create a mock provider that fails every create, update and delete.
    pub fn failing() -> Self {
        Self {
            fail_mutations: true,
            ..Self::new()
        }
    }

    /// Number of provider calls served so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of provisioned machines.
    pub async fn machine_count(&self) -> usize {
        self.machines.read().await.len()
    }

    fn begin(&self, op: &'static str) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations && op != "exists" {
            return Err(ProviderError::Injected(op));
        }
        Ok(())
    }
}

impl Default for MockProviderVm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderVm for MockProviderVm {
    async fn create(&self, machine: &Machine) -> Result<()> {
        self.begin("create")?;

        let key = machine.key();
        let mut machines = self.machines.write().await;
        if machines.contains_key(&key) {
            debug!(machine = %key, "[MOCK] Machine already exists");
            return Ok(());
        }

        info!(machine = %key, "[MOCK] Creating VM");
        machines.insert(key, machine.spec_hash());
        Ok(())
    }

    async fn exists(&self, machine: &Machine) -> Result<bool> {
        self.begin("exists")?;
        Ok(self.machines.read().await.contains_key(&machine.key()))
    }

    async fn update(&self, machine: &Machine) -> Result<bool> {
        self.begin("update")?;

        let key = machine.key();
        let mut machines = self.machines.write().await;
        let Some(current) = machines.get_mut(&key) else {
            return Err(ProviderError::NotFound(key).into());
        };

        let desired = machine.spec_hash();
        if *current == desired {
            debug!(machine = %key, "[MOCK] VM already matches spec");
            return Ok(false);
        }

        info!(machine = %key, from = %current, to = %desired, "[MOCK] Updating VM");
        *current = desired;
        Ok(true)
    }

    async fn delete(&self, machine: &Machine) -> Result<()> {
        self.begin("delete")?;

        let key = machine.key();
        if self.machines.write().await.remove(&key).is_some() {
            info!(machine = %key, "[MOCK] Deleting VM");
        }
        Ok(())
    }
}
