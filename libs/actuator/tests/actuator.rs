//! Integration tests for the actuator's error and event policy.
//!
//! A scripted provider returns fixed results and counts calls, so each test
//! can check both what the actuator returned and what it emitted.

use std::error::Error as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use capk_actuator::{
    Actuator, ActuatorError, BypassMarker, BypassPolicy, ConfigError, EventAction, EventType,
    Machine, MachineActuator, ProviderVm,
};
use capk_events::MemoryEventSink;

use async_trait::async_trait;
use rstest::rstest;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stub failure: {0}")]
struct StubError(&'static str);

/// Provider with fixed per-operation results.
#[derive(Default)]
struct StubProvider {
    create_error: Option<StubError>,
    exists_result: Option<bool>,
    exists_error: Option<StubError>,
    update_modified: bool,
    update_error: Option<StubError>,
    delete_error: Option<StubError>,
    calls: AtomicUsize,
}

impl StubProvider {
    fn ok() -> Self {
        Self {
            exists_result: Some(true),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            create_error: Some(StubError("create")),
            exists_error: Some(StubError("exists")),
            update_error: Some(StubError("update")),
            delete_error: Some(StubError("delete")),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn result(&self, err: &Option<StubError>) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match err {
            Some(e) => Err(e.clone().into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProviderVm for StubProvider {
    async fn create(&self, _machine: &Machine) -> anyhow::Result<()> {
        self.result(&self.create_error)
    }

    async fn exists(&self, _machine: &Machine) -> anyhow::Result<bool> {
        self.result(&self.exists_error)?;
        Ok(self.exists_result.unwrap_or(false))
    }

    async fn update(&self, _machine: &Machine) -> anyhow::Result<bool> {
        self.result(&self.update_error)?;
        Ok(self.update_modified)
    }

    async fn delete(&self, _machine: &Machine) -> anyhow::Result<()> {
        self.result(&self.delete_error)
    }
}

fn setup(provider: StubProvider) -> (Actuator, Arc<StubProvider>, Arc<MemoryEventSink>) {
    let provider = Arc::new(provider);
    let events = Arc::new(MemoryEventSink::new());
    let actuator = Actuator::new(provider.clone(), events.clone());
    (actuator, provider, events)
}

fn stub_cause(err: &ActuatorError) -> Option<&StubError> {
    err.source().and_then(|s| s.downcast_ref::<StubError>())
}

// =============================================================================
// Bypass
// =============================================================================

#[rstest]
#[case("narg")]
#[case("worker-narg-0")]
#[case("snarge")]
#[tokio::test]
async fn test_bypass_skips_provider_and_events(#[case] name: &str) {
    let (actuator, provider, events) = setup(StubProvider::failing());
    let actuator = actuator.with_bypass(BypassPolicy::test_mode());
    let machine = Machine::new(name);

    actuator.create(&machine).await.unwrap();
    actuator.update(&machine).await.unwrap();
    actuator.delete(&machine).await.unwrap();
    assert!(actuator.exists(&machine).await.unwrap());

    assert_eq!(provider.calls(), 0);
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_bypass_with_custom_marker() {
    let (actuator, provider, events) = setup(StubProvider::failing());
    let actuator = actuator.with_bypass(BypassPolicy::name_contains("fake").unwrap());

    actuator.create(&Machine::new("fake-worker")).await.unwrap();
    assert_eq!(provider.calls(), 0);

    // The default marker means nothing under a custom policy.
    assert!(actuator.create(&Machine::new("narg-worker")).await.is_err());
    assert_eq!(provider.calls(), 1);
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn test_empty_marker_never_reaches_actuator() {
    assert_eq!(BypassMarker::new(""), Err(ConfigError::EmptyBypassMarker));
    assert_eq!(
        BypassPolicy::name_contains(String::new()),
        Err(ConfigError::EmptyBypassMarker)
    );

    // The narrowest valid marker still leaves unrelated machines alone.
    let (actuator, provider, events) = setup(StubProvider::ok());
    let actuator = actuator.with_bypass(BypassPolicy::name_contains("~").unwrap());
    let machine = Machine::new("prod-db-0");

    actuator.create(&machine).await.unwrap();
    assert!(actuator.exists(&machine).await.unwrap());

    assert_eq!(provider.calls(), 2);
    assert_eq!(events.with_reason("Create").len(), 1);
}

#[tokio::test]
async fn test_marker_names_reach_provider_when_bypass_disabled() {
    let (actuator, provider, events) = setup(StubProvider::ok());
    let machine = Machine::new("worker-narg-0");

    actuator.create(&machine).await.unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(events.with_reason("Create").len(), 1);
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_success_records_normal_event() {
    let (actuator, provider, events) = setup(StubProvider::ok());
    let machine = Machine::new("worker-0");

    actuator.create(&machine).await.unwrap();

    assert_eq!(provider.calls(), 1);
    let recorded = events.events();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].event_type, EventType::Normal);
    assert_eq!(recorded[0].reason, "Create");
    assert_eq!(recorded[0].message, "Created Machine worker-0");
}

#[tokio::test]
async fn test_create_failure_is_wrapped_and_reported() {
    let (actuator, _provider, events) = setup(StubProvider::failing());
    let machine = Machine::new("worker-0");

    let err = actuator.create(&machine).await.unwrap_err();

    assert_eq!(stub_cause(&err), Some(&StubError("create")));
    assert_eq!(err.machine(), "worker-0");
    assert_eq!(err.action(), EventAction::Create);
    assert_eq!(
        err.to_string(),
        "worker-0: provider failed to create machine: stub failure: create"
    );

    let warnings = events.of_type(EventType::Warning);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].reason, "FailedCreate");
    assert_eq!(warnings[0].message, err.to_string());
    assert!(events.of_type(EventType::Normal).is_empty());
}

#[tokio::test]
async fn test_create_twice_against_idempotent_provider() {
    let (actuator, provider, events) = setup(StubProvider::ok());
    let machine = Machine::new("worker-0");

    actuator.create(&machine).await.unwrap();
    actuator.create(&machine).await.unwrap();

    assert_eq!(provider.calls(), 2);
    assert!(events.of_type(EventType::Warning).is_empty());
}

#[tokio::test]
async fn test_empty_name_is_passed_to_provider() {
    let (actuator, provider, _events) = setup(StubProvider::ok());

    actuator.create(&Machine::new("")).await.unwrap();

    assert_eq!(provider.calls(), 1);
}

// =============================================================================
// Exists
// =============================================================================

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn test_exists_returns_provider_result(#[case] present: bool) {
    let (actuator, provider, events) = setup(StubProvider {
        exists_result: Some(present),
        ..StubProvider::default()
    });

    let exists = actuator.exists(&Machine::new("worker-0")).await.unwrap();

    assert_eq!(exists, present);
    assert_eq!(provider.calls(), 1);
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_exists_error_is_not_wrapped() {
    let (actuator, _provider, events) = setup(StubProvider::failing());

    let err = actuator.exists(&Machine::new("worker-0")).await.unwrap_err();

    assert_eq!(err.downcast_ref::<StubError>(), Some(&StubError("exists")));
    assert_eq!(err.to_string(), "stub failure: exists");
    assert!(events.is_empty());
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_without_change_is_silent() {
    let (actuator, provider, events) = setup(StubProvider {
        update_modified: false,
        ..StubProvider::default()
    });

    actuator.update(&Machine::new("worker-0")).await.unwrap();

    assert_eq!(provider.calls(), 1);
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_update_with_change_records_normal_event() {
    let (actuator, _provider, events) = setup(StubProvider {
        update_modified: true,
        ..StubProvider::default()
    });

    actuator.update(&Machine::new("worker-0")).await.unwrap();

    let recorded = events.events();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].event_type, EventType::Normal);
    assert_eq!(recorded[0].reason, "Update");
    assert_eq!(recorded[0].message, "Updated Machine worker-0");
}

#[tokio::test]
async fn test_update_failure_is_wrapped_and_reported() {
    let (actuator, _provider, events) = setup(StubProvider::failing());

    let err = actuator.update(&Machine::new("worker-0")).await.unwrap_err();

    assert_eq!(stub_cause(&err), Some(&StubError("update")));
    assert_eq!(err.action(), EventAction::Update);
    assert_eq!(events.len(), 1);
    assert_eq!(events.with_reason("FailedUpdate").len(), 1);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_success_records_normal_event() {
    let (actuator, _provider, events) = setup(StubProvider::ok());

    actuator.delete(&Machine::new("worker-0")).await.unwrap();

    let recorded = events.events();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].reason, "Delete");
    assert_eq!(recorded[0].message, "Deleted machine worker-0");
}

#[tokio::test]
async fn test_delete_failure_is_wrapped_and_reported() {
    let (actuator, _provider, events) = setup(StubProvider::failing());

    let err = actuator.delete(&Machine::new("worker-0")).await.unwrap_err();

    assert_eq!(stub_cause(&err), Some(&StubError("delete")));
    assert_eq!(err.action(), EventAction::Delete);
    assert_eq!(events.with_reason("FailedDelete").len(), 1);
    assert!(events.of_type(EventType::Normal).is_empty());
}

// =============================================================================
// Failure table
// =============================================================================

#[rstest]
#[case(EventAction::Create, "FailedCreate")]
#[case(EventAction::Update, "FailedUpdate")]
#[case(EventAction::Delete, "FailedDelete")]
#[tokio::test]
async fn test_each_failure_emits_one_warning(#[case] action: EventAction, #[case] reason: &str) {
    let (actuator, _provider, events) = setup(StubProvider::failing());
    let machine = Machine::new("worker-0").with_namespace("ns1");

    let err = match action {
        EventAction::Create => actuator.create(&machine).await,
        EventAction::Update => actuator.update(&machine).await,
        EventAction::Delete => actuator.delete(&machine).await,
        EventAction::None => unreachable!(),
    }
    .unwrap_err();

    assert!(matches!(err, ActuatorError::ProviderOperation { .. }));
    let recorded = events.events();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].event_type, EventType::Warning);
    assert_eq!(recorded[0].reason, reason);
    assert_eq!(recorded[0].subject, "ns1/worker-0");
}
