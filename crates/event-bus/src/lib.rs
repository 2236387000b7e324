//! Lifecycle event bus for Keyward suites.
//!
//! Six event kinds mark the boundaries of suite, case, and step execution.
//! Delivery is sequential in subscription order and awaited to completion,
//! so listeners observe a consistent trace. Two dispatch paths exist on
//! purpose: [`LifecycleBus::publish`] raises the first subscriber failure
//! (case-scope hook bodies are fatal to the case), while
//! [`LifecycleBus::publish_logged`] records failures as warnings and never
//! raises (step- and suite-boundary instrumentation must not abort the run).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use futures::future::BoxFuture;
use thiserror::Error;
use tracing::warn;

use run_trace::{RunnerHandle, TestStep};

/// The six lifecycle boundaries subscribers can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BeforeSuite,
    AfterSuite,
    BeforeCase,
    AfterCase,
    BeforeStep,
    AfterStep,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::BeforeSuite => "BEFORE_SUITE",
            EventKind::AfterSuite => "AFTER_SUITE",
            EventKind::BeforeCase => "BEFORE_CASE",
            EventKind::AfterCase => "AFTER_CASE",
            EventKind::BeforeStep => "BEFORE_STEP",
            EventKind::AfterStep => "AFTER_STEP",
        };
        f.write_str(name)
    }
}

/// Payload of suite-boundary events.
#[derive(Debug, Clone)]
pub struct SuiteEvent {
    pub suite_name: String,
    pub suite_id: String,
    pub runner: RunnerHandle,
}

/// Payload of case-boundary events.
#[derive(Debug, Clone)]
pub struct CaseEvent {
    pub suite_name: String,
    pub suite_id: String,
    pub case_name: String,
    pub case_id: String,
    pub runner: RunnerHandle,
}

/// Payload of step-boundary events: a snapshot of the step being processed.
#[derive(Debug, Clone)]
pub struct StepEvent {
    pub step: TestStep,
}

#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    BeforeSuite(SuiteEvent),
    AfterSuite(SuiteEvent),
    BeforeCase(CaseEvent),
    AfterCase(CaseEvent),
    BeforeStep(StepEvent),
    AfterStep(StepEvent),
}

impl LifecycleEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LifecycleEvent::BeforeSuite(_) => EventKind::BeforeSuite,
            LifecycleEvent::AfterSuite(_) => EventKind::AfterSuite,
            LifecycleEvent::BeforeCase(_) => EventKind::BeforeCase,
            LifecycleEvent::AfterCase(_) => EventKind::AfterCase,
            LifecycleEvent::BeforeStep(_) => EventKind::BeforeStep,
            LifecycleEvent::AfterStep(_) => EventKind::AfterStep,
        }
    }
}

#[derive(Debug, Error, Clone)]
pub enum EventError {
    #[error("subscriber '{subscriber}' failed during {kind}: {message}")]
    Subscriber {
        subscriber: String,
        kind: EventKind,
        message: String,
    },
}

/// Trait implemented by everything attached to the bus.
#[async_trait]
pub trait EventListener: Send + Sync {
    async fn handle(&self, event: &LifecycleEvent) -> anyhow::Result<()>;
}

struct FnListener<F> {
    f: F,
}

#[async_trait]
impl<F> EventListener for FnListener<F>
where
    F: Fn(LifecycleEvent) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync,
{
    async fn handle(&self, event: &LifecycleEvent) -> anyhow::Result<()> {
        (self.f)(event.clone()).await
    }
}

/// Wraps an async closure into an [`EventListener`].
pub fn listener_fn<F>(f: F) -> Arc<dyn EventListener>
where
    F: Fn(LifecycleEvent) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync + 'static,
{
    Arc::new(FnListener { f })
}

struct Subscription {
    name: String,
    listener: Arc<dyn EventListener>,
}

/// Outcome of a lenient dispatch: every subscriber ran, failures recorded.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    pub delivered: usize,
    pub failures: Vec<EventError>,
}

impl DispatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Single-process publish/subscribe channel keyed by [`EventKind`].
pub struct LifecycleBus {
    subscribers: RwLock<HashMap<EventKind, Vec<Subscription>>>,
}

impl LifecycleBus {
    pub fn new() -> Arc<Self> {
        Arc::new(LifecycleBus {
            subscribers: RwLock::new(HashMap::new()),
        })
    }

    /// Registers `listener` under `name` for `kind`. Subscription order is
    /// delivery order; hook wrappers rely on being registered before the
    /// events they instrument fire.
    pub fn subscribe(
        &self,
        kind: EventKind,
        name: impl Into<String>,
        listener: Arc<dyn EventListener>,
    ) {
        let mut subscribers = self.subscribers.write().expect("subscriber map lock");
        subscribers.entry(kind).or_default().push(Subscription {
            name: name.into(),
            listener,
        });
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers
            .read()
            .expect("subscriber map lock")
            .get(&kind)
            .map_or(0, Vec::len)
    }

    fn subscriptions_for(&self, kind: EventKind) -> Vec<(String, Arc<dyn EventListener>)> {
        self.subscribers
            .read()
            .expect("subscriber map lock")
            .get(&kind)
            .map(|subs| {
                subs.iter()
                    .map(|sub| (sub.name.clone(), Arc::clone(&sub.listener)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Strict dispatch: awaits subscribers sequentially in subscription order
    /// and returns the first failure, skipping the remaining subscribers.
    pub async fn publish(&self, event: LifecycleEvent) -> Result<(), EventError> {
        let kind = event.kind();
        for (name, listener) in self.subscriptions_for(kind) {
            listener
                .handle(&event)
                .await
                .map_err(|err| EventError::Subscriber {
                    subscriber: name,
                    kind,
                    message: format!("{err:#}"),
                })?;
        }
        Ok(())
    }

    /// Lenient dispatch: awaits every subscriber sequentially, records and
    /// warn-logs each failure, and never raises.
    pub async fn publish_logged(&self, event: LifecycleEvent) -> DispatchOutcome {
        let kind = event.kind();
        let mut outcome = DispatchOutcome::default();
        for (name, listener) in self.subscriptions_for(kind) {
            match listener.handle(&event).await {
                Ok(()) => outcome.delivered += 1,
                Err(err) => {
                    let failure = EventError::Subscriber {
                        subscriber: name,
                        kind,
                        message: format!("{err:#}"),
                    };
                    warn!(%kind, error = %failure, "event subscriber failed; continuing");
                    outcome.failures.push(failure);
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::Mutex;

    use run_trace::Runner;

    fn suite_event() -> LifecycleEvent {
        LifecycleEvent::BeforeSuite(SuiteEvent {
            suite_name: "smoke".into(),
            suite_id: "SUITE-1".into(),
            runner: RunnerHandle::new(Runner::new("smoke", "SUITE-1")),
        })
    }

    fn recording_listener(log: Arc<Mutex<Vec<String>>>, tag: &str) -> Arc<dyn EventListener> {
        let tag = tag.to_string();
        listener_fn(move |_event| {
            let log = Arc::clone(&log);
            let tag = tag.clone();
            Box::pin(async move {
                log.lock().unwrap().push(tag);
                Ok(())
            })
        })
    }

    fn failing_listener(message: &'static str) -> Arc<dyn EventListener> {
        listener_fn(move |_event| Box::pin(async move { Err(anyhow!(message)) }))
    }

    #[tokio::test]
    async fn delivery_follows_subscription_order() {
        let bus = LifecycleBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(
            EventKind::BeforeSuite,
            "first",
            recording_listener(Arc::clone(&log), "first"),
        );
        bus.subscribe(
            EventKind::BeforeSuite,
            "second",
            recording_listener(Arc::clone(&log), "second"),
        );

        bus.publish(suite_event()).await.unwrap();
        assert_eq!(*log.lock().unwrap(), ["first", "second"]);
    }

    #[tokio::test]
    async fn events_only_reach_their_kind() {
        let bus = LifecycleBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(
            EventKind::AfterSuite,
            "after-only",
            recording_listener(Arc::clone(&log), "after"),
        );

        bus.publish(suite_event()).await.unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn strict_publish_stops_at_first_failure() {
        let bus = LifecycleBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(EventKind::BeforeSuite, "boom", failing_listener("boom"));
        bus.subscribe(
            EventKind::BeforeSuite,
            "never",
            recording_listener(Arc::clone(&log), "never"),
        );

        let err = bus.publish(suite_event()).await.unwrap_err();
        let EventError::Subscriber {
            subscriber, kind, ..
        } = err;
        assert_eq!(subscriber, "boom");
        assert_eq!(kind, EventKind::BeforeSuite);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn lenient_publish_runs_everyone_and_records_failures() {
        let bus = LifecycleBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(EventKind::BeforeSuite, "boom", failing_listener("boom"));
        bus.subscribe(
            EventKind::BeforeSuite,
            "still-runs",
            recording_listener(Arc::clone(&log), "still-runs"),
        );

        let outcome = bus.publish_logged(suite_event()).await;
        assert_eq!(outcome.delivered, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert!(!outcome.is_clean());
        assert_eq!(*log.lock().unwrap(), ["still-runs"]);
    }
}
