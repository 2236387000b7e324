//! Explicit suite registration, done once during construction.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::info;
use uuid::Uuid;

use keyward_config::Config;
use keyward_event_bus::{EventKind, EventListener, LifecycleBus};
use keyword_actions::{Assert, Keyword};
use run_trace::{Hook, Runner, RunnerHandle, TestCase};
use wd_adapter::Driver;

use crate::context::{CaseBody, CaseContext, HookBody, HookContext, HookScope};
use crate::hooks::HookWrapper;
use crate::suite::{ExecutableCase, TestSuite};

struct CaseRegistration {
    name: String,
    id: String,
    enabled: bool,
    body: CaseBody,
}

struct HookRegistration {
    scope: HookScope,
    name: String,
    body: HookBody,
}

struct StepListenerRegistration {
    kind: EventKind,
    name: String,
    listener: Arc<dyn EventListener>,
}

/// Declares one test suite: its cases, lifecycle hooks, and step listeners.
///
/// Everything is registered before execution; `build()` creates the trace
/// records (one [`Hook`] per declared hook per scope, case hooks replicated
/// onto every test case) and subscribes the hook wrappers in registration
/// order, so the records exist before any event can fire.
pub struct SuiteBuilder {
    name: String,
    id: String,
    config: Arc<Config>,
    driver: Arc<Driver>,
    cases: Vec<CaseRegistration>,
    hooks: Vec<HookRegistration>,
    step_listeners: Vec<StepListenerRegistration>,
}

impl SuiteBuilder {
    pub fn new(name: impl Into<String>, config: Arc<Config>, driver: Arc<Driver>) -> Self {
        SuiteBuilder {
            name: name.into(),
            id: Uuid::new_v4().to_string(),
            config,
            driver,
            cases: Vec::new(),
            hooks: Vec::new(),
            step_listeners: Vec::new(),
        }
    }

    /// Overrides the generated suite id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn case<F, Fut>(self, name: impl Into<String>, id: impl Into<String>, body: F) -> Self
    where
        F: Fn(CaseContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.register_case(name.into(), id.into(), true, boxed_case(body))
    }

    /// Registers a case that stays `SKIPPED`: its record appears in the trace
    /// but the body never runs.
    pub fn disabled_case<F, Fut>(
        self,
        name: impl Into<String>,
        id: impl Into<String>,
        body: F,
    ) -> Self
    where
        F: Fn(CaseContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.register_case(name.into(), id.into(), false, boxed_case(body))
    }

    fn register_case(mut self, name: String, id: String, enabled: bool, body: CaseBody) -> Self {
        self.cases.push(CaseRegistration {
            name,
            id,
            enabled,
            body,
        });
        self
    }

    pub fn before_suite<F, Fut>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.register_hook(HookScope::BeforeSuite, name.into(), boxed_hook(body))
    }

    pub fn after_suite<F, Fut>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.register_hook(HookScope::AfterSuite, name.into(), boxed_hook(body))
    }

    pub fn before_case<F, Fut>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.register_hook(HookScope::BeforeCase, name.into(), boxed_hook(body))
    }

    pub fn after_case<F, Fut>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.register_hook(HookScope::AfterCase, name.into(), boxed_hook(body))
    }

    fn register_hook(mut self, scope: HookScope, name: String, body: HookBody) -> Self {
        self.hooks.push(HookRegistration { scope, name, body });
        self
    }

    /// Plain step listener, no hook record: observes BEFORE_STEP payloads.
    pub fn on_before_step(
        mut self,
        name: impl Into<String>,
        listener: Arc<dyn EventListener>,
    ) -> Self {
        self.step_listeners.push(StepListenerRegistration {
            kind: EventKind::BeforeStep,
            name: name.into(),
            listener,
        });
        self
    }

    /// Plain step listener, no hook record: observes AFTER_STEP payloads.
    pub fn on_after_step(
        mut self,
        name: impl Into<String>,
        listener: Arc<dyn EventListener>,
    ) -> Self {
        self.step_listeners.push(StepListenerRegistration {
            kind: EventKind::AfterStep,
            name: name.into(),
            listener,
        });
        self
    }

    pub fn build(self) -> TestSuite {
        let mut runner = Runner::new(self.name.clone(), self.id.clone());
        info!(suite = %self.name, id = %self.id, "initialized runner");

        for registration in &self.cases {
            let mut case = TestCase::new(
                registration.name.clone(),
                registration.id.clone(),
                registration.enabled,
            );
            for hook in &self.hooks {
                match hook.scope {
                    HookScope::BeforeCase => case.add_before_hook(Hook::new(hook.name.clone())),
                    HookScope::AfterCase => case.add_after_hook(Hook::new(hook.name.clone())),
                    _ => {}
                }
            }
            runner.add_case(case);
        }
        for hook in &self.hooks {
            match hook.scope {
                HookScope::BeforeSuite => runner.add_before_hook(Hook::new(hook.name.clone())),
                HookScope::AfterSuite => runner.add_after_hook(Hook::new(hook.name.clone())),
                _ => {}
            }
        }

        let runner = RunnerHandle::new(runner);
        let bus = LifecycleBus::new();

        for hook in self.hooks {
            let wrapper = HookWrapper {
                scope: hook.scope,
                name: hook.name.clone(),
                body: hook.body,
                suite_name: self.name.clone(),
                suite_id: self.id.clone(),
                runner: runner.clone(),
                driver: Arc::clone(&self.driver),
            };
            bus.subscribe(hook.scope.event_kind(), hook.name, Arc::new(wrapper));
        }
        for listener in self.step_listeners {
            bus.subscribe(listener.kind, listener.name, listener.listener);
        }

        let keyword = Arc::new(Keyword::new(
            Arc::clone(&self.driver),
            Arc::clone(&self.config),
            runner.clone(),
            Arc::clone(&bus),
        ));
        let assert = Arc::new(Assert::new(runner.clone(), Arc::clone(&bus)));

        TestSuite::new(
            self.name,
            self.id,
            self.driver,
            bus,
            runner,
            keyword,
            assert,
            self.cases
                .into_iter()
                .map(|registration| ExecutableCase {
                    name: registration.name,
                    id: registration.id,
                    enabled: registration.enabled,
                    body: registration.body,
                })
                .collect(),
        )
    }
}

fn boxed_case<F, Fut>(f: F) -> CaseBody
where
    F: Fn(CaseContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(
        move |context: CaseContext| -> BoxFuture<'static, anyhow::Result<()>> {
            Box::pin(f(context))
        },
    )
}

fn boxed_hook<F, Fut>(f: F) -> HookBody
where
    F: Fn(HookContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(
        move |context: HookContext| -> BoxFuture<'static, anyhow::Result<()>> {
            Box::pin(f(context))
        },
    )
}
