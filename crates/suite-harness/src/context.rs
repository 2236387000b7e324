//! Contexts threaded into user-authored case and hook bodies.

use std::sync::Arc;

use futures::future::BoxFuture;

use keyward_event_bus::EventKind;
use keyword_actions::{Assert, Keyword};
use run_trace::RunnerHandle;
use wd_adapter::Driver;

/// Handed to every test case body.
#[derive(Clone)]
pub struct CaseContext {
    pub keyword: Arc<Keyword>,
    pub assert: Arc<Assert>,
}

/// Handed to every lifecycle hook body. Hooks typically manage the
/// automation session through `driver` and may inspect the trace so far.
#[derive(Clone)]
pub struct HookContext {
    pub suite_name: String,
    pub suite_id: String,
    pub runner: RunnerHandle,
    pub driver: Arc<Driver>,
}

pub type CaseBody =
    Arc<dyn Fn(CaseContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

pub type HookBody =
    Arc<dyn Fn(HookContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Scope of a registered lifecycle hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookScope {
    BeforeSuite,
    AfterSuite,
    BeforeCase,
    AfterCase,
}

impl HookScope {
    pub(crate) fn event_kind(self) -> EventKind {
        match self {
            HookScope::BeforeSuite => EventKind::BeforeSuite,
            HookScope::AfterSuite => EventKind::AfterSuite,
            HookScope::BeforeCase => EventKind::BeforeCase,
            HookScope::AfterCase => EventKind::AfterCase,
        }
    }
}
