//! Suite registration and execution for Keyward.
//!
//! [`SuiteBuilder`] replaces the decorator-style registration of classic
//! keyword frameworks with explicit calls made during suite construction:
//! test cases, lifecycle hooks, and step listeners are declared up front,
//! hook trace records are created before any event can fire, and
//! [`TestSuite::run`] then walks the cases on a single logical thread,
//! emitting lifecycle events around every boundary.

mod builder;
mod context;
mod hooks;
mod suite;

pub use builder::SuiteBuilder;
pub use context::{CaseBody, CaseContext, HookBody, HookContext, HookScope};
pub use suite::TestSuite;

// The surface test authors interact with, re-exported for one-import use.
pub use keyward_config::{Config, ServerConfig};
pub use keyward_core_types::{Element, Platform, Selector, SelectorStrategy, TestStatus};
pub use keyward_event_bus::{
    listener_fn, EventKind, EventListener, LifecycleBus, LifecycleEvent, StepEvent,
};
pub use keyword_actions::{Assert, Keyword, KeywordError, NavTarget, Page, TextMatch};
pub use run_trace::{Hook, Runner, RunnerHandle, TestCase, TestStep};
pub use wd_adapter::{Driver, DriverError, SessionConnector, WebDriverSession};
