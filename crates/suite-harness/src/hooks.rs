//! Wrapping listeners that bind user hook bodies to the event bus and the
//! matching hook trace records.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use keyward_event_bus::{EventListener, LifecycleEvent};
use run_trace::{Hook, RunnerHandle};
use wd_adapter::Driver;

use crate::context::{HookBody, HookContext, HookScope};

/// One registered lifecycle hook: on its event, locates the matching [`Hook`]
/// record (on the runner for suite scope, on the current test case for case
/// scope), times the user body, records pass/fail, and re-raises body
/// failures to the publisher. Whether that failure aborts anything is the
/// publisher's decision, not the wrapper's.
pub(crate) struct HookWrapper {
    pub(crate) scope: HookScope,
    pub(crate) name: String,
    pub(crate) body: HookBody,
    pub(crate) suite_name: String,
    pub(crate) suite_id: String,
    pub(crate) runner: RunnerHandle,
    pub(crate) driver: Arc<Driver>,
}

impl HookWrapper {
    fn with_hook(&self, f: impl FnOnce(&mut Hook)) {
        let name = self.name.as_str();
        let scope = self.scope;
        self.runner.with(|runner| {
            let record = match scope {
                HookScope::BeforeSuite => runner.before_hook_mut(name),
                HookScope::AfterSuite => runner.after_hook_mut(name),
                HookScope::BeforeCase => runner
                    .current_case_mut()
                    .and_then(|case| case.before_hook_mut(name)),
                HookScope::AfterCase => runner
                    .current_case_mut()
                    .and_then(|case| case.after_hook_mut(name)),
            };
            match record {
                Some(hook) => f(hook),
                None => warn!(hook = name, ?scope, "no matching hook record"),
            }
        });
    }
}

#[async_trait]
impl EventListener for HookWrapper {
    async fn handle(&self, _event: &LifecycleEvent) -> anyhow::Result<()> {
        self.with_hook(Hook::start_now);
        info!(
            "============ START HOOK: {} [{:?}] ============",
            self.name, self.scope
        );

        let context = HookContext {
            suite_name: self.suite_name.clone(),
            suite_id: self.suite_id.clone(),
            runner: self.runner.clone(),
            driver: Arc::clone(&self.driver),
        };
        let result = (self.body)(context).await;

        match &result {
            Ok(()) => {
                self.with_hook(|hook| {
                    hook.end_now();
                    hook.generate_duration();
                    hook.mark_passed();
                });
                info!(
                    "============ END HOOK: {} [{:?}] ============",
                    self.name, self.scope
                );
            }
            Err(err) => {
                self.with_hook(|hook| {
                    hook.end_now();
                    hook.generate_duration();
                    hook.mark_failed();
                });
                warn!(hook = %self.name, error = %format!("{err:#}"), "hook body failed");
            }
        }
        result
    }
}
