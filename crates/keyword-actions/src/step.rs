//! Step bookkeeping shared by every keyword.

use std::sync::Arc;

use element_locator::Resolution;
use keyward_event_bus::{LifecycleBus, LifecycleEvent, StepEvent};
use run_trace::{RunnerHandle, TestStep};

/// Wraps one keyword invocation: creates the step record, emits BEFORE_STEP
/// on open and AFTER_STEP on finish (both lenient — subscriber failures are
/// logged and swallowed), and appends the finished record to the currently
/// executing test case.
pub(crate) struct StepRecorder {
    step: TestStep,
    runner: RunnerHandle,
    bus: Arc<LifecycleBus>,
}

impl StepRecorder {
    pub(crate) async fn open(name: &str, runner: &RunnerHandle, bus: &Arc<LifecycleBus>) -> Self {
        let step = TestStep::new(name);
        bus.publish_logged(LifecycleEvent::BeforeStep(StepEvent { step: step.clone() }))
            .await;
        StepRecorder {
            step,
            runner: runner.clone(),
            bus: Arc::clone(bus),
        }
    }

    pub(crate) fn arg(&mut self, key: &str, value: impl Into<String>) {
        self.step.set_arg(key, value);
    }

    pub(crate) fn start(&mut self) {
        self.step.start_now();
    }

    pub(crate) async fn pass(self) {
        self.finish(true).await;
    }

    pub(crate) async fn fail(self) {
        self.finish(false).await;
    }

    async fn finish(mut self, passed: bool) {
        if passed {
            self.step.mark_passed();
        } else {
            self.step.mark_failed();
        }
        self.step.end_now();
        self.step.generate_duration();
        self.runner.push_step(self.step.clone());
        self.bus
            .publish_logged(LifecycleEvent::AfterStep(StepEvent { step: self.step }))
            .await;
    }
}

/// Step-arg description of a resolved element, flagging self-healed lookups.
pub(crate) fn describe_resolution(resolution: &Resolution) -> String {
    if resolution.used_fallback {
        format!("{} (self-healing)", resolution.selector)
    } else {
        resolution.selector.to_string()
    }
}
