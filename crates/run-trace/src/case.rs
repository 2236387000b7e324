//! Trace record of one declared test case.

use serde::Serialize;

use keyward_core_types::{pretty_duration, TestStatus};

use crate::{now_millis, ZERO_DURATION};
use crate::{Hook, TestStep};

/// Execution record of one declared test case: its per-case hooks, its steps
/// in invocation order, and its overall status. The executable body is held
/// by the suite registration, not by this record.
#[derive(Debug, Clone, Serialize)]
pub struct TestCase {
    name: String,
    id: String,
    enabled: bool,
    start: i64,
    end: i64,
    duration: String,
    status: TestStatus,
    exception: Option<String>,
    screenshot: Option<String>,
    before_hooks: Vec<Hook>,
    after_hooks: Vec<Hook>,
    test_steps: Vec<TestStep>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, id: impl Into<String>, enabled: bool) -> Self {
        TestCase {
            name: name.into(),
            id: id.into(),
            enabled,
            start: 0,
            end: 0,
            duration: ZERO_DURATION.to_string(),
            status: TestStatus::Skipped,
            exception: None,
            screenshot: None,
            before_hooks: Vec::new(),
            after_hooks: Vec::new(),
            test_steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn exception(&self) -> Option<&str> {
        self.exception.as_deref()
    }

    pub fn set_exception(&mut self, exception: impl Into<String>) {
        self.exception = Some(exception.into());
    }

    /// Path of a failure screenshot captured by a reporting listener.
    pub fn screenshot(&self) -> Option<&str> {
        self.screenshot.as_deref()
    }

    pub fn set_screenshot(&mut self, path: impl Into<String>) {
        self.screenshot = Some(path.into());
    }

    pub fn before_hooks(&self) -> &[Hook] {
        &self.before_hooks
    }

    pub fn after_hooks(&self) -> &[Hook] {
        &self.after_hooks
    }

    pub fn add_before_hook(&mut self, hook: Hook) {
        self.before_hooks.push(hook);
    }

    pub fn add_after_hook(&mut self, hook: Hook) {
        self.after_hooks.push(hook);
    }

    pub fn before_hook_mut(&mut self, name: &str) -> Option<&mut Hook> {
        self.before_hooks.iter_mut().find(|hook| hook.name() == name)
    }

    pub fn after_hook_mut(&mut self, name: &str) -> Option<&mut Hook> {
        self.after_hooks.iter_mut().find(|hook| hook.name() == name)
    }

    pub fn test_steps(&self) -> &[TestStep] {
        &self.test_steps
    }

    /// Appends a finished step record; steps are never reordered or removed.
    pub fn push_step(&mut self, step: TestStep) {
        self.test_steps.push(step);
    }

    pub fn start_now(&mut self) {
        self.start = now_millis();
    }

    pub fn end_now(&mut self) {
        self.end = now_millis();
    }

    pub fn generate_duration(&mut self) {
        self.duration = pretty_duration(self.end - self.start);
    }

    pub fn mark_passed(&mut self) {
        self.status = TestStatus::Success;
    }

    pub fn mark_failed(&mut self) {
        self.status = TestStatus::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_preserve_invocation_order() {
        let mut case = TestCase::new("login works", "TC-1", true);
        case.push_step(TestStep::new("go_to"));
        case.push_step(TestStep::new("click"));
        case.push_step(TestStep::new("verify_element_visible"));

        let names: Vec<&str> = case.test_steps().iter().map(TestStep::name).collect();
        assert_eq!(names, ["go_to", "click", "verify_element_visible"]);
    }

    #[test]
    fn hooks_are_looked_up_by_name() {
        let mut case = TestCase::new("login works", "TC-1", true);
        case.add_before_hook(Hook::new("open_session"));
        case.add_before_hook(Hook::new("seed_data"));

        assert!(case.before_hook_mut("seed_data").is_some());
        assert!(case.before_hook_mut("missing").is_none());
    }

    #[test]
    fn disabled_case_stays_skipped() {
        let case = TestCase::new("flaky", "TC-9", false);
        assert!(!case.enabled());
        assert_eq!(case.status(), TestStatus::Skipped);
    }
}
