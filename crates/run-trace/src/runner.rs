//! Trace record of one suite run.

use serde::Serialize;

use keyward_core_types::{pretty_duration, Element, TestStatus};

use crate::{now_millis, ZERO_DURATION};
use crate::{Hook, TestCase};

/// Execution-time owner of one suite instance: all of its test cases, its
/// suite-level hooks, the cursor routing step/hook updates to the currently
/// executing case, and the self-healing audit log.
#[derive(Debug, Clone, Serialize)]
pub struct Runner {
    name: String,
    id: String,
    start: i64,
    end: i64,
    duration: String,
    status: TestStatus,
    test_cases: Vec<TestCase>,
    before_hooks: Vec<Hook>,
    after_hooks: Vec<Hook>,
    current_test_case_index: usize,
    self_healing_elements: Vec<Element>,
}

impl Runner {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Runner {
            name: name.into(),
            id: id.into(),
            start: 0,
            end: 0,
            duration: ZERO_DURATION.to_string(),
            status: TestStatus::Skipped,
            test_cases: Vec::new(),
            before_hooks: Vec::new(),
            after_hooks: Vec::new(),
            current_test_case_index: 0,
            self_healing_elements: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
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

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    pub fn test_cases_mut(&mut self) -> &mut [TestCase] {
        &mut self.test_cases
    }

    pub fn add_case(&mut self, case: TestCase) {
        tracing::info!(case = case.name(), id = case.id(), runner = %self.name, "registered test case");
        self.test_cases.push(case);
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

    pub fn current_test_case_index(&self) -> usize {
        self.current_test_case_index
    }

    /// Moves the case cursor. The cursor routes every step/hook mutation to
    /// the currently executing case; it only ever moves forward.
    pub fn set_current_test_case_index(&mut self, index: usize) {
        debug_assert!(
            index >= self.current_test_case_index,
            "case cursor cannot move backwards"
        );
        self.current_test_case_index = index;
    }

    pub fn current_case(&self) -> Option<&TestCase> {
        self.test_cases.get(self.current_test_case_index)
    }

    pub fn current_case_mut(&mut self) -> Option<&mut TestCase> {
        self.test_cases.get_mut(self.current_test_case_index)
    }

    /// Appends a finished step record to the currently executing case.
    pub fn push_step(&mut self, step: crate::TestStep) {
        match self.current_case_mut() {
            Some(case) => case.push_step(step),
            None => tracing::warn!("dropping step recorded outside any test case"),
        }
    }

    pub fn self_healing_elements(&self) -> &[Element] {
        &self.self_healing_elements
    }

    /// Appends to the audit log of elements that resolved through a fallback.
    pub fn record_self_healing(&mut self, element: &Element) {
        self.self_healing_elements.push(element.clone());
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
