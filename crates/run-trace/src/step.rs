//! Trace record of one keyword invocation.

use std::collections::BTreeMap;

use serde::Serialize;

use keyward_core_types::{pretty_duration, TestStatus};

use crate::{now_millis, ZERO_DURATION};

/// Execution record of one keyword invocation. A fresh step is created for
/// every call and appended to the owning test case in invocation order.
#[derive(Debug, Clone, Serialize)]
pub struct TestStep {
    name: String,
    args: BTreeMap<String, String>,
    start: i64,
    end: i64,
    duration: String,
    status: TestStatus,
}

impl TestStep {
    pub fn new(name: impl Into<String>) -> Self {
        TestStep {
            name: name.into(),
            args: BTreeMap::new(),
            start: 0,
            end: 0,
            duration: ZERO_DURATION.to_string(),
            status: TestStatus::Skipped,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &BTreeMap<String, String> {
        &self.args
    }

    /// Records a human-readable description of one keyword parameter.
    pub fn set_arg(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.args.insert(key.into(), value.into());
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
    fn fresh_step_is_skipped() {
        let step = TestStep::new("click");
        assert_eq!(step.status(), TestStatus::Skipped);
        assert_eq!(step.duration(), "0 second");
        assert!(step.args().is_empty());
    }

    #[test]
    fn args_describe_parameters() {
        let mut step = TestStep::new("go_to");
        step.set_arg("target", "https://example.test [url]");
        assert_eq!(
            step.args().get("target").map(String::as_str),
            Some("https://example.test [url]")
        );
    }

    #[test]
    fn end_never_precedes_start() {
        let mut step = TestStep::new("click");
        step.start_now();
        step.end_now();
        step.generate_duration();
        assert!(step.end() >= step.start());
    }

    #[test]
    fn duration_tracks_window_size() {
        let mut a = TestStep::new("one");
        a.start = 1_000;
        a.end = 2_500;
        a.generate_duration();
        assert_eq!(a.duration(), "1.5 second(s)");

        let mut b = TestStep::new("two");
        b.start = 1_000;
        b.end = 4_000;
        b.generate_duration();
        assert_eq!(b.duration(), "3 second(s)");
    }
}
