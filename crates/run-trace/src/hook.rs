//! Trace record of one before/after lifecycle hook.

use serde::Serialize;

use keyward_core_types::{pretty_duration, TestStatus};

use crate::{now_millis, ZERO_DURATION};

/// Execution record of one declared lifecycle hook, tracked like a test step.
/// Created at registration time, mutated by the hook wrapper that runs it.
#[derive(Debug, Clone, Serialize)]
pub struct Hook {
    name: String,
    start: i64,
    end: i64,
    duration: String,
    status: TestStatus,
}

impl Hook {
    pub fn new(name: impl Into<String>) -> Self {
        Hook {
            name: name.into(),
            start: 0,
            end: 0,
            duration: ZERO_DURATION.to_string(),
            status: TestStatus::Skipped,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
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
    fn starts_skipped_with_zero_duration() {
        let hook = Hook::new("login");
        assert_eq!(hook.status(), TestStatus::Skipped);
        assert_eq!(hook.duration(), "0 second");
        assert_eq!(hook.start(), 0);
    }

    #[test]
    fn records_timing_window() {
        let mut hook = Hook::new("login");
        hook.start_now();
        hook.end_now();
        hook.generate_duration();
        assert!(hook.end() >= hook.start());
        assert!(hook.duration().ends_with("second(s)"));
    }

    #[test]
    fn terminal_states() {
        let mut hook = Hook::new("login");
        hook.mark_failed();
        assert_eq!(hook.status(), TestStatus::Failed);

        let mut hook = Hook::new("login");
        hook.mark_passed();
        assert_eq!(hook.status(), TestStatus::Success);
    }
}
