//! Numeric comparison keywords, tracked like any other step.

use std::sync::Arc;

use tracing::{error, info};

use keyward_event_bus::LifecycleBus;
use run_trace::RunnerHandle;

use crate::errors::KeywordError;
use crate::step::StepRecorder;

/// Comparison collaborator, separate from [`crate::Keyword`]: assertions need
/// the trace and the bus but never the automation session.
pub struct Assert {
    runner: RunnerHandle,
    bus: Arc<LifecycleBus>,
}

impl Assert {
    pub fn new(runner: RunnerHandle, bus: Arc<LifecycleBus>) -> Self {
        Assert { runner, bus }
    }

    pub async fn greater_than(&self, actual: f64, limit: f64) -> Result<(), KeywordError> {
        self.compare("assert_greater_than", actual, limit, ">", |a, b| a > b)
            .await
    }

    pub async fn greater_or_equal(&self, actual: f64, limit: f64) -> Result<(), KeywordError> {
        self.compare("assert_greater_or_equal", actual, limit, ">=", |a, b| {
            a >= b
        })
        .await
    }

    pub async fn less_than(&self, actual: f64, limit: f64) -> Result<(), KeywordError> {
        self.compare("assert_less_than", actual, limit, "<", |a, b| a < b)
            .await
    }

    pub async fn less_or_equal(&self, actual: f64, limit: f64) -> Result<(), KeywordError> {
        self.compare("assert_less_or_equal", actual, limit, "<=", |a, b| a <= b)
            .await
    }

    async fn compare(
        &self,
        name: &'static str,
        actual: f64,
        limit: f64,
        operator: &'static str,
        holds: fn(f64, f64) -> bool,
    ) -> Result<(), KeywordError> {
        let mut step = StepRecorder::open(name, &self.runner, &self.bus).await;
        step.arg("actual", actual.to_string());
        step.arg("limit", limit.to_string());
        step.start();

        if holds(actual, limit) {
            info!(actual, limit, operator, "SUCCESS - assertion holds");
            step.pass().await;
            Ok(())
        } else {
            error!(actual, limit, operator, "FAILED - assertion does not hold");
            step.fail().await;
            Err(KeywordError::AssertionFailed {
                assertion: name.to_string(),
                actual: actual.to_string(),
                expected: format!("{operator} {limit}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use keyward_core_types::TestStatus;
    use run_trace::{Runner, TestCase};

    fn fixture() -> (Assert, RunnerHandle) {
        let mut runner = Runner::new("smoke", "RUN-1");
        runner.add_case(TestCase::new("case", "TC-1", true));
        let runner = RunnerHandle::new(runner);
        (Assert::new(runner.clone(), LifecycleBus::new()), runner)
    }

    #[tokio::test]
    async fn holding_comparisons_pass() {
        let (assert, runner) = fixture();
        assert.greater_than(3.0, 2.0).await.unwrap();
        assert.greater_or_equal(2.0, 2.0).await.unwrap();
        assert.less_than(1.0, 2.0).await.unwrap();
        assert.less_or_equal(2.0, 2.0).await.unwrap();

        let snapshot = runner.snapshot();
        let statuses: Vec<TestStatus> = snapshot.test_cases()[0]
            .test_steps()
            .iter()
            .map(|step| step.status())
            .collect();
        assert_eq!(statuses, vec![TestStatus::Success; 4]);
    }

    #[tokio::test]
    async fn broken_comparison_fails_with_typed_error() {
        let (assert, runner) = fixture();
        let err = assert.greater_than(1.0, 2.0).await.unwrap_err();

        match err {
            KeywordError::AssertionFailed {
                assertion,
                actual,
                expected,
            } => {
                assert_eq!(assertion, "assert_greater_than");
                assert_eq!(actual, "1");
                assert_eq!(expected, "> 2");
            }
            other => panic!("unexpected error: {other}"),
        }

        let snapshot = runner.snapshot();
        let step = &snapshot.test_cases()[0].test_steps()[0];
        assert_eq!(step.status(), TestStatus::Failed);
        assert_eq!(step.args().get("actual").map(String::as_str), Some("1"));
    }
}
