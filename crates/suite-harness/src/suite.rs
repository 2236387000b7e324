//! The execution run loop.

use std::sync::Arc;

use tracing::{error, info, warn};

use keyward_core_types::TestStatus;
use keyward_event_bus::{CaseEvent, LifecycleBus, LifecycleEvent, SuiteEvent};
use keyword_actions::{Assert, Keyword};
use run_trace::{Runner, RunnerHandle};
use wd_adapter::Driver;

use crate::context::{CaseBody, CaseContext};

pub(crate) struct ExecutableCase {
    pub(crate) name: String,
    pub(crate) id: String,
    pub(crate) enabled: bool,
    pub(crate) body: CaseBody,
}

/// One built suite, ready to run.
///
/// Cases execute strictly in declaration order on a single logical thread;
/// the case cursor on the runner is advanced exactly once per case, before
/// that case's first step can be recorded.
pub struct TestSuite {
    name: String,
    id: String,
    driver: Arc<Driver>,
    bus: Arc<LifecycleBus>,
    runner: RunnerHandle,
    keyword: Arc<Keyword>,
    assert: Arc<Assert>,
    cases: Vec<ExecutableCase>,
}

impl TestSuite {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        id: String,
        driver: Arc<Driver>,
        bus: Arc<LifecycleBus>,
        runner: RunnerHandle,
        keyword: Arc<Keyword>,
        assert: Arc<Assert>,
        cases: Vec<ExecutableCase>,
    ) -> Self {
        TestSuite {
            name,
            id,
            driver,
            bus,
            runner,
            keyword,
            assert,
            cases,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn driver(&self) -> Arc<Driver> {
        Arc::clone(&self.driver)
    }

    pub fn runner(&self) -> &RunnerHandle {
        &self.runner
    }

    /// The bus, for subscribing extra listeners before `run()`.
    pub fn bus(&self) -> &Arc<LifecycleBus> {
        &self.bus
    }

    pub fn keyword(&self) -> Arc<Keyword> {
        Arc::clone(&self.keyword)
    }

    pub fn assert(&self) -> Arc<Assert> {
        Arc::clone(&self.assert)
    }

    fn suite_event(&self) -> SuiteEvent {
        SuiteEvent {
            suite_name: self.name.clone(),
            suite_id: self.id.clone(),
            runner: self.runner.clone(),
        }
    }

    fn case_event(&self, case: &ExecutableCase) -> CaseEvent {
        CaseEvent {
            suite_name: self.name.clone(),
            suite_id: self.id.clone(),
            case_name: case.name.clone(),
            case_id: case.id.clone(),
            runner: self.runner.clone(),
        }
    }

    /// Executes every enabled case in declaration order and returns the
    /// finished runner snapshot for report generation.
    ///
    /// Suite-boundary events are dispatched leniently (a failing before/after
    /// suite hook is recorded and logged, the run continues); case-boundary
    /// events are strict (a failing before-case hook fails the case and skips
    /// its body, a failing after-case hook fails the case).
    pub async fn run(&self) -> Runner {
        info!(
            "============================== START SUITE: {} ==============================",
            self.name
        );
        self.runner.with(Runner::start_now);
        self.bus
            .publish_logged(LifecycleEvent::BeforeSuite(self.suite_event()))
            .await;

        for (index, case) in self.cases.iter().enumerate() {
            self.runner.set_current_test_case_index(index);
            if !case.enabled {
                info!(case = %case.name, "test case disabled; skipping");
                continue;
            }
            self.execute_case(case).await;
        }

        self.bus
            .publish_logged(LifecycleEvent::AfterSuite(self.suite_event()))
            .await;

        self.runner.with(|runner| {
            let any_failed = runner
                .test_cases()
                .iter()
                .any(|case| case.status() == TestStatus::Failed);
            if any_failed {
                runner.mark_failed();
            } else {
                runner.mark_passed();
            }
            runner.end_now();
            runner.generate_duration();
        });
        info!(
            "============================== END SUITE: {} ==============================",
            self.name
        );
        self.runner.snapshot()
    }

    async fn execute_case(&self, case: &ExecutableCase) {
        info!(
            "============================== START TEST: {} ==============================",
            case.name
        );
        self.runner.with(|runner| {
            if let Some(record) = runner.current_case_mut() {
                record.start_now();
            }
        });

        let mut failure: Option<String> = None;

        match self
            .bus
            .publish(LifecycleEvent::BeforeCase(self.case_event(case)))
            .await
        {
            Ok(()) => {
                let context = CaseContext {
                    keyword: Arc::clone(&self.keyword),
                    assert: Arc::clone(&self.assert),
                };
                if let Err(err) = (case.body)(context).await {
                    error!(case = %case.name, error = %format!("{err:#}"), "test case failed");
                    failure = Some(format!("{err:#}"));
                }
            }
            Err(err) => {
                warn!(case = %case.name, error = %err, "before-case hook failed; skipping case body");
                failure = Some(err.to_string());
            }
        }

        if let Err(err) = self
            .bus
            .publish(LifecycleEvent::AfterCase(self.case_event(case)))
            .await
        {
            warn!(case = %case.name, error = %err, "after-case hook failed");
            failure.get_or_insert_with(|| err.to_string());
        }

        self.runner.with(|runner| {
            if let Some(record) = runner.current_case_mut() {
                match &failure {
                    Some(message) => {
                        record.set_exception(message.clone());
                        record.mark_failed();
                    }
                    None => record.mark_passed(),
                }
                record.end_now();
                record.generate_duration();
            }
        });
        info!(
            "============================== END TEST: {} ==============================",
            case.name
        );
    }
}
