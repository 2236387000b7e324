//! End-to-end runs against the in-memory fake backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use suite_harness::{
    listener_fn, CaseContext, Config, Driver, Element, HookContext, LifecycleEvent, Platform,
    Selector, SuiteBuilder, TestStatus,
};
use wd_adapter::fake::{FakeConnector, FakeElementSpec, FakeSession};

fn fixture() -> (FakeSession, Arc<Config>, Arc<Driver>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let session = FakeSession::new();
    let config = Arc::new(Config::new(Platform::Desktop));
    let driver = Arc::new(Driver::new(
        Arc::clone(&config),
        Arc::new(FakeConnector::with_session(session.clone())),
    ));
    (session, config, driver)
}

async fn open_session(ctx: HookContext) -> anyhow::Result<()> {
    ctx.driver.start_session().await?;
    Ok(())
}

#[tokio::test]
async fn full_suite_run_produces_a_complete_trace() {
    let (session, config, driver) = fixture();
    session.install("#login", FakeElementSpec::visible().with_text("Log in"));

    let suite = SuiteBuilder::new("login suite", config, driver)
        .with_id("SUITE-1")
        .before_suite("open_session", open_session)
        .after_suite("close_session", |ctx: HookContext| async move {
            ctx.driver.end_session().await?;
            Ok(())
        })
        .before_case("reset_state", |_ctx: HookContext| async move { Ok(()) })
        .case("clicks login", "TC-1", |ctx: CaseContext| async move {
            ctx.keyword.go_to("https://example.test").await?;
            let login = Element::new(Selector::attr_id("login"), vec![]);
            ctx.keyword.verify_element_visible(&login).await?;
            ctx.keyword.click(&login).await?;
            ctx.keyword.verify_element_text(&login, "Log in").await?;
            ctx.assert.greater_than(3.0, 2.0).await?;
            Ok(())
        })
        .build();

    let runner = suite.run().await;

    assert_eq!(runner.status(), TestStatus::Success);
    assert_eq!(runner.name(), "login suite");
    assert_eq!(runner.id(), "SUITE-1");

    let case = &runner.test_cases()[0];
    assert_eq!(case.status(), TestStatus::Success);
    assert!(case.exception().is_none());

    let step_names: Vec<&str> = case.test_steps().iter().map(|step| step.name()).collect();
    assert_eq!(
        step_names,
        [
            "go_to",
            "verify_element_visible",
            "click",
            "verify_element_text",
            "assert_greater_than"
        ]
    );
    for step in case.test_steps() {
        assert_eq!(step.status(), TestStatus::Success);
        assert!(step.end() >= step.start());
    }

    assert_eq!(case.before_hooks()[0].name(), "reset_state");
    assert_eq!(case.before_hooks()[0].status(), TestStatus::Success);
    assert_eq!(runner.before_hooks()[0].status(), TestStatus::Success);
    assert_eq!(runner.after_hooks()[0].status(), TestStatus::Success);

    assert_eq!(session.clicks("#login"), 1);
    assert!(session.is_closed());
}

#[tokio::test(start_paused = true)]
async fn failing_keyword_stops_the_case_but_not_the_suite() {
    let (session, config, driver) = fixture();

    let suite = SuiteBuilder::new("mixed", config, driver)
        .with_id("SUITE-2")
        .before_suite("open_session", open_session)
        .case("broken", "TC-1", |ctx: CaseContext| async move {
            let missing = Element::new(Selector::attr_id("missing"), vec![]);
            ctx.keyword.verify_element_visible(&missing).await?;
            // unreachable once the verification throws
            ctx.keyword.go_to("https://never.test").await?;
            Ok(())
        })
        .case("healthy", "TC-2", |ctx: CaseContext| async move {
            ctx.keyword.go_to("https://second.test").await?;
            Ok(())
        })
        .build();

    let runner = suite.run().await;

    assert_eq!(runner.status(), TestStatus::Failed);

    let broken = &runner.test_cases()[0];
    assert_eq!(broken.status(), TestStatus::Failed);
    assert!(broken.exception().is_some());
    assert_eq!(broken.test_steps().len(), 1);
    assert_eq!(broken.test_steps()[0].name(), "verify_element_visible");
    assert_eq!(broken.test_steps()[0].status(), TestStatus::Failed);

    let healthy = &runner.test_cases()[1];
    assert_eq!(healthy.status(), TestStatus::Success);
    assert_eq!(session.visited_urls(), ["https://second.test"]);
}

#[tokio::test]
async fn disabled_case_is_skipped_entirely() {
    let (session, config, driver) = fixture();
    let ran = Arc::new(AtomicBool::new(false));
    let ran_in_body = Arc::clone(&ran);

    let suite = SuiteBuilder::new("with disabled", config, driver)
        .before_suite("open_session", open_session)
        .before_case("reset_state", |_ctx: HookContext| async move { Ok(()) })
        .disabled_case("not ready", "TC-1", move |_ctx: CaseContext| {
            let ran = Arc::clone(&ran_in_body);
            async move {
                ran.store(true, Ordering::SeqCst);
                Ok(())
            }
        })
        .case("active", "TC-2", |ctx: CaseContext| async move {
            ctx.keyword.go_to("https://active.test").await?;
            Ok(())
        })
        .build();

    let runner = suite.run().await;

    assert!(!ran.load(Ordering::SeqCst));
    assert_eq!(runner.status(), TestStatus::Success);

    let skipped = &runner.test_cases()[0];
    assert_eq!(skipped.status(), TestStatus::Skipped);
    assert!(skipped.test_steps().is_empty());
    assert_eq!(skipped.before_hooks()[0].status(), TestStatus::Skipped);

    assert_eq!(session.visited_urls(), ["https://active.test"]);
}

#[tokio::test]
async fn failing_before_case_hook_fails_the_case_and_skips_the_body() {
    let (session, config, driver) = fixture();
    let after_ran = Arc::new(AtomicBool::new(false));
    let after_flag = Arc::clone(&after_ran);

    let suite = SuiteBuilder::new("hooked", config, driver)
        .before_suite("open_session", open_session)
        .before_case("broken_hook", |_ctx: HookContext| async move {
            anyhow::bail!("hook exploded")
        })
        .after_case("cleanup", move |_ctx: HookContext| {
            let after_ran = Arc::clone(&after_flag);
            async move {
                after_ran.store(true, Ordering::SeqCst);
                Ok(())
            }
        })
        .case("never runs", "TC-1", |ctx: CaseContext| async move {
            ctx.keyword.go_to("https://never.test").await?;
            Ok(())
        })
        .build();

    let runner = suite.run().await;

    let case = &runner.test_cases()[0];
    assert_eq!(case.status(), TestStatus::Failed);
    assert!(case
        .exception()
        .is_some_and(|message| message.contains("hook exploded")));
    assert!(case.test_steps().is_empty());
    assert!(session.visited_urls().is_empty());

    let hook = &case.before_hooks()[0];
    assert_eq!(hook.status(), TestStatus::Failed);
    assert!(hook.end() >= hook.start());
    assert!(hook.duration().ends_with("second(s)"));

    // after-case hooks still run for cleanup
    assert!(after_ran.load(Ordering::SeqCst));
    assert_eq!(case.after_hooks()[0].status(), TestStatus::Success);
    assert_eq!(runner.status(), TestStatus::Failed);
}

#[tokio::test]
async fn failing_after_case_hook_fails_an_otherwise_green_case() {
    let (_session, config, driver) = fixture();

    let suite = SuiteBuilder::new("after hooked", config, driver)
        .before_suite("open_session", open_session)
        .after_case("broken_cleanup", |_ctx: HookContext| async move {
            anyhow::bail!("cleanup exploded")
        })
        .case("green body", "TC-1", |ctx: CaseContext| async move {
            ctx.keyword.go_to("https://fine.test").await?;
            Ok(())
        })
        .build();

    let runner = suite.run().await;

    let case = &runner.test_cases()[0];
    assert_eq!(case.status(), TestStatus::Failed);
    assert_eq!(case.test_steps()[0].status(), TestStatus::Success);
    assert_eq!(case.after_hooks()[0].status(), TestStatus::Failed);
    assert_eq!(runner.status(), TestStatus::Failed);
}

#[tokio::test]
async fn failing_suite_hook_is_recorded_but_does_not_stop_the_run() {
    let (session, config, driver) = fixture();

    let suite = SuiteBuilder::new("resilient", config, driver)
        .before_suite("open_session", open_session)
        .before_suite("exploding_setup", |_ctx: HookContext| async move {
            anyhow::bail!("observability down")
        })
        .case("still runs", "TC-1", |ctx: CaseContext| async move {
            ctx.keyword.go_to("https://still.test").await?;
            Ok(())
        })
        .build();

    let runner = suite.run().await;

    assert_eq!(runner.status(), TestStatus::Success);
    assert_eq!(runner.before_hooks()[0].status(), TestStatus::Success);
    assert_eq!(runner.before_hooks()[1].status(), TestStatus::Failed);
    assert_eq!(session.visited_urls(), ["https://still.test"]);
}

#[tokio::test]
async fn step_listeners_observe_every_step_without_affecting_it() {
    let (_session, config, driver) = fixture();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_listener = Arc::clone(&seen);

    let suite = SuiteBuilder::new("observed", config, driver)
        .before_suite("open_session", open_session)
        .on_after_step(
            "step_collector",
            listener_fn(move |event| {
                let seen = Arc::clone(&seen_by_listener);
                Box::pin(async move {
                    if let LifecycleEvent::AfterStep(step_event) = event {
                        seen.lock()
                            .unwrap()
                            .push(step_event.step.name().to_string());
                    }
                    Ok(())
                })
            }),
        )
        .on_before_step(
            "broken_listener",
            listener_fn(|_event| Box::pin(async { Err(anyhow::anyhow!("listener bug")) })),
        )
        .case("observed case", "TC-1", |ctx: CaseContext| async move {
            ctx.keyword.go_to("https://observed.test").await?;
            ctx.assert.less_than(1.0, 2.0).await?;
            Ok(())
        })
        .build();

    let runner = suite.run().await;

    assert_eq!(runner.status(), TestStatus::Success);
    assert_eq!(*seen.lock().unwrap(), ["go_to", "assert_less_than"]);
    for step in runner.test_cases()[0].test_steps() {
        assert_eq!(step.status(), TestStatus::Success);
    }
}
