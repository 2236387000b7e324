//! The keyword action layer.

use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tracing::{error, info, warn};

use element_locator::{ElementResolver, ResolvePolicy};
use keyward_config::Config;
use keyward_core_types::Element;
use keyward_event_bus::LifecycleBus;
use run_trace::RunnerHandle;
use wd_adapter::{Driver, DriverError, WebDriverSession};

use crate::errors::KeywordError;
use crate::platform::PlatformSupport;
use crate::step::{describe_resolution, StepRecorder};
use crate::target::NavTarget;

/// Expected text of an element: exact equality or a regex.
#[derive(Debug, Clone)]
pub enum TextMatch {
    Exact(String),
    Pattern(Regex),
}

impl TextMatch {
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => actual == expected,
            TextMatch::Pattern(pattern) => pattern.is_match(actual),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            TextMatch::Exact(expected) => expected.clone(),
            TextMatch::Pattern(pattern) => format!("{pattern} [regex]"),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(expected: &str) -> Self {
        TextMatch::Exact(expected.to_string())
    }
}

impl From<String> for TextMatch {
    fn from(expected: String) -> Self {
        TextMatch::Exact(expected)
    }
}

impl From<Regex> for TextMatch {
    fn from(pattern: Regex) -> Self {
        TextMatch::Pattern(pattern)
    }
}

/// User-facing element interaction keywords.
///
/// Every keyword records a fresh [`run_trace::TestStep`] on the currently
/// executing test case and emits BEFORE_STEP/AFTER_STEP around its work.
/// Platform-gated keywords fail fast with
/// [`KeywordError::PlatformUnsupported`] before any bookkeeping, then with
/// [`KeywordError::SessionNotInitialized`] when no session is open.
pub struct Keyword {
    driver: Arc<Driver>,
    config: Arc<Config>,
    runner: RunnerHandle,
    bus: Arc<LifecycleBus>,
}

impl Keyword {
    pub fn new(
        driver: Arc<Driver>,
        config: Arc<Config>,
        runner: RunnerHandle,
        bus: Arc<LifecycleBus>,
    ) -> Self {
        Keyword {
            driver,
            config,
            runner,
            bus,
        }
    }

    fn ensure_platform(
        &self,
        keyword: &'static str,
        support: PlatformSupport,
    ) -> Result<(), KeywordError> {
        let platform = self.config.platform;
        if support.allows(platform) {
            Ok(())
        } else {
            error!(keyword, %platform, "keyword cannot run on this platform");
            Err(KeywordError::PlatformUnsupported { keyword, platform })
        }
    }

    fn session(&self) -> Result<Arc<dyn WebDriverSession>, KeywordError> {
        self.driver
            .session()
            .ok_or(KeywordError::SessionNotInitialized)
    }

    fn resolver(&self, session: &Arc<dyn WebDriverSession>) -> ElementResolver {
        ElementResolver::new(
            Arc::clone(session),
            ResolvePolicy::from(self.config.as_ref()),
            self.runner.clone(),
        )
    }

    /// Navigates to a URL or a page object's URL.
    ///
    /// Fails with [`KeywordError::InvalidArgument`] before any navigation
    /// call when the URL is empty; the produced step is still recorded.
    pub async fn go_to(&self, target: impl Into<NavTarget>) -> Result<(), KeywordError> {
        self.ensure_platform("go_to", PlatformSupport::WEB)?;
        let session = self.session()?;
        let target = target.into();

        let mut step = StepRecorder::open("go_to", &self.runner, &self.bus).await;
        let url = target.url();
        step.arg("target", target.describe());
        step.start();

        if url.is_empty() {
            error!("FAILED - url is empty");
            step.fail().await;
            return Err(KeywordError::InvalidArgument {
                name: "url".to_string(),
                expected: "non-empty string".to_string(),
                given: "\"\" (empty string)".to_string(),
            });
        }

        info!(%url, "navigating...");
        if let Err(err) = session.navigate_to(&url).await {
            error!(error = %err, "FAILED - navigation error");
            step.fail().await;
            return Err(err.into());
        }
        let current = match session.current_url().await {
            Ok(current) => current,
            Err(err) => {
                step.fail().await;
                return Err(err.into());
            }
        };
        info!(current_url = %current, "SUCCESS - navigation completed");
        step.pass().await;
        Ok(())
    }

    /// Navigates one step back in history.
    pub async fn back(&self) -> Result<(), KeywordError> {
        self.ensure_platform("back", PlatformSupport::WEB)?;
        let session = self.session()?;

        let mut step = StepRecorder::open("back", &self.runner, &self.bus).await;
        step.start();

        if let Err(err) = session.back().await {
            error!(error = %err, "FAILED - back navigation");
            step.fail().await;
            return Err(err.into());
        }
        info!("SUCCESS - back navigation");
        step.pass().await;
        Ok(())
    }

    /// Clicks the element; the element must be resolvable and clickable.
    pub async fn click(&self, element: &Element) -> Result<(), KeywordError> {
        self.ensure_platform("click", PlatformSupport::WEB)?;
        let session = self.session()?;

        let mut step = StepRecorder::open("click", &self.runner, &self.bus).await;
        info!(selector = %element.default_selector(), "clicking element...");
        step.arg("element", element.default_selector().to_string());
        step.start();

        let resolution = match self.resolver(&session).resolve(element, None).await {
            Ok(resolution) => resolution,
            Err(err) => {
                error!(error = %err, "FAILED - element not found");
                step.fail().await;
                return Err(err.into());
            }
        };
        step.arg("element", describe_resolution(&resolution));

        match resolution.handle.click().await {
            Ok(()) => {
                info!("SUCCESS - element has been clicked");
                step.pass().await;
                Ok(())
            }
            Err(err) => {
                error!(
                    error = %err,
                    "FAILED - element is either not visible or positioned behind another element"
                );
                step.fail().await;
                Err(KeywordError::ClickIntercepted {
                    selector: resolution.selector.to_string(),
                })
            }
        }
    }

    /// Verifies the element is visible inside the viewport.
    pub async fn verify_element_visible(&self, element: &Element) -> Result<(), KeywordError> {
        self.ensure_platform("verify_element_visible", PlatformSupport::WEB)?;
        let session = self.session()?;

        let mut step =
            StepRecorder::open("verify_element_visible", &self.runner, &self.bus).await;
        info!(selector = %element.default_selector(), "verifying element is visible...");
        step.arg("element", element.default_selector().to_string());
        step.start();

        let resolution = match self.resolver(&session).resolve(element, None).await {
            Ok(resolution) => resolution,
            Err(err) => {
                error!(error = %err, "FAILED - element is not visible");
                step.fail().await;
                return Err(err.into());
            }
        };
        step.arg("element", describe_resolution(&resolution));

        match resolution.handle.is_displayed_in_viewport().await {
            Ok(true) => {
                info!("SUCCESS - element is visible");
                step.pass().await;
                Ok(())
            }
            Ok(false) => {
                error!("FAILED - element is not visible");
                step.fail().await;
                Err(KeywordError::ElementNotVisible {
                    selector: element.default_selector().to_string(),
                })
            }
            Err(err) => {
                step.fail().await;
                Err(err.into())
            }
        }
    }

    /// Verifies the element is NOT visible inside the viewport. The check
    /// queries the default selector directly, without self-healing; an
    /// element that cannot be found counts as not visible.
    pub async fn verify_element_not_visible(&self, element: &Element) -> Result<(), KeywordError> {
        self.ensure_platform("verify_element_not_visible", PlatformSupport::WEB)?;
        let session = self.session()?;

        let mut step =
            StepRecorder::open("verify_element_not_visible", &self.runner, &self.bus).await;
        info!(selector = %element.default_selector(), "verifying element is not visible...");
        step.arg("element", element.default_selector().to_string());
        step.start();

        let displayed = match self.query_displayed(&session, element).await {
            Ok(displayed) => displayed,
            Err(err) => {
                step.fail().await;
                return Err(err);
            }
        };

        if displayed {
            error!("FAILED - element is visible");
            step.fail().await;
            return Err(KeywordError::ElementVisible {
                selector: element.default_selector().to_string(),
            });
        }

        info!("SUCCESS - element is not visible");
        step.pass().await;
        Ok(())
    }

    /// Waits until the element is visible in the viewport. Returns `false`
    /// when it never became visible within the budget; a timeout is a valid
    /// outcome for this keyword, not an error.
    pub async fn wait_for_element_visible(
        &self,
        element: &Element,
        timeout_secs: Option<u64>,
    ) -> Result<bool, KeywordError> {
        self.ensure_platform("wait_for_element_visible", PlatformSupport::WEB)?;
        let session = self.session()?;

        let mut step =
            StepRecorder::open("wait_for_element_visible", &self.runner, &self.bus).await;
        info!(selector = %element.default_selector(), "waiting for element to be visible...");
        step.arg("element", element.default_selector().to_string());
        step.arg("timeout", describe_timeout(timeout_secs));
        step.start();

        let timeout = timeout_secs.map(Duration::from_secs);
        match self.resolver(&session).resolve(element, timeout).await {
            Ok(resolution) => {
                step.arg("element", describe_resolution(&resolution));
                match resolution.handle.is_displayed_in_viewport().await {
                    Ok(true) => {
                        info!("SUCCESS - element became visible within budget");
                        step.pass().await;
                        Ok(true)
                    }
                    _ => {
                        error!("FAILED - element did not become visible within budget");
                        step.fail().await;
                        Ok(false)
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "FAILED - element did not become visible within budget");
                step.fail().await;
                Ok(false)
            }
        }
    }

    /// Waits until the element is no longer visible. Returns `false` when it
    /// stayed visible for the whole budget. Uses the default selector
    /// directly, without self-healing.
    pub async fn wait_for_element_not_visible(
        &self,
        element: &Element,
        timeout_secs: Option<u64>,
    ) -> Result<bool, KeywordError> {
        self.ensure_platform("wait_for_element_not_visible", PlatformSupport::WEB)?;
        let session = self.session()?;

        let mut step =
            StepRecorder::open("wait_for_element_not_visible", &self.runner, &self.bus).await;
        info!(selector = %element.default_selector(), "waiting for element to be not visible...");
        step.arg("element", element.default_selector().to_string());
        step.arg("timeout", describe_timeout(timeout_secs));
        step.start();

        let timeout = timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.config.wait_for_timeout());

        let handle = match session
            .find_element(&element.default_selector().to_native())
            .await
        {
            Ok(handle) => handle,
            Err(err) => {
                warn!(error = %err, "element lookup failed");
                step.fail().await;
                return Ok(false);
            }
        };

        match handle
            .wait_for_displayed(timeout, self.config.wait_for_interval(), true)
            .await
        {
            Ok(true) => {
                info!("SUCCESS - element is not visible within budget");
                step.pass().await;
                Ok(true)
            }
            Ok(false) => {
                error!("FAILED - element stayed visible for the whole budget");
                step.fail().await;
                Ok(false)
            }
            Err(err) => {
                warn!(error = %err, "visibility wait failed");
                step.fail().await;
                Ok(false)
            }
        }
    }

    /// Halts execution for the given number of seconds. Use only for
    /// animations or backend processing without visual feedback; prefer the
    /// `wait_for_*` keywords to wait for an element.
    pub async fn delay(&self, seconds: f64) -> Result<(), KeywordError> {
        let session = self.session()?;

        let mut step = StepRecorder::open("delay", &self.runner, &self.bus).await;
        info!(seconds, "delaying execution...");
        step.arg("duration", seconds.to_string());
        step.start();

        if let Err(err) = session.pause(Duration::from_secs_f64(seconds)).await {
            step.fail().await;
            return Err(err.into());
        }
        info!(seconds, "SUCCESS - execution delayed");
        step.pass().await;
        Ok(())
    }

    /// Verifies the element's text against an exact string or a regex.
    pub async fn verify_element_text(
        &self,
        element: &Element,
        expected: impl Into<TextMatch>,
    ) -> Result<(), KeywordError> {
        self.ensure_platform("verify_element_text", PlatformSupport::WEB)?;
        let session = self.session()?;
        let expected = expected.into();

        let mut step = StepRecorder::open("verify_element_text", &self.runner, &self.bus).await;
        info!(
            selector = %element.default_selector(),
            expected = %expected.describe(),
            "verifying element text..."
        );
        step.arg("element", element.default_selector().to_string());
        step.arg("text", expected.describe());
        step.start();

        let resolution = match self.resolver(&session).resolve(element, None).await {
            Ok(resolution) => resolution,
            Err(err) => {
                step.fail().await;
                return Err(err.into());
            }
        };
        step.arg("element", describe_resolution(&resolution));

        let actual = match resolution.handle.text().await {
            Ok(actual) => actual,
            Err(err) => {
                step.fail().await;
                return Err(err.into());
            }
        };

        if expected.matches(&actual) {
            info!("SUCCESS - element text matches");
            step.pass().await;
            Ok(())
        } else {
            error!(%actual, expected = %expected.describe(), "FAILED - element text mismatch");
            step.fail().await;
            Err(KeywordError::AssertionFailed {
                assertion: "verify_element_text".to_string(),
                actual,
                expected: expected.describe(),
            })
        }
    }

    async fn query_displayed(
        &self,
        session: &Arc<dyn WebDriverSession>,
        element: &Element,
    ) -> Result<bool, KeywordError> {
        let handle = session
            .find_element(&element.default_selector().to_native())
            .await?;
        match handle.is_displayed_in_viewport().await {
            Ok(displayed) => Ok(displayed),
            Err(DriverError::NoSuchElement { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

fn describe_timeout(timeout_secs: Option<u64>) -> String {
    match timeout_secs {
        Some(secs) => secs.to_string(),
        None => "default".to_string(),
    }
}
