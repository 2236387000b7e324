//! Deterministic in-memory automation backend for tests.
//!
//! [`FakeSession`] models one page: a map from native selector strings to
//! element specs with appearance delays measured on the tokio clock, so
//! polling behavior is exercised for real under `start_paused` tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};

use keyward_config::Config;

use crate::errors::DriverError;
use crate::ports::{ElementHandle, SessionConnector, WebDriverSession};

/// Behavior of one fake element.
#[derive(Debug, Clone)]
pub struct FakeElementSpec {
    appears_after: Option<Duration>,
    displayed: bool,
    in_viewport: bool,
    text: String,
    click_intercepted: bool,
}

impl FakeElementSpec {
    /// Present, displayed, and inside the viewport from the start.
    pub fn visible() -> Self {
        FakeElementSpec {
            appears_after: None,
            displayed: true,
            in_viewport: true,
            text: String::new(),
            click_intercepted: false,
        }
    }

    /// Present from the start but not displayed.
    pub fn hidden() -> Self {
        FakeElementSpec {
            displayed: false,
            in_viewport: false,
            ..FakeElementSpec::visible()
        }
    }

    /// Becomes present (and displayed) only after `delay` on the tokio clock.
    pub fn appearing_after(delay: Duration) -> Self {
        FakeElementSpec {
            appears_after: Some(delay),
            ..FakeElementSpec::visible()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn outside_viewport(mut self) -> Self {
        self.in_viewport = false;
        self
    }

    pub fn with_click_intercepted(mut self) -> Self {
        self.click_intercepted = true;
        self
    }
}

#[derive(Default)]
struct FakeState {
    elements: HashMap<String, FakeElementSpec>,
    url: String,
    history: Vec<String>,
    find_attempts: Vec<String>,
    clicks: HashMap<String, u32>,
    closed: bool,
}

struct FakeInner {
    created: Instant,
    state: Mutex<FakeState>,
}

impl FakeInner {
    fn spec(&self, selector: &str) -> Option<FakeElementSpec> {
        self.state
            .lock()
            .expect("fake state lock")
            .elements
            .get(selector)
            .cloned()
    }

    fn exists_now(&self, selector: &str) -> bool {
        match self.spec(selector) {
            Some(spec) => match spec.appears_after {
                Some(delay) => Instant::now() >= self.created + delay,
                None => true,
            },
            None => false,
        }
    }
}

/// In-memory [`WebDriverSession`]; cheap to clone, clones share the page.
#[derive(Clone)]
pub struct FakeSession {
    inner: Arc<FakeInner>,
}

impl FakeSession {
    pub fn new() -> Self {
        FakeSession {
            inner: Arc::new(FakeInner {
                created: Instant::now(),
                state: Mutex::new(FakeState::default()),
            }),
        }
    }

    /// Installs or replaces the element behind `native_selector`.
    pub fn install(&self, native_selector: impl Into<String>, spec: FakeElementSpec) {
        self.inner
            .state
            .lock()
            .expect("fake state lock")
            .elements
            .insert(native_selector.into(), spec);
    }

    /// Every native selector passed to `find_element`, in call order.
    pub fn find_attempts(&self) -> Vec<String> {
        self.inner
            .state
            .lock()
            .expect("fake state lock")
            .find_attempts
            .clone()
    }

    pub fn clicks(&self, native_selector: &str) -> u32 {
        self.inner
            .state
            .lock()
            .expect("fake state lock")
            .clicks
            .get(native_selector)
            .copied()
            .unwrap_or(0)
    }

    pub fn visited_urls(&self) -> Vec<String> {
        self.inner
            .state
            .lock()
            .expect("fake state lock")
            .history
            .clone()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().expect("fake state lock").closed
    }
}

impl Default for FakeSession {
    fn default() -> Self {
        FakeSession::new()
    }
}

#[async_trait]
impl WebDriverSession for FakeSession {
    async fn find_element(
        &self,
        native_selector: &str,
    ) -> Result<Arc<dyn ElementHandle>, DriverError> {
        self.inner
            .state
            .lock()
            .expect("fake state lock")
            .find_attempts
            .push(native_selector.to_string());
        Ok(Arc::new(FakeElement {
            inner: Arc::clone(&self.inner),
            selector: native_selector.to_string(),
        }))
    }

    async fn navigate_to(&self, url: &str) -> Result<(), DriverError> {
        let mut state = self.inner.state.lock().expect("fake state lock");
        state.url = url.to_string();
        state.history.push(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.inner.state.lock().expect("fake state lock").url.clone())
    }

    async fn back(&self) -> Result<(), DriverError> {
        let mut state = self.inner.state.lock().expect("fake state lock");
        state.history.pop();
        state.url = state.history.last().cloned().unwrap_or_default();
        Ok(())
    }

    async fn pause(&self, duration: Duration) -> Result<(), DriverError> {
        sleep(duration).await;
        Ok(())
    }

    async fn delete_session(&self) -> Result<(), DriverError> {
        self.inner.state.lock().expect("fake state lock").closed = true;
        Ok(())
    }
}

struct FakeElement {
    inner: Arc<FakeInner>,
    selector: String,
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn wait_for_exist(
        &self,
        timeout: Duration,
        interval: Duration,
    ) -> Result<(), DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.inner.exists_now(&self.selector) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DriverError::WaitTimeout {
                    selector: self.selector.clone(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            sleep(interval).await;
        }
    }

    async fn wait_for_displayed(
        &self,
        timeout: Duration,
        interval: Duration,
        reverse: bool,
    ) -> Result<bool, DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            let displayed = self.is_displayed().await?;
            if displayed != reverse {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(interval).await;
        }
    }

    async fn is_displayed(&self) -> Result<bool, DriverError> {
        Ok(self.inner.exists_now(&self.selector)
            && self
                .inner
                .spec(&self.selector)
                .map(|spec| spec.displayed)
                .unwrap_or(false))
    }

    async fn is_displayed_in_viewport(&self) -> Result<bool, DriverError> {
        Ok(self.inner.exists_now(&self.selector)
            && self
                .inner
                .spec(&self.selector)
                .map(|spec| spec.displayed && spec.in_viewport)
                .unwrap_or(false))
    }

    async fn click(&self) -> Result<(), DriverError> {
        if !self.inner.exists_now(&self.selector) {
            return Err(DriverError::NoSuchElement {
                selector: self.selector.clone(),
            });
        }
        let spec = self.inner.spec(&self.selector).expect("spec exists");
        if spec.click_intercepted {
            return Err(DriverError::Backend(format!(
                "click intercepted on {}",
                self.selector
            )));
        }
        *self
            .inner
            .state
            .lock()
            .expect("fake state lock")
            .clicks
            .entry(self.selector.clone())
            .or_insert(0) += 1;
        Ok(())
    }

    async fn text(&self) -> Result<String, DriverError> {
        if !self.inner.exists_now(&self.selector) {
            return Err(DriverError::NoSuchElement {
                selector: self.selector.clone(),
            });
        }
        Ok(self
            .inner
            .spec(&self.selector)
            .map(|spec| spec.text)
            .unwrap_or_default())
    }
}

/// [`SessionConnector`] that always hands out the same prepared fake session.
#[derive(Default)]
pub struct FakeConnector {
    session: Mutex<Option<FakeSession>>,
}

impl FakeConnector {
    /// Connector that will serve `session` to the driver.
    pub fn with_session(session: FakeSession) -> Self {
        FakeConnector {
            session: Mutex::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionConnector for FakeConnector {
    async fn connect(&self, _config: &Config) -> Result<Arc<dyn WebDriverSession>, DriverError> {
        let mut slot = self.session.lock().expect("connector lock");
        let session = slot.get_or_insert_with(FakeSession::new).clone();
        Ok(Arc::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn wait_for_exist_times_out_for_missing_element() {
        let session = FakeSession::new();
        let handle = session.find_element("#missing").await.unwrap();

        let err = handle
            .wait_for_exist(Duration::from_secs(1), Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(matches!(err, DriverError::WaitTimeout { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_exist_sees_delayed_appearance() {
        let session = FakeSession::new();
        session.install(
            "#late",
            FakeElementSpec::appearing_after(Duration::from_millis(1500)),
        );
        let handle = session.find_element("#late").await.unwrap();

        handle
            .wait_for_exist(Duration::from_secs(2), Duration::from_millis(500))
            .await
            .unwrap();
        assert!(handle.is_displayed().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_displayed_reverse_waits_for_disappearance() {
        let session = FakeSession::new();
        session.install("#spinner", FakeElementSpec::hidden());
        let handle = session.find_element("#spinner").await.unwrap();

        let gone = handle
            .wait_for_displayed(Duration::from_secs(1), Duration::from_millis(500), true)
            .await
            .unwrap();
        assert!(gone);
    }

    #[tokio::test]
    async fn navigation_tracks_history() {
        let session = FakeSession::new();
        session.navigate_to("https://a.test").await.unwrap();
        session.navigate_to("https://b.test").await.unwrap();
        assert_eq!(session.current_url().await.unwrap(), "https://b.test");

        session.back().await.unwrap();
        assert_eq!(session.current_url().await.unwrap(), "https://a.test");
    }

    #[tokio::test]
    async fn intercepted_click_fails() {
        let session = FakeSession::new();
        session.install(
            "#covered",
            FakeElementSpec::visible().with_click_intercepted(),
        );
        let handle = session.find_element("#covered").await.unwrap();
        assert!(handle.click().await.is_err());
        assert_eq!(session.clicks("#covered"), 0);
    }
}
