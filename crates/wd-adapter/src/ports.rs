//! Port traits over the external browser/device automation client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use keyward_config::Config;

use crate::errors::DriverError;

/// Live handle to one element in the current page or screen.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Polls every `interval` until the element exists, up to `timeout`;
    /// fails with [`DriverError::WaitTimeout`] when the budget runs out.
    async fn wait_for_exist(
        &self,
        timeout: Duration,
        interval: Duration,
    ) -> Result<(), DriverError>;

    /// Polls until the element is displayed (or, with `reverse`, no longer
    /// displayed). `Ok(false)` means the condition never held within budget.
    async fn wait_for_displayed(
        &self,
        timeout: Duration,
        interval: Duration,
        reverse: bool,
    ) -> Result<bool, DriverError>;

    async fn is_displayed(&self) -> Result<bool, DriverError>;

    async fn is_displayed_in_viewport(&self) -> Result<bool, DriverError>;

    async fn click(&self) -> Result<(), DriverError>;

    async fn text(&self) -> Result<String, DriverError>;
}

/// One open automation session (browser or device).
#[async_trait]
pub trait WebDriverSession: Send + Sync {
    /// Lazy lookup: always returns a handle for a well-formed selector;
    /// existence is checked by the handle's wait/query calls.
    async fn find_element(
        &self,
        native_selector: &str,
    ) -> Result<Arc<dyn ElementHandle>, DriverError>;

    async fn navigate_to(&self, url: &str) -> Result<(), DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;

    async fn back(&self) -> Result<(), DriverError>;

    async fn pause(&self, duration: Duration) -> Result<(), DriverError>;

    async fn delete_session(&self) -> Result<(), DriverError>;
}

/// Opens sessions against a concrete automation backend, applying the
/// configured capabilities and connection retry policy.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn connect(&self, config: &Config) -> Result<Arc<dyn WebDriverSession>, DriverError>;
}
