//! Element resolver with self-healing fallback scan.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use keyward_config::Config;
use keyward_core_types::{Element, Selector};
use run_trace::RunnerHandle;
use wd_adapter::{DriverError, ElementHandle, WebDriverSession};

use crate::errors::LocatorError;

/// Timing and self-healing knobs, captured once from the [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct ResolvePolicy {
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    pub self_healing_enabled: bool,
}

impl From<&Config> for ResolvePolicy {
    fn from(config: &Config) -> Self {
        ResolvePolicy {
            wait_timeout: config.wait_for_timeout(),
            poll_interval: config.wait_for_interval(),
            self_healing_enabled: config.self_healing_enabled,
        }
    }
}

/// A successful resolution: the live handle plus which selector produced it.
pub struct Resolution {
    pub handle: Arc<dyn ElementHandle>,
    pub selector: Selector,
    pub used_fallback: bool,
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolution")
            .field("selector", &self.selector)
            .field("used_fallback", &self.used_fallback)
            .finish_non_exhaustive()
    }
}

/// Resolves elements against one automation session.
pub struct ElementResolver {
    session: Arc<dyn WebDriverSession>,
    policy: ResolvePolicy,
    runner: RunnerHandle,
}

impl ElementResolver {
    pub fn new(
        session: Arc<dyn WebDriverSession>,
        policy: ResolvePolicy,
        runner: RunnerHandle,
    ) -> Self {
        ElementResolver {
            session,
            policy,
            runner,
        }
    }

    pub fn policy(&self) -> &ResolvePolicy {
        &self.policy
    }

    /// Resolves `element` within `timeout_override` (or the configured wait
    /// budget). The previously healed selector, when one is remembered, is
    /// tried before the default; each fallback attempt gets the full budget,
    /// so the worst case is `timeout × (1 + fallback_count)`.
    pub async fn resolve(
        &self,
        element: &Element,
        timeout_override: Option<Duration>,
    ) -> Result<Resolution, LocatorError> {
        let timeout = timeout_override.unwrap_or(self.policy.wait_timeout);
        let candidate = element.preferred_selector();

        match self.attempt(&candidate, timeout).await {
            Ok(handle) => {
                let used_fallback = &candidate != element.default_selector();
                return Ok(Resolution {
                    handle,
                    selector: candidate,
                    used_fallback,
                });
            }
            Err(err) => {
                debug!(selector = %candidate, error = %err, "candidate selector did not resolve")
            }
        }

        if !self.policy.self_healing_enabled {
            warn!("self healing is disabled");
            return Err(self.not_found(element));
        }

        warn!(
            selector = %element.default_selector(),
            "unable to locate element with default selector; initiating self healing"
        );
        for selector in element.fallback_selectors() {
            match self.attempt(selector, timeout).await {
                Ok(handle) => {
                    info!(selector = %selector, "self healing succeeded");
                    element.record_healing(selector.clone());
                    self.runner.record_self_healing(element);
                    return Ok(Resolution {
                        handle,
                        selector: selector.clone(),
                        used_fallback: true,
                    });
                }
                Err(err) => {
                    warn!(selector = %selector, error = %err, "self healing attempt failed")
                }
            }
        }

        Err(self.not_found(element))
    }

    async fn attempt(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<Arc<dyn ElementHandle>, DriverError> {
        let handle = self.session.find_element(&selector.to_native()).await?;
        handle
            .wait_for_exist(timeout, self.policy.poll_interval)
            .await?;
        Ok(handle)
    }

    fn not_found(&self, element: &Element) -> LocatorError {
        LocatorError::NotFound {
            selector: element.default_selector().to_string(),
        }
    }
}
