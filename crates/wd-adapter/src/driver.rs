//! Session lifecycle management for one runner.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use keyward_config::Config;

use crate::errors::DriverError;
use crate::ports::{SessionConnector, WebDriverSession};

/// Owns the single automation session of one runner.
///
/// Starting a session while one is open logs a warning and reuses the
/// existing one; tearing down without an open session is an error.
pub struct Driver {
    config: Arc<Config>,
    connector: Arc<dyn SessionConnector>,
    session: Mutex<Option<Arc<dyn WebDriverSession>>>,
}

impl Driver {
    pub fn new(config: Arc<Config>, connector: Arc<dyn SessionConnector>) -> Self {
        Driver {
            config,
            connector,
            session: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The currently open session, if any.
    pub fn session(&self) -> Option<Arc<dyn WebDriverSession>> {
        self.session.lock().expect("session lock").clone()
    }

    pub async fn start_session(&self) -> Result<Arc<dyn WebDriverSession>, DriverError> {
        if let Some(existing) = self.session() {
            warn!(
                "previous driver session exists; close it with end_session() before starting \
                 a new one. Re-using the existing session"
            );
            return Ok(existing);
        }

        info!("initializing driver session...");
        let session = self.connector.connect(&self.config).await?;
        *self.session.lock().expect("session lock") = Some(Arc::clone(&session));
        info!("driver session initialization completed");
        Ok(session)
    }

    pub async fn end_session(&self) -> Result<(), DriverError> {
        let session = self
            .session
            .lock()
            .expect("session lock")
            .take()
            .ok_or(DriverError::SessionClosed)?;
        session.delete_session().await?;
        info!("driver session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeConnector;
    use keyward_core_types::Platform;

    fn driver() -> Driver {
        let config = Arc::new(Config::new(Platform::Desktop));
        Driver::new(config, Arc::new(FakeConnector::default()))
    }

    #[tokio::test]
    async fn start_session_reuses_existing_session() {
        let driver = driver();
        let first = driver.start_session().await.unwrap();
        let second = driver.start_session().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn end_session_without_start_fails() {
        let driver = driver();
        assert!(matches!(
            driver.end_session().await,
            Err(DriverError::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn end_session_clears_the_slot() {
        let driver = driver();
        driver.start_session().await.unwrap();
        driver.end_session().await.unwrap();
        assert!(driver.session().is_none());
    }
}
