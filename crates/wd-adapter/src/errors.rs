//! Error types for the automation-client seam.

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DriverError {
    /// A keyword ran with no open automation session.
    #[error("session is not initialized; start the driver before invoking keywords")]
    SessionNotInitialized,

    /// Teardown was requested while no session is open.
    #[error("driver session has been closed or was never started")]
    SessionClosed,

    /// The element never existed within the polling budget.
    #[error("element did not exist within {timeout_ms} ms: {selector}")]
    WaitTimeout { selector: String, timeout_ms: u64 },

    /// An immediate query hit an element that is not present.
    #[error("no such element: {selector}")]
    NoSuchElement { selector: String },

    /// Opening the session against the automation server failed.
    #[error("connection to automation server failed: {0}")]
    Connection(String),

    /// The automation backend rejected or failed an operation.
    #[error("automation backend error: {0}")]
    Backend(String),
}
