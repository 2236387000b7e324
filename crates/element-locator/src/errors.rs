//! Error types for locator resolution.

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// The default selector and every attempted fallback timed out. Carries
    /// the default selector's description for diagnostics.
    #[error("no such element: {selector}")]
    NotFound { selector: String },
}
