//! Error types raised by keywords.

use thiserror::Error;

use element_locator::LocatorError;
use keyward_core_types::Platform;
use wd_adapter::DriverError;

#[derive(Debug, Error)]
pub enum KeywordError {
    /// A keyword received a structurally invalid argument.
    #[error("invalid argument '{name}': expected {expected}, given {given}")]
    InvalidArgument {
        name: String,
        expected: String,
        given: String,
    },

    /// A keyword was invoked with no open automation session.
    #[error("session is not initialized; start the driver before invoking keywords")]
    SessionNotInitialized,

    /// A gated keyword was invoked on a platform outside its allow-list.
    #[error("keyword '{keyword}' cannot run on '{platform}' platform")]
    PlatformUnsupported {
        keyword: &'static str,
        platform: Platform,
    },

    /// A comparison keyword's expectation did not hold.
    #[error("assertion '{assertion}' failed: actual '{actual}', expected {expected}")]
    AssertionFailed {
        assertion: String,
        actual: String,
        expected: String,
    },

    #[error("element is not visible: {selector}")]
    ElementNotVisible { selector: String },

    #[error("element is visible: {selector}")]
    ElementVisible { selector: String },

    /// The click was swallowed by another element on top of the target.
    #[error("element click was intercepted: {selector}")]
    ClickIntercepted { selector: String },

    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}
