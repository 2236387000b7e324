//! WebDriver-protocol adapter seam.
//!
//! The rest of the workspace talks to the automation client exclusively
//! through the port traits here; a production backend implements them over
//! the wire protocol, and the [`fake`] module provides a deterministic
//! in-memory backend for tests.

pub mod driver;
pub mod errors;
pub mod ports;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use driver::Driver;
pub use errors::DriverError;
pub use ports::{ElementHandle, SessionConnector, WebDriverSession};
