//! Locator resolution with self-healing retry.
//!
//! Given an [`keyward_core_types::Element`] and a timeout budget, the
//! resolver produces a live handle plus metadata about which selector
//! succeeded. The last-known-good selector is tried first; when it times out
//! and self-healing is enabled, the declared fallbacks are scanned in order,
//! each with the full budget, and the first working substitute is remembered
//! on the element and logged on the runner for later triage.

pub mod errors;
pub mod resolver;

pub use errors::LocatorError;
pub use resolver::{ElementResolver, Resolution, ResolvePolicy};
