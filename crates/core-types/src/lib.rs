//! Shared primitives for the Keyward test orchestration workspace.
//!
//! Everything here is dependency-light on purpose: the selector/element model,
//! the execution status machine, the target platform enumeration, and the
//! duration formatting used by every trace record.

pub mod duration;
pub mod element;
pub mod selector;
pub mod status;

pub use duration::pretty_duration;
pub use element::{Element, ElementError};
pub use selector::{Selector, SelectorStrategy};
pub use status::{Platform, TestStatus};
