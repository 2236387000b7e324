//! User-facing keyword actions with built-in step bookkeeping.
//!
//! Every keyword follows the same shape: raise BEFORE_STEP, record arguments,
//! resolve the target element through the self-healing locator, perform the
//! automation call, finish the step record, raise AFTER_STEP, and signal
//! failure — by error for verify/act keywords, by `false` for the
//! boolean-returning `wait_for_*` family.

pub mod assert;
pub mod errors;
pub mod keyword;
pub mod platform;
mod step;
pub mod target;

pub use assert::Assert;
pub use errors::KeywordError;
pub use keyword::{Keyword, TextMatch};
pub use platform::PlatformSupport;
pub use target::{NavTarget, Page};
