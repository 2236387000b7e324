//! Execution status machine and target platform enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status shared by every trace entity.
///
/// `Skipped` is both the initial state and the terminal state of anything
/// that never executed; `Failed`/`Success` are terminal once set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    #[default]
    Skipped,
    Failed,
    Success,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestStatus::Skipped => "SKIPPED",
            TestStatus::Failed => "FAILED",
            TestStatus::Success => "SUCCESS",
        };
        f.write_str(name)
    }
}

/// Target platform of the automation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Desktop,
    Lite,
    Android,
    Ios,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Desktop => "desktop",
            Platform::Lite => "lite",
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }

    pub fn is_desktop(&self) -> bool {
        matches!(self, Platform::Desktop)
    }

    pub fn is_lite(&self) -> bool {
        matches!(self, Platform::Lite)
    }

    pub fn is_android(&self) -> bool {
        matches!(self, Platform::Android)
    }

    pub fn is_ios(&self) -> bool {
        matches!(self, Platform::Ios)
    }

    pub fn is_web(&self) -> bool {
        self.is_desktop() || self.is_lite()
    }

    pub fn is_mobile(&self) -> bool {
        self.is_android() || self.is_ios()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_skipped() {
        assert_eq!(TestStatus::default(), TestStatus::Skipped);
    }

    #[test]
    fn platform_families() {
        assert!(Platform::Desktop.is_web());
        assert!(Platform::Lite.is_web());
        assert!(Platform::Android.is_mobile());
        assert!(Platform::Ios.is_mobile());
        assert!(!Platform::Desktop.is_mobile());
    }

    #[test]
    fn platform_serde_names_match_config_format() {
        assert_eq!(serde_json::to_string(&Platform::Desktop).unwrap(), "\"desktop\"");
        assert_eq!(
            serde_json::from_str::<Platform>("\"android\"").unwrap(),
            Platform::Android
        );
    }
}
