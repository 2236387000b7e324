//! Per-keyword platform allow-lists.

use keyward_core_types::Platform;

/// Which target platforms a keyword may run on. Gated keywords check this
/// before any step bookkeeping and before the session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformSupport {
    pub desktop: bool,
    pub lite: bool,
    pub android: bool,
    pub ios: bool,
}

impl PlatformSupport {
    /// Desktop and lite web only.
    pub const WEB: PlatformSupport = PlatformSupport {
        desktop: true,
        lite: true,
        android: false,
        ios: false,
    };

    /// Android and iOS only.
    pub const MOBILE: PlatformSupport = PlatformSupport {
        desktop: false,
        lite: false,
        android: true,
        ios: true,
    };

    pub const ALL: PlatformSupport = PlatformSupport {
        desktop: true,
        lite: true,
        android: true,
        ios: true,
    };

    pub fn allows(&self, platform: Platform) -> bool {
        match platform {
            Platform::Desktop => self.desktop,
            Platform::Lite => self.lite,
            Platform::Android => self.android,
            Platform::Ios => self.ios,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_allow_list_rejects_mobile() {
        assert!(PlatformSupport::WEB.allows(Platform::Desktop));
        assert!(PlatformSupport::WEB.allows(Platform::Lite));
        assert!(!PlatformSupport::WEB.allows(Platform::Android));
        assert!(!PlatformSupport::WEB.allows(Platform::Ios));
    }

    #[test]
    fn all_allows_everything() {
        for platform in [
            Platform::Desktop,
            Platform::Lite,
            Platform::Android,
            Platform::Ios,
        ] {
            assert!(PlatformSupport::ALL.allows(platform));
        }
    }
}
