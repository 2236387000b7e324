//! Navigation targets: plain URLs or page objects.

use std::sync::Arc;

/// Page-object style provider of a navigation URL.
pub trait Page: Send + Sync {
    fn url(&self) -> String;
}

/// Target of the `go_to` keyword.
#[derive(Clone)]
pub enum NavTarget {
    Url(String),
    Page(Arc<dyn Page>),
}

impl NavTarget {
    pub fn url(&self) -> String {
        match self {
            NavTarget::Url(url) => url.clone(),
            NavTarget::Page(page) => page.url(),
        }
    }

    /// Human-readable description recorded into the test step args.
    pub fn describe(&self) -> String {
        match self {
            NavTarget::Url(url) => format!("{url} [url]"),
            NavTarget::Page(page) => format!("{} [page.url()]", page.url()),
        }
    }
}

impl From<&str> for NavTarget {
    fn from(url: &str) -> Self {
        NavTarget::Url(url.to_string())
    }
}

impl From<String> for NavTarget {
    fn from(url: String) -> Self {
        NavTarget::Url(url)
    }
}

impl From<Arc<dyn Page>> for NavTarget {
    fn from(page: Arc<dyn Page>) -> Self {
        NavTarget::Page(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LoginPage;

    impl Page for LoginPage {
        fn url(&self) -> String {
            "https://example.test/login".to_string()
        }
    }

    #[test]
    fn url_target_describes_itself() {
        let target = NavTarget::from("https://example.test");
        assert_eq!(target.url(), "https://example.test");
        assert_eq!(target.describe(), "https://example.test [url]");
    }

    #[test]
    fn page_target_delegates_to_the_page_object() {
        let target = NavTarget::from(Arc::new(LoginPage) as Arc<dyn Page>);
        assert_eq!(target.url(), "https://example.test/login");
        assert_eq!(target.describe(), "https://example.test/login [page.url()]");
    }
}
