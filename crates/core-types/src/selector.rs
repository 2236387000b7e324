//! Selector model: one concrete strategy for locating a UI element.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Locator strategy names, matching the configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorStrategy {
    #[serde(rename = "attr:id")]
    AttrId,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "tag")]
    Tag,
    #[serde(rename = "xpath")]
    Xpath,
    #[serde(rename = "custom")]
    Custom,
}

impl SelectorStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            SelectorStrategy::AttrId => "attr:id",
            SelectorStrategy::Text => "text",
            SelectorStrategy::Tag => "tag",
            SelectorStrategy::Xpath => "xpath",
            SelectorStrategy::Custom => "custom",
        }
    }
}

impl fmt::Display for SelectorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One concrete way to locate a UI element.
///
/// Each variant knows how to render itself into the automation client's
/// native selector syntax; nothing else in the system interprets selector
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Selector {
    /// `id` attribute lookup, rendered as a CSS id selector.
    AttrId { value: String },
    /// Exact or partial visible-text match.
    Text { value: String, contains: bool },
    /// Tag name lookup.
    Tag { value: String },
    /// Raw XPath expression, passed through untouched.
    Xpath { value: String },
    /// Escape hatch: a pre-rendered native selector under a caller-chosen name.
    Custom { name: String, native: String },
}

impl Selector {
    pub fn attr_id(value: impl Into<String>) -> Self {
        Selector::AttrId {
            value: value.into(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Selector::Text {
            value: value.into(),
            contains: false,
        }
    }

    pub fn text_contains(value: impl Into<String>) -> Self {
        Selector::Text {
            value: value.into(),
            contains: true,
        }
    }

    pub fn tag(value: impl Into<String>) -> Self {
        Selector::Tag {
            value: value.into(),
        }
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Selector::Xpath {
            value: value.into(),
        }
    }

    pub fn custom(name: impl Into<String>, native: impl Into<String>) -> Self {
        Selector::Custom {
            name: name.into(),
            native: native.into(),
        }
    }

    pub fn strategy(&self) -> SelectorStrategy {
        match self {
            Selector::AttrId { .. } => SelectorStrategy::AttrId,
            Selector::Text { .. } => SelectorStrategy::Text,
            Selector::Tag { .. } => SelectorStrategy::Tag,
            Selector::Xpath { .. } => SelectorStrategy::Xpath,
            Selector::Custom { .. } => SelectorStrategy::Custom,
        }
    }

    /// The authored value, before native rendering.
    pub fn value(&self) -> &str {
        match self {
            Selector::AttrId { value }
            | Selector::Text { value, .. }
            | Selector::Tag { value }
            | Selector::Xpath { value } => value,
            Selector::Custom { native, .. } => native,
        }
    }

    /// Render into the automation client's native selector syntax.
    pub fn to_native(&self) -> String {
        match self {
            Selector::AttrId { value } => format!("#{value}"),
            Selector::Text {
                value,
                contains: false,
            } => format!("={value}"),
            Selector::Text {
                value,
                contains: true,
            } => format!(".*={value}"),
            Selector::Tag { value } => format!("<{value} />"),
            Selector::Xpath { value } => value.clone(),
            Selector::Custom { native, .. } => native.clone(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // XPath renders to itself, echoing the native form would repeat it.
            Selector::Xpath { value } => write!(f, "[{} --> {}]", self.strategy(), value),
            _ => write!(
                f,
                "[{} --> {} [native --> {}]]",
                self.strategy(),
                self.value(),
                self.to_native()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_id_renders_as_css_id() {
        assert_eq!(Selector::attr_id("login-btn").to_native(), "#login-btn");
    }

    #[test]
    fn text_exact_and_contains_render_differently() {
        assert_eq!(Selector::text("Submit").to_native(), "=Submit");
        assert_eq!(Selector::text_contains("Sub").to_native(), ".*=Sub");
    }

    #[test]
    fn tag_renders_as_tag_pattern() {
        assert_eq!(Selector::tag("button").to_native(), "<button />");
    }

    #[test]
    fn xpath_passes_through() {
        assert_eq!(
            Selector::xpath("//div[@id='x']").to_native(),
            "//div[@id='x']"
        );
    }

    #[test]
    fn custom_uses_supplied_native_string() {
        let sel = Selector::custom("data-test", "[data-test=submit]");
        assert_eq!(sel.to_native(), "[data-test=submit]");
        assert_eq!(sel.strategy(), SelectorStrategy::Custom);
    }

    #[test]
    fn display_includes_strategy_and_native_form() {
        let rendered = Selector::attr_id("ok").to_string();
        assert_eq!(rendered, "[attr:id --> ok [native --> #ok]]");

        let xpath = Selector::xpath("//missing").to_string();
        assert_eq!(xpath, "[xpath --> //missing]");
    }
}
