//! `[icons]` section configuration.
//!
//! Controls how icon shorthands are matched and rewritten.
//!
//! # Example
//!
//! ```toml
//! [icons]
//! transform = "i[class]"      # element selector, or false to disable
//! bundle = "fontawesome"      # bundle the sprite symbols are collected in
//! shortcode = "icon"          # {% icon "far:user" %}, or false to disable
//! shortcode_class = "icon"    # class on shortcode output
//! fail_on_error = false       # abort the build on unknown icons
//! ignored_classes = ["fa-fw"] # marker classes kept on the output element
//!
//! [icons.default_attributes]
//! focusable = "false"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Element selector used when `transform = true`.
pub const DEFAULT_SELECTOR: &str = "i[class]";

/// Shortcode name used when `shortcode = true`.
pub const DEFAULT_SHORTCODE: &str = "icon";

/// Icon transform settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IconOptions {
    /// Element selector for the class-based path. `None` disables it.
    #[serde(deserialize_with = "selector_toggle")]
    pub transform: Option<String>,

    /// Bundle name the sprite symbols are registered under.
    pub bundle: String,

    /// Shortcode name for direct `prefix:name` invocation. `None` disables it.
    #[serde(deserialize_with = "shortcode_toggle")]
    pub shortcode: Option<String>,

    /// Class given to shortcode output.
    #[serde(alias = "shortcodeClass")]
    pub shortcode_class: Option<String>,

    /// Attributes merged into every replacement `<svg>`.
    #[serde(alias = "defaultAttributes")]
    pub default_attributes: BTreeMap<String, String>,

    /// Abort on icons missing from the catalogue instead of leaving them.
    #[serde(alias = "failOnError")]
    pub fail_on_error: bool,

    /// Marker classes that survive on the output element.
    #[serde(alias = "ignoredClasses")]
    pub ignored_classes: Vec<String>,
}

impl Default for IconOptions {
    fn default() -> Self {
        Self {
            transform: Some(DEFAULT_SELECTOR.to_string()),
            bundle: "fontawesome".to_string(),
            shortcode: Some(DEFAULT_SHORTCODE.to_string()),
            shortcode_class: None,
            default_attributes: BTreeMap::new(),
            fail_on_error: false,
            ignored_classes: vec!["fa-fw".to_string()],
        }
    }
}

impl IconOptions {
    /// Shortcode class, ignoring an empty string.
    pub fn shortcode_class(&self) -> Option<&str> {
        self.shortcode_class
            .as_deref()
            .map(str::trim)
            .filter(|class| !class.is_empty())
    }

    /// Check option values, returning a message per problem.
    pub fn check(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(selector) = &self.transform {
            if selector.trim().is_empty() {
                problems.push("icons.transform must not be empty".to_string());
            } else if !is_valid_selector(selector) {
                problems.push(format!("icons.transform `{selector}` is not a valid selector"));
            }
        }

        if self.bundle.trim().is_empty() {
            problems.push("icons.bundle must not be empty".to_string());
        }

        if let Some(name) = &self.shortcode
            && !is_identifier(name)
        {
            problems.push(format!("icons.shortcode `{name}` is not a valid identifier"));
        }

        for class in &self.ignored_classes {
            if class.is_empty() || class.contains(char::is_whitespace) {
                problems.push(format!("icons.ignored_classes entry `{class}` is not a class name"));
            }
        }

        for name in self.default_attributes.keys() {
            if name.is_empty() || name.contains(|c: char| c.is_whitespace() || "\"'<>=/".contains(c)) {
                problems.push(format!("icons.default_attributes key `{name}` is not an attribute name"));
            }
        }

        problems
    }
}

/// Whether the HTML selector engine accepts `selector`.
fn is_valid_selector(selector: &str) -> bool {
    tl::parse("", tl::ParserOptions::default())
        .map(|dom| dom.query_selector(selector).is_some())
        .unwrap_or(false)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// `true`, `false` or a custom value.
#[derive(Deserialize)]
#[serde(untagged)]
enum Toggle {
    Enabled(bool),
    Named(String),
}

impl Toggle {
    fn resolve(self, default: &str) -> Option<String> {
        match self {
            Self::Enabled(true) => Some(default.to_string()),
            Self::Enabled(false) => None,
            Self::Named(value) => Some(value),
        }
    }
}

fn selector_toggle<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Toggle::deserialize(d)?.resolve(DEFAULT_SELECTOR))
}

fn shortcode_toggle<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Toggle::deserialize(d)?.resolve(DEFAULT_SHORTCODE))
}
