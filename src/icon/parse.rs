//! Class attribute → icon metadata.
//!
//! ```text
//! "fa-sharp fa-solid fa-user fa-fw"
//!      │        │       │     └─ extra (whitelisted, kept on output)
//!      │        │       └─────── icon name candidate
//!      │        └─────────────── style
//!      └──────────────────────── family
//! ```

use std::collections::BTreeSet;

use serde::Serialize;

use super::prefix::{self, Family, MARKER_PREFIX, Style};

/// Icon information extracted from one class attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconMetadata {
    pub style: Option<Style>,
    pub family: Family,
    pub icon_name: Option<String>,
    pub extras: BTreeSet<String>,
}

impl IconMetadata {
    /// Parse a class attribute value.
    ///
    /// `whitelist` holds full class tokens (e.g. `fa-fw`) that are modifiers
    /// rather than icon names. Never fails: unrelated input yields metadata
    /// with only the default family set.
    pub fn parse(class: &str, whitelist: &[String]) -> Self {
        let mut meta = Self::default();

        for token in class.split_whitespace() {
            // Short legacy form: `fas`, `far`, `fab`, ...
            if let Some((family, style)) = prefix::from_prefix(token) {
                meta.family = family;
                meta.style = Some(style);
                continue;
            }

            let Some(rest) = token.strip_prefix(MARKER_PREFIX) else {
                continue;
            };

            if let Some(style) = Style::from_token(rest) {
                meta.style = Some(style);
            } else if let Some(family) = Family::from_token(rest) {
                meta.family = family;
            } else if whitelist.iter().any(|w| w == token) {
                meta.extras.insert(token.to_string());
            } else if meta
                .icon_name
                .as_ref()
                .is_none_or(|name| rest.len() > name.len())
            {
                // Longest candidate wins; equal length keeps the first seen.
                meta.icon_name = Some(rest.to_string());
            }
        }

        meta
    }

    /// Structured dump for diagnostics.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}
