//! Icon resolution errors.

use std::path::PathBuf;

use thiserror::Error;

use super::prefix::{Family, Style};

/// Failure reported by an icon lookup.
///
/// `NotFound` and `UnknownPrefix` mean the icon is missing and are
/// recoverable. Every other variant is an infrastructure fault and always
/// aborts the page.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Could not find icon: {selector}")]
    NotFound { selector: String },

    #[error("no icon prefix registered for family `{family}` with style `{style}`")]
    UnknownPrefix { family: Family, style: Style },

    #[error("IO error when reading catalogue `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed icon catalogue `{path}`: {reason}")]
    Catalogue { path: PathBuf, reason: String },
}

impl LookupError {
    #[inline]
    pub fn not_found(selector: impl Into<String>) -> Self {
        Self::NotFound {
            selector: selector.into(),
        }
    }

    /// The icon does not exist, as opposed to the lookup failing.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::UnknownPrefix { .. })
    }
}

/// Errors that abort a page transform.
#[derive(Debug, Error)]
pub enum IconError {
    /// Composed diagnostic for an icon that could not be resolved.
    #[error("Error with icon, via {origin}. Resolved to: {metadata}. Original error message: {source}")]
    Unresolved {
        /// `class="..."` or `shortcode "..."`.
        origin: String,
        /// JSON dump of the parsed metadata.
        metadata: String,
        #[source]
        source: LookupError,
    },

    #[error("invalid icon selector `{0}`, expected `prefix:name`")]
    InvalidSelector(String),

    #[error("invalid element selector `{0}`")]
    InvalidMatcher(String),

    #[error("failed to parse html: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = LookupError::not_found("fas:left");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Could not find icon: fas:left");
    }

    #[test]
    fn test_unresolved_message() {
        let err = IconError::Unresolved {
            origin: r#"class="fa-solid fa-left""#.to_string(),
            metadata: r#"{"style":"solid"}"#.to_string(),
            source: LookupError::not_found("fas:left"),
        };
        assert_eq!(
            err.to_string(),
            r#"Error with icon, via class="fa-solid fa-left". Resolved to: {"style":"solid"}. Original error message: Could not find icon: fas:left"#
        );
    }

    #[test]
    fn test_unknown_prefix_message() {
        let err = LookupError::UnknownPrefix {
            family: Family::Sharp,
            style: Style::Brands,
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("`sharp`"));
        assert!(err.to_string().contains("`brands`"));
    }
}
