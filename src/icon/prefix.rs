//! Style/family vocabulary and the prefix table.
//!
//! ```text
//! family         │ solid  regular  light  thin  duotone  brands
//! ───────────────┼──────────────────────────────────────────────
//! classic        │ fas    far      fal    fat   fad      fab
//! sharp          │ fass   fasr     fasl   fast  -        -
//! sharp-duotone  │ fasds  fasdr    fasdl  fasdt -        -
//! ```
//!
//! The table is plain static data, so it is shared across page workers
//! without synchronization.

use std::fmt;

use serde::Serialize;

/// Class prefix that marks a token as icon-related.
pub const MARKER_PREFIX: &str = "fa-";

/// Icon style (`fa-solid`, `fa-regular`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Solid,
    Regular,
    Light,
    Thin,
    Duotone,
    Brands,
}

impl Style {
    pub const ALL: [Self; 6] = [
        Self::Solid,
        Self::Regular,
        Self::Light,
        Self::Thin,
        Self::Duotone,
        Self::Brands,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Regular => "regular",
            Self::Light => "light",
            Self::Thin => "thin",
            Self::Duotone => "duotone",
            Self::Brands => "brands",
        }
    }

    /// Match a class token with the marker prefix already stripped.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == token)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon family. Everything is `classic` unless a family token says otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    #[default]
    Classic,
    Sharp,
    SharpDuotone,
}

impl Family {
    pub const ALL: [Self; 3] = [Self::Classic, Self::Sharp, Self::SharpDuotone];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Sharp => "sharp",
            Self::SharpDuotone => "sharp-duotone",
        }
    }

    /// Match a class token with the marker prefix already stripped.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == token)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `family → style → prefix`, flattened.
static PREFIXES: &[(Family, Style, &str)] = &[
    (Family::Classic, Style::Solid, "fas"),
    (Family::Classic, Style::Regular, "far"),
    (Family::Classic, Style::Light, "fal"),
    (Family::Classic, Style::Thin, "fat"),
    (Family::Classic, Style::Duotone, "fad"),
    (Family::Classic, Style::Brands, "fab"),
    (Family::Sharp, Style::Solid, "fass"),
    (Family::Sharp, Style::Regular, "fasr"),
    (Family::Sharp, Style::Light, "fasl"),
    (Family::Sharp, Style::Thin, "fast"),
    (Family::SharpDuotone, Style::Solid, "fasds"),
    (Family::SharpDuotone, Style::Regular, "fasdr"),
    (Family::SharpDuotone, Style::Light, "fasdl"),
    (Family::SharpDuotone, Style::Thin, "fasdt"),
];

/// Look up the selector prefix for a family/style pair.
///
/// The table is sparse: `sharp` has no `brands`, for example.
pub fn prefix_for(family: Family, style: Style) -> Option<&'static str> {
    PREFIXES
        .iter()
        .find(|(f, s, _)| *f == family && *s == style)
        .map(|(_, _, prefix)| *prefix)
}

/// Reverse lookup, used for short legacy classes like `fas`.
pub fn from_prefix(prefix: &str) -> Option<(Family, Style)> {
    PREFIXES
        .iter()
        .find(|(_, _, p)| *p == prefix)
        .map(|(f, s, _)| (*f, *s))
}

/// Check whether a whole class token is a registered prefix.
#[inline]
pub fn is_prefix(token: &str) -> bool {
    from_prefix(token).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_for_classic() {
        assert_eq!(prefix_for(Family::Classic, Style::Regular), Some("far"));
        assert_eq!(prefix_for(Family::Classic, Style::Solid), Some("fas"));
        assert_eq!(prefix_for(Family::Classic, Style::Brands), Some("fab"));
    }

    #[test]
    fn test_prefix_for_sparse() {
        assert_eq!(prefix_for(Family::Sharp, Style::Thin), Some("fast"));
        assert_eq!(prefix_for(Family::Sharp, Style::Brands), None);
        assert_eq!(prefix_for(Family::SharpDuotone, Style::Duotone), None);
    }

    #[test]
    fn test_from_prefix() {
        assert_eq!(from_prefix("fas"), Some((Family::Classic, Style::Solid)));
        assert_eq!(from_prefix("fasdr"), Some((Family::SharpDuotone, Style::Regular)));
        assert_eq!(from_prefix("fa"), None);
        assert!(is_prefix("fab"));
        assert!(!is_prefix("fa-user"));
    }

    #[test]
    fn test_prefixes_unique() {
        for (i, (_, _, a)) in PREFIXES.iter().enumerate() {
            for (_, _, b) in &PREFIXES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_tokens() {
        assert_eq!(Style::from_token("duotone"), Some(Style::Duotone));
        assert_eq!(Style::from_token("classic"), None);
        assert_eq!(Family::from_token("sharp-duotone"), Some(Family::SharpDuotone));
        assert_eq!(Family::default(), Family::Classic);
    }
}
