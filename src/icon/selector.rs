//! Canonical `prefix:name` selectors.

use std::fmt;
use std::str::FromStr;

use super::error::{IconError, LookupError};
use super::parse::IconMetadata;
use super::prefix::prefix_for;

/// Normalized lookup key, e.g. `far:user`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalSelector {
    prefix: String,
    name: String,
}

impl CanonicalSelector {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// Build a selector from parsed class metadata.
    ///
    /// Returns `Ok(None)` when style or icon name is missing: the class is
    /// not an icon marker and the element should be left alone. A family and
    /// style without a registered prefix is a missing icon.
    pub fn resolve(meta: &IconMetadata) -> Result<Option<Self>, LookupError> {
        let (Some(style), Some(name)) = (meta.style, meta.icon_name.as_deref()) else {
            return Ok(None);
        };

        let prefix = prefix_for(meta.family, style).ok_or(LookupError::UnknownPrefix {
            family: meta.family,
            style,
        })?;

        Ok(Some(Self::new(prefix, name)))
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fragment id of the sprite symbol: `far:user` → `far-fa-user`.
    pub fn reference_key(&self) -> String {
        format!("{}-fa-{}", self.prefix, self.name)
    }
}

impl fmt::Display for CanonicalSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.name)
    }
}

impl FromStr for CanonicalSelector {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(':') {
            Some((prefix, name))
                if !prefix.is_empty()
                    && !name.is_empty()
                    && !s.contains(char::is_whitespace)
                    && !name.contains(':') =>
            {
                Ok(Self::new(prefix, name))
            }
            _ => Err(IconError::InvalidSelector(s.to_string())),
        }
    }
}
