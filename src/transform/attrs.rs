//! Ordered element attributes and the icon class filter.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::icon::prefix::{MARKER_PREFIX, is_prefix};
use crate::utils::html::{escape_attr, parse_attributes, unescape};

/// Attribute list in source order. Names are unique; `set` replaces in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the attribute part of a start tag (`class="a" id=b hidden`).
    ///
    /// Values are entity-decoded; rendering escapes them again.
    pub fn parse(source: &str) -> Self {
        let mut attrs = Self::new();
        for (name, value) in parse_attributes(source) {
            // first occurrence wins, like browsers do
            if attrs.get(&name).is_none() {
                attrs.0.push((name, unescape(&value).into_owned()));
            }
        }
        attrs
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.0.iter().position(|(key, _)| key == name)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as ` name="value"` pairs (leading space included).
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in self.iter() {
            let _ = write!(out, r#" {}="{}""#, name, escape_attr(value));
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attrs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

impl From<&BTreeMap<String, String>> for Attrs {
    fn from(map: &BTreeMap<String, String>) -> Self {
        map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }
}

/// Defaults first, then the element's own attributes on top.
///
/// `class` follows the same rule: the element's class replaces the default
/// one, and the default only applies when the element has none.
pub fn merge_attrs(source: &Attrs, defaults: &Attrs) -> Attrs {
    let mut merged = defaults.clone();
    for (name, value) in source.iter() {
        merged.set(name, value);
    }
    merged
}

/// Whether a class token marks an icon and should be dropped from output.
#[inline]
fn is_icon_marker(token: &str, whitelist: &[String]) -> bool {
    if whitelist.iter().any(|w| w == token) {
        return false;
    }
    token.starts_with(MARKER_PREFIX) || is_prefix(token)
}

/// Strip icon marker classes, keeping unrelated and whitelisted ones.
///
/// An empty result removes `class` entirely. Idempotent.
pub fn filter_attrs(mut attrs: Attrs, whitelist: &[String]) -> Attrs {
    let Some(class) = attrs.get("class") else {
        return attrs;
    };

    let kept = class
        .split_whitespace()
        .filter(|token| !is_icon_marker(token, whitelist))
        .collect::<Vec<_>>()
        .join(" ");

    if kept.is_empty() {
        attrs.remove("class");
    } else {
        attrs.set("class", kept);
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitelist() -> Vec<String> {
        vec!["fa-fw".to_string()]
    }

    #[test]
    fn test_parse_keeps_order_and_decodes() {
        let attrs = Attrs::parse(r#"class="fa-solid fa-user" title="a &amp; b" data-x=1 hidden"#);
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("class", "fa-solid fa-user"),
                ("title", "a & b"),
                ("data-x", "1"),
                ("hidden", ""),
            ]
        );
        assert_eq!(attrs.render(), r#" class="fa-solid fa-user" title="a &amp; b" data-x="1" hidden="""#);
    }

    #[test]
    fn test_parse_duplicate_first_wins() {
        let attrs = Attrs::parse(r#"id="a" id="b""#);
        assert_eq!(attrs.get("id"), Some("a"));
    }

    #[test]
    fn test_set_and_remove() {
        let mut attrs: Attrs = [("a", "1"), ("b", "2")].into_iter().collect();
        attrs.set("a", "3");
        assert_eq!(attrs.iter().next(), Some(("a", "3")));
        assert_eq!(attrs.remove("a"), Some("3".to_string()));
        assert_eq!(attrs.remove("a"), None);
        assert!(!attrs.is_empty());
    }

    #[test]
    fn test_filter_keeps_whitelisted_and_plain() {
        let attrs = Attrs::parse(r#"class="fas fa-starfighter fa-fw icon-lg""#);
        let filtered = filter_attrs(attrs, &whitelist());
        assert_eq!(filtered.get("class"), Some("fa-fw icon-lg"));
    }

    #[test]
    fn test_filter_removes_empty_class() {
        let attrs = Attrs::parse(r#"class="fa-regular fa-user" id="me""#);
        let filtered = filter_attrs(attrs, &whitelist());
        assert_eq!(filtered.get("class"), None);
        assert_eq!(filtered.render(), r#" id="me""#);
    }

    #[test]
    fn test_filter_without_class() {
        let attrs = Attrs::parse(r#"id="me""#);
        assert_eq!(filter_attrs(attrs.clone(), &whitelist()), attrs);
    }

    #[test]
    fn test_filter_idempotent() {
        for source in [
            r#"class="fa-solid  fa-user  big fa-fw""#,
            r#"class="fa-user""#,
            r#"class="far icon" role="img""#,
            r#"title="x""#,
        ] {
            let once = filter_attrs(Attrs::parse(source), &whitelist());
            let twice = filter_attrs(once.clone(), &whitelist());
            assert_eq!(once, twice, "{source}");
        }
    }

    #[test]
    fn test_merge_source_overrides_defaults() {
        let defaults: Attrs = [("aria-hidden", "true"), ("class", "icon"), ("width", "1em")]
            .into_iter()
            .collect();
        let source = Attrs::parse(r#"class="fa-solid fa-user" width="2em" id="x""#);
        let merged = merge_attrs(&source, &defaults);
        assert_eq!(
            merged.iter().collect::<Vec<_>>(),
            vec![
                ("aria-hidden", "true"),
                ("class", "fa-solid fa-user"),
                ("width", "2em"),
                ("id", "x"),
            ]
        );
    }

    #[test]
    fn test_merge_default_class_when_source_has_none() {
        let defaults: Attrs = [("class", "icon")].into_iter().collect();
        let merged = merge_attrs(&Attrs::new(), &defaults);
        assert_eq!(merged.get("class"), Some("icon"));
    }

    #[test]
    fn test_from_btreemap() {
        let map = BTreeMap::from([
            ("focusable".to_string(), "false".to_string()),
            ("aria-hidden".to_string(), "true".to_string()),
        ]);
        let attrs = Attrs::from(&map);
        assert_eq!(attrs.render(), r#" aria-hidden="true" focusable="false""#);
    }
}
