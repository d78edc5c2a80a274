//! Per-page asset bundles.
//!
//! Icon transforms register sprite symbols against the page being rendered;
//! the host later asks for the page's bundle and emits it where the page
//! requested it.
//!
//! Pages are processed on rayon workers, so the manager is a concurrent map
//! keyed by page. Each page bucket keeps first-registration order and drops
//! repeated keys.

use dashmap::DashMap;
use rustc_hash::FxHashSet;

/// Accumulates markup per page identity.
///
/// Registration is append-with-dedup: calling it repeatedly, in any order,
/// with the same `key` for the same page keeps a single copy.
pub trait AssetRegistrar: Send + Sync {
    fn add_to_page(&self, page: &str, key: &str, markup: &str);
}

#[derive(Debug, Default)]
struct PageAssets {
    keys: FxHashSet<String>,
    fragments: Vec<String>,
}

impl PageAssets {
    fn push(&mut self, key: &str, markup: &str) {
        if self.keys.insert(key.to_string()) {
            self.fragments.push(markup.to_string());
        }
    }
}

/// Named bundle collection (e.g. `fontawesome`).
#[derive(Debug)]
pub struct BundleManager {
    name: String,
    pages: DashMap<String, PageAssets>,
}

impl BundleManager {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: DashMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bundle output for a page: distinct fragments joined by newlines.
    ///
    /// Returns an empty string for pages that registered nothing.
    pub fn get_for_page(&self, page: &str) -> String {
        self.pages
            .get(page)
            .map(|assets| assets.fragments.join("\n"))
            .unwrap_or_default()
    }

    /// Number of distinct fragments registered for a page.
    pub fn count_for_page(&self, page: &str) -> usize {
        self.pages.get(page).map_or(0, |assets| assets.fragments.len())
    }

    /// Forget a page, e.g. before it is rendered again.
    pub fn reset_page(&self, page: &str) {
        self.pages.remove(page);
    }
}

impl AssetRegistrar for BundleManager {
    fn add_to_page(&self, page: &str, key: &str, markup: &str) {
        self.pages
            .entry(page.to_string())
            .or_default()
            .push(key, markup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_duplicate_registration_kept_once() {
        let bundle = BundleManager::new("fontawesome");
        bundle.add_to_page("/index.html", "far-fa-user", "<svg>user</svg>");
        bundle.add_to_page("/index.html", "far-fa-user", "<svg>user</svg>");
        assert_eq!(bundle.count_for_page("/index.html"), 1);
        assert_eq!(bundle.get_for_page("/index.html"), "<svg>user</svg>");
    }

    #[test]
    fn test_distinct_icons_in_first_registration_order() {
        let bundle = BundleManager::new("fontawesome");
        bundle.add_to_page("/a.html", "fas-fa-house", "<svg>house</svg>");
        bundle.add_to_page("/a.html", "far-fa-user", "<svg>user</svg>");
        bundle.add_to_page("/a.html", "fas-fa-house", "<svg>house</svg>");
        assert_eq!(
            bundle.get_for_page("/a.html"),
            "<svg>house</svg>\n<svg>user</svg>"
        );
    }

    #[test]
    fn test_pages_are_isolated() {
        let bundle = BundleManager::new("fontawesome");
        bundle.add_to_page("/a.html", "far-fa-user", "<svg>user</svg>");
        assert_eq!(bundle.get_for_page("/b.html"), "");
        assert_eq!(bundle.count_for_page("/b.html"), 0);

        bundle.reset_page("/a.html");
        assert_eq!(bundle.get_for_page("/a.html"), "");
        assert_eq!(bundle.name(), "fontawesome");
    }

    #[test]
    fn test_concurrent_registration() {
        let bundle = BundleManager::new("fontawesome");
        (0..64).into_par_iter().for_each(|i| {
            let page = format!("/page-{}.html", i % 4);
            bundle.add_to_page(&page, "far-fa-user", "<svg>user</svg>");
            bundle.add_to_page(&page, &format!("key-{}", i % 3), "<svg>x</svg>");
        });
        for i in 0..4 {
            let page = format!("/page-{i}.html");
            assert_eq!(bundle.count_for_page(&page), 4);
        }
    }
}
