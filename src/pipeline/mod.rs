//! Per-page processing.
//!
//! ```text
//! page html
//!    │  1. {% icon "far:user" %}          → <svg><use .../></svg>
//!    │  2. <i class="fa-regular fa-user"> → <svg><use .../></svg>
//!    │  3. {% getBundle "fontawesome" %}  → registered <symbol>s
//!    ▼
//! rewritten html
//! ```
//!
//! Shortcodes run before the element transform so their output is never
//! matched twice. The bundle placeholder is filled last, once every icon of
//! the page has been registered.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::bundle::BundleManager;
use crate::config::IconOptions;
use crate::icon::{IconError, IconLookup};
use crate::transform::{Attrs, IconTransform, TransformStats};

/// `{% getBundle "name" %}`, also with `{%-`/`-%}` trimming markers.
static BUNDLE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{%-?[ \t\r\n]*getBundle[ \t\r\n]+(?:"([^"]*)"|'([^']*)')[ \t\r\n]*-?%\}"#)
        .unwrap()
});

/// Result of processing one page.
#[derive(Debug)]
pub struct PageOutput {
    pub html: String,
    pub stats: TransformStats,
    /// Shortcodes expanded to icons.
    pub shortcodes: usize,
    /// Distinct symbols in the page bundle.
    pub symbols: usize,
}

/// Page processor shared by all pages of a build.
pub struct PagePipeline<'a> {
    options: &'a IconOptions,
    lookup: &'a dyn IconLookup,
    bundle: &'a BundleManager,
    shortcode: Option<Regex>,
}

impl<'a> PagePipeline<'a> {
    pub fn new(
        options: &'a IconOptions,
        lookup: &'a dyn IconLookup,
        bundle: &'a BundleManager,
    ) -> Result<Self, regex::Error> {
        let shortcode = options
            .shortcode
            .as_deref()
            .map(shortcode_pattern)
            .transpose()?;

        Ok(Self {
            options,
            lookup,
            bundle,
            shortcode,
        })
    }

    /// Process one page identified by `page` (its site URL path).
    pub fn process(&self, page: &str, html: &str) -> Result<PageOutput, IconError> {
        // pages are processed once per build; start from a clean bucket
        self.bundle.reset_page(page);

        let transform = IconTransform::new(self.options, self.lookup, self.bundle, page);

        let mut shortcodes = 0;
        let html = match &self.shortcode {
            Some(re) => {
                let attrs = self.shortcode_attrs();
                try_replace_all(re, html, |caps| {
                    let selector = quoted(caps).unwrap_or_default();
                    let markup = transform.shortcode(selector, &attrs)?;
                    if markup.is_some() {
                        shortcodes += 1;
                    }
                    Ok(markup.unwrap_or_default())
                })?
            }
            None => html.to_string(),
        };

        let transformed = transform.transform(&html)?;

        let html = self.fill_bundle(page, &transformed.html);

        Ok(PageOutput {
            html,
            stats: transformed.stats,
            shortcodes,
            symbols: self.bundle.count_for_page(page),
        })
    }

    fn shortcode_attrs(&self) -> Attrs {
        match self.options.shortcode_class() {
            Some(class) => [("class", class)].into_iter().collect(),
            None => Attrs::new(),
        }
    }

    /// Replace this bundle's placeholders; other bundles' are left in place.
    fn fill_bundle(&self, page: &str, html: &str) -> String {
        let name = self.bundle.name();
        BUNDLE_PLACEHOLDER
            .replace_all(html, |caps: &Captures| {
                if quoted(caps) == Some(name) {
                    self.bundle.get_for_page(page)
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    }
}

/// `{% name "prefix:icon" %}`
fn shortcode_pattern(name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r#"\{{%-?[ \t\r\n]*{}[ \t\r\n]+(?:"([^"]*)"|'([^']*)')[ \t\r\n]*-?%\}}"#,
        regex::escape(name)
    ))
}

/// First quoted argument, whichever quote style was used.
fn quoted<'h>(caps: &Captures<'h>) -> Option<&'h str> {
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// `Regex::replace_all` with a fallible replacer.
fn try_replace_all<E>(
    re: &Regex,
    haystack: &str,
    mut replace: impl FnMut(&Captures) -> Result<String, E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for caps in re.captures_iter(haystack) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&haystack[last..whole.start()]);
        out.push_str(&replace(&caps)?);
        last = whole.end();
    }
    out.push_str(&haystack[last..]);
    Ok(out)
}
