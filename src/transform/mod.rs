//! Icon tree transform.
//!
//! One pass over a parsed page:
//!
//! ```text
//! scanning ──match──▶ visit ──┬─ Unmatched   (not an icon marker)
//!    ▲                        ├─ Skipped     (icon missing, fail_on_error off)
//!    │                        ├─ Replaced    (edit recorded, symbol registered)
//!    └────────────────────────┘
//!                             └─ Fatal       (abort the page)
//! ```
//!
//! The parsed tree is never mutated. Visits produce byte-range edits against
//! the source string, applied in one go after traversal, so everything
//! outside a replaced element stays byte-for-byte identical.

pub mod attrs;

use serde_json::json;

use crate::bundle::AssetRegistrar;
use crate::config::IconOptions;
use crate::debug;
use crate::icon::{
    CanonicalSelector, IconError, IconLookup, IconMetadata, LookupError, ResolvedIcon,
};
use crate::utils::html::{escape_attr, is_raw_text_element};

pub use attrs::{Attrs, filter_attrs, merge_attrs};

/// Why a matched element was left alone.
#[derive(Debug)]
pub enum SkipReason {
    /// No such icon, or no prefix for its family and style.
    NotFound(LookupError),
}

/// Outcome of visiting one matched element.
#[derive(Debug)]
pub enum Visit {
    Unmatched,
    Skipped(SkipReason),
    Replaced(String),
    Fatal(IconError),
}

/// Counters for one transformed page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransformStats {
    pub replaced: usize,
    pub skipped: usize,
}

/// Rewritten page.
#[derive(Debug)]
pub struct Transformed {
    pub html: String,
    pub stats: TransformStats,
}

/// Byte range of the source to replace.
#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    replacement: String,
}

/// Icon transform bound to one page.
pub struct IconTransform<'a> {
    options: &'a IconOptions,
    defaults: Attrs,
    lookup: &'a dyn IconLookup,
    registrar: &'a dyn AssetRegistrar,
    page: &'a str,
}

impl<'a> IconTransform<'a> {
    pub fn new(
        options: &'a IconOptions,
        lookup: &'a dyn IconLookup,
        registrar: &'a dyn AssetRegistrar,
        page: &'a str,
    ) -> Self {
        Self {
            options,
            defaults: Attrs::from(&options.default_attributes),
            lookup,
            registrar,
            page,
        }
    }

    /// Rewrite every matching icon element of `html`.
    ///
    /// Returns the input unchanged when the class-based path is disabled.
    pub fn transform(&self, html: &str) -> Result<Transformed, IconError> {
        let mut stats = TransformStats::default();
        let Some(selector) = self.options.transform.as_deref() else {
            return Ok(Transformed {
                html: html.to_string(),
                stats,
            });
        };

        let mut edits = Vec::new();
        // end of the last replaced element; nested matches inside it are gone
        let mut covered = 0;

        for (start, end) in match_spans(html, selector)? {
            if start < covered {
                continue;
            }

            match self.visit(&html[start..end]) {
                Visit::Unmatched => {}
                Visit::Skipped(SkipReason::NotFound(err)) => {
                    stats.skipped += 1;
                    debug!("icons"; "{} on {} (ignoring via `fail_on_error` option)", err, self.page);
                }
                Visit::Replaced(replacement) => {
                    stats.replaced += 1;
                    covered = end;
                    edits.push(Edit {
                        start,
                        end,
                        replacement,
                    });
                }
                Visit::Fatal(err) => return Err(err),
            }
        }

        Ok(Transformed {
            html: apply_edits(html, &edits),
            stats,
        })
    }

    /// Visit one matched element given its full source (`<i ...>...</i>`).
    pub fn visit(&self, element: &str) -> Visit {
        let attrs = Attrs::parse(start_tag_attrs(element));
        let class = attrs.get("class").unwrap_or_default();
        let meta = IconMetadata::parse(class, &self.options.ignored_classes);

        let found = match CanonicalSelector::resolve(&meta) {
            Ok(Some(selector)) => self.lookup.lookup(&selector),
            Ok(None) => return Visit::Unmatched,
            Err(err) => Err(err),
        };

        self.settle(found, &attrs, || {
            (format!(r#"class="{class}""#), meta.to_json())
        })
    }

    /// Shortcode path: `prefix:name` plus explicit attributes.
    ///
    /// `Ok(None)` means the icon was missing and `fail_on_error` is off.
    pub fn shortcode(&self, selector: &str, attrs: &Attrs) -> Result<Option<String>, IconError> {
        let selector: CanonicalSelector = selector.parse()?;

        let visit = self.settle(self.lookup.lookup(&selector), attrs, || {
            let meta = json!({ "prefix": selector.prefix(), "iconName": selector.name() });
            (format!(r#"shortcode "{selector}""#), meta.to_string())
        });

        match visit {
            Visit::Replaced(markup) => Ok(Some(markup)),
            Visit::Skipped(SkipReason::NotFound(err)) => {
                debug!("icons"; "{} on {} (ignoring via `fail_on_error` option)", err, self.page);
                Ok(None)
            }
            Visit::Unmatched => Ok(None),
            Visit::Fatal(err) => Err(err),
        }
    }

    /// Turn a lookup result into a visit: register the symbol and build the
    /// replacement, or skip/abort depending on `fail_on_error`.
    ///
    /// `origin` supplies the diagnostic context, only evaluated on failure.
    fn settle(
        &self,
        found: Result<ResolvedIcon, LookupError>,
        attrs: &Attrs,
        origin: impl FnOnce() -> (String, String),
    ) -> Visit {
        match found {
            Ok(icon) => {
                self.registrar
                    .add_to_page(self.page, &icon.reference_key, &icon.markup);

                let attrs = filter_attrs(
                    merge_attrs(attrs, &self.defaults),
                    &self.options.ignored_classes,
                );
                Visit::Replaced(render_reference(&attrs, &icon.reference_key))
            }
            Err(err) if err.is_not_found() && !self.options.fail_on_error => {
                Visit::Skipped(SkipReason::NotFound(err))
            }
            Err(source) => {
                let (origin, metadata) = origin();
                Visit::Fatal(IconError::Unresolved {
                    origin,
                    metadata,
                    source,
                })
            }
        }
    }
}

/// `<svg ...><use href="#key" xlink:href="#key"></use></svg>`
pub fn render_reference(attrs: &Attrs, reference_key: &str) -> String {
    let target = escape_attr(reference_key);
    format!(
        r##"<svg{}><use href="#{target}" xlink:href="#{target}"></use></svg>"##,
        attrs.render()
    )
}

/// Source byte ranges of elements matching `selector`, in document order.
///
/// Matches inside `<script>`/`<style>` are dropped: `tl` parses their text
/// as markup, but browsers treat it as raw text.
fn match_spans(html: &str, selector: &str) -> Result<Vec<(usize, usize)>, IconError> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|err| IconError::Parse(format!("{err:?}")))?;
    let parser = dom.parser();

    let raw_text: Vec<(usize, usize)> = dom
        .nodes()
        .iter()
        .filter_map(|node| node.as_tag())
        .filter(|tag| is_raw_text_element(&tag.name().as_utf8_str().to_ascii_lowercase()))
        .filter_map(|tag| element_span(html, tag.raw().as_bytes()))
        .collect();

    let matches = dom
        .query_selector(selector)
        .ok_or_else(|| IconError::InvalidMatcher(selector.to_string()))?;

    let mut spans: Vec<_> = matches
        .filter_map(|handle| handle.get(parser))
        .filter_map(|node| node.as_tag())
        .filter_map(|tag| element_span(html, tag.raw().as_bytes()))
        .filter(|&(start, end)| {
            !raw_text
                .iter()
                .any(|&(outer_start, outer_end)| outer_start < start && end <= outer_end)
        })
        .collect();

    spans.sort_unstable();
    spans.dedup();
    Ok(spans)
}

/// Locate a parser-borrowed slice inside `html`.
fn element_span(html: &str, raw: &[u8]) -> Option<(usize, usize)> {
    let base = html.as_ptr() as usize;
    let mut start = (raw.as_ptr() as usize).checked_sub(base)?;
    let end = start.checked_add(raw.len())?;
    if end > html.len() || raw.is_empty() {
        return None;
    }

    // the raw span may begin after the opening bracket
    let bytes = html.as_bytes();
    if bytes[start] != b'<' && start > 0 && bytes[start - 1] == b'<' {
        start -= 1;
    }

    (html.is_char_boundary(start) && html.is_char_boundary(end)).then_some((start, end))
}

/// Attribute text of the start tag: `<i class="x">..` → ` class="x"`.
fn start_tag_attrs(element: &str) -> &str {
    let body = element.strip_prefix('<').unwrap_or(element);
    let name_end = body
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(body.len());
    let rest = &body[name_end..];

    let mut quote = None;
    for (i, c) in rest.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return rest[..i].trim_end_matches('/'),
            _ => {}
        }
    }
    rest
}

/// Splice non-overlapping, sorted edits into `html`.
fn apply_edits(html: &str, edits: &[Edit]) -> String {
    if edits.is_empty() {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    for edit in edits {
        out.push_str(&html[cursor..edit.start]);
        out.push_str(&edit.replacement);
        cursor = edit.end;
    }
    out.push_str(&html[cursor..]);
    out
}
