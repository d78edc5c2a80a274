//! Page build orchestration.
//!
//! Build phases:
//! - **Load** - Read every configured icon catalogue
//! - **Collect** - Gather `*.html` pages under the input directory
//! - **Process** - Rewrite pages in parallel, one bundle bucket per page
//! - **Write** - Mirror pages into the output directory
//! - **Finalize** - Summary logging

use std::{
    fs,
    path::{Component, Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::{Context, Result, anyhow};
use jwalk::WalkDir;
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::{
    bundle::BundleManager,
    config::IconsConfig,
    debug,
    icon::Catalogue,
    log,
    logger::PageProgress,
    pipeline::{PageOutput, PagePipeline},
};

/// Totals over every processed page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    /// Pages whose content changed.
    pub rewritten: usize,
    pub replaced: usize,
    pub skipped: usize,
    pub shortcodes: usize,
    /// Symbols emitted, summed over page bundles.
    pub symbols: usize,
}

impl BuildSummary {
    fn add(&mut self, out: &PageOutput, changed: bool) {
        self.pages += 1;
        self.rewritten += usize::from(changed);
        self.replaced += out.stats.replaced;
        self.skipped += out.stats.skipped;
        self.shortcodes += out.shortcodes;
        self.symbols += out.symbols;
    }
}

/// Build all pages of the input directory.
///
/// `quiet` hides the progress line and the summary; warnings still print.
///
/// Pipeline: load -> collect -> process -> write -> finalize
pub fn build_pages(config: &IconsConfig, quiet: bool) -> Result<BuildSummary> {
    let catalogue = Catalogue::load(&config.catalogue.files).context("Failed to load icon catalogue")?;
    debug!("icons"; "{} selectors from {} catalogue file(s)", catalogue.len(), config.catalogue.files.len());

    let input = &config.build.input;
    if !input.is_dir() {
        return Err(anyhow!("Input directory '{}' not found", input.display()));
    }

    let pages = collect_pages(input);
    if pages.is_empty() {
        log!("warn"; "no html pages found in {}", input.display());
        return Ok(BuildSummary::default());
    }

    let bundle = BundleManager::new(&config.icons.bundle);
    let pipeline = PagePipeline::new(&config.icons, &catalogue, &bundle)
        .context("Invalid shortcode name")?;

    let progress = (!quiet).then(|| PageProgress::new(pages.len()));
    let summary = process_pages(config, &pipeline, &pages, progress.as_ref())?;

    if let Some(p) = progress {
        p.finish();
    }

    if !quiet {
        log_summary(&summary);
    }
    if summary.skipped > 0 {
        log!("warn"; "{} icon element(s) left unchanged, run with --verbose for details", summary.skipped);
    }
    Ok(summary)
}

/// Every `*.html` file under `dir`, sorted for stable output.
fn collect_pages(dir: &Path) -> Vec<PathBuf> {
    let mut pages: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| is_html(path))
        .collect();
    pages.sort();
    pages
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Process pages in parallel, stopping at the first failure.
fn process_pages(
    config: &IconsConfig,
    pipeline: &PagePipeline<'_>,
    pages: &[PathBuf],
    progress: Option<&PageProgress>,
) -> Result<BuildSummary> {
    let has_error = AtomicBool::new(false);
    let failure = Mutex::new(None);

    let results: Vec<Option<(PageOutput, bool)>> = pages
        .par_iter()
        .map(|path| {
            if has_error.load(Ordering::Relaxed) {
                return None;
            }
            match process_page(config, pipeline, path) {
                Ok(result) => {
                    if let Some(p) = progress {
                        p.tick();
                    }
                    Some(result)
                }
                Err(e) => {
                    if !has_error.swap(true, Ordering::Relaxed) {
                        *failure.lock() =
                            Some(e.context(format!("Failed to process {}", path.display())));
                    }
                    None
                }
            }
        })
        .collect();

    if let Some(err) = failure.into_inner() {
        return Err(err);
    }

    let mut summary = BuildSummary::default();
    for (out, changed) in results.iter().flatten() {
        summary.add(out, *changed);
    }
    Ok(summary)
}

/// Rewrite one page; returns its output and whether the content changed.
fn process_page(
    config: &IconsConfig,
    pipeline: &PagePipeline<'_>,
    path: &Path,
) -> Result<(PageOutput, bool)> {
    let input = &config.build.input;
    let html =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let url = page_url(input, path);
    let out = pipeline.process(&url, &html)?;
    let changed = out.html != html;

    // in-place builds leave untouched pages alone
    if changed || !config.build.in_place() {
        let relative = path.strip_prefix(input).unwrap_or(path);
        let dest = config.build.output.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&dest, &out.html)
            .with_context(|| format!("Failed to write {}", dest.display()))?;
    }

    debug!("page"; "{} ({} icons, {} missing)", url, out.stats.replaced + out.shortcodes, out.stats.skipped);
    Ok((out, changed))
}

/// Site URL path of a page: `<input>/blog/post.html` → `/blog/post.html`.
fn page_url(input: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(input).unwrap_or(path);
    let mut url = String::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            url.push('/');
            url.push_str(&part.to_string_lossy());
        }
    }
    if url.is_empty() {
        url.push('/');
    }
    url
}

fn log_summary(summary: &BuildSummary) {
    log!(
        "done";
        "{} icons ({} sprite symbols) in {} of {} pages",
        summary.replaced + summary.shortcodes,
        summary.symbols,
        summary.rewritten,
        summary.pages
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildConfig, CatalogueConfig};
    use crate::icon::catalogue::tests::sample_catalogue_json;
    use tempfile::TempDir;

    const USER_REF: &str =
        r##"<svg><use href="#far-fa-user" xlink:href="#far-fa-user"></use></svg>"##;

    fn site(temp: &TempDir, output: &str) -> IconsConfig {
        let root = temp.path();
        let catalogue = root.join("icons.json");
        fs::write(&catalogue, sample_catalogue_json()).unwrap();

        let mut config = IconsConfig::default();
        config.root = root.to_path_buf();
        config.catalogue = CatalogueConfig {
            files: vec![catalogue],
        };
        config.build = BuildConfig {
            input: root.join("_site"),
            output: root.join(output),
        };
        fs::create_dir_all(&config.build.input).unwrap();
        config
    }

    fn write_page(config: &IconsConfig, relative: &str, html: &str) {
        let path = config.build.input.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, html).unwrap();
    }

    #[test]
    fn test_build_in_place() {
        let temp = TempDir::new().unwrap();
        let config = site(&temp, "_site");
        write_page(
            &config,
            "index.html",
            "<i class=\"fa-regular fa-user\"></i>\n{% getBundle \"fontawesome\" %}",
        );
        write_page(&config, "about/index.html", "<p>no icons</p>");
        write_page(&config, "style.css", ".fa-user {}");

        let summary = build_pages(&config, true).unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.rewritten, 1);
        assert_eq!(summary.replaced, 1);

        let index = fs::read_to_string(config.build.input.join("index.html")).unwrap();
        assert!(index.starts_with(USER_REF));
        assert!(index.contains(r#"<symbol aria-hidden="true""#));
        assert_eq!(
            fs::read_to_string(config.build.input.join("style.css")).unwrap(),
            ".fa-user {}"
        );
    }

    #[test]
    fn test_build_mirrors_into_output() {
        let temp = TempDir::new().unwrap();
        let config = site(&temp, "out");
        write_page(&config, "blog/post.html", "{% icon \"fas:house\" %}");
        write_page(&config, "plain.html", "<p>x</p>");

        let summary = build_pages(&config, true).unwrap();
        assert_eq!(summary.shortcodes, 1);

        let post = fs::read_to_string(config.build.output.join("blog/post.html")).unwrap();
        assert!(post.starts_with(r##"<svg><use href="#fas-fa-house""##));
        // unchanged pages are still copied when not building in place
        assert_eq!(
            fs::read_to_string(config.build.output.join("plain.html")).unwrap(),
            "<p>x</p>"
        );
        // source is left alone
        assert_eq!(
            fs::read_to_string(config.build.input.join("blog/post.html")).unwrap(),
            "{% icon \"fas:house\" %}"
        );
    }

    #[test]
    fn test_bundles_are_per_page() {
        let temp = TempDir::new().unwrap();
        let config = site(&temp, "_site");
        let placeholder = "{% getBundle \"fontawesome\" %}";
        write_page(&config, "a.html", &format!("<i class=\"fas fa-house\"></i>{placeholder}"));
        write_page(&config, "b.html", &format!("<i class=\"far fa-user\"></i>{placeholder}"));

        let summary = build_pages(&config, true).unwrap();
        assert_eq!(summary.symbols, 2);

        let a = fs::read_to_string(config.build.input.join("a.html")).unwrap();
        let b = fs::read_to_string(config.build.input.join("b.html")).unwrap();
        assert!(a.contains(r#"id="fas-fa-house""#) && !a.contains(r#"id="far-fa-user""#));
        assert!(b.contains(r#"id="far-fa-user""#) && !b.contains(r#"id="fas-fa-house""#));
    }

    #[test]
    fn test_missing_icon_fails_build() {
        let temp = TempDir::new().unwrap();
        let mut config = site(&temp, "_site");
        config.icons.fail_on_error = true;
        let html = r#"<i class="fa-solid fa-left"></i>"#;
        write_page(&config, "index.html", html);

        let err = build_pages(&config, true).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("index.html"));
        assert!(message.contains("Could not find icon: fas:left"));
        assert_eq!(
            fs::read_to_string(config.build.input.join("index.html")).unwrap(),
            html
        );
    }

    #[test]
    fn test_missing_input_dir() {
        let temp = TempDir::new().unwrap();
        let mut config = site(&temp, "_site");
        config.build.input = temp.path().join("nope");
        let err = build_pages(&config, true).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_bad_catalogue_fails_before_pages() {
        let temp = TempDir::new().unwrap();
        let config = site(&temp, "_site");
        fs::write(&config.catalogue.files[0], "{ not json").unwrap();
        let err = build_pages(&config, true).unwrap_err();
        assert!(format!("{err:#}").contains("icon catalogue"));
    }

    #[test]
    fn test_page_url() {
        let input = Path::new("/site/_site");
        assert_eq!(page_url(input, Path::new("/site/_site/index.html")), "/index.html");
        assert_eq!(
            page_url(input, Path::new("/site/_site/blog/post.html")),
            "/blog/post.html"
        );
    }

    #[test]
    fn test_collect_pages_sorted_html_only() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::create_dir_all(dir.join("b")).unwrap();
        fs::write(dir.join("b/index.html"), "").unwrap();
        fs::write(dir.join("a.HTML"), "").unwrap();
        fs::write(dir.join("feed.xml"), "").unwrap();

        let pages = collect_pages(dir);
        assert_eq!(pages, vec![dir.join("a.HTML"), dir.join("b/index.html")]);
    }
}
