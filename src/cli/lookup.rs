//! `lookup` command: resolve a single icon against the configured catalogues.
//!
//! Accepts either a canonical selector (`far:user`) or a class list as it
//! would appear on a page (`"fa-regular fa-user"`).

use anyhow::{Context, Result, anyhow};

use crate::{
    config::IconsConfig,
    icon::{CanonicalSelector, Catalogue, IconLookup, IconMetadata, ResolvedIcon},
    log,
};

/// Resolve `query` and print the symbol markup to stdout.
pub fn lookup_icon(query: &str, config: &IconsConfig) -> Result<()> {
    let selector = parse_query(query, &config.icons.ignored_classes)?;
    let catalogue =
        Catalogue::load(&config.catalogue.files).context("Failed to load icon catalogue")?;

    let icon = resolve(&catalogue, &selector)?;
    log!("icons"; "{} -> #{}", selector, icon.reference_key);
    println!("{}", icon.markup);
    Ok(())
}

fn resolve(lookup: &dyn IconLookup, selector: &CanonicalSelector) -> Result<ResolvedIcon> {
    Ok(lookup.lookup(selector)?)
}

/// `prefix:name`, or a class list resolved the way page elements are.
fn parse_query(query: &str, whitelist: &[String]) -> Result<CanonicalSelector> {
    if query.contains(':') {
        return Ok(query.parse()?);
    }

    let meta = IconMetadata::parse(query, whitelist);
    CanonicalSelector::resolve(&meta)?
        .ok_or_else(|| anyhow!("`{query}` does not name an icon (need a style and an icon name)"))
}
