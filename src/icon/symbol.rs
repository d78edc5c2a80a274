//! Sprite symbol markup for one icon definition.

use std::fmt::Write;

use super::catalogue::{IconDefinition, PathData};
use crate::utils::html::escape_attr;

/// Render the hidden `<svg><symbol>` wrapper registered in the page bundle.
///
/// The symbol `id` is the reference key, so `<use href="#key">` resolves
/// against it.
pub fn render_symbol(def: &IconDefinition, reference_key: &str) -> String {
    let prefix = escape_attr(&def.prefix);
    let name = escape_attr(&def.icon_name);

    let mut out = String::with_capacity(256 + def.path_len());
    out.push_str(r#"<svg style="display: none;">"#);
    let _ = write!(
        out,
        r#"<symbol aria-hidden="true" focusable="false" data-prefix="{prefix}" data-icon="{name}" class="svg-inline--fa fa-{name}" role="img" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" id="{}">"#,
        def.width,
        def.height,
        escape_attr(reference_key),
    );

    match &def.path {
        PathData::Single(d) => push_path(&mut out, None, d),
        PathData::Duotone(layers) => {
            let (secondary, primary) = match layers.as_slice() {
                [secondary, primary, ..] => (secondary.as_str(), primary.as_str()),
                [only] => ("", only.as_str()),
                [] => ("", ""),
            };
            out.push_str(r#"<g class="fa-duotone-group">"#);
            push_path(&mut out, Some("fa-secondary"), secondary);
            push_path(&mut out, Some("fa-primary"), primary);
            out.push_str("</g>");
        }
    }

    out.push_str("</symbol></svg>");
    out
}

fn push_path(out: &mut String, class: Option<&str>, d: &str) {
    out.push_str("<path");
    if let Some(class) = class {
        let _ = write!(out, r#" class="{class}""#);
    }
    let _ = write!(out, r#" fill="currentColor" d="{}"></path>"#, escape_attr(d));
}
