//! HTML text helpers.
//!
//! Attribute values are read raw from the page source, decoded with
//! [`unescape`] and written back through [`escape_attr`], so a value that
//! is passed through untouched renders the same as before.

use std::borrow::Cow;

// =============================================================================
// Escaping
// =============================================================================

fn entity_for(c: char) -> Option<&'static str> {
    Some(match c {
        '&' => "&amp;",
        '<' => "&lt;",
        '>' => "&gt;",
        '"' => "&quot;",
        '\'' => "&#39;",
        _ => return None,
    })
}

/// Escape markup-significant characters. Borrows when nothing needs escaping.
pub fn escape(s: &str) -> Cow<'_, str> {
    let Some(first) = s.find(|c| entity_for(c).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 16);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match entity_for(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape a value placed inside a double-quoted attribute.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape(s)
}

// =============================================================================
// Unescaping
// =============================================================================

/// Longest entity body we try to decode (`#x10FFFF`, `nbsp`, ...).
const MAX_ENTITY_LEN: usize = 10;

/// Decode character references in `s`.
///
/// Understands the common named entities plus decimal and hex references.
/// Anything else, including a bare `&`, is kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];

        let reference = tail
            .find(';')
            .filter(|&end| (1..=MAX_ENTITY_LEN).contains(&end))
            .and_then(|end| decode_reference(&tail[..end]).map(|c| (c, end)));

        if let Some((c, end)) = reference {
            out.push(c);
            rest = &tail[end + 1..];
        } else {
            out.push('&');
            rest = tail;
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn decode_reference(body: &str) -> Option<char> {
    let named = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        _ => {
            let digits = body.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            return char::from_u32(code);
        }
    };
    Some(named)
}

// =============================================================================
// Elements
// =============================================================================

/// Elements whose content is raw text rather than markup.
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

// =============================================================================
// Start-tag attributes
// =============================================================================

/// Split start-tag attribute text into `(name, raw value)` pairs in source
/// order.
///
/// `class="fa-solid fa-user" title='Home' hidden` yields
/// `[("class", "fa-solid fa-user"), ("title", "Home"), ("hidden", "")]`.
/// Values keep their entities; stray `/` (self-closing tags) is skipped.
pub fn parse_attributes(s: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut it = s.chars().peekable();

    loop {
        while it.next_if(|c| c.is_whitespace() || *c == '/').is_some() {}
        let Some(first) = it.next() else {
            break;
        };

        let mut name = String::from(first);
        while let Some(c) = it.next_if(|c| *c != '=' && !c.is_whitespace()) {
            name.push(c);
        }

        while it.next_if(|c| c.is_whitespace()).is_some() {}
        if it.next_if_eq(&'=').is_none() {
            pairs.push((name, String::new()));
            continue;
        }
        while it.next_if(|c| c.is_whitespace()).is_some() {}

        let value: String = match it.next_if(|c| *c == '"' || *c == '\'') {
            Some(quote) => it.by_ref().take_while(|c| *c != quote).collect(),
            None => std::iter::from_fn(|| it.next_if(|c| !c.is_whitespace())).collect(),
        };
        pairs.push((name, value));
    }

    pairs
}
