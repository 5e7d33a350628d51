//! Shared helpers for HTML generation.

use std::fmt::Write;

use mdtf_directives::PropertyList;
use pulldown_cmark_escape::escape_href;

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Substitute `%s` placeholders in order.
///
/// Placeholders beyond the supplied arguments become empty.
pub(crate) fn fill_template(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len() + 16);
    let mut args = args.iter();
    let mut parts = template.split("%s");

    if let Some(first) = parts.next() {
        result.push_str(first);
    }
    for part in parts {
        result.push_str(args.next().copied().unwrap_or_default());
        result.push_str(part);
    }
    result
}

/// Whether a URL points off-site (`scheme://...` or protocol-relative `//...`).
pub(crate) fn is_external_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    url.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Append ` name="value"` pairs to `out`, escaping values.
///
/// URL attributes are percent-encoded the way `pulldown_cmark::html` does.
/// Pairs whose name is not a valid attribute name are skipped.
pub(crate) fn write_attributes(out: &mut String, attrs: &PropertyList) {
    for (name, value) in attrs.iter() {
        if !is_attribute_name(name) {
            tracing::warn!(attribute = name, "Skipping invalid attribute name");
            continue;
        }
        write!(out, r#" {name}=""#).unwrap();
        if matches!(name, "href" | "src") {
            escape_href(&mut *out, value).unwrap();
        } else {
            out.push_str(&escape_html(value));
        }
        out.push('"');
    }
}

/// HTML attribute name: non-empty, no whitespace, controls, quotes, `<`, `>`, `/` or `=`.
fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace()
                && !c.is_control()
                && !matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

/// ` class="..."`, or nothing for an empty class.
pub(crate) fn class_attribute(class: &str) -> String {
    if class.is_empty() {
        String::new()
    } else {
        format!(r#" class="{}""#, escape_html(class))
    }
}

/// Merge configured attributes over generated ones.
pub(crate) fn merge_attributes(attrs: &mut PropertyList, extra: &PropertyList) {
    for (name, value) in extra.iter() {
        attrs.insert(name, value);
    }
}
