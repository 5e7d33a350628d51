//! Inline text decoration: abbreviations and bare URL linking.

use std::borrow::Cow;
use std::fmt::Write;
use std::sync::LazyLock;

use mdtf_directives::{DirectiveSet, PropertyList};
use regex::{Regex, RegexBuilder};

use crate::engine::EngineError;
use crate::util::{escape_html, is_external_url, merge_attributes, write_attributes};

/// Bare `http(s)://` URL, trimmed back to a word boundary plus trailing slashes.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bhttps?://[^\s<]+\b/*").unwrap());

/// Abbreviation definition line: `*[HTML]: HyperText Markup Language`.
static ABBR_DEFINITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\[([^\]]+)\]:[ \t]*(.*?)[ \t]*$").unwrap());

/// Compiled abbreviation patterns are capped to keep huge lists from
/// exhausting memory.
const ABBREVIATION_REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Strip `*[X]: expansion` lines from a document.
///
/// Returns the remaining text and the abbreviations in definition order.
/// Lines inside fenced code blocks are left alone.
pub(crate) fn extract_abbreviation_definitions(text: &str) -> (Cow<'_, str>, PropertyList) {
    let mut definitions = PropertyList::new();
    if !text.contains("*[") {
        return (Cow::Borrowed(text), definitions);
    }

    let mut body = String::with_capacity(text.len());
    // Marker character and run length of the open fence.
    let mut fence: Option<(char, usize)> = None;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);

        match (fence, fence_marker(content)) {
            (None, Some((marker, run, _))) => {
                fence = Some((marker, run));
                body.push_str(line);
                continue;
            }
            (Some((open, len)), Some((marker, run, info)))
                if marker == open && run >= len && info.is_empty() =>
            {
                fence = None;
                body.push_str(line);
                continue;
            }
            _ => {}
        }

        if fence.is_none()
            && let Some(caps) = ABBR_DEFINITION_RE.captures(content)
        {
            definitions.insert(caps[1].trim(), &caps[2]);
            continue;
        }
        body.push_str(line);
    }

    (Cow::Owned(body), definitions)
}

/// Parse a fence line into its marker character, run length and info string.
fn fence_marker(line: &str) -> Option<(char, usize, &str)> {
    let trimmed = line.trim_start();
    let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let run = trimmed.len() - trimmed.trim_start_matches(marker).len();
    (run >= 3).then(|| (marker, run, trimmed[run..].trim()))
}

/// Rewrites plain text runs into HTML with `<abbr>` and autolinked URLs.
pub(crate) struct TextDecorator {
    abbreviations: Option<(Regex, PropertyList)>,
    link_urls: bool,
    url_attributes: PropertyList,
}

impl TextDecorator {
    /// Build a decorator for one render call.
    pub(crate) fn new(
        abbreviations: PropertyList,
        directives: &DirectiveSet,
    ) -> Result<Self, EngineError> {
        let abbreviations = if abbreviations.keys().any(|k| !k.is_empty()) {
            Some((abbreviation_regex(&abbreviations)?, abbreviations))
        } else {
            None
        };

        // Autolinked URLs are always absolute, so both attribute sets apply.
        let mut url_attributes = directives.link_attributes().clone();
        merge_attributes(&mut url_attributes, directives.external_link_attributes());

        Ok(Self {
            abbreviations,
            link_urls: directives.urls_linked(),
            url_attributes,
        })
    }

    /// Decorate `text`, returning escaped HTML, or `None` when nothing changed.
    ///
    /// URLs are not linked when `in_link` is set.
    pub(crate) fn decorate(&self, text: &str, in_link: bool) -> Option<String> {
        if self.abbreviations.is_none() && (!self.link_urls || in_link) {
            return None;
        }

        let mut out = String::with_capacity(text.len() + 32);
        let mut changed = false;
        let mut last = 0;

        if self.link_urls && !in_link {
            for m in URL_RE.find_iter(text) {
                self.push_abbreviated(&mut out, &text[last..m.start()]);
                self.push_url(&mut out, m.as_str());
                changed = true;
                last = m.end();
            }
        }
        changed |= self.push_abbreviated(&mut out, &text[last..]);

        changed.then_some(out)
    }

    /// Push escaped `segment` with abbreviations wrapped; true if any matched.
    fn push_abbreviated(&self, out: &mut String, segment: &str) -> bool {
        let Some((regex, expansions)) = &self.abbreviations else {
            out.push_str(&escape_html(segment));
            return false;
        };

        let mut matched = false;
        let mut last = 0;
        for m in regex.find_iter(segment) {
            out.push_str(&escape_html(&segment[last..m.start()]));
            let title = expansions.get(m.as_str()).unwrap_or_default();
            write!(
                out,
                r#"<abbr title="{}">{}</abbr>"#,
                escape_html(title),
                escape_html(m.as_str())
            )
            .unwrap();
            matched = true;
            last = m.end();
        }
        out.push_str(&escape_html(&segment[last..]));
        matched
    }

    fn push_url(&self, out: &mut String, url: &str) {
        let mut attrs = PropertyList::new();
        attrs.insert("href", url);
        if is_external_url(url) {
            merge_attributes(&mut attrs, &self.url_attributes);
        }
        out.push_str("<a");
        write_attributes(out, &attrs);
        write!(out, ">{}</a>", escape_html(url)).unwrap();
    }
}

/// Whole-word alternation of all abbreviations, longest first.
fn abbreviation_regex(abbreviations: &PropertyList) -> Result<Regex, regex::Error> {
    let mut keys: Vec<&str> = abbreviations.keys().filter(|k| !k.is_empty()).collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let alternation = keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
        .size_limit(ABBREVIATION_REGEX_SIZE_LIMIT)
        .build()
}

#[cfg(test)]
mod tests {
    use mdtf_directives::{ConfigSnapshot, compile};
    use pretty_assertions::assert_eq;

    use super::*;

    fn decorator(config: &ConfigSnapshot) -> TextDecorator {
        let directives = compile(config).unwrap();
        TextDecorator::new(directives.abbreviations().clone(), &directives).unwrap()
    }

    #[test]
    fn test_extract_definitions() {
        let text = "Intro\n*[HTML]: HyperText Markup Language\nThe HTML standard\n";
        let (body, defs) = extract_abbreviation_definitions(text);
        assert_eq!(body, "Intro\nThe HTML standard\n");
        assert_eq!(defs.get("HTML"), Some("HyperText Markup Language"));
    }

    #[test]
    fn test_extract_definitions_skips_fenced_code() {
        let text = "```\n*[X]: kept\n```\n*[Y]: removed\n";
        let (body, defs) = extract_abbreviation_definitions(text);
        assert_eq!(body, "```\n*[X]: kept\n```\n");
        assert_eq!(defs.keys().collect::<Vec<_>>(), vec!["Y"]);
    }

    #[test]
    fn test_extract_definitions_longer_fence_not_closed_by_shorter() {
        let text = "````\n```\n*[X]: kept in code\n````\n\nX here\n";
        let (body, defs) = extract_abbreviation_definitions(text);
        assert_eq!(body, text);
        assert!(defs.is_empty());
    }

    #[test]
    fn test_extract_definitions_fence_with_info_does_not_close() {
        let text = "~~~\n~~~rust\n*[X]: kept\n~~~\n*[Y]: removed\n";
        let (body, defs) = extract_abbreviation_definitions(text);
        assert_eq!(body, "~~~\n~~~rust\n*[X]: kept\n~~~\n");
        assert_eq!(defs.keys().collect::<Vec<_>>(), vec!["Y"]);
    }

    #[test]
    fn test_fence_marker() {
        assert_eq!(fence_marker("```rust"), Some(('`', 3, "rust")));
        assert_eq!(fence_marker("  ~~~~"), Some(('~', 4, "")));
        assert_eq!(fence_marker("``"), None);
        assert_eq!(fence_marker("text"), None);
    }

    #[test]
    fn test_extract_definitions_borrowed_when_absent() {
        let (body, defs) = extract_abbreviation_definitions("plain text");
        assert!(matches!(body, Cow::Borrowed(_)));
        assert!(defs.is_empty());
    }

    #[test]
    fn test_abbreviation_wrapping() {
        let d = decorator(
            &ConfigSnapshot::new()
                .with("abbreviations", "HTML=HyperText Markup Language")
                .with("setUrlsLinked", false),
        );
        assert_eq!(
            d.decorate("Write HTML & CSS", false).as_deref(),
            Some(r#"Write <abbr title="HyperText Markup Language">HTML</abbr> &amp; CSS"#)
        );
    }

    #[test]
    fn test_abbreviation_whole_words_only() {
        let d = decorator(
            &ConfigSnapshot::new()
                .with("abbreviations", "CSS=Cascading Style Sheets")
                .with("setUrlsLinked", false),
        );
        assert_eq!(d.decorate("SCSS files", false), None);
    }

    #[test]
    fn test_longest_abbreviation_wins() {
        let d = decorator(
            &ConfigSnapshot::new()
                .with("abbreviations", "HTML=Markup\nHTML5=Markup five")
                .with("setUrlsLinked", false),
        );
        assert_eq!(
            d.decorate("HTML5", false).as_deref(),
            Some(r#"<abbr title="Markup five">HTML5</abbr>"#)
        );
    }

    #[test]
    fn test_url_linking() {
        let d = decorator(&ConfigSnapshot::new().with("externalLinkAttributes", "rel=nofollow"));
        assert_eq!(
            d.decorate("See https://example.com/docs. Thanks", false)
                .as_deref(),
            Some(
                r#"See <a href="https://example.com/docs" rel="nofollow">https://example.com/docs</a>. Thanks"#
            )
        );
    }

    #[test]
    fn test_abbreviation_before_url() {
        let d = decorator(&ConfigSnapshot::new().with("abbreviations", "HTML=Markup"));
        assert_eq!(
            d.decorate("HTML at https://example.com", false).as_deref(),
            Some(
                r#"<abbr title="Markup">HTML</abbr> at <a href="https://example.com">https://example.com</a>"#
            )
        );
    }

    #[test]
    fn test_no_url_linking_inside_links() {
        let d = decorator(&ConfigSnapshot::new());
        assert_eq!(d.decorate("https://example.com", true), None);
    }

    #[test]
    fn test_nothing_to_do_returns_none() {
        let d = decorator(&ConfigSnapshot::new());
        assert_eq!(d.decorate("no links here", false), None);
    }
}
