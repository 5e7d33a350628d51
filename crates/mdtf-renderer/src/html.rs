//! HTML engine built on `pulldown-cmark`.
//!
//! Markdown parsing is left to `pulldown-cmark`. The engine rewrites the
//! event stream so that links, images, code blocks, tables, footnotes and
//! void elements follow the [`DirectiveSet`], then hands the result to
//! `pulldown_cmark::html::push_html`.

use std::collections::HashMap;
use std::fmt::Write;

use mdtf_directives::{DirectiveSet, PropertyList};
use pulldown_cmark::{
    Alignment, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd,
    TextMergeStream,
};

use crate::engine::{EngineError, RenderEngine};
use crate::text::{TextDecorator, extract_abbreviation_definitions};
use crate::util::{
    class_attribute, escape_html, fill_template, is_external_url, merge_attributes,
    write_attributes,
};

/// Class template used when `codeClass` is blank.
const DEFAULT_CODE_CLASS: &str = "language-%s";

/// Markdown-to-HTML engine.
///
/// Supports the extra syntax users of "Markdown Extra" expect: tables,
/// footnotes, definition lists, heading attributes (`## Title {#id .class}`),
/// abbreviations (`*[HTML]: HyperText Markup Language`), strikethrough and
/// task lists.
///
/// # Example
///
/// ```
/// use mdtf_directives::{ConfigSnapshot, compile};
/// use mdtf_renderer::{HtmlEngine, RenderEngine};
///
/// let directives = compile(&ConfigSnapshot::new().with("html5ElementSuffix", true)).unwrap();
/// let html = HtmlEngine::new().render("a  \nb", &directives).unwrap();
/// assert_eq!(html, "<p>a<br>\nb</p>\n");
/// ```
#[derive(Clone, Debug)]
pub struct HtmlEngine {
    options: Options,
}

impl Default for HtmlEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_HEADING_ATTRIBUTES
                | Options::ENABLE_DEFINITION_LIST,
        }
    }

    /// Parser options used for every render.
    #[must_use]
    pub fn options(&self) -> Options {
        self.options
    }
}

impl RenderEngine for HtmlEngine {
    fn render(&self, text: &str, directives: &DirectiveSet) -> Result<String, EngineError> {
        let (body, inline_abbreviations) = extract_abbreviation_definitions(text);

        let mut abbreviations = directives.abbreviations().clone();
        merge_attributes(&mut abbreviations, &inline_abbreviations);
        let decorator = TextDecorator::new(abbreviations, directives)?;

        let parser = TextMergeStream::new(Parser::new_ext(&body, self.options));
        let events = Rewriter::new(directives, &decorator).rewrite(parser);

        let mut html = String::with_capacity(body.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());

        tracing::debug!(
            input_len = text.len(),
            output_len = html.len(),
            "Rendered markdown"
        );

        Ok(html)
    }
}

/// Image being collected; alt text arrives as inner events.
struct PendingImage {
    src: String,
    title: String,
    alt: String,
    /// Nested images inside the alt text.
    depth: usize,
}

#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell: usize,
}

/// Footnote bookkeeping for one document.
#[derive(Default)]
struct Footnotes<'a> {
    /// Labels in order of first reference, with their reference counts.
    referenced: Vec<(String, usize)>,
    /// Rewritten definition bodies by label.
    definitions: HashMap<String, Vec<Event<'a>>>,
    /// Definition currently being collected.
    current: Option<(String, Vec<Event<'a>>)>,
}

impl Footnotes<'_> {
    /// Record a reference; returns the footnote number and the occurrence count.
    fn reference(&mut self, label: &str) -> (usize, usize) {
        if let Some(pos) = self.referenced.iter().position(|(l, _)| l == label) {
            let entry = &mut self.referenced[pos];
            entry.1 += 1;
            (pos + 1, entry.1)
        } else {
            self.referenced.push((label.to_owned(), 1));
            (self.referenced.len(), 1)
        }
    }
}

/// Per-render event rewriter.
struct Rewriter<'a, 'r> {
    directives: &'r DirectiveSet,
    decorator: &'r TextDecorator,
    suffix: &'static str,
    events: Vec<Event<'a>>,
    footnotes: Footnotes<'a>,
    image: Option<PendingImage>,
    table: TableState,
    in_code_block: bool,
    link_depth: usize,
}

impl<'a, 'r> Rewriter<'a, 'r> {
    fn new(directives: &'r DirectiveSet, decorator: &'r TextDecorator) -> Self {
        Self {
            directives,
            decorator,
            suffix: directives.element_closing_style().suffix(),
            events: Vec::new(),
            footnotes: Footnotes::default(),
            image: None,
            table: TableState::default(),
            in_code_block: false,
            link_depth: 0,
        }
    }

    fn rewrite<I>(mut self, events: I) -> Vec<Event<'a>>
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process(event);
        }
        self.append_footnotes();
        self.events
    }

    /// Push an event to the open footnote definition, or the document.
    fn emit(&mut self, event: Event<'a>) {
        match &mut self.footnotes.current {
            Some((_, body)) => body.push(event),
            None => self.events.push(event),
        }
    }

    fn emit_html(&mut self, html: String) {
        self.emit(Event::Html(CowStr::from(html)));
    }

    fn process(&mut self, event: Event<'a>) {
        if self.image.is_some() {
            self.collect_image(event);
            return;
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(text),
            Event::SoftBreak if self.directives.breaks_enabled() => self.line_break(),
            Event::HardBreak => self.line_break(),
            Event::Rule => {
                let html = format!("<hr{}\n", self.suffix);
                self.emit_html(html);
            }
            Event::TaskListMarker(checked) => {
                let checked = if checked { r#" checked="checked""# } else { "" };
                let html = format!(
                    r#"<input type="checkbox" disabled="disabled"{checked}{} "#,
                    self.suffix
                );
                self.emit_html(html);
            }
            Event::FootnoteReference(label) => self.footnote_reference(&label),
            other => self.emit(other),
        }
    }

    fn start_tag(&mut self, tag: Tag<'a>) {
        match tag {
            Tag::CodeBlock(kind) => {
                self.in_code_block = true;
                let html = self.code_block_open(&kind);
                self.emit_html(html);
            }
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                self.link_depth += 1;
                let html = self.link_open(link_type, &dest_url, &title);
                self.emit_html(html);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some(PendingImage {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                    alt: String::new(),
                    depth: 0,
                });
            }
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments,
                    ..TableState::default()
                };
                let html = format!("<table{}>\n", self.table_attributes());
                self.emit_html(html);
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell = 0;
                self.emit_html("<thead>\n<tr>\n".to_owned());
            }
            Tag::TableRow => {
                self.table.cell = 0;
                self.emit_html("<tr>\n".to_owned());
            }
            Tag::TableCell => {
                let element = if self.table.in_head { "th" } else { "td" };
                let html = format!("<{element}{}>", self.cell_alignment());
                self.emit_html(html);
            }
            Tag::FootnoteDefinition(label) => {
                self.footnotes.current = Some((label.into_string(), Vec::new()));
            }
            other => self.emit(Event::Start(other)),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.emit_html("</code></pre>\n".to_owned());
            }
            TagEnd::Link => {
                self.link_depth = self.link_depth.saturating_sub(1);
                self.emit_html("</a>".to_owned());
            }
            TagEnd::Table => self.emit_html("</tbody>\n</table>\n".to_owned()),
            TagEnd::TableHead => {
                self.table.in_head = false;
                self.emit_html("</tr>\n</thead>\n<tbody>\n".to_owned());
            }
            TagEnd::TableRow => self.emit_html("</tr>\n".to_owned()),
            TagEnd::TableCell => {
                let element = if self.table.in_head { "th" } else { "td" };
                self.table.cell += 1;
                self.emit_html(format!("</{element}>\n"));
            }
            TagEnd::FootnoteDefinition => {
                if let Some((label, body)) = self.footnotes.current.take() {
                    self.footnotes.definitions.entry(label).or_insert(body);
                }
            }
            other => self.emit(Event::End(other)),
        }
    }

    fn text(&mut self, text: CowStr<'a>) {
        if self.in_code_block {
            self.emit(Event::Text(text));
            return;
        }
        match self.decorator.decorate(&text, self.link_depth > 0) {
            Some(html) => self.emit_html(html),
            None => self.emit(Event::Text(text)),
        }
    }

    fn line_break(&mut self) {
        let html = format!("<br{}\n", self.suffix);
        self.emit_html(html);
    }

    /// Accumulate alt text until the image closes.
    fn collect_image(&mut self, event: Event<'a>) {
        let Some(image) = self.image.as_mut() else {
            return;
        };
        match event {
            Event::Start(Tag::Image { .. }) => image.depth += 1,
            Event::End(TagEnd::Image) if image.depth > 0 => image.depth -= 1,
            Event::End(TagEnd::Image) => {
                if let Some(image) = self.image.take() {
                    let html = self.image_tag(&image);
                    self.emit_html(html);
                }
            }
            Event::Text(text) | Event::Code(text) => image.alt.push_str(&text),
            Event::SoftBreak | Event::HardBreak => image.alt.push(' '),
            _ => {}
        }
    }

    fn code_block_open(&self, kind: &CodeBlockKind<'_>) -> String {
        let language = match kind {
            CodeBlockKind::Fenced(info) => info
                .split(|c: char| c.is_whitespace() || c == '{')
                .next()
                .filter(|lang| !lang.is_empty()),
            CodeBlockKind::Indented => None,
        };

        let Some(language) = language else {
            return "<pre><code>".to_owned();
        };

        let template = match self.directives.code_class() {
            "" => DEFAULT_CODE_CLASS,
            template => template,
        };
        let class = class_attribute(&fill_template(template, &[language]));

        if self.directives.code_block_attr_on_parent() {
            format!("<pre{class}><code>")
        } else {
            format!("<pre><code{class}>")
        }
    }

    fn link_open(&self, link_type: LinkType, dest_url: &str, title: &str) -> String {
        let href = if link_type == LinkType::Email {
            format!("mailto:{dest_url}")
        } else {
            dest_url.to_owned()
        };

        let mut attrs = PropertyList::new();
        attrs.insert("href", href.as_str());
        if !title.is_empty() {
            attrs.insert("title", title);
        }
        merge_attributes(&mut attrs, self.directives.link_attributes());
        if is_external_url(&href) {
            merge_attributes(&mut attrs, self.directives.external_link_attributes());
        }

        let mut html = String::from("<a");
        write_attributes(&mut html, &attrs);
        html.push('>');
        html
    }

    fn image_tag(&self, image: &PendingImage) -> String {
        let mut attrs = PropertyList::new();
        attrs.insert("src", image.src.as_str());
        attrs.insert("alt", image.alt.as_str());
        if !image.title.is_empty() {
            attrs.insert("title", image.title.as_str());
        }
        merge_attributes(&mut attrs, self.directives.image_attributes());
        if is_external_url(&image.src) {
            merge_attributes(&mut attrs, self.directives.external_image_attributes());
        }

        let mut html = String::from("<img");
        write_attributes(&mut html, &attrs);
        html.push_str(self.suffix);
        html
    }

    /// `tableClass`: a number sets `border`, anything else the class.
    fn table_attributes(&self) -> String {
        match self.directives.table_class() {
            Some(class) if !class.is_empty() && class.bytes().all(|b| b.is_ascii_digit()) => {
                format!(r#" border="{class}""#)
            }
            Some(class) => class_attribute(class),
            None => String::new(),
        }
    }

    fn cell_alignment(&self) -> String {
        let alignment = match self.table.alignments.get(self.table.cell) {
            Some(Alignment::Left) => "left",
            Some(Alignment::Center) => "center",
            Some(Alignment::Right) => "right",
            Some(Alignment::None) | None => return String::new(),
        };
        match self.directives.table_align_class() {
            Some(template) => class_attribute(&fill_template(template, &[alignment])),
            None => format!(r#" style="text-align: {alignment};""#),
        }
    }

    fn footnote_reference(&mut self, label: &str) {
        let (number, count) = self.footnotes.reference(label);
        let number = number.to_string();

        let link_id = fill_template(self.directives.footnote_link_id(), &[label]);
        let backlink_id = fill_template(
            self.directives.footnote_backlink_id(),
            &[&count.to_string(), label],
        );
        let text = match self.directives.footnote_link_text() {
            Some(template) => fill_template(template, &[&number]),
            None => number,
        };

        let html = format!(
            r##"<sup id="{}"><a href="#{}"{}>{text}</a></sup>"##,
            escape_html(&backlink_id),
            escape_html(&link_id),
            class_attribute(self.directives.footnote_link_class()),
        );
        self.emit_html(html);
    }

    /// Append the footnote list for every referenced, defined footnote.
    fn append_footnotes(&mut self) {
        // An unterminated definition still counts.
        if let Some((label, body)) = self.footnotes.current.take() {
            self.footnotes.definitions.entry(label).or_insert(body);
        }

        let referenced = std::mem::take(&mut self.footnotes.referenced);
        let mut items = Vec::new();
        for (label, count) in referenced {
            if let Some(body) = self.footnotes.definitions.remove(&label) {
                items.push((label, count, body));
            }
        }
        if items.is_empty() {
            return;
        }

        let directives = self.directives;
        self.events.push(Event::Html(CowStr::from(format!(
            "<div{}>\n<hr{}\n<ol>\n",
            class_attribute(directives.footnote_class()),
            self.suffix
        ))));

        for (label, count, mut body) in items {
            let link_id = fill_template(directives.footnote_link_id(), &[&label]);
            self.events.push(Event::Html(CowStr::from(format!(
                "<li id=\"{}\">\n",
                escape_html(&link_id)
            ))));

            let backlinks = Event::Html(CowStr::from(backlinks_html(directives, &label, count)));
            match body
                .iter()
                .rposition(|e| matches!(e, Event::End(TagEnd::Paragraph)))
            {
                Some(pos) => body.insert(pos, backlinks),
                None => body.push(backlinks),
            }

            self.events.extend(body);
            self.events.push(Event::Html(CowStr::from("</li>\n")));
        }

        self.events
            .push(Event::Html(CowStr::from("</ol>\n</div>\n")));
    }
}

/// One backlink per reference to a footnote.
fn backlinks_html(directives: &DirectiveSet, label: &str, count: usize) -> String {
    let mut html = String::new();
    for occurrence in 1..=count {
        let backlink_id = fill_template(
            directives.footnote_backlink_id(),
            &[&occurrence.to_string(), label],
        );
        write!(
            html,
            r##"&#160;<a href="#{}" rev="footnote"{}>{}</a>"##,
            escape_html(&backlink_id),
            class_attribute(directives.footnote_backlink_class()),
            directives.footnote_backlink_text()
        )
        .unwrap();
    }
    html
}
