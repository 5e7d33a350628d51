//! The compiled, immutable option set handed to the rendering engine.

use serde::Serialize;

use crate::property_list::PropertyList;
use crate::schema::SCHEMA;

/// How void elements (`<br>`, `<hr>`, `<img>`) are closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementClosingStyle {
    /// XHTML style: `<br />`.
    #[default]
    SelfClosingSlash,
    /// HTML5 style: `<br>`.
    BareAngleBracket,
}

impl ElementClosingStyle {
    /// Map the `html5ElementSuffix` switch to a closing style.
    ///
    /// Enabling the HTML5 option removes the XHTML self-closing slash.
    #[must_use]
    pub fn from_html5_suffix(html5: bool) -> Self {
        if html5 {
            Self::BareAngleBracket
        } else {
            Self::SelfClosingSlash
        }
    }

    /// Text that ends a void element's start tag.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::SelfClosingSlash => " />",
            Self::BareAngleBracket => ">",
        }
    }
}

/// Complete set of rendering directives for one render call.
///
/// Built by [`compile`](crate::compile) and read-only afterwards. The serde
/// representation (camelCase field names) is the contract with the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveSet {
    pub(crate) element_closing_style: ElementClosingStyle,
    pub(crate) abbreviations: PropertyList,
    pub(crate) link_attributes: PropertyList,
    pub(crate) external_link_attributes: PropertyList,
    pub(crate) image_attributes: PropertyList,
    pub(crate) external_image_attributes: PropertyList,
    pub(crate) code_class: String,
    pub(crate) code_block_attr_on_parent: bool,
    pub(crate) table_class: Option<String>,
    pub(crate) table_align_class: Option<String>,
    pub(crate) footnote_link_id: String,
    pub(crate) footnote_backlink_id: String,
    pub(crate) footnote_class: String,
    pub(crate) footnote_link_class: String,
    pub(crate) footnote_backlink_class: String,
    pub(crate) footnote_link_text: Option<String>,
    pub(crate) footnote_backlink_text: String,
    pub(crate) urls_linked: bool,
    pub(crate) breaks_enabled: bool,
}

impl Default for DirectiveSet {
    /// Directive set with every field at its schema default.
    fn default() -> Self {
        let mut set = Self::blank();
        for field in SCHEMA {
            field.kind.apply_default(&mut set);
        }
        set
    }
}

impl DirectiveSet {
    /// Zero values, before schema defaults are applied.
    fn blank() -> Self {
        Self {
            element_closing_style: ElementClosingStyle::default(),
            abbreviations: PropertyList::new(),
            link_attributes: PropertyList::new(),
            external_link_attributes: PropertyList::new(),
            image_attributes: PropertyList::new(),
            external_image_attributes: PropertyList::new(),
            code_class: String::new(),
            code_block_attr_on_parent: false,
            table_class: None,
            table_align_class: None,
            footnote_link_id: String::new(),
            footnote_backlink_id: String::new(),
            footnote_class: String::new(),
            footnote_link_class: String::new(),
            footnote_backlink_class: String::new(),
            footnote_link_text: None,
            footnote_backlink_text: String::new(),
            urls_linked: false,
            breaks_enabled: false,
        }
    }

    #[must_use]
    pub fn element_closing_style(&self) -> ElementClosingStyle {
        self.element_closing_style
    }

    /// Predefined abbreviations (`short -> expansion`).
    #[must_use]
    pub fn abbreviations(&self) -> &PropertyList {
        &self.abbreviations
    }

    /// Attributes added to every link.
    #[must_use]
    pub fn link_attributes(&self) -> &PropertyList {
        &self.link_attributes
    }

    /// Attributes added to links with an absolute URL.
    #[must_use]
    pub fn external_link_attributes(&self) -> &PropertyList {
        &self.external_link_attributes
    }

    /// Attributes added to every image.
    #[must_use]
    pub fn image_attributes(&self) -> &PropertyList {
        &self.image_attributes
    }

    /// Attributes added to images with an absolute URL.
    #[must_use]
    pub fn external_image_attributes(&self) -> &PropertyList {
        &self.external_image_attributes
    }

    /// Class template for fenced code; `%s` is the language.
    #[must_use]
    pub fn code_class(&self) -> &str {
        &self.code_class
    }

    /// Whether code block attributes go on `<pre>` instead of `<code>`.
    #[must_use]
    pub fn code_block_attr_on_parent(&self) -> bool {
        self.code_block_attr_on_parent
    }

    #[must_use]
    pub fn table_class(&self) -> Option<&str> {
        self.table_class.as_deref()
    }

    /// Class template for aligned table cells; `%s` is the alignment.
    #[must_use]
    pub fn table_align_class(&self) -> Option<&str> {
        self.table_align_class.as_deref()
    }

    /// ID template for footnote items; `%s` is the footnote name.
    #[must_use]
    pub fn footnote_link_id(&self) -> &str {
        &self.footnote_link_id
    }

    /// ID template for footnote references; the first `%s` is the reference
    /// count, the second the footnote name.
    #[must_use]
    pub fn footnote_backlink_id(&self) -> &str {
        &self.footnote_backlink_id
    }

    #[must_use]
    pub fn footnote_class(&self) -> &str {
        &self.footnote_class
    }

    #[must_use]
    pub fn footnote_link_class(&self) -> &str {
        &self.footnote_link_class
    }

    #[must_use]
    pub fn footnote_backlink_class(&self) -> &str {
        &self.footnote_backlink_class
    }

    /// Text template for footnote references; `%s` is the footnote number.
    #[must_use]
    pub fn footnote_link_text(&self) -> Option<&str> {
        self.footnote_link_text.as_deref()
    }

    /// Raw HTML used as the backlink text.
    #[must_use]
    pub fn footnote_backlink_text(&self) -> &str {
        &self.footnote_backlink_text
    }

    /// Whether bare URLs in text become links.
    #[must_use]
    pub fn urls_linked(&self) -> bool {
        self.urls_linked
    }

    /// Whether soft line breaks render as `<br>`.
    #[must_use]
    pub fn breaks_enabled(&self) -> bool {
        self.breaks_enabled
    }
}
