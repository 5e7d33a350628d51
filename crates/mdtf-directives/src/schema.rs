//! Declarative description of every configuration field.
//!
//! Each [`FieldDescriptor`] names a configuration field, the directive it
//! feeds, how its value is interpreted and where it lands in the
//! [`DirectiveSet`]. The compiler walks [`SCHEMA`] in order; adding a
//! directive means adding a descriptor here and a field on `DirectiveSet`.

use crate::directive_set::{DirectiveSet, ElementClosingStyle};
use crate::error::CompileError;
use crate::property_list::{PropertyList, parse_property_list};
use crate::snapshot::ConfigValue;

/// Entry separator for line-oriented lists.
pub const LINE_SEPARATOR: &str = "\n";
/// Entry separator for single-line attribute lists.
pub const COMMA_SEPARATOR: &str = ",";

/// How a configuration value is turned into a directive.
pub enum FieldKind {
    /// Boolean HTML5 switch mapped to an [`ElementClosingStyle`].
    ElementSuffix {
        slot: fn(&mut DirectiveSet) -> &mut ElementClosingStyle,
    },
    /// Delimited `key=value` list.
    PropertyList {
        separator: &'static str,
        slot: fn(&mut DirectiveSet) -> &mut PropertyList,
    },
    /// Boolean passthrough.
    Flag {
        default: bool,
        slot: fn(&mut DirectiveSet) -> &mut bool,
    },
    /// String passthrough; null selects the default.
    Text {
        default: &'static str,
        slot: fn(&mut DirectiveSet) -> &mut String,
    },
    /// Nullable string passthrough.
    OptionalText {
        slot: fn(&mut DirectiveSet) -> &mut Option<String>,
    },
}

impl FieldKind {
    /// Human-readable shape expected by this kind.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        match self {
            Self::ElementSuffix { .. } | Self::Flag { .. } => "boolean",
            Self::PropertyList { .. } | Self::Text { .. } | Self::OptionalText { .. } => "string",
        }
    }

    /// Whether `value` has a shape this kind can compile.
    #[must_use]
    pub fn accepts(&self, value: &ConfigValue) -> bool {
        matches!(
            (self, value),
            (_, ConfigValue::Null)
                | (Self::ElementSuffix { .. } | Self::Flag { .. }, ConfigValue::Bool(_))
                | (
                    Self::PropertyList { .. } | Self::Text { .. } | Self::OptionalText { .. },
                    ConfigValue::Text(_)
                )
        )
    }

    pub(crate) fn apply_default(&self, set: &mut DirectiveSet) {
        match self {
            Self::ElementSuffix { slot } => *slot(set) = ElementClosingStyle::default(),
            Self::PropertyList { slot, .. } => *slot(set) = PropertyList::new(),
            Self::Flag { default, slot } => *slot(set) = *default,
            Self::Text { default, slot } => *slot(set) = (*default).to_owned(),
            Self::OptionalText { slot } => *slot(set) = None,
        }
    }

    pub(crate) fn apply(
        &self,
        field: &'static str,
        value: &ConfigValue,
        set: &mut DirectiveSet,
    ) -> Result<(), CompileError> {
        match (self, value) {
            (_, ConfigValue::Null) => self.apply_default(set),
            (Self::ElementSuffix { slot }, ConfigValue::Bool(html5)) => {
                *slot(set) = ElementClosingStyle::from_html5_suffix(*html5);
            }
            (Self::PropertyList { separator, slot }, ConfigValue::Text(list)) => {
                *slot(set) = parse_property_list(list, separator).map_err(|e| {
                    CompileError::MalformedPropertyEntry {
                        field,
                        entry: e.entry,
                    }
                })?;
            }
            (Self::Flag { slot, .. }, ConfigValue::Bool(flag)) => *slot(set) = *flag,
            (Self::Text { slot, .. }, ConfigValue::Text(text)) => {
                text.clone_into(slot(set));
            }
            (Self::OptionalText { slot }, ConfigValue::Text(text)) => {
                *slot(set) = Some(text.clone());
            }
            (kind, other) => {
                return Err(CompileError::InvalidFieldType {
                    field,
                    expected: kind.expected(),
                    found: other.kind_name(),
                });
            }
        }
        Ok(())
    }
}

/// One configuration field and the directive it produces.
pub struct FieldDescriptor {
    /// Configuration field name.
    pub name: &'static str,
    /// Directive name in the serialized [`DirectiveSet`].
    pub directive: &'static str,
    pub kind: FieldKind,
}

/// Every configuration field, in compilation order.
pub const SCHEMA: &[FieldDescriptor] = &[
    FieldDescriptor {
        name: "html5ElementSuffix",
        directive: "elementClosingStyle",
        kind: FieldKind::ElementSuffix {
            slot: |d| &mut d.element_closing_style,
        },
    },
    FieldDescriptor {
        name: "abbreviations",
        directive: "abbreviations",
        kind: FieldKind::PropertyList {
            separator: LINE_SEPARATOR,
            slot: |d| &mut d.abbreviations,
        },
    },
    FieldDescriptor {
        name: "linkAttributes",
        directive: "linkAttributes",
        kind: FieldKind::PropertyList {
            separator: COMMA_SEPARATOR,
            slot: |d| &mut d.link_attributes,
        },
    },
    FieldDescriptor {
        name: "externalLinkAttributes",
        directive: "externalLinkAttributes",
        kind: FieldKind::PropertyList {
            separator: COMMA_SEPARATOR,
            slot: |d| &mut d.external_link_attributes,
        },
    },
    FieldDescriptor {
        name: "imageAttributes",
        directive: "imageAttributes",
        kind: FieldKind::PropertyList {
            separator: COMMA_SEPARATOR,
            slot: |d| &mut d.image_attributes,
        },
    },
    FieldDescriptor {
        name: "externalImageAttributes",
        directive: "externalImageAttributes",
        kind: FieldKind::PropertyList {
            separator: COMMA_SEPARATOR,
            slot: |d| &mut d.external_image_attributes,
        },
    },
    FieldDescriptor {
        name: "codeClass",
        directive: "codeClass",
        kind: FieldKind::Text {
            default: "language-%s",
            slot: |d| &mut d.code_class,
        },
    },
    FieldDescriptor {
        name: "codeBlockAttrParent",
        directive: "codeBlockAttrOnParent",
        kind: FieldKind::Flag {
            default: false,
            slot: |d| &mut d.code_block_attr_on_parent,
        },
    },
    FieldDescriptor {
        name: "tableClass",
        directive: "tableClass",
        kind: FieldKind::OptionalText {
            slot: |d| &mut d.table_class,
        },
    },
    FieldDescriptor {
        name: "tableAlignClass",
        directive: "tableAlignClass",
        kind: FieldKind::OptionalText {
            slot: |d| &mut d.table_align_class,
        },
    },
    FieldDescriptor {
        name: "footnoteLinkId",
        directive: "footnoteLinkId",
        kind: FieldKind::Text {
            default: "fn:%s",
            slot: |d| &mut d.footnote_link_id,
        },
    },
    FieldDescriptor {
        name: "footnoteBacklinkId",
        directive: "footnoteBacklinkId",
        kind: FieldKind::Text {
            default: "fnref%s:%s",
            slot: |d| &mut d.footnote_backlink_id,
        },
    },
    FieldDescriptor {
        name: "footnoteClass",
        directive: "footnoteClass",
        kind: FieldKind::Text {
            default: "footnotes",
            slot: |d| &mut d.footnote_class,
        },
    },
    FieldDescriptor {
        name: "footnoteLinkClass",
        directive: "footnoteLinkClass",
        kind: FieldKind::Text {
            default: "footnote-ref",
            slot: |d| &mut d.footnote_link_class,
        },
    },
    FieldDescriptor {
        name: "footnoteBacklinkClass",
        directive: "footnoteBacklinkClass",
        kind: FieldKind::Text {
            default: "footnote-backref",
            slot: |d| &mut d.footnote_backlink_class,
        },
    },
    FieldDescriptor {
        name: "footnoteLinkText",
        directive: "footnoteLinkText",
        kind: FieldKind::OptionalText {
            slot: |d| &mut d.footnote_link_text,
        },
    },
    FieldDescriptor {
        name: "footnoteBacklinkText",
        directive: "footnoteBacklinkText",
        kind: FieldKind::Text {
            default: "&#8617;",
            slot: |d| &mut d.footnote_backlink_text,
        },
    },
    FieldDescriptor {
        name: "setUrlsLinked",
        directive: "urlsLinked",
        kind: FieldKind::Flag {
            default: true,
            slot: |d| &mut d.urls_linked,
        },
    },
    FieldDescriptor {
        name: "setBreaksEnabled",
        directive: "breaksEnabled",
        kind: FieldKind::Flag {
            default: false,
            slot: |d| &mut d.breaks_enabled,
        },
    },
];

/// Look up a field descriptor by configuration name.
#[must_use]
pub fn field(name: &str) -> Option<&'static FieldDescriptor> {
    SCHEMA.iter().find(|f| f.name == name)
}
