//! Configuration-to-directive compilation.

use crate::directive_set::DirectiveSet;
use crate::error::CompileError;
use crate::schema::SCHEMA;
use crate::snapshot::ConfigSnapshot;

/// Compile a configuration snapshot into a [`DirectiveSet`].
///
/// Fields are processed in [`SCHEMA`] order. Absent fields keep their
/// defaults, list fields are parsed with their fixed separator and scalars
/// are copied through. Keys that are not in the schema are ignored.
///
/// # Errors
///
/// Returns [`CompileError::MalformedPropertyEntry`] for the first list entry
/// without a `=` or `:`, and [`CompileError::InvalidFieldType`] for a value
/// of the wrong shape. Nothing is returned on error.
///
/// # Example
///
/// ```
/// use mdtf_directives::{ConfigSnapshot, ElementClosingStyle, compile};
///
/// let config = ConfigSnapshot::new()
///     .with("html5ElementSuffix", true)
///     .with("imageAttributes", "class=hero, alt=Banner");
/// let directives = compile(&config).unwrap();
///
/// assert_eq!(
///     directives.element_closing_style(),
///     ElementClosingStyle::BareAngleBracket
/// );
/// assert_eq!(directives.image_attributes().get("class"), Some("hero"));
/// ```
pub fn compile(config: &ConfigSnapshot) -> Result<DirectiveSet, CompileError> {
    let mut directives = DirectiveSet::default();
    let mut applied = 0usize;

    for field in SCHEMA {
        if let Some(value) = config.get(field.name) {
            field.kind.apply(field.name, value, &mut directives)?;
            applied += 1;
        }
    }

    tracing::debug!(
        configured = applied,
        ignored = config.len() - applied,
        "Compiled directive set"
    );

    Ok(directives)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::directive_set::ElementClosingStyle;
    use crate::property_list::PropertyList;
    use crate::snapshot::ConfigValue;

    fn list(pairs: &[(&str, &str)]) -> PropertyList {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_empty_config_yields_defaults() {
        let directives = compile(&ConfigSnapshot::new()).unwrap();
        assert_eq!(directives, DirectiveSet::default());
    }

    #[test]
    fn test_html5_suffix_true_removes_slash() {
        let config = ConfigSnapshot::new().with("html5ElementSuffix", true);
        let directives = compile(&config).unwrap();
        assert_eq!(
            directives.element_closing_style(),
            ElementClosingStyle::BareAngleBracket
        );
    }

    #[test]
    fn test_html5_suffix_false_or_absent_keeps_slash() {
        let config = ConfigSnapshot::new().with("html5ElementSuffix", false);
        assert_eq!(
            compile(&config).unwrap().element_closing_style(),
            ElementClosingStyle::SelfClosingSlash
        );
        assert_eq!(
            compile(&ConfigSnapshot::new())
                .unwrap()
                .element_closing_style(),
            ElementClosingStyle::SelfClosingSlash
        );
    }

    #[test]
    fn test_image_attributes() {
        let config = ConfigSnapshot::new().with("imageAttributes", "class=hero, alt=Banner");
        let directives = compile(&config).unwrap();
        assert_eq!(
            directives.image_attributes(),
            &list(&[("class", "hero"), ("alt", "Banner")])
        );
    }

    #[test]
    fn test_abbreviations_use_newline_separator() {
        let config = ConfigSnapshot::new().with(
            "abbreviations",
            "HTML=HyperText Markup Language\nCSS:Cascading Style Sheets",
        );
        let directives = compile(&config).unwrap();
        assert_eq!(
            directives.abbreviations(),
            &list(&[
                ("HTML", "HyperText Markup Language"),
                ("CSS", "Cascading Style Sheets"),
            ])
        );
    }

    #[test]
    fn test_abbreviation_expansion_keeps_commas() {
        let config = ConfigSnapshot::new().with("abbreviations", "R&D=Research, and Development");
        let directives = compile(&config).unwrap();
        assert_eq!(
            directives.abbreviations().get("R&D"),
            Some("Research, and Development")
        );
    }

    #[test]
    fn test_all_attribute_lists() {
        let config = ConfigSnapshot::new()
            .with("linkAttributes", "class=link")
            .with("externalLinkAttributes", "target=_blank, rel=nofollow")
            .with("externalImageAttributes", "class:external");
        let directives = compile(&config).unwrap();

        assert_eq!(directives.link_attributes(), &list(&[("class", "link")]));
        assert_eq!(
            directives.external_link_attributes(),
            &list(&[("target", "_blank"), ("rel", "nofollow")])
        );
        assert_eq!(
            directives.external_image_attributes(),
            &list(&[("class", "external")])
        );
        assert!(directives.image_attributes().is_empty());
    }

    #[test]
    fn test_empty_list_string_is_empty() {
        let config = ConfigSnapshot::new().with("linkAttributes", "");
        assert!(compile(&config).unwrap().link_attributes().is_empty());
    }

    #[test]
    fn test_malformed_entry_names_field_and_entry() {
        let config = ConfigSnapshot::new().with("linkAttributes", "target=_blank,bogus");
        let err = compile(&config).unwrap_err();

        assert_eq!(
            err,
            CompileError::MalformedPropertyEntry {
                field: "linkAttributes",
                entry: "bogus".to_owned(),
            }
        );
        let message = err.to_string();
        assert!(message.contains("linkAttributes"));
        assert!(message.contains("\"bogus\""));
    }

    #[test]
    fn test_null_table_class_passes_through() {
        let config = ConfigSnapshot::new().with("tableClass", ConfigValue::Null);
        let directives = compile(&config).unwrap();
        assert_eq!(directives.table_class(), None);
    }

    #[test]
    fn test_null_on_non_nullable_field_uses_default() {
        let config = ConfigSnapshot::new()
            .with("codeClass", ConfigValue::Null)
            .with("footnoteBacklinkText", ConfigValue::Null);
        let directives = compile(&config).unwrap();
        assert_eq!(directives.code_class(), "language-%s");
        assert_eq!(directives.footnote_backlink_text(), "&#8617;");
    }

    #[test]
    fn test_scalars_pass_through_literally() {
        let config = ConfigSnapshot::new()
            .with("codeClass", "hl hl-%s")
            .with("codeBlockAttrParent", true)
            .with("tableClass", "0")
            .with("tableAlignClass", "text-%s")
            .with("footnoteLinkId", "")
            .with("footnoteBacklinkId", "cite_ref:%s-%s")
            .with("footnoteClass", "cite-refs")
            .with("footnoteLinkClass", "cite-ref")
            .with("footnoteBacklinkClass", "cite-backref")
            .with("footnoteLinkText", "[%s]")
            .with("footnoteBacklinkText", "back")
            .with("setUrlsLinked", false)
            .with("setBreaksEnabled", true);
        let directives = compile(&config).unwrap();

        assert_eq!(directives.code_class(), "hl hl-%s");
        assert!(directives.code_block_attr_on_parent());
        assert_eq!(directives.table_class(), Some("0"));
        assert_eq!(directives.table_align_class(), Some("text-%s"));
        assert_eq!(directives.footnote_link_id(), "");
        assert_eq!(directives.footnote_backlink_id(), "cite_ref:%s-%s");
        assert_eq!(directives.footnote_class(), "cite-refs");
        assert_eq!(directives.footnote_link_class(), "cite-ref");
        assert_eq!(directives.footnote_backlink_class(), "cite-backref");
        assert_eq!(directives.footnote_link_text(), Some("[%s]"));
        assert_eq!(directives.footnote_backlink_text(), "back");
        assert!(!directives.urls_linked());
        assert!(directives.breaks_enabled());
    }

    #[test]
    fn test_wrong_value_type() {
        let config = ConfigSnapshot::new().with("html5ElementSuffix", "true");
        let err = compile(&config).unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidFieldType {
                field: "html5ElementSuffix",
                expected: "boolean",
                found: "string",
            }
        );
        assert_eq!(err.field(), "html5ElementSuffix");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = ConfigSnapshot::new()
            .with("notAField", "x")
            .with("tableClass", "grid");
        let directives = compile(&config).unwrap();
        assert_eq!(directives.table_class(), Some("grid"));
    }

    #[test]
    fn test_compiles_are_independent() {
        let first = compile(&ConfigSnapshot::new().with("tableClass", "a")).unwrap();
        let second = compile(&ConfigSnapshot::new()).unwrap();
        assert_eq!(first.table_class(), Some("a"));
        assert_eq!(second.table_class(), None);
    }
}
