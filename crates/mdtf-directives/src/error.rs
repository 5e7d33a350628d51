//! Directive compilation errors.

/// Error compiling a configuration snapshot into a directive set.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A list entry contains neither `=` nor `:`.
    #[error("{field}: malformed property entry {entry:?} (expected `key=value` or `key:value`)")]
    MalformedPropertyEntry {
        /// Configuration field holding the list.
        field: &'static str,
        /// The offending entry, trimmed.
        entry: String,
    },
    /// A value whose shape does not match the field.
    #[error("{field}: expected a {expected} value, found {found}")]
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl CompileError {
    /// Configuration field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MalformedPropertyEntry { field, .. } | Self::InvalidFieldType { field, .. } => {
                field
            }
        }
    }
}
