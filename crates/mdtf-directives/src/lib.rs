//! Configuration-to-directive compiler for the mdtf Markdown formatter.
//!
//! Turns a [`ConfigSnapshot`] of human-authored settings into an immutable
//! [`DirectiveSet`] for a rendering engine.
//!
//! # Architecture
//!
//! - [`parse_property_list`]: parses `key=value` / `key:value` lists
//! - [`SCHEMA`]: declarative table of configuration fields
//! - [`compile`]: single loop over the schema producing a [`DirectiveSet`]
//!
//! # Example
//!
//! ```
//! use mdtf_directives::{ConfigSnapshot, compile};
//!
//! let config = ConfigSnapshot::new().with("linkAttributes", "target=_blank,bogus");
//! let err = compile(&config).unwrap_err();
//! assert_eq!(err.field(), "linkAttributes");
//! ```

mod compiler;
mod directive_set;
mod error;
mod property_list;
mod schema;
mod snapshot;

pub use compiler::compile;
pub use directive_set::{DirectiveSet, ElementClosingStyle};
pub use error::CompileError;
pub use property_list::{MalformedEntry, PropertyList, parse_property_list};
pub use schema::{COMMA_SEPARATOR, FieldDescriptor, FieldKind, LINE_SEPARATOR, SCHEMA, field};
pub use snapshot::{ConfigSnapshot, ConfigValue};

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(DirectiveSet: Send, Sync, Clone);
    static_assertions::assert_impl_all!(ConfigSnapshot: Send, Sync, Clone);
    static_assertions::assert_impl_all!(CompileError: Send, Sync, std::error::Error);
}
