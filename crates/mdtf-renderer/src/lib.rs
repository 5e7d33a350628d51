//! Directive-driven Markdown rendering for mdtf.
//!
//! This crate provides the [`RenderEngine`] seam, the bundled [`HtmlEngine`]
//! and the [`Formatter`] entry point that ties configuration compilation to
//! rendering.
//!
//! # Example
//!
//! ```
//! use mdtf_directives::ConfigSnapshot;
//!
//! let config = ConfigSnapshot::new()
//!     .with("html5ElementSuffix", true)
//!     .with("imageAttributes", "class=hero");
//! let html = mdtf_renderer::format("![Logo](logo.png)", &config).unwrap();
//! assert_eq!(html, "<p><img src=\"logo.png\" alt=\"Logo\" class=\"hero\"></p>\n");
//! ```

mod engine;
mod formatter;
mod html;
mod text;
mod util;

pub use engine::{EngineError, RenderEngine};
pub use formatter::{FormatError, Formatter, format};
pub use html::HtmlEngine;
pub use util::escape_html;

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(HtmlEngine: Send, Sync, RenderEngine);
    static_assertions::assert_impl_all!(Formatter: Send, Sync);
    static_assertions::assert_impl_all!(FormatError: Send, Sync, std::error::Error);
}
