//! Caller-facing entry point: compile, then render.

use mdtf_directives::{CompileError, ConfigSnapshot, DirectiveSet, compile};
use rayon::prelude::*;

use crate::engine::{EngineError, RenderEngine};
use crate::html::HtmlEngine;

/// Error formatting a piece of text.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Formats raw text according to a configuration snapshot.
///
/// A formatter holds only its engine. Every call compiles a fresh
/// [`DirectiveSet`], so one formatter can be shared across threads.
///
/// # Example
///
/// ```
/// use mdtf_directives::ConfigSnapshot;
/// use mdtf_renderer::Formatter;
///
/// let config = ConfigSnapshot::new().with("linkAttributes", "class=link");
/// let html = Formatter::new().format("[a](/b)", &config).unwrap();
/// assert_eq!(html, "<p><a href=\"/b\" class=\"link\">a</a></p>\n");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Formatter<E = HtmlEngine> {
    engine: E,
}

impl Formatter<HtmlEngine> {
    /// Formatter backed by the bundled [`HtmlEngine`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_engine(HtmlEngine::new())
    }
}

impl<E: RenderEngine> Formatter<E> {
    #[must_use]
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Compile `config` and render `raw_text` with the result.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Compile`] for an invalid configuration and
    /// [`FormatError::Engine`] when the engine fails. No partial output is
    /// produced in either case.
    pub fn format(&self, raw_text: &str, config: &ConfigSnapshot) -> Result<String, FormatError> {
        let directives = compile(config)?;
        self.render(raw_text, &directives)
    }

    /// Render `text` with already compiled directives.
    ///
    /// The engine's output is returned unchanged.
    pub fn render(&self, text: &str, directives: &DirectiveSet) -> Result<String, FormatError> {
        Ok(self.engine.render(text, directives)?)
    }

    /// Format many texts with one configuration, in parallel.
    ///
    /// The configuration is compiled once. Results are returned in input
    /// order; an engine failure for one text does not affect the others.
    ///
    /// # Errors
    ///
    /// Returns the [`CompileError`] if the configuration is invalid, in which
    /// case nothing is rendered.
    pub fn format_batch<T>(
        &self,
        texts: &[T],
        config: &ConfigSnapshot,
    ) -> Result<Vec<Result<String, EngineError>>, CompileError>
    where
        T: AsRef<str> + Sync,
    {
        let directives = compile(config)?;

        tracing::debug!(count = texts.len(), "Formatting batch");

        Ok(texts
            .par_iter()
            .map(|text| self.engine.render(text.as_ref(), &directives))
            .collect())
    }
}

/// Format `raw_text` with the bundled [`HtmlEngine`].
///
/// # Errors
///
/// See [`Formatter::format`].
pub fn format(raw_text: &str, config: &ConfigSnapshot) -> Result<String, FormatError> {
    Formatter::new().format(raw_text, config)
}
