//! The rendering engine seam.

use mdtf_directives::DirectiveSet;

/// Failure raised by a rendering engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The abbreviation set could not be compiled into a matcher.
    #[error("failed to build abbreviation matcher: {0}")]
    Abbreviations(#[from] regex::Error),
    /// Failure reported by a third-party engine.
    #[error("rendering engine failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A Markdown rendering engine driven by a [`DirectiveSet`].
///
/// Implementations must honour every directive and must not keep state
/// between calls, so a single engine can serve concurrent renders.
pub trait RenderEngine: Send + Sync {
    /// Render `text` with `directives`.
    fn render(&self, text: &str, directives: &DirectiveSet) -> Result<String, EngineError>;
}

impl<E: RenderEngine + ?Sized> RenderEngine for &E {
    fn render(&self, text: &str, directives: &DirectiveSet) -> Result<String, EngineError> {
        (**self).render(text, directives)
    }
}

impl<E: RenderEngine + ?Sized> RenderEngine for Box<E> {
    fn render(&self, text: &str, directives: &DirectiveSet) -> Result<String, EngineError> {
        (**self).render(text, directives)
    }
}
