//! CLI error types.

use mdtf_config::ConfigError;
use mdtf_directives::CompileError;
use mdtf_renderer::FormatError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("{0}")]
    Format(#[from] FormatError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    Validation(String),
}
