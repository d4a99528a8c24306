//! CLI error types.

use linkpad_config::ConfigError;
use linkpad_renderer::StylesheetError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Stylesheet(#[from] StylesheetError),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Validation(String),
}
