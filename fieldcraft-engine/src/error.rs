//! Error types for the engine.

use fieldcraft_model::SchemaIssue;
use fieldcraft_store::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while configuring or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A collaborator failed; nothing was formatted or persisted past it.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Field groups rejected under the `reject` collision policy.
    #[error("schema rejected: {}", render_issues(.0))]
    Schema(Vec<SchemaIssue>),

    /// IO error (config file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML config.
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn render_issues(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
