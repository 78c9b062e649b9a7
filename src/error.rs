//! Error types for mr-shipit

use thiserror::Error;

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mr-shipit operations
#[derive(Debug, Error)]
pub enum Error {
    /// GitLab API returned a failure response
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// HTTP transport failure (connect, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration is invalid or incomplete
    #[error("configuration error: {0}")]
    Config(String),

    /// The renovate config file does not have the expected shape
    #[error("invalid renovate config format")]
    InvalidConfigFormat,

    /// No repositories could be extracted from the configured source
    #[error("no repositories found")]
    NoRepositories,
}
