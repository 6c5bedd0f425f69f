//! Provider and configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when calling the evaluation service.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response decoded but carried no evaluation text.
    #[error("response contained no evaluation")]
    MissingContent,

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Errors that prevent an interview from starting at all.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No evaluator credential in the secrets file or the environment.
    #[error("{name} is not set: add it to {} or export it in the environment", secrets_file.display())]
    MissingCredential { name: String, secrets_file: PathBuf },

    /// An explicitly requested file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A config, secrets or questions file could not be read or parsed.
    #[error("invalid {kind} file {}: {message}", path.display())]
    Invalid {
        kind: &'static str,
        path: PathBuf,
        message: String,
    },
}
