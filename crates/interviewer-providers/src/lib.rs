//! interviewer-providers — answer evaluation backends.
//!
//! Implements the `Evaluator` trait against Groq's OpenAI-compatible API,
//! provides a mock for tests, and resolves configuration and credentials.

pub mod config;
pub mod error;
pub mod groq;
pub mod mock;

pub use config::{
    create_evaluator, load_config_from, resolve_api_key, InterviewerConfig, TranscriptFormat,
};
pub use error::{ConfigError, ProviderError};
pub use groq::GroqEvaluator;
pub use mock::MockEvaluator;
