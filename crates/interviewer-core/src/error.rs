//! Session error types.
//!
//! Every error here leaves the session exactly as it was before the failing
//! event: no answer is appended and the question index does not move.

use thiserror::Error;

use crate::session::Phase;

/// Errors produced while driving an interview session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The event is not valid in the session's current phase.
    #[error("cannot {action} while the session is {phase}")]
    InvalidTransition { action: &'static str, phase: Phase },

    /// The question bank holds fewer questions than a session needs.
    #[error("question bank has {available} questions, a session needs {required}")]
    BankTooSmall { available: usize, required: usize },

    /// A sampler returned indices that do not form a valid selection.
    #[error("invalid question selection: {0}")]
    InvalidSelection(String),

    /// The evaluator call failed; the answer was not recorded.
    #[error("evaluation failed: {0:#}")]
    Evaluation(anyhow::Error),
}

impl SessionError {
    /// Returns `true` if resubmitting the same answer may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Evaluation(_))
    }
}
