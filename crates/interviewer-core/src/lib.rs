//! interviewer-core — question bank, session state machine, and transcripts.
//!
//! This crate owns the interview flow: drawing a question set, collecting and
//! evaluating answers, and projecting a finished session into a transcript.
//! The evaluation service and transcript storage are reached through traits.

pub mod bank;
pub mod error;
pub mod interview;
pub mod session;
pub mod traits;
pub mod transcript;

pub use bank::{Question, QuestionBank, QUESTIONS_PER_SESSION};
pub use error::SessionError;
pub use interview::{Event, EventOutcome, Interview, PersistenceFailure};
pub use session::{
    FixedSampler, Phase, QuestionSampler, RandomSampler, SelectedSet, Session, SubmitOutcome,
};
pub use traits::{EvaluationRequest, EvaluationResult, Evaluator, TranscriptWriter};
pub use transcript::{Transcript, TranscriptEntry};
