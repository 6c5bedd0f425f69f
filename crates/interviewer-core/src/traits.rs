//! Trait definitions for the session's external collaborators.
//!
//! The evaluator is implemented by `interviewer-providers`, transcript
//! writers by `interviewer-report`.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::transcript::Transcript;

// ---------------------------------------------------------------------------
// Evaluator trait
// ---------------------------------------------------------------------------

/// A text-evaluation backend that scores one answer to one question.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Human-readable evaluator name (e.g. "groq").
    fn name(&self) -> &str;

    /// Score a candidate answer. The returned text is stored verbatim.
    async fn evaluate(&self, request: &EvaluationRequest) -> anyhow::Result<EvaluationResult>;
}

/// One (question, answer) pair to be scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// The question as presented to the candidate.
    pub question: String,
    /// The candidate's raw answer.
    pub answer: String,
}

impl EvaluationRequest {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// The full prompt text sent to the evaluation service.
    pub fn prompt(&self) -> String {
        build_evaluation_prompt(&self.question, &self.answer)
    }
}

/// Opaque evaluator output: by convention a score line, a feedback line and
/// an improvement-tips line, but never validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationResult(String);

impl EvaluationResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Best-effort extraction of the `Score: X/5` line, for display only.
    pub fn score(&self) -> Option<f64> {
        extract_score(&self.0)
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Transcript writer trait
// ---------------------------------------------------------------------------

/// Durable sink for a completed session's transcript.
pub trait TranscriptWriter: Send + Sync {
    /// Short writer name used in logs and failure reports (e.g. "text").
    fn name(&self) -> &str;

    /// Persist the transcript, returning where it was written.
    fn write(&self, transcript: &Transcript) -> anyhow::Result<PathBuf>;
}

// ---------------------------------------------------------------------------
// Evaluation prompt
// ---------------------------------------------------------------------------

/// Build the interviewer prompt for one question and answer.
///
/// The response format is fixed so transcripts read consistently, even though
/// nothing downstream parses it.
pub fn build_evaluation_prompt(question: &str, answer: &str) -> String {
    format!(
        "You are an expert Excel interviewer.
Question: {question}
Candidate's Answer: {answer}

Evaluate the candidate's answer:
1. Score from 0 to 5.
2. Give clear feedback.
3. Provide improvement tips.

Respond exactly in this format:
Score: X/5
Feedback: ...
Improvement Tips: ...
"
    )
}

fn extract_score(text: &str) -> Option<f64> {
    let is_decoration = |c: char| c == '*' || c == '#' || c == ':' || c.is_whitespace();

    for line in text.lines() {
        let line = line.trim_start_matches(is_decoration).to_ascii_lowercase();
        let Some(rest) = line.strip_prefix("score") else {
            continue;
        };
        let value = rest
            .trim_start_matches(is_decoration)
            .split('/')
            .next()
            .unwrap_or_default()
            .trim();
        if let Ok(score) = value.parse::<f64>() {
            if (0.0..=5.0).contains(&score) {
                return Some(score);
            }
        }
    }
    None
}
