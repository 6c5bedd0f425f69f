//! Read-only record of a completed session.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::bank::Question;
use crate::traits::EvaluationResult;

/// Timestamp format used for transcript ids and file names.
pub const TRANSCRIPT_ID_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Width of the dashed line separating transcript entries.
pub const SEPARATOR_WIDTH: usize = 50;

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// 1-based position in the session.
    pub number: usize,
    pub question: Question,
    pub answer: String,
    pub feedback: EvaluationResult,
}

/// A completed session's questions, answers and feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Timestamp-derived identifier, `YYYY-MM-DD_HH-MM-SS`.
    pub id: String,
    pub generated_at: DateTime<Local>,
    pub entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Zip parallel question/answer/feedback slices into entries.
    pub fn from_parts(
        generated_at: DateTime<Local>,
        questions: &[Question],
        answers: &[String],
        feedback: &[EvaluationResult],
    ) -> Self {
        let entries = questions
            .iter()
            .zip(answers)
            .zip(feedback)
            .enumerate()
            .map(|(i, ((question, answer), feedback))| TranscriptEntry {
                number: i + 1,
                question: question.clone(),
                answer: answer.clone(),
                feedback: feedback.clone(),
            })
            .collect();

        Self {
            id: generated_at.format(TRANSCRIPT_ID_FORMAT).to_string(),
            generated_at,
            entries,
        }
    }

    /// Four lines per entry: question, answer, trimmed feedback, separator.
    pub fn lines(&self) -> Vec<String> {
        let separator = "-".repeat(SEPARATOR_WIDTH);
        let mut lines = Vec::with_capacity(self.entries.len() * 4);
        for entry in &self.entries {
            lines.push(format!("Q{}: {}", entry.number, entry.question));
            lines.push(format!("User Answer: {}", entry.answer));
            lines.push(entry.feedback.text().trim().to_string());
            lines.push(separator.clone());
        }
        lines
    }

    /// The newline-joined transcript body. Depends only on the entries.
    pub fn render_text(&self) -> String {
        self.lines().join("\n")
    }

    /// Mean of the scores the evaluator reported, skipping unscored entries.
    pub fn average_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self
            .entries
            .iter()
            .filter_map(|e| e.feedback.score())
            .collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }
}
