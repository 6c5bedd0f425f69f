//! The static question bank interviews draw from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of questions asked in one session.
pub const QUESTIONS_PER_SESSION: usize = 5;

const EXCEL_QUESTIONS: [&str; 10] = [
    "What is the difference between a workbook and a worksheet in Excel?",
    "How do you freeze panes in Excel?",
    "What is the use of the CONCATENATE function?",
    "What does the IF function do in Excel?",
    "How do you apply a filter to data in Excel?",
    "What is conditional formatting and how do you use it?",
    "How do you create a chart in Excel?",
    "Explain the difference between COUNT, COUNTA, and COUNTIF.",
    "How do you use the SUM function?",
    "What is the shortcut to insert the current date in a cell?",
];

/// A single interview question. Two questions are the same question when
/// their text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question(String);

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Question {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Immutable, ordered set of candidate questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from arbitrary questions. Duplicate texts are dropped,
    /// keeping the first occurrence, so every index names a distinct question.
    pub fn new(questions: Vec<Question>) -> Self {
        let mut unique: Vec<Question> = Vec::with_capacity(questions.len());
        for q in questions {
            if !unique.contains(&q) {
                unique.push(q);
            }
        }
        Self { questions: unique }
    }

    /// The built-in bank of ten Excel interview questions.
    pub fn excel() -> Self {
        Self::new(EXCEL_QUESTIONS.iter().map(|&q| Question::from(q)).collect())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn contains(&self, question: &Question) -> bool {
        self.questions.contains(question)
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::excel()
    }
}
