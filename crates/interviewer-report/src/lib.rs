//! interviewer-report — transcript writers.
//!
//! Writes completed sessions to disk as plain text (the canonical
//! `sample_transcript_<timestamp>.txt`) or JSON.

pub mod json;
pub mod text;

pub use json::JsonTranscriptWriter;
pub use text::TextTranscriptWriter;
