//! Plain-text transcript writer.
//!
//! One file per completed session, named from the transcript timestamp:
//! `sample_transcript_<YYYY-MM-DD_HH-MM-SS>.txt`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use interviewer_core::traits::TranscriptWriter;
use interviewer_core::transcript::Transcript;

/// File name for a transcript written as text.
pub fn transcript_file_name(transcript: &Transcript) -> String {
    format!("sample_transcript_{}.txt", transcript.id)
}

/// Write `transcript` as text into `dir`, returning the file path.
pub fn write_text_transcript(transcript: &Transcript, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create transcript directory {}", dir.display()))?;
    let path = dir.join(transcript_file_name(transcript));
    std::fs::write(&path, transcript.render_text())
        .with_context(|| format!("failed to write transcript to {}", path.display()))?;
    Ok(path)
}

/// [`TranscriptWriter`] producing the plain-text transcript.
#[derive(Debug, Clone)]
pub struct TextTranscriptWriter {
    output_dir: PathBuf,
}

impl TextTranscriptWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl TranscriptWriter for TextTranscriptWriter {
    fn name(&self) -> &str {
        "text"
    }

    fn write(&self, transcript: &Transcript) -> Result<PathBuf> {
        write_text_transcript(transcript, &self.output_dir)
    }
}
