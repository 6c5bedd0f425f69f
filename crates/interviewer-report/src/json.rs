//! JSON transcript writer.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use interviewer_core::traits::TranscriptWriter;
use interviewer_core::transcript::Transcript;

/// Write `transcript` as pretty JSON into `dir`, returning the file path.
pub fn write_json_transcript(transcript: &Transcript, dir: &Path) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(transcript).context("failed to serialize transcript")?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create transcript directory {}", dir.display()))?;
    let path = dir.join(format!("sample_transcript_{}.json", transcript.id));
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write transcript to {}", path.display()))?;
    Ok(path)
}

/// [`TranscriptWriter`] producing a JSON transcript.
#[derive(Debug, Clone)]
pub struct JsonTranscriptWriter {
    output_dir: PathBuf,
}

impl JsonTranscriptWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl TranscriptWriter for JsonTranscriptWriter {
    fn name(&self) -> &str {
        "json"
    }

    fn write(&self, transcript: &Transcript) -> Result<PathBuf> {
        write_json_transcript(transcript, &self.output_dir)
    }
}
