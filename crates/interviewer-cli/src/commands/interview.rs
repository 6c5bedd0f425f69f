//! The `interviewer interview` command (also the default).

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use interviewer_core::interview::Interview;
use interviewer_core::session::{QuestionSampler, RandomSampler, Session};
use interviewer_core::traits::TranscriptWriter;
use interviewer_providers::config::{load_config_from, resolve_api_key, TranscriptFormat};
use interviewer_providers::create_evaluator;
use interviewer_report::{JsonTranscriptWriter, TextTranscriptWriter};

use crate::console::Console;

/// Command-line overrides for an interview run.
pub struct Options {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub seed: Option<u64>,
}

pub async fn execute(options: Options) -> Result<()> {
    let mut config = load_config_from(options.config.as_deref())?;
    if let Some(output) = options.output {
        config.output_dir = output;
    }

    // The credential must resolve before the session can make progress.
    let api_key = resolve_api_key(&config.secrets_file)?;
    let evaluator = create_evaluator(&config.evaluator, &api_key)?;

    let sampler: Box<dyn QuestionSampler> = match options.seed {
        Some(seed) => Box::new(RandomSampler::seeded(seed)),
        None => Box::new(RandomSampler::from_entropy()),
    };
    let session = Session::new(config.question_bank()?, sampler)?;

    let mut interview = Interview::new(session, Arc::from(evaluator));
    for writer in transcript_writers(&config.formats, &config.output_dir) {
        interview = interview.with_writer(writer);
    }

    tracing::info!(
        session = %interview.session().id(),
        output_dir = %config.output_dir.display(),
        "interview ready"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let completed = Console::new(stdin.lock(), stdout.lock())
        .run(&mut interview)
        .await?;

    tracing::info!(completed, "interviewer exiting");
    Ok(())
}

/// One writer per distinct format, in first-seen order.
fn transcript_writers(formats: &[TranscriptFormat], dir: &Path) -> Vec<Arc<dyn TranscriptWriter>> {
    let mut seen: Vec<TranscriptFormat> = Vec::with_capacity(formats.len());
    for format in formats {
        if !seen.contains(format) {
            seen.push(*format);
        }
    }

    seen.into_iter()
        .map(|format| -> Arc<dyn TranscriptWriter> {
            match format {
                TranscriptFormat::Text => Arc::new(TextTranscriptWriter::new(dir)),
                TranscriptFormat::Json => Arc::new(JsonTranscriptWriter::new(dir)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(writers: &[Arc<dyn TranscriptWriter>]) -> Vec<&str> {
        writers.iter().map(|w| w.name()).collect()
    }

    #[test]
    fn repeated_formats_get_one_writer_each() {
        use TranscriptFormat::{Json, Text};

        let writers = transcript_writers(&[Text, Json, Text], Path::new("out"));
        assert_eq!(names(&writers), ["text", "json"]);

        let writers = transcript_writers(&[Json, Json, Text, Json], Path::new("out"));
        assert_eq!(names(&writers), ["json", "text"]);
    }

    #[test]
    fn no_formats_means_no_writers() {
        assert!(transcript_writers(&[], Path::new("out")).is_empty());
    }
}
