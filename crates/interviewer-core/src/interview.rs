//! Event driver tying a session to its evaluator and transcript writers.
//!
//! The presentation layer feeds [`Event`]s in one at a time; each is handled
//! to completion before `handle` returns, and `&mut self` rules out a second
//! submit while an evaluation is outstanding.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;

use crate::error::SessionError;
use crate::session::{Session, SubmitOutcome};
use crate::traits::{Evaluator, TranscriptWriter};
use crate::transcript::Transcript;

/// A user action forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Submit(String),
    Restart,
}

/// A transcript writer that failed. The interview still completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceFailure {
    pub writer: String,
    pub message: String,
}

/// What a handled event did.
#[derive(Debug, Clone)]
pub enum EventOutcome {
    /// The session moved to `InProgress`.
    Started,
    /// A blank answer was ignored; the same question stands.
    Ignored,
    /// An answer was recorded and more questions remain.
    Answered { number: usize },
    /// The final answer was recorded and the transcript handed to the writers.
    Completed {
        transcript: Transcript,
        saved: Vec<PathBuf>,
        failures: Vec<PersistenceFailure>,
    },
    /// The session was reset to `NotStarted`.
    Restarted,
}

/// A single-session interview.
pub struct Interview {
    session: Session,
    evaluator: Arc<dyn Evaluator>,
    writers: Vec<Arc<dyn TranscriptWriter>>,
}

impl Interview {
    pub fn new(session: Session, evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            session,
            evaluator,
            writers: Vec::new(),
        }
    }

    /// Add a writer invoked once per completed session.
    pub fn with_writer(mut self, writer: Arc<dyn TranscriptWriter>) -> Self {
        self.writers.push(writer);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Process one event.
    pub async fn handle(&mut self, event: Event) -> Result<EventOutcome, SessionError> {
        match event {
            Event::Start => {
                self.session.start()?;
                Ok(EventOutcome::Started)
            }
            Event::Submit(answer) => {
                let outcome = self
                    .session
                    .submit(self.evaluator.as_ref(), &answer)
                    .await?;
                match outcome {
                    SubmitOutcome::Ignored => Ok(EventOutcome::Ignored),
                    SubmitOutcome::Accepted {
                        completed: false,
                        number,
                    } => Ok(EventOutcome::Answered { number }),
                    SubmitOutcome::Accepted {
                        completed: true, ..
                    } => self.finish(),
                }
            }
            Event::Restart => {
                self.session.restart()?;
                Ok(EventOutcome::Restarted)
            }
        }
    }

    fn finish(&self) -> Result<EventOutcome, SessionError> {
        let transcript = self
            .session
            .transcript(Local::now())
            .ok_or(SessionError::InvalidTransition {
                action: "build a transcript",
                phase: self.session.phase(),
            })?;

        let mut saved = Vec::new();
        let mut failures = Vec::new();
        for writer in &self.writers {
            match writer.write(&transcript) {
                Ok(path) => {
                    tracing::info!(
                        writer = writer.name(),
                        path = %path.display(),
                        "transcript saved"
                    );
                    saved.push(path);
                }
                Err(e) => {
                    tracing::error!(
                        writer = writer.name(),
                        error = %e,
                        "failed to save transcript"
                    );
                    failures.push(PersistenceFailure {
                        writer: writer.name().to_string(),
                        message: format!("{e:#}"),
                    });
                }
            }
        }

        Ok(EventOutcome::Completed {
            transcript,
            saved,
            failures,
        })
    }
}
