//! Line-oriented console front end for an interview.
//!
//! Renders the current session phase and turns input lines into events.
//! Input is read synchronously, so a second answer can never be dispatched
//! while an evaluation is still running.

use std::io::{BufRead, Write};

use anyhow::Result;
use comfy_table::{Cell, Table};

use interviewer_core::interview::{Event, EventOutcome, Interview};
use interviewer_core::session::Phase;
use interviewer_core::transcript::Transcript;
use interviewer_core::QUESTIONS_PER_SESSION;

const TITLE: &str = "Excel Mock Interviewer";

/// Typed at the answer prompt to leave mid-interview.
pub const QUIT_COMMAND: &str = ":quit";

/// Drives one interview from `input` to `output`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run until the user quits or input ends. Returns the number of
    /// sessions completed.
    pub async fn run(&mut self, interview: &mut Interview) -> Result<usize> {
        let mut completed = 0;

        loop {
            match interview.session().phase() {
                Phase::NotStarted => {
                    self.render_welcome()?;
                    match self.read_line()? {
                        Some(line) if !line.trim().eq_ignore_ascii_case("q") => {
                            interview.handle(Event::Start).await?;
                        }
                        _ => return Ok(completed),
                    }
                }
                Phase::InProgress => {
                    let session = interview.session();
                    let number = session.current_index() + 1;
                    let question = session
                        .current_question()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    writeln!(self.output, "\nQ{number}: {question}")?;
                    write!(self.output, "Your Answer: ")?;
                    self.output.flush()?;

                    let Some(answer) = self.read_line()? else {
                        return Ok(completed);
                    };
                    if answer.trim() == QUIT_COMMAND {
                        return Ok(completed);
                    }
                    if !answer.trim().is_empty() {
                        writeln!(self.output, "Evaluating your answer...")?;
                    }

                    match interview.handle(Event::Submit(answer)).await {
                        Ok(EventOutcome::Completed {
                            transcript,
                            saved,
                            failures,
                        }) => {
                            completed += 1;
                            self.render_completion(&transcript)?;
                            for path in saved.iter().map(|p| p.display()) {
                                writeln!(self.output, "Transcript saved to `{path}`")?;
                            }
                            for failure in &failures {
                                writeln!(
                                    self.output,
                                    "Could not save {} transcript: {}",
                                    failure.writer, failure.message
                                )?;
                            }
                        }
                        Ok(_) => {}
                        Err(e) if e.is_retryable() => {
                            writeln!(self.output, "{e}")?;
                            writeln!(
                                self.output,
                                "Your answer was not recorded. Please try again."
                            )?;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                Phase::Completed => {
                    write!(self.output, "\nRestart the interview? [y/N] ")?;
                    self.output.flush()?;
                    match self.read_line()? {
                        Some(line) if line.trim().eq_ignore_ascii_case("y") => {
                            interview.handle(Event::Restart).await?;
                        }
                        _ => return Ok(completed),
                    }
                }
            }
        }
    }

    fn render_welcome(&mut self) -> Result<()> {
        writeln!(self.output, "\n{TITLE}")?;
        writeln!(
            self.output,
            "Welcome !! You'll be asked {QUESTIONS_PER_SESSION} randomly selected Excel questions. \
             After each response, you'll receive instant feedback based on relevance, accuracy, \
             and completeness. A summary will be provided at the end."
        )?;
        write!(self.output, "Press Enter to start the interview (q to quit): ")?;
        self.output.flush()?;
        Ok(())
    }

    fn render_completion(&mut self, transcript: &Transcript) -> Result<()> {
        writeln!(self.output, "\nInterview Completed!")?;
        writeln!(self.output, "\nFeedback Summary")?;

        let mut table = Table::new();
        table.set_header(vec!["#", "Question", "Score"]);
        for entry in &transcript.entries {
            let score = entry
                .feedback
                .score()
                .map(|s| format!("{s}/5"))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                Cell::new(entry.number),
                Cell::new(&entry.question),
                Cell::new(score),
            ]);
        }
        writeln!(self.output, "{table}")?;
        if let Some(avg) = transcript.average_score() {
            writeln!(self.output, "Average score: {avg:.1}/5")?;
        }

        for entry in &transcript.entries {
            writeln!(self.output, "\nQ{}: {}", entry.number, entry.question)?;
            writeln!(self.output, "Your Answer: {}", entry.answer)?;
            writeln!(self.output, "{}", entry.feedback.text().trim())?;
            writeln!(self.output, "---")?;
        }
        Ok(())
    }

    /// Next input line without its line ending; `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
