//! The interview session state machine.
//!
//! A session moves `NotStarted -> InProgress -> Completed` and back to
//! `NotStarted` on restart. `Completed` is never stored: it is derived from
//! the question index reaching the end of the selected set.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::bank::{Question, QuestionBank, QUESTIONS_PER_SESSION};
use crate::error::SessionError;
use crate::traits::{EvaluationRequest, EvaluationResult, Evaluator};
use crate::transcript::Transcript;

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Chooses which bank indices make up a session's question set.
pub trait QuestionSampler: Send {
    /// Return `count` indices into a bank of `bank_len` questions.
    fn sample(&mut self, bank_len: usize, count: usize) -> Vec<usize>;
}

/// Uniform sampling without replacement.
pub struct RandomSampler<R = StdRng> {
    rng: R,
}

impl<R: Rng + Send> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSampler<StdRng> {
    /// Sampler seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic sampler for reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> QuestionSampler for RandomSampler<R> {
    fn sample(&mut self, bank_len: usize, count: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, bank_len, count.min(bank_len)).into_vec()
    }
}

/// Replays a fixed list of picks on every draw.
#[derive(Debug, Clone)]
pub struct FixedSampler {
    picks: Vec<usize>,
}

impl FixedSampler {
    pub fn new(picks: Vec<usize>) -> Self {
        Self { picks }
    }
}

impl QuestionSampler for FixedSampler {
    fn sample(&mut self, _bank_len: usize, _count: usize) -> Vec<usize> {
        self.picks.clone()
    }
}

// ---------------------------------------------------------------------------
// Selected set
// ---------------------------------------------------------------------------

/// The questions asked in one session: distinct, drawn from the bank, in
/// presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSet {
    questions: Vec<Question>,
}

impl SelectedSet {
    /// Draw `count` questions from `bank` using `sampler`.
    pub fn draw(
        bank: &QuestionBank,
        count: usize,
        sampler: &mut dyn QuestionSampler,
    ) -> Result<Self, SessionError> {
        if bank.len() < count {
            return Err(SessionError::BankTooSmall {
                available: bank.len(),
                required: count,
            });
        }

        let picks = sampler.sample(bank.len(), count);
        if picks.len() != count {
            return Err(SessionError::InvalidSelection(format!(
                "expected {count} questions, sampler returned {}",
                picks.len()
            )));
        }

        let mut seen = HashSet::with_capacity(count);
        let mut questions = Vec::with_capacity(count);
        for index in picks {
            let question = bank.get(index).ok_or_else(|| {
                SessionError::InvalidSelection(format!(
                    "index {index} is outside a bank of {}",
                    bank.len()
                ))
            })?;
            if !seen.insert(index) {
                return Err(SessionError::InvalidSelection(format!(
                    "index {index} drawn twice"
                )));
            }
            questions.push(question.clone());
        }

        Ok(Self { questions })
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
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::NotStarted => write!(f, "not started"),
            Phase::InProgress => write!(f, "in progress"),
            Phase::Completed => write!(f, "completed"),
        }
    }
}

/// Result of a submit event that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The answer was blank; nothing changed and the same question stands.
    Ignored,
    /// The answer was evaluated and recorded.
    Accepted {
        /// 1-based number of the question just answered.
        number: usize,
        /// Whether this answer finished the session.
        completed: bool,
    },
}

/// One interview attempt.
pub struct Session {
    id: Uuid,
    bank: QuestionBank,
    sampler: Box<dyn QuestionSampler>,
    selected: SelectedSet,
    started: bool,
    answers: Vec<String>,
    feedback: Vec<EvaluationResult>,
}

impl Session {
    /// Create a session in the `NotStarted` phase with a freshly drawn set.
    pub fn new(
        bank: QuestionBank,
        mut sampler: Box<dyn QuestionSampler>,
    ) -> Result<Self, SessionError> {
        let selected = SelectedSet::draw(&bank, QUESTIONS_PER_SESSION, sampler.as_mut())?;
        Ok(Self {
            id: Uuid::new_v4(),
            bank,
            sampler,
            selected,
            started: false,
            answers: Vec::new(),
            feedback: Vec::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn selected(&self) -> &SelectedSet {
        &self.selected
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn feedback(&self) -> &[EvaluationResult] {
        &self.feedback
    }

    /// Index of the next unanswered question.
    pub fn current_index(&self) -> usize {
        self.answers.len()
    }

    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::NotStarted
        } else if self.current_index() >= self.selected.len() {
            Phase::Completed
        } else {
            Phase::InProgress
        }
    }

    /// The question awaiting an answer, if the session is in progress.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase() {
            Phase::InProgress => self.selected.get(self.current_index()),
            _ => None,
        }
    }

    /// `NotStarted -> InProgress`. Draws a fresh question set.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::NotStarted, "start")?;
        self.reset()?;
        self.started = true;
        tracing::info!(session = %self.id, questions = self.selected.len(), "interview started");
        Ok(())
    }

    /// Evaluate and record an answer to the current question.
    ///
    /// Blank answers are ignored without calling the evaluator. If the
    /// evaluator fails, the session is left untouched and the same question
    /// may be answered again.
    #[instrument(skip(self, evaluator, answer), fields(session = %self.id, index = self.current_index()))]
    pub async fn submit(
        &mut self,
        evaluator: &dyn Evaluator,
        answer: &str,
    ) -> Result<SubmitOutcome, SessionError> {
        self.expect_phase(Phase::InProgress, "submit an answer")?;

        if answer.trim().is_empty() {
            tracing::debug!("blank answer ignored");
            return Ok(SubmitOutcome::Ignored);
        }

        let question = self
            .selected
            .get(self.current_index())
            .ok_or(SessionError::InvalidTransition {
                action: "submit an answer",
                phase: Phase::Completed,
            })?;
        let request = EvaluationRequest::new(question.text(), answer);

        let result = evaluator.evaluate(&request).await.map_err(|e| {
            tracing::warn!(evaluator = evaluator.name(), error = %e, "evaluation failed");
            SessionError::Evaluation(e)
        })?;

        self.answers.push(answer.to_string());
        self.feedback.push(result);
        self.check_invariants();

        let number = self.current_index();
        let completed = self.phase() == Phase::Completed;
        if completed {
            tracing::info!(session = %self.id, "interview completed");
        }
        Ok(SubmitOutcome::Accepted { number, completed })
    }

    /// `Completed -> NotStarted` with a new id and a fresh question set.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::Completed, "restart")?;
        let previous = self.id;
        self.reset()?;
        self.id = Uuid::new_v4();
        self.started = false;
        tracing::info!(previous = %previous, session = %self.id, "interview restarted");
        Ok(())
    }

    /// Project a completed session into a transcript stamped `generated_at`.
    pub fn transcript(&self, generated_at: DateTime<Local>) -> Option<Transcript> {
        if self.phase() != Phase::Completed {
            return None;
        }
        Some(Transcript::from_parts(
            generated_at,
            self.selected.questions(),
            &self.answers,
            &self.feedback,
        ))
    }

    fn expect_phase(&self, expected: Phase, action: &'static str) -> Result<(), SessionError> {
        let phase = self.phase();
        if phase == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition { action, phase })
        }
    }

    /// Draw a new set before clearing anything, so a failed draw changes nothing.
    fn reset(&mut self) -> Result<(), SessionError> {
        let selected =
            SelectedSet::draw(&self.bank, QUESTIONS_PER_SESSION, self.sampler.as_mut())?;
        self.selected = selected;
        self.answers.clear();
        self.feedback.clear();
        self.check_invariants();
        Ok(())
    }

    fn check_invariants(&self) {
        debug_assert_eq!(self.answers.len(), self.feedback.len());
        debug_assert!(self.current_index() <= self.selected.len());
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("phase", &self.phase())
            .field("current_index", &self.current_index())
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Echoes a canned score and counts calls; fails while `fail` is set.
    struct StubEvaluator {
        calls: AtomicUsize,
        fail: bool,
    }

    impl StubEvaluator {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl Evaluator for StubEvaluator {
        fn name(&self) -> &str {
            "stub"
        }

        async fn evaluate(&self, request: &EvaluationRequest) -> anyhow::Result<EvaluationResult> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                anyhow::bail!("service unavailable");
            }
            Ok(EvaluationResult::new(format!(
                "Score: 3/5\nFeedback: answered '{}'\nImprovement Tips: more detail",
                request.question
            )))
        }
    }

    fn assert_consistent(session: &Session) {
        assert_eq!(session.answers().len(), session.current_index());
        assert_eq!(session.feedback().len(), session.current_index());
        assert!(session.current_index() <= QUESTIONS_PER_SESSION);
    }

    fn assert_valid_selection(session: &Session) {
        let selected = session.selected().questions();
        assert_eq!(selected.len(), QUESTIONS_PER_SESSION);
        let distinct: HashSet<&Question> = selected.iter().collect();
        assert_eq!(distinct.len(), QUESTIONS_PER_SESSION);
        assert!(selected.iter().all(|q| session.bank().contains(q)));
    }

    fn fixed_session(picks: Vec<usize>) -> Session {
        Session::new(QuestionBank::excel(), Box::new(FixedSampler::new(picks))).unwrap()
    }

    async fn complete(session: &mut Session, evaluator: &StubEvaluator) {
        for i in 0..QUESTIONS_PER_SESSION {
            session
                .submit(evaluator, &format!("answer {}", i + 1))
                .await
                .unwrap();
        }
    }

    #[test]
    fn new_session_is_not_started() {
        let session =
            Session::new(QuestionBank::excel(), Box::new(RandomSampler::from_entropy())).unwrap();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.current_index(), 0);
        assert!(session.current_question().is_none());
        assert_valid_selection(&session);
        assert_consistent(&session);
    }

    #[test]
    fn random_sampler_always_draws_distinct_bank_questions() {
        let bank = QuestionBank::excel();
        let mut sampler = RandomSampler::seeded(7);
        for _ in 0..200 {
            let set = SelectedSet::draw(&bank, QUESTIONS_PER_SESSION, &mut sampler).unwrap();
            let distinct: HashSet<&Question> = set.questions().iter().collect();
            assert_eq!(distinct.len(), QUESTIONS_PER_SESSION);
            assert!(set.questions().iter().all(|q| bank.contains(q)));
        }
    }

    #[test]
    fn seeded_samplers_are_reproducible() {
        let bank = QuestionBank::excel();
        let a = SelectedSet::draw(&bank, 5, &mut RandomSampler::seeded(42)).unwrap();
        let b = SelectedSet::draw(&bank, 5, &mut RandomSampler::seeded(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn draw_rejects_duplicate_picks() {
        let bank = QuestionBank::excel();
        let err = SelectedSet::draw(&bank, 5, &mut FixedSampler::new(vec![1, 1, 2, 3, 4]))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidSelection(_)));
    }

    #[test]
    fn draw_rejects_out_of_range_picks() {
        let bank = QuestionBank::excel();
        let err = SelectedSet::draw(&bank, 5, &mut FixedSampler::new(vec![0, 1, 2, 3, 10]))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidSelection(_)));
    }

    #[test]
    fn draw_rejects_small_bank() {
        let bank = QuestionBank::new(vec!["a".into(), "b".into()]);
        let err = SelectedSet::draw(&bank, 5, &mut RandomSampler::seeded(1)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::BankTooSmall {
                available: 2,
                required: 5
            }
        ));
    }

    #[test]
    fn start_moves_to_in_progress() {
        let mut session = fixed_session(vec![0, 1, 2, 3, 4]);
        session.start().unwrap();
        assert_eq!(session.phase(), Phase::InProgress);
        assert_eq!(session.current_question(), QuestionBank::excel().get(0));
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut session = fixed_session(vec![0, 1, 2, 3, 4]);
        session.start().unwrap();
        let err = session.start().unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                phase: Phase::InProgress,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn submit_before_start_is_rejected() {
        let mut session = fixed_session(vec![0, 1, 2, 3, 4]);
        let evaluator = StubEvaluator::ok();
        let err = session.submit(&evaluator, "an answer").await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
        assert_eq!(evaluator.calls(), 0);
    }

    #[tokio::test]
    async fn full_run_with_fixed_picks_completes() {
        let bank = QuestionBank::excel();
        let mut session = fixed_session(vec![1, 3, 5, 7, 9]);
        let evaluator = StubEvaluator::ok();
        session.start().unwrap();

        for i in 0..QUESTIONS_PER_SESSION {
            let expected = bank.get(1 + 2 * i).unwrap();
            assert_eq!(session.current_question(), Some(expected));
            let outcome = session
                .submit(&evaluator, &format!("answer {}", i + 1))
                .await
                .unwrap();
            assert_eq!(
                outcome,
                SubmitOutcome::Accepted {
                    number: i + 1,
                    completed: i + 1 == QUESTIONS_PER_SESSION
                }
            );
            assert_consistent(&session);
        }

        assert_eq!(session.current_index(), 5);
        assert_eq!(session.feedback().len(), 5);
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(evaluator.calls(), 5);
    }

    #[tokio::test]
    async fn blank_answers_change_nothing() {
        let mut session = fixed_session(vec![1, 3, 5, 7, 9]);
        let evaluator = StubEvaluator::ok();
        session.start().unwrap();

        for blank in ["", "   ", "\n\t "] {
            let outcome = session.submit(&evaluator, blank).await.unwrap();
            assert_eq!(outcome, SubmitOutcome::Ignored);
        }

        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert!(session.feedback().is_empty());
        assert_eq!(evaluator.calls(), 0);
    }

    #[tokio::test]
    async fn answers_are_stored_verbatim() {
        let mut session = fixed_session(vec![1, 3, 5, 7, 9]);
        session.start().unwrap();
        session
            .submit(&StubEvaluator::ok(), "  padded answer  ")
            .await
            .unwrap();
        assert_eq!(session.answers(), ["  padded answer  "]);
    }

    #[tokio::test]
    async fn evaluator_failure_leaves_session_untouched() {
        let mut session = fixed_session(vec![1, 3, 5, 7, 9]);
        session.start().unwrap();
        session.submit(&StubEvaluator::ok(), "first").await.unwrap();

        let err = session
            .submit(&StubEvaluator::failing(), "second")
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("service unavailable"));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.answers(), ["first"]);
        assert_consistent(&session);

        session.submit(&StubEvaluator::ok(), "second").await.unwrap();
        assert_eq!(session.current_index(), 2);
    }

    #[tokio::test]
    async fn completed_session_rejects_submissions() {
        let mut session = fixed_session(vec![1, 3, 5, 7, 9]);
        let evaluator = StubEvaluator::ok();
        session.start().unwrap();
        complete(&mut session, &evaluator).await;

        let err = session.submit(&evaluator, "one more").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                phase: Phase::Completed,
                ..
            }
        ));
        assert_eq!(session.current_index(), 5);
        assert_eq!(evaluator.calls(), 5);
    }

    #[tokio::test]
    async fn restart_resets_and_resamples() {
        let mut session = Session::new(
            QuestionBank::excel(),
            Box::new(RandomSampler::seeded(2024)),
        )
        .unwrap();
        let evaluator = StubEvaluator::ok();
        session.start().unwrap();
        complete(&mut session, &evaluator).await;
        let first_id = session.id();

        session.restart().unwrap();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert!(session.feedback().is_empty());
        assert_ne!(session.id(), first_id);
        assert_valid_selection(&session);

        session.start().unwrap();
        assert_eq!(session.phase(), Phase::InProgress);
        assert_valid_selection(&session);
    }

    #[tokio::test]
    async fn restart_requires_completion() {
        let mut session = fixed_session(vec![1, 3, 5, 7, 9]);
        session.start().unwrap();
        session.submit(&StubEvaluator::ok(), "only one").await.unwrap();

        assert!(session.restart().is_err());
        assert_eq!(session.current_index(), 1);
    }

    #[tokio::test]
    async fn transcript_only_after_completion() {
        let mut session = fixed_session(vec![1, 3, 5, 7, 9]);
        let evaluator = StubEvaluator::ok();
        session.start().unwrap();
        assert!(session.transcript(Local::now()).is_none());

        complete(&mut session, &evaluator).await;
        let transcript = session.transcript(Local::now()).unwrap();
        assert_eq!(transcript.entries.len(), 5);
        assert_eq!(transcript.entries[0].answer, "answer 1");
    }
}
