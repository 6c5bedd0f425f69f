//! Mock evaluator for testing sessions without real API calls.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use interviewer_core::traits::{EvaluationRequest, EvaluationResult, Evaluator};

use crate::error::ProviderError;

/// Default canned evaluation, in the format the real prompt asks for.
pub const DEFAULT_MOCK_EVALUATION: &str =
    "Score: 3/5\nFeedback: Partially correct.\nImprovement Tips: Add a concrete example.";

/// A mock evaluator returning configurable responses.
///
/// Responses are matched on a substring of the question, first match in
/// insertion order wins; calls listed in `fail_on_calls` (1-based) return a
/// network error instead.
pub struct MockEvaluator {
    /// Ordered (question substring, evaluation text) pairs.
    responses: Vec<(String, String)>,
    /// Response if no question matches.
    default_response: String,
    /// Call numbers that fail.
    fail_on_calls: Vec<u32>,
    call_count: AtomicU32,
    last_request: Mutex<Option<EvaluationRequest>>,
}

impl MockEvaluator {
    /// Create a mock with question→response mappings, checked in order.
    pub fn new<I, K, V>(responses: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            responses: responses
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            default_response: DEFAULT_MOCK_EVALUATION.to_string(),
            fail_on_calls: Vec::new(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same evaluation.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            default_response: response.to_string(),
            ..Self::default()
        }
    }

    /// Make the given 1-based calls fail with a network error.
    pub fn failing_on(mut self, calls: &[u32]) -> Self {
        self.fail_on_calls = calls.to_vec();
        self
    }

    /// Number of evaluate calls made, including failed ones.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<EvaluationRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockEvaluator {
    fn default() -> Self {
        Self::new(Vec::<(String, String)>::new())
    }
}

#[async_trait]
impl Evaluator for MockEvaluator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> anyhow::Result<EvaluationResult> {
        let call = self.call_count.fetch_add(1, Ordering::Relaxed) + 1;
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());

        if self.fail_on_calls.contains(&call) {
            return Err(ProviderError::NetworkError(format!("mock failure on call {call}")).into());
        }

        let content = self
            .responses
            .iter()
            .find(|(key, _)| request.question.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        Ok(EvaluationResult::new(content))
    }
}
