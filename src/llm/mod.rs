//! Language-model collaborator interface
//!
//! Defines the narrow `LanguageModel` seam the memory components depend on.
//! The contract is deliberately forgiving: a completion call never surfaces
//! an error to the caller. Network failures, quota errors, and unparseable
//! responses all collapse to `None`, which callers treat as "no usable
//! result" and skip.
//!
//! Production supplies [`gemini::GeminiClient`]; tests supply a deterministic
//! stub so every memory property can be exercised without network access.

pub mod gemini;

use async_trait::async_trait;
use serde_json::Value;

/// Narrow interface to the external text-classification service.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send a prompt and return the structured JSON object it produced.
    ///
    /// `None` on any failure: transport, quota, empty response, or a
    /// response that is not valid JSON.
    async fn structured_completion(&self, prompt: &str) -> Option<Value>;

    /// Human-readable name for this model (used in logs).
    fn name(&self) -> &str;
}

#[cfg(test)]
pub mod stub {
    //! Deterministic in-process model for tests

    use super::*;
    use std::sync::Mutex;

    /// Test double that replays a fixed queue of responses.
    ///
    /// `None` entries simulate collaborator failure; once the queue is
    /// exhausted the stub falls back to its repeating response (`None`
    /// unless built with [`StubModel::always`]). Prompts are recorded for
    /// assertion.
    pub struct StubModel {
        responses: Mutex<Vec<Option<Value>>>,
        fallback: Option<Value>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubModel {
        /// A stub that replays `responses` in order, then fails
        pub fn with_responses(responses: Vec<Option<Value>>) -> Self {
            let mut reversed = responses;
            reversed.reverse();
            Self {
                responses: Mutex::new(reversed),
                fallback: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// A stub that always returns the same object
        pub fn always(value: Value) -> Self {
            Self {
                responses: Mutex::new(Vec::new()),
                fallback: Some(value),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// A stub that always fails
        pub fn failing() -> Self {
            Self::with_responses(Vec::new())
        }

        /// Prompts received so far
        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LanguageModel for StubModel {
        async fn structured_completion(&self, prompt: &str) -> Option<Value> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let mut responses = self.responses.lock().unwrap();
            match responses.pop() {
                Some(response) => response,
                None => self.fallback.clone(),
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }
}
