//! Language-model capability consumed by the pipeline
//!
//! The core treats the model as opaque text in / text out. Contract-bearing
//! stages call it at temperature 0; only the final generation stage uses a
//! configurable temperature.

mod openai_compat;

use async_trait::async_trait;

pub use openai_compat::OpenAiCompatClient;

/// Temperature used by every contract-bearing stage (requirement, intent,
/// semantic task). Deterministic sampling is part of their contract.
pub const CONTRACT_TEMPERATURE: f32 = 0.0;

/// Upstream language-model failure (network, service, malformed transport
/// response). Never retried by the pipeline; retries apply only to malformed
/// content, not failed calls.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("completion response missing expected structure: {0}")]
    MalformedResponse(String),

    #[error("language model service error: {0}")]
    ServiceError(String),
}

/// One completion round-trip against a language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `user_prompt` under `system_prompt` at the given temperature.
    ///
    /// Implementations must be deterministic at temperature 0 for the
    /// contract-bearing stages to behave as specified.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted language model for unit and pipeline tests.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{LanguageModel, LlmError};

    /// Replays a fixed queue of responses, one per `complete` call.
    pub struct ScriptedModel {
        responses: Mutex<Vec<String>>,
        pub calls: Mutex<Vec<(String, String, f32)>>,
    }

    impl ScriptedModel {
        pub fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().map(String::from).collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(
            &self,
            system_prompt: &str,
            user_prompt: &str,
            temperature: f32,
        ) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push((
                system_prompt.to_string(),
                user_prompt.to_string(),
                temperature,
            ));
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(LlmError::ServiceError("script exhausted".to_string()));
            }
            Ok(responses.remove(0))
        }
    }

    /// Always fails with an upstream error, for propagation tests.
    pub struct FailingModel;

    #[async_trait]
    impl LanguageModel for FailingModel {
        async fn complete(&self, _: &str, _: &str, _: f32) -> Result<String, LlmError> {
            Err(LlmError::ServiceError("service unavailable".to_string()))
        }
    }
}
