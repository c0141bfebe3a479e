//! OpenAI-compatible chat-completions client
//!
//! Stock [`LanguageModel`] implementation for any endpoint speaking the
//! `/v1/chat/completions` wire format (OpenAI, vLLM, Ollama's compat layer).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::LlmSettings;

use super::{LanguageModel, LlmError};

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Thin chat-completions client over a shared connection pool.
#[derive(Clone)]
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl OpenAiCompatClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(LlmError::HttpError)?;
        Ok(Self { http, settings })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let start_time = std::time::Instant::now();

        let payload = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature,
        };

        let mut request = self.http.post(self.completions_url()).json(&payload);
        if let Some(api_key) = &self.settings.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?.error_for_status()?;
        let body: ChatResponse = response.json().await?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("no choices in response".to_string()))?;

        tracing::debug!(
            model = %self.settings.model,
            temperature = temperature,
            elapsed_ms = start_time.elapsed().as_millis(),
            response_length = content.len(),
            "Chat completion finished"
        );

        Ok(content)
    }
}
