use thiserror::Error;

use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation model call failed: {0}")]
    Llm(#[from] LlmError),
}
