//! Error types for semantic task construction

use thiserror::Error;

use crate::llm::LlmError;
use crate::service::repair::{RepairError, StructureError};

/// Terminal error for the semantic task stage. The rule-based builder never
/// fails; only the language-model-backed variant produces these.
#[derive(Debug, Error)]
pub enum SemanticTaskBuildError {
    #[error("language model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model output invalid after repair attempt: {0}")]
    Invalid(#[source] StructureError),
}

impl From<RepairError> for SemanticTaskBuildError {
    fn from(err: RepairError) -> Self {
        match err {
            RepairError::Upstream(e) => SemanticTaskBuildError::Llm(e),
            RepairError::InvalidAfterRepair(e) => SemanticTaskBuildError::Invalid(e),
        }
    }
}
