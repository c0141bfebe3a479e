//! Error types for intent analysis

use thiserror::Error;

use crate::llm::LlmError;
use crate::service::repair::{RepairError, StructureError};

/// Terminal error for the intent analysis stage. The rule-based analyzer
/// never fails; only the language-model-backed variant produces these.
#[derive(Debug, Error)]
pub enum IntentAnalysisError {
    #[error("language model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model output invalid after repair attempt: {0}")]
    Invalid(#[source] StructureError),
}

impl From<RepairError> for IntentAnalysisError {
    fn from(err: RepairError) -> Self {
        match err {
            RepairError::Upstream(e) => IntentAnalysisError::Llm(e),
            RepairError::InvalidAfterRepair(e) => IntentAnalysisError::Invalid(e),
        }
    }
}
