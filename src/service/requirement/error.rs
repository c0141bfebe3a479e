//! Error types for requirement parsing

use thiserror::Error;

use crate::llm::LlmError;
use crate::service::repair::{RepairError, StructureError};

/// Terminal error for the requirement stage. Distinguishes a failed model call
/// from model output that stayed invalid through the repair attempt.
#[derive(Debug, Error)]
pub enum RequirementParseError {
    #[error("language model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model output invalid after repair attempt: {0}")]
    Invalid(#[source] StructureError),
}

impl From<RepairError> for RequirementParseError {
    fn from(err: RepairError) -> Self {
        match err {
            RepairError::Upstream(e) => RequirementParseError::Llm(e),
            RepairError::InvalidAfterRepair(e) => RequirementParseError::Invalid(e),
        }
    }
}
