pub mod retrieval_query;
pub mod retrieval_result;
pub mod semantic_task;

pub use retrieval_query::{RetrievalQueryValidationError, validate_query};
pub use retrieval_result::{
    RetrievalResultValidationError, RetrievedChunkValidationError, validate_chunk, validate_result,
};
pub use semantic_task::{SemanticTaskValidationError, validate_task, validate_tasks};
