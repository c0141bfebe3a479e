use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::retrieval::RetrievalResult;
use crate::model::semantic::{OutputSpec, SemanticTask};

// Frozen input boundary to the generation stage. Nothing past this point may
// reinterpret the requirement or re-run retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationInput {
    pub task: SemanticTask,
    pub retrieval_result: RetrievalResult,
    pub output_spec: OutputSpec,
}

// Final generation outcome plus trace data: which chunks were supplied as
// evidence and how confident retrieval was in them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub task_id: String,
    pub content: String,
    /// Chunk ids supplied as evidence, in prompt order.
    pub used_chunks: Vec<String>,
    /// Mirrors the merged retrieval confidence.
    pub confidence: f64,
    pub generated_at: DateTime<Utc>,
}
