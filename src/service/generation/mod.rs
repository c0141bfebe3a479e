//! Generation stage
//!
//! Freezes retrieval evidence into a [`GenerationInput`] and runs one grounded
//! model call against it. The model sees only the frozen input; it never
//! reopens retrieval or the original requirement.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::llm::LanguageModel;
use crate::model::{
    GenerationInput, GenerationResult, GenerationSettings, OutputSpec, RetrievalResult,
    RetrievedChunk, SemanticTask, mean_relevance,
};

pub mod error;
pub mod prompts;

pub use error::GenerationError;

use prompts::{GENERATION_SYSTEM_PROMPT, build_generation_prompt};

/// Folds one task plus its retrieval results into a frozen [`GenerationInput`].
///
/// Results below `min_confidence` are dropped whole. Within each surviving
/// result chunks are ranked by relevance and truncated to `top_k` before being
/// merged into a single synthetic result.
#[derive(Debug, Clone)]
pub struct GenerationInputBuilder {
    settings: GenerationSettings,
}

impl GenerationInputBuilder {
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    pub fn build(
        &self,
        task: &SemanticTask,
        results: &[RetrievalResult],
        output_spec: Option<OutputSpec>,
    ) -> GenerationInput {
        let mut merged: Vec<RetrievedChunk> = Vec::new();
        for result in results {
            if result.confidence < self.settings.min_confidence {
                tracing::debug!(
                    query_id = %result.query_id,
                    confidence = result.confidence,
                    "retrieval result below confidence floor, dropped"
                );
                continue;
            }
            let mut chunks = result.chunks.clone();
            chunks.sort_by(|a, b| {
                b.relevance_score
                    .partial_cmp(&a.relevance_score)
                    .unwrap_or(Ordering::Equal)
            });
            if let Some(k) = self.settings.top_k {
                chunks.truncate(k);
            }
            merged.extend(chunks);
        }

        let query_id = {
            let id = Uuid::new_v4().simple().to_string();
            format!("merged-{}", &id[..8])
        };
        let confidence = mean_relevance(&merged);
        let total_hits = merged.len();

        tracing::info!(
            task_id = %task.task_id,
            chunks = total_hits,
            confidence,
            "generation input frozen"
        );

        GenerationInput {
            task: task.clone(),
            retrieval_result: RetrievalResult {
                query_id,
                chunks: merged,
                confidence,
                total_hits,
            },
            output_spec: output_spec.unwrap_or_else(|| task.output_spec.clone()),
        }
    }
}

/// Produces the final answer from a frozen [`GenerationInput`].
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, input: &GenerationInput) -> Result<GenerationResult, GenerationError>;
}

/// Language-model-backed generator. Unlike the contract stages this runs at the
/// configured sampling temperature and never retries; an upstream failure is
/// reported as-is.
pub struct GenerationExecutor {
    llm: Arc<dyn LanguageModel>,
    temperature: f32,
}

impl GenerationExecutor {
    pub fn new(llm: Arc<dyn LanguageModel>, temperature: f32) -> Self {
        Self { llm, temperature }
    }
}

#[async_trait]
impl Generator for GenerationExecutor {
    async fn generate(&self, input: &GenerationInput) -> Result<GenerationResult, GenerationError> {
        let user_prompt = build_generation_prompt(input);
        let content = self
            .llm
            .complete(GENERATION_SYSTEM_PROMPT, &user_prompt, self.temperature)
            .await?;

        let used_chunks: Vec<String> = input
            .retrieval_result
            .chunks
            .iter()
            .map(|c| c.chunk_id.clone())
            .collect();

        tracing::info!(
            task_id = %input.task.task_id,
            used_chunks = used_chunks.len(),
            confidence = input.retrieval_result.confidence,
            "generation complete"
        );

        Ok(GenerationResult {
            task_id: input.task.task_id.clone(),
            content,
            used_chunks,
            confidence: input.retrieval_result.confidence,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::llm::testing::{FailingModel, ScriptedModel};
    use crate::model::{OutputType, RetrievalScope, TaskType};

    use super::*;

    fn chunk(id: &str, score: f64) -> RetrievedChunk {
        RetrievedChunk {
            chunk_id: id.to_string(),
            source_id: format!("src-{id}"),
            source_type: RetrievalScope::Code,
            content: format!("content of {id}"),
            relevance_score: score,
            metadata: HashMap::new(),
        }
    }

    fn task() -> SemanticTask {
        SemanticTask {
            task_id: "task-1".to_string(),
            intent: "analyze login validation in UserService".to_string(),
            task_type: TaskType::Analysis,
            entities: vec![],
            operations: vec![],
            constraints: vec![],
            output_spec: OutputSpec {
                output_type: OutputType::Text,
                schema: None,
                quality_requirements: vec![],
            },
        }
    }

    #[test]
    fn top_k_keeps_highest_relevance_in_order() {
        let settings = GenerationSettings {
            min_confidence: 0.2,
            top_k: Some(2),
            temperature: 0.2,
        };
        let result = RetrievalResult::from_chunks(
            "rq-1".to_string(),
            vec![chunk("a", 0.9), chunk("b", 0.3), chunk("c", 0.7)],
        );
        let input = GenerationInputBuilder::new(settings).build(&task(), &[result], None);

        let scores: Vec<f64> = input
            .retrieval_result
            .chunks
            .iter()
            .map(|c| c.relevance_score)
            .collect();
        assert_eq!(scores, vec![0.9, 0.7]);
        assert_eq!(input.retrieval_result.total_hits, 2);
    }

    #[test]
    fn low_confidence_results_are_dropped_whole() {
        let settings = GenerationSettings {
            min_confidence: 0.5,
            top_k: None,
            temperature: 0.2,
        };
        let strong = RetrievalResult::from_chunks("rq-1".to_string(), vec![chunk("a", 0.8)]);
        let weak = RetrievalResult::from_chunks("rq-2".to_string(), vec![chunk("b", 0.1)]);
        let input = GenerationInputBuilder::new(settings).build(&task(), &[strong, weak], None);

        assert_eq!(input.retrieval_result.chunks.len(), 1);
        assert_eq!(input.retrieval_result.chunks[0].chunk_id, "a");
    }

    #[test]
    fn empty_results_yield_zero_confidence() {
        let input =
            GenerationInputBuilder::new(GenerationSettings::default()).build(&task(), &[], None);
        assert_eq!(input.retrieval_result.confidence, 0.0);
        assert!(input.retrieval_result.chunks.is_empty());
    }

    #[test]
    fn merged_confidence_is_mean_of_kept_chunks() {
        let result = RetrievalResult::from_chunks(
            "rq-1".to_string(),
            vec![chunk("a", 0.8), chunk("b", 0.4)],
        );
        let input =
            GenerationInputBuilder::new(GenerationSettings::default()).build(&task(), &[result], None);
        assert!((input.retrieval_result.confidence - 0.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn executor_records_used_chunks_and_confidence() {
        let result = RetrievalResult::from_chunks(
            "rq-1".to_string(),
            vec![chunk("a", 0.9), chunk("b", 0.5)],
        );
        let input =
            GenerationInputBuilder::new(GenerationSettings::default()).build(&task(), &[result], None);

        let llm = Arc::new(ScriptedModel::new(vec!["the answer, grounded"]));
        let executor = GenerationExecutor::new(llm, 0.2);
        let generated = executor.generate(&input).await.unwrap();

        assert_eq!(generated.task_id, "task-1");
        assert_eq!(generated.content, "the answer, grounded");
        assert_eq!(generated.used_chunks, vec!["a", "b"]);
        assert!((generated.confidence - 0.7).abs() < 1e-9);
    }

    #[tokio::test]
    async fn upstream_failure_is_not_retried() {
        let input =
            GenerationInputBuilder::new(GenerationSettings::default()).build(&task(), &[], None);
        let executor = GenerationExecutor::new(Arc::new(FailingModel), 0.2);
        let err = executor.generate(&input).await.unwrap_err();
        assert!(matches!(err, GenerationError::Llm(_)));
    }
}
