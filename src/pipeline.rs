//! Staged semantic execution pipeline
//!
//! Drives one requirement through the full chain: structuring, intent
//! analysis, semantic task construction, retrieval and grounded generation.
//! Each boundary is validated before the next stage runs, so a semantic defect
//! surfaces where it was produced instead of corrupting a later stage.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::llm::{LanguageModel, LlmError, OpenAiCompatClient};
use crate::model::{
    GenerationResult, IntentAnalysis, PipelineConfig, Requirement, RetrievalQuery, RetrievalResult,
    SemanticTask,
};
use crate::retriever::{Retriever, RetrieverError};
use crate::service::generation::{
    GenerationError, GenerationExecutor, GenerationInputBuilder, Generator,
};
use crate::service::intent::{IntentAnalysisError, IntentAnalyzer, RuleBasedIntentAnalyzer};
use crate::service::query::RetrievalQueryBuilder;
use crate::service::requirement::{LlmRequirementParser, RequirementParseError, RequirementParser};
use crate::service::task::{RuleBasedTaskBuilder, SemanticTaskBuildError, SemanticTaskBuilder};
use crate::service::validation::{
    RetrievalQueryValidationError, RetrievalResultValidationError, SemanticTaskValidationError,
    validate_query, validate_result, validate_tasks,
};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("requirement stage failed: {0}")]
    Requirement(#[from] RequirementParseError),

    #[error("intent stage failed: {0}")]
    Intent(#[from] IntentAnalysisError),

    #[error("task stage failed: {0}")]
    Task(#[from] SemanticTaskBuildError),

    #[error("task validation failed: {0}")]
    TaskValidation(#[from] SemanticTaskValidationError),

    #[error("query validation failed: {0}")]
    QueryValidation(#[from] RetrievalQueryValidationError),

    #[error("retrieval stage failed: {0}")]
    Retrieval(#[from] RetrieverError),

    #[error("retrieval result validation failed: {0}")]
    ResultValidation(#[from] RetrievalResultValidationError),

    #[error("generation stage failed: {0}")]
    Generation(#[from] GenerationError),
}

/// Full trace of one pipeline run: every intermediate representation the run
/// produced, in stage order. Serializable for audit logs and debugging.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub requirement: Requirement,
    pub intent: IntentAnalysis,
    pub tasks: Vec<SemanticTask>,
    pub queries: Vec<RetrievalQuery>,
    pub retrieval_results: Vec<RetrievalResult>,
    pub generation: GenerationResult,
}

pub struct SemanticExecutionPipeline {
    parser: Arc<dyn RequirementParser>,
    analyzer: Arc<dyn IntentAnalyzer>,
    task_builder: Arc<dyn SemanticTaskBuilder>,
    retriever: Arc<dyn Retriever>,
    query_builder: RetrievalQueryBuilder,
    input_builder: GenerationInputBuilder,
    generator: Arc<dyn Generator>,
}

impl SemanticExecutionPipeline {
    pub fn new(
        parser: Arc<dyn RequirementParser>,
        analyzer: Arc<dyn IntentAnalyzer>,
        task_builder: Arc<dyn SemanticTaskBuilder>,
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn Generator>,
        input_builder: GenerationInputBuilder,
    ) -> Self {
        Self {
            parser,
            analyzer,
            task_builder,
            retriever,
            query_builder: RetrievalQueryBuilder::new(),
            input_builder,
            generator,
        }
    }

    /// Standard wiring: language-model requirement parsing, rule-based intent
    /// and task stages, the supplied retriever, model-backed generation.
    pub fn from_config(
        llm: Arc<dyn LanguageModel>,
        retriever: Arc<dyn Retriever>,
        config: &PipelineConfig,
    ) -> Self {
        Self::new(
            Arc::new(LlmRequirementParser::new(llm.clone())),
            Arc::new(RuleBasedIntentAnalyzer::new()),
            Arc::new(RuleBasedTaskBuilder::new()),
            retriever,
            Arc::new(GenerationExecutor::new(llm, config.generation.temperature)),
            GenerationInputBuilder::new(config.generation.clone()),
        )
    }

    /// [`Self::from_config`] with the stock OpenAI-compatible client.
    pub fn with_openai(
        retriever: Arc<dyn Retriever>,
        config: &PipelineConfig,
    ) -> Result<Self, LlmError> {
        let llm = Arc::new(OpenAiCompatClient::new(config.llm.clone())?);
        Ok(Self::from_config(llm, retriever, config))
    }

    /// Run one requirement end to end.
    ///
    /// Generation answers the primary (first) task; retrieval evidence from
    /// every executed query is merged into its input. Summarize-only tasks
    /// produce no query, so a run may legitimately reach generation with no
    /// evidence at all.
    pub async fn run(&self, raw_text: &str) -> Result<PipelineRun, PipelineError> {
        tracing::info!(input_length = raw_text.len(), "Pipeline run started");

        let requirement = self.parser.parse(raw_text).await?;
        let intent = self.analyzer.analyze(&requirement).await?;

        let tasks = self.task_builder.build(&requirement, &intent).await?;
        validate_tasks(&tasks)?;

        let queries = self.query_builder.build(&tasks);
        for query in &queries {
            validate_query(query)?;
        }

        let mut retrieval_results = Vec::with_capacity(queries.len());
        for query in &queries {
            let result = self.retriever.execute(query).await?;
            validate_result(&result)?;
            retrieval_results.push(result);
        }

        // Tasks are non-empty past validation, the primary is always first.
        let primary = &tasks[0];
        let input = self.input_builder.build(primary, &retrieval_results, None);
        let generation = self.generator.generate(&input).await?;

        tracing::info!(
            task_count = tasks.len(),
            query_count = queries.len(),
            evidence_chunks = generation.used_chunks.len(),
            confidence = generation.confidence,
            "Pipeline run finished"
        );

        Ok(PipelineRun {
            requirement,
            intent,
            tasks,
            queries,
            retrieval_results,
            generation,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::llm::testing::ScriptedModel;
    use crate::model::{RetrievalScope, RetrievedChunk, TaskType};
    use crate::retriever::InMemoryRetriever;

    use super::*;

    const REQUIREMENT_OUTPUT: &str = r#"{
        "domain": "authentication",
        "stage": null,
        "core_intent": "Understand how UserService validates logins",
        "entities": ["UserService", "login"],
        "operations": ["analyze"],
        "non_functional": [],
        "constraints": [],
        "implicit_signals": [],
        "confidence": 0.9,
        "warnings": [],
        "assumptions": []
    }"#;

    fn chunk(id: &str, content: &str, score: f64) -> RetrievedChunk {
        RetrievedChunk {
            chunk_id: id.to_string(),
            source_id: format!("src-{id}"),
            source_type: RetrievalScope::Code,
            content: content.to_string(),
            relevance_score: score,
            metadata: HashMap::new(),
        }
    }

    fn pipeline(responses: Vec<&str>) -> (SemanticExecutionPipeline, Arc<ScriptedModel>) {
        let llm = Arc::new(ScriptedModel::new(responses));
        let retriever = Arc::new(InMemoryRetriever::new(vec![
            chunk("a", "impl UserService { fn login(&self) -> bool }", 0.9),
            chunk("b", "fn validate_login(user: &User) -> Result<(), AuthError>", 0.7),
            chunk("c", "payment reconciliation batch job", 0.8),
        ]));
        let config = PipelineConfig::default();
        (
            SemanticExecutionPipeline::from_config(llm.clone(), retriever, &config),
            llm,
        )
    }

    #[tokio::test]
    async fn runs_end_to_end_over_in_memory_retrieval() {
        let (pipeline, llm) = pipeline(vec![
            REQUIREMENT_OUTPUT,
            "UserService validates logins in its login method. [Evidence 1]",
        ]);

        let run = pipeline
            .run("Look at how UserService does login validation")
            .await
            .unwrap();

        assert_eq!(run.requirement.entities, vec!["UserService", "login"]);
        assert_eq!(run.tasks.len(), 1);
        assert!(matches!(
            run.tasks[0].task_type,
            TaskType::Analysis | TaskType::CodeSearch
        ));

        assert_eq!(run.queries.len(), 1);
        let keywords = &run.queries[0].keywords;
        assert!(keywords.iter().any(|k| k == "UserService"));
        assert!(keywords.iter().any(|k| k == "login"));

        // The payment chunk matches no keyword.
        assert_eq!(run.retrieval_results[0].chunks.len(), 2);

        assert!(run.generation.content.contains("[Evidence 1]"));
        assert_eq!(run.generation.used_chunks.len(), 2);
        assert!(run.generation.confidence > 0.0);

        // One requirement call, one generation call; intent and task stages
        // are rule-based and model-free.
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn requirement_repair_is_transparent_to_the_run() {
        let (pipeline, llm) = pipeline(vec![
            "not json",
            REQUIREMENT_OUTPUT,
            "grounded answer",
        ]);

        let run = pipeline
            .run("Look at how UserService does login validation")
            .await
            .unwrap();

        assert_eq!(run.generation.content, "grounded answer");
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn requirement_failure_stops_the_pipeline() {
        let (pipeline, llm) = pipeline(vec!["nope", "still nope"]);

        let err = pipeline.run("anything").await.unwrap_err();
        assert!(matches!(err, PipelineError::Requirement(_)));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn run_trace_serializes() {
        let (pipeline, _) = pipeline(vec![REQUIREMENT_OUTPUT, "answer"]);
        let run = pipeline
            .run("Look at how UserService does login validation")
            .await
            .unwrap();

        let json = serde_json::to_value(&run).unwrap();
        assert!(json["requirement"]["core_intent"].is_string());
        assert!(json["generation"]["content"].is_string());
    }
}
