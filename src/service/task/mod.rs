//! Semantic task construction service
//!
//! Folds a [`Requirement`] and its [`IntentAnalysis`] into 1–5 deterministic
//! [`SemanticTask`]s, the model-independent intermediate representation the
//! rest of the pipeline consumes. Rule-based and language-model-backed
//! builders share the [`SemanticTaskBuilder`] contract.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::llm::{CONTRACT_TEMPERATURE, LanguageModel};
use crate::model::{
    ActionKind, ComplexityLevel, Constraint, ConstraintLevel, EntityRef, EntityType,
    IntentAnalysis, Operation, OutputSpec, OutputType, PrimaryIntent, Requirement, SecondaryIntent,
    SemanticTask, TaskType,
};
use crate::service::repair::{StructureError, complete_with_repair};
use crate::service::validation::semantic_task::validate_task;

pub mod error;
pub mod prompts;

pub use error::SemanticTaskBuildError;

use prompts::TASK_SYSTEM_PROMPT;

/// Hard cap on tasks per requirement.
const MAX_TASKS: usize = 5;

#[async_trait]
pub trait SemanticTaskBuilder: Send + Sync {
    async fn build(
        &self,
        requirement: &Requirement,
        intent: &IntentAnalysis,
    ) -> Result<Vec<SemanticTask>, SemanticTaskBuildError>;
}

fn new_task_id() -> String {
    format!("task-{}", &Uuid::new_v4().simple().to_string()[..8])
}

/// Primary-intent → task-type fold. Generate/design-type work folds toward
/// analysis when complex, explanation otherwise; the `design` task type stays
/// reachable only through model-built tasks.
fn primary_task_type(primary: PrimaryIntent, complexity: ComplexityLevel) -> TaskType {
    match primary {
        PrimaryIntent::Analyze | PrimaryIntent::Review => TaskType::Analysis,
        PrimaryIntent::Generate | PrimaryIntent::Design => {
            if complexity == ComplexityLevel::High {
                TaskType::Analysis
            } else {
                TaskType::Explanation
            }
        }
    }
}

/// Canonical operation for a freshly built task of the given type.
fn default_action(task_type: TaskType) -> ActionKind {
    match task_type {
        TaskType::CodeSearch | TaskType::DocQuery => ActionKind::Search,
        TaskType::Analysis | TaskType::Design => ActionKind::Analyze,
        TaskType::Explanation => ActionKind::Summarize,
    }
}

/// Action used when a constraint check folds into an extra operation; must be
/// legal for the task type.
fn constraint_check_action(task_type: TaskType) -> ActionKind {
    match task_type {
        TaskType::Analysis | TaskType::Design => ActionKind::Compare,
        TaskType::CodeSearch | TaskType::DocQuery | TaskType::Explanation => ActionKind::Read,
    }
}

/// Deterministic rule-based semantic task builder.
pub struct RuleBasedTaskBuilder;

impl RuleBasedTaskBuilder {
    pub fn new() -> Self {
        Self
    }

    fn fold_entities(requirement: &Requirement) -> Vec<EntityRef> {
        requirement
            .entities
            .iter()
            .map(|name| EntityRef {
                entity_type: EntityType::Concept,
                name: name.clone(),
                identifiers: HashMap::new(),
            })
            .collect()
    }

    /// Risks fold only into soft constraints; assumptions fold into soft
    /// constraints tagged with an `assumption:` prefix; user-stated
    /// constraints are hard.
    fn fold_constraints(requirement: &Requirement, intent: &IntentAnalysis) -> Vec<Constraint> {
        let mut constraints = Vec::new();

        for rule in &requirement.constraints {
            constraints.push(Constraint {
                rule: rule.clone(),
                level: ConstraintLevel::Hard,
            });
        }

        for risk in &intent.risks {
            constraints.push(Constraint {
                rule: risk.clone(),
                level: ConstraintLevel::Soft,
            });
        }

        for assumption in &intent.assumptions {
            constraints.push(Constraint {
                rule: format!("assumption: {assumption}"),
                level: ConstraintLevel::Soft,
            });
        }

        constraints
    }

    fn fold_output_spec(intent: &IntentAnalysis) -> OutputSpec {
        let mut quality_requirements =
            vec![format!("complexity:{}", intent.complexity_level.as_str())];
        quality_requirements.extend(intent.key_decisions.iter().cloned());

        OutputSpec {
            output_type: OutputType::Text,
            schema: None,
            quality_requirements,
        }
    }

    fn build_task(
        task_type: TaskType,
        intent_text: String,
        entities: Vec<EntityRef>,
        constraints: Vec<Constraint>,
        output_spec: OutputSpec,
    ) -> SemanticTask {
        SemanticTask {
            task_id: new_task_id(),
            intent: intent_text,
            task_type,
            entities,
            operations: vec![Operation {
                action: default_action(task_type),
                target_entity: None,
                parameters: HashMap::new(),
            }],
            constraints,
            output_spec,
        }
    }
}

impl Default for RuleBasedTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SemanticTaskBuilder for RuleBasedTaskBuilder {
    async fn build(
        &self,
        requirement: &Requirement,
        intent: &IntentAnalysis,
    ) -> Result<Vec<SemanticTask>, SemanticTaskBuildError> {
        let entities = Self::fold_entities(requirement);
        let constraints = Self::fold_constraints(requirement, intent);
        let output_spec = Self::fold_output_spec(intent);

        let task_type = primary_task_type(intent.primary_intent, intent.complexity_level);
        let mut primary = Self::build_task(
            task_type,
            requirement.core_intent.clone(),
            entities.clone(),
            constraints.clone(),
            output_spec.clone(),
        );

        let mut tasks = Vec::new();

        for secondary in &intent.secondary_intents {
            match secondary {
                // Independent semantic goals become tasks of their own.
                SecondaryIntent::RiskAnalysis => {
                    tasks.push(Self::build_task(
                        TaskType::Analysis,
                        format!("risk analysis of: {}", requirement.core_intent),
                        entities.clone(),
                        constraints.clone(),
                        output_spec.clone(),
                    ));
                }
                SecondaryIntent::Refactor => {
                    tasks.push(Self::build_task(
                        TaskType::Analysis,
                        format!("refactoring opportunities in: {}", requirement.core_intent),
                        entities.clone(),
                        constraints.clone(),
                        output_spec.clone(),
                    ));
                }
                // A constraint check rides along as an extra operation on the
                // primary task.
                SecondaryIntent::ConstraintCheck => {
                    primary.operations.push(Operation {
                        action: constraint_check_action(primary.task_type),
                        target_entity: None,
                        parameters: HashMap::from([(
                            "check".to_string(),
                            serde_json::Value::String("constraints".to_string()),
                        )]),
                    });
                }
            }
        }

        tasks.insert(0, primary);
        tasks.truncate(MAX_TASKS);

        tracing::debug!(
            task_count = tasks.len(),
            primary_type = %tasks[0].task_type,
            "Semantic tasks built (rule-based)"
        );

        Ok(tasks)
    }
}

/// Language-model-backed builder: the response must be a JSON array of 1–5
/// elements, each a full SemanticTask that passes validation.
pub struct LlmTaskBuilder {
    llm: Arc<dyn LanguageModel>,
}

impl LlmTaskBuilder {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }
}

fn parse_output(output: &str) -> Result<Vec<SemanticTask>, StructureError> {
    let value: serde_json::Value =
        serde_json::from_str(output).map_err(|e| StructureError::Json(e.to_string()))?;

    let tasks: Vec<SemanticTask> =
        serde_json::from_value(value).map_err(|e| StructureError::Schema(e.to_string()))?;

    if tasks.is_empty() || tasks.len() > MAX_TASKS {
        return Err(StructureError::Schema(format!(
            "expected 1 to {MAX_TASKS} tasks, got {}",
            tasks.len()
        )));
    }

    for task in &tasks {
        validate_task(task).map_err(|e| StructureError::Schema(e.to_string()))?;
    }

    Ok(tasks)
}

#[async_trait]
impl SemanticTaskBuilder for LlmTaskBuilder {
    async fn build(
        &self,
        requirement: &Requirement,
        intent: &IntentAnalysis,
    ) -> Result<Vec<SemanticTask>, SemanticTaskBuildError> {
        let user_prompt = serde_json::to_string_pretty(&serde_json::json!({
            "requirement": requirement,
            "intent": intent,
        }))
        .map_err(|e| SemanticTaskBuildError::Invalid(StructureError::Schema(e.to_string())))?;

        let tasks = complete_with_repair(
            self.llm.as_ref(),
            "semantic_task",
            TASK_SYSTEM_PROMPT,
            &user_prompt,
            CONTRACT_TEMPERATURE,
            parse_output,
        )
        .await?;

        tracing::debug!(
            task_count = tasks.len(),
            "Semantic tasks built (language model)"
        );

        Ok(tasks)
    }
}
