use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::model::retrieval::RetrievalScope;

/// Kind of thing an [`EntityRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Module,
    Class,
    Function,
    Api,
    Document,
    Concept,
}

/// Stable semantic reference to a code symbol, document or concept.
///
/// `identifiers` carries system-level locators, e.g.
/// `{"path": "auth/user_service.rs", "symbol": "login"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityRef {
    pub entity_type: EntityType,
    pub name: String,
    #[serde(default)]
    pub identifiers: HashMap<String, String>,
}

/// Semantic action applied to an entity. Which actions are legal depends on the
/// task type, see [`TaskType::allowed_actions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Read,
    Search,
    Analyze,
    Compare,
    Summarize,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Read => "read",
            ActionKind::Search => "search",
            ActionKind::Analyze => "analyze",
            ActionKind::Compare => "compare",
            ActionKind::Summarize => "summarize",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Operation {
    pub action: ActionKind,
    /// Name of the entity the action applies to, referencing `EntityRef.name`.
    #[serde(default)]
    pub target_entity: Option<String>,
    #[serde(default)]
    pub parameters: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintLevel {
    /// Must hold.
    Hard,
    /// Best effort.
    Soft,
}

/// Semantic-layer rule the system must respect, unrelated to output style.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constraint {
    pub rule: String,
    pub level: ConstraintLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    Text,
    Markdown,
    Json,
    Code,
}

impl OutputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::Text => "text",
            OutputType::Markdown => "markdown",
            OutputType::Json => "json",
            OutputType::Code => "code",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structural expectation for the final output: what it is, not how to produce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSpec {
    pub output_type: OutputType,
    /// JSON schema of the expected structure, when the output is structured.
    #[serde(default)]
    pub schema: Option<serde_json::Value>,
    #[serde(default)]
    pub quality_requirements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    CodeSearch,
    DocQuery,
    Design,
    Analysis,
    Explanation,
}

impl TaskType {
    /// Legal operation actions for this task type.
    pub fn allowed_actions(&self) -> &'static [ActionKind] {
        match self {
            TaskType::CodeSearch => &[ActionKind::Search, ActionKind::Read],
            TaskType::DocQuery => &[ActionKind::Search, ActionKind::Read, ActionKind::Summarize],
            TaskType::Analysis => &[ActionKind::Analyze, ActionKind::Compare, ActionKind::Read],
            TaskType::Design => &[ActionKind::Analyze, ActionKind::Compare, ActionKind::Summarize],
            TaskType::Explanation => &[ActionKind::Read, ActionKind::Summarize],
        }
    }

    /// Task types that may carry an empty entity list.
    pub fn allows_empty_entities(&self) -> bool {
        matches!(self, TaskType::Design)
    }

    /// Retrieval scope a task of this type searches in.
    pub fn default_scope(&self) -> RetrievalScope {
        match self {
            TaskType::CodeSearch | TaskType::Analysis => RetrievalScope::Code,
            TaskType::DocQuery | TaskType::Design | TaskType::Explanation => RetrievalScope::Doc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::CodeSearch => "code_search",
            TaskType::DocQuery => "doc_query",
            TaskType::Design => "design",
            TaskType::Analysis => "analysis",
            TaskType::Explanation => "explanation",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Deterministic, model-independent unit of work, ready for retrieval and
// generation. This is the core intermediate representation of the pipeline:
// everything downstream consumes it, nothing downstream reinterprets the
// natural-language requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SemanticTask {
    pub task_id: String,
    /// One-sentence task intent, free of prompt phrasing.
    pub intent: String,
    pub task_type: TaskType,
    pub entities: Vec<EntityRef>,
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    pub output_spec: OutputSpec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_table_matches_task_types() {
        assert!(
            TaskType::CodeSearch
                .allowed_actions()
                .contains(&ActionKind::Search)
        );
        assert!(
            !TaskType::Explanation
                .allowed_actions()
                .contains(&ActionKind::Analyze)
        );
        assert!(
            TaskType::Design
                .allowed_actions()
                .contains(&ActionKind::Summarize)
        );
    }

    #[test]
    fn only_design_allows_empty_entities() {
        assert!(TaskType::Design.allows_empty_entities());
        assert!(!TaskType::Analysis.allows_empty_entities());
        assert!(!TaskType::CodeSearch.allows_empty_entities());
    }

    #[test]
    fn semantic_task_rejects_unknown_fields() {
        let json = r#"{
            "task_id": "task-1",
            "intent": "x",
            "task_type": "analysis",
            "entities": [],
            "operations": [],
            "output_spec": {"output_type": "text", "quality_requirements": []},
            "surprise": true
        }"#;
        let result: Result<SemanticTask, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
