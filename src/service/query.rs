//! Deterministic mapping from semantic tasks to retrieval queries.
//!
//! No model call happens here. Two runs over the same task list produce the
//! same queries modulo the generated query ids.

use serde_json::json;
use uuid::Uuid;

use crate::model::{ActionKind, ConstraintLevel, RetrievalQuery, SemanticTask};

fn new_query_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("rq-{}", &id[..8])
}

/// Builds at most one [`RetrievalQuery`] per [`SemanticTask`].
///
/// Tasks whose operations are all `summarize` need no fresh evidence and are
/// skipped. Every other task yields a query scoped by its task type, with
/// keywords drawn from its entity names and operation actions.
#[derive(Debug, Default)]
pub struct RetrievalQueryBuilder;

impl RetrievalQueryBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, tasks: &[SemanticTask]) -> Vec<RetrievalQuery> {
        tasks.iter().filter_map(|task| self.build_one(task)).collect()
    }

    fn build_one(&self, task: &SemanticTask) -> Option<RetrievalQuery> {
        if !task.operations.is_empty()
            && task
                .operations
                .iter()
                .all(|op| op.action == ActionKind::Summarize)
        {
            tracing::debug!(task_id = %task.task_id, "summarize-only task, skipping retrieval");
            return None;
        }

        let mut keywords: Vec<String> = Vec::new();
        for entity in &task.entities {
            push_unique(&mut keywords, entity.name.clone());
        }
        for op in &task.operations {
            push_unique(&mut keywords, op.action.as_str().to_string());
        }
        if task.entities.is_empty() {
            // Design tasks may carry no entities, fall back to intent tokens.
            for token in task.intent.split_whitespace() {
                push_unique(&mut keywords, token.to_string());
            }
        }

        let hard_rules: Vec<serde_json::Value> = task
            .constraints
            .iter()
            .filter(|c| c.level == ConstraintLevel::Hard)
            .map(|c| json!(c.rule))
            .collect();

        let mut filters = std::collections::BTreeMap::new();
        filters.insert("task_type".to_string(), json!(task.task_type.as_str()));
        if !hard_rules.is_empty() {
            filters.insert("constraint".to_string(), json!(hard_rules));
        }

        let query = RetrievalQuery {
            query_id: new_query_id(),
            scope: task.task_type.default_scope(),
            keywords,
            entity_refs: task.entities.clone(),
            filters,
        };
        tracing::debug!(
            task_id = %task.task_id,
            query_id = %query.query_id,
            scope = %query.scope,
            keywords = query.keywords.len(),
            "built retrieval query"
        );
        Some(query)
    }
}

fn push_unique(keywords: &mut Vec<String>, candidate: String) {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return;
    }
    if !keywords.iter().any(|k| k == trimmed) {
        keywords.push(trimmed.to_string());
    }
}
