//! Structural and semantic-consistency validation for SemanticTask
//!
//! Deterministic, short-circuiting: the first violated invariant raises, with
//! the offending task and field identified. No heuristics, no accumulation.

use std::collections::HashSet;

use thiserror::Error;

use crate::model::{ActionKind, SemanticTask, TaskType};

#[derive(Debug, Error)]
pub enum SemanticTaskValidationError {
    #[error("semantic task list must not be empty")]
    EmptyTaskList,

    #[error("task_id must not be empty")]
    EmptyTaskId,

    #[error("task[{task_id}]: intent must not be empty")]
    EmptyIntent { task_id: String },

    #[error("task[{task_id}]: entities must not be empty for task_type {task_type}")]
    EmptyEntities { task_id: String, task_type: TaskType },

    #[error("task[{task_id}]: entity name must not be empty")]
    EmptyEntityName { task_id: String },

    #[error("task[{task_id}]: operations must not be empty")]
    EmptyOperations { task_id: String },

    #[error("task[{task_id}]: action {action} is not legal for task_type {task_type}")]
    IllegalAction {
        task_id: String,
        action: ActionKind,
        task_type: TaskType,
    },

    #[error("task[{task_id}]: target_entity {target} is not declared in entities")]
    UndeclaredTargetEntity { task_id: String, target: String },

    #[error("task[{task_id}]: constraint rule must not be empty")]
    EmptyConstraintRule { task_id: String },

    #[error("task[{task_id}]: quality requirement must not be blank")]
    BlankQualityRequirement { task_id: String },
}

/// Validate a list of tasks: non-empty, each task individually valid.
pub fn validate_tasks(tasks: &[SemanticTask]) -> Result<(), SemanticTaskValidationError> {
    if tasks.is_empty() {
        return Err(SemanticTaskValidationError::EmptyTaskList);
    }
    for task in tasks {
        validate_task(task)?;
    }
    Ok(())
}

/// Validate one task against the full invariant set.
pub fn validate_task(task: &SemanticTask) -> Result<(), SemanticTaskValidationError> {
    if task.task_id.trim().is_empty() {
        return Err(SemanticTaskValidationError::EmptyTaskId);
    }

    let task_id = || task.task_id.clone();

    if task.intent.trim().is_empty() {
        return Err(SemanticTaskValidationError::EmptyIntent { task_id: task_id() });
    }

    if task.entities.is_empty() && !task.task_type.allows_empty_entities() {
        return Err(SemanticTaskValidationError::EmptyEntities {
            task_id: task_id(),
            task_type: task.task_type,
        });
    }

    let mut entity_names: HashSet<&str> = HashSet::new();
    for entity in &task.entities {
        if entity.name.trim().is_empty() {
            return Err(SemanticTaskValidationError::EmptyEntityName { task_id: task_id() });
        }
        entity_names.insert(entity.name.as_str());
    }

    if task.operations.is_empty() {
        return Err(SemanticTaskValidationError::EmptyOperations { task_id: task_id() });
    }

    let allowed = task.task_type.allowed_actions();
    for op in &task.operations {
        if !allowed.contains(&op.action) {
            return Err(SemanticTaskValidationError::IllegalAction {
                task_id: task_id(),
                action: op.action,
                task_type: task.task_type,
            });
        }

        if let Some(target) = &op.target_entity
            && !entity_names.contains(target.as_str())
        {
            return Err(SemanticTaskValidationError::UndeclaredTargetEntity {
                task_id: task_id(),
                target: target.clone(),
            });
        }
    }

    for constraint in &task.constraints {
        if constraint.rule.trim().is_empty() {
            return Err(SemanticTaskValidationError::EmptyConstraintRule { task_id: task_id() });
        }
    }

    for quality in &task.output_spec.quality_requirements {
        if quality.trim().is_empty() {
            return Err(SemanticTaskValidationError::BlankQualityRequirement {
                task_id: task_id(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::model::{Constraint, ConstraintLevel, EntityRef, EntityType, Operation, OutputSpec, OutputType};

    use super::*;

    fn entity(name: &str) -> EntityRef {
        EntityRef {
            entity_type: EntityType::Class,
            name: name.to_string(),
            identifiers: HashMap::new(),
        }
    }

    fn operation(action: ActionKind, target: Option<&str>) -> Operation {
        Operation {
            action,
            target_entity: target.map(|t| t.to_string()),
            parameters: HashMap::new(),
        }
    }

    fn task(task_type: TaskType, action: ActionKind) -> SemanticTask {
        SemanticTask {
            task_id: "task-1".to_string(),
            intent: "inspect login flow".to_string(),
            task_type,
            entities: vec![entity("UserService")],
            operations: vec![operation(action, None)],
            constraints: vec![Constraint {
                rule: "backend only".to_string(),
                level: ConstraintLevel::Hard,
            }],
            output_spec: OutputSpec {
                output_type: OutputType::Text,
                schema: None,
                quality_requirements: vec!["complexity:low".to_string()],
            },
        }
    }

    #[test]
    fn legal_task_passes() {
        validate_task(&task(TaskType::Analysis, ActionKind::Analyze)).unwrap();
        validate_task(&task(TaskType::CodeSearch, ActionKind::Search)).unwrap();
        validate_task(&task(TaskType::Explanation, ActionKind::Summarize)).unwrap();
    }

    #[test]
    fn mismatched_action_fails() {
        let err = validate_task(&task(TaskType::CodeSearch, ActionKind::Analyze)).unwrap_err();
        assert!(matches!(
            err,
            SemanticTaskValidationError::IllegalAction {
                action: ActionKind::Analyze,
                task_type: TaskType::CodeSearch,
                ..
            }
        ));
    }

    #[test]
    fn declared_target_entity_passes_dangling_fails() {
        let mut ok = task(TaskType::Analysis, ActionKind::Analyze);
        ok.operations = vec![operation(ActionKind::Analyze, Some("UserService"))];
        validate_task(&ok).unwrap();

        let mut dangling = task(TaskType::Analysis, ActionKind::Analyze);
        dangling.operations = vec![operation(ActionKind::Analyze, Some("PaymentService"))];
        let err = validate_task(&dangling).unwrap_err();
        assert!(matches!(
            err,
            SemanticTaskValidationError::UndeclaredTargetEntity { target, .. } if target == "PaymentService"
        ));
    }

    #[test]
    fn empty_entities_only_legal_for_design() {
        let mut design = task(TaskType::Design, ActionKind::Analyze);
        design.entities.clear();
        validate_task(&design).unwrap();

        let mut analysis = task(TaskType::Analysis, ActionKind::Analyze);
        analysis.entities.clear();
        let err = validate_task(&analysis).unwrap_err();
        assert!(matches!(
            err,
            SemanticTaskValidationError::EmptyEntities { .. }
        ));
    }

    #[test]
    fn empty_required_fields_fail() {
        let mut no_id = task(TaskType::Analysis, ActionKind::Analyze);
        no_id.task_id = "  ".to_string();
        assert!(matches!(
            validate_task(&no_id),
            Err(SemanticTaskValidationError::EmptyTaskId)
        ));

        let mut no_intent = task(TaskType::Analysis, ActionKind::Analyze);
        no_intent.intent = String::new();
        assert!(matches!(
            validate_task(&no_intent),
            Err(SemanticTaskValidationError::EmptyIntent { .. })
        ));

        let mut no_ops = task(TaskType::Analysis, ActionKind::Analyze);
        no_ops.operations.clear();
        assert!(matches!(
            validate_task(&no_ops),
            Err(SemanticTaskValidationError::EmptyOperations { .. })
        ));

        let mut blank_rule = task(TaskType::Analysis, ActionKind::Analyze);
        blank_rule.constraints[0].rule = " ".to_string();
        assert!(matches!(
            validate_task(&blank_rule),
            Err(SemanticTaskValidationError::EmptyConstraintRule { .. })
        ));
    }

    #[test]
    fn empty_task_list_fails() {
        assert!(matches!(
            validate_tasks(&[]),
            Err(SemanticTaskValidationError::EmptyTaskList)
        ));
    }
}
