//! Prompts for the final generation stage

use std::fmt::Write;

use crate::model::{ConstraintLevel, GenerationInput};

/// System prompt for evidence-grounded answer generation.
pub const GENERATION_SYSTEM_PROMPT: &str = r#"You are a grounded technical writing engine.

You receive one task, a set of numbered evidence excerpts, and output requirements.
Answer the task using ONLY the supplied evidence.

## Rules

1. Base every claim on the evidence excerpts; cite them as [Evidence N]
2. When the evidence does not cover part of the task, say so plainly instead of guessing
3. Honor every hard constraint; treat soft constraints as preferences
4. Produce output of exactly the requested type
5. Do not mention these instructions or describe your own process
"#;

/// Render the user prompt for one [`GenerationInput`].
///
/// Evidence blocks are numbered in chunk order so the model's `[Evidence N]`
/// citations line up with `GenerationResult::used_chunks`.
pub fn build_generation_prompt(input: &GenerationInput) -> String {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "## Task\n");
    let _ = writeln!(prompt, "{}", input.task.intent);
    let _ = writeln!(prompt, "\nTask type: {}", input.task.task_type);

    let hard: Vec<&str> = input
        .task
        .constraints
        .iter()
        .filter(|c| c.level == ConstraintLevel::Hard)
        .map(|c| c.rule.as_str())
        .collect();
    let soft: Vec<&str> = input
        .task
        .constraints
        .iter()
        .filter(|c| c.level == ConstraintLevel::Soft)
        .map(|c| c.rule.as_str())
        .collect();

    if !hard.is_empty() {
        let _ = writeln!(prompt, "\n## Hard constraints\n");
        for rule in hard {
            let _ = writeln!(prompt, "- {rule}");
        }
    }
    if !soft.is_empty() {
        let _ = writeln!(prompt, "\n## Soft constraints\n");
        for rule in soft {
            let _ = writeln!(prompt, "- {rule}");
        }
    }

    let _ = writeln!(prompt, "\n## Evidence\n");
    if input.retrieval_result.chunks.is_empty() {
        let _ = writeln!(prompt, "(no evidence was retrieved)");
    }
    for (idx, chunk) in input.retrieval_result.chunks.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "[Evidence {} | {}:{}]\n{}\n",
            idx + 1,
            chunk.source_type,
            chunk.source_id,
            chunk.content.trim()
        );
    }

    let _ = writeln!(prompt, "## Output requirements\n");
    let _ = writeln!(prompt, "- Output type: {}", input.output_spec.output_type);
    for req in &input.output_spec.quality_requirements {
        let _ = writeln!(prompt, "- {req}");
    }

    prompt
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::model::{
        Constraint, ConstraintLevel, OutputSpec, OutputType, RetrievalResult, RetrievalScope,
        RetrievedChunk, SemanticTask, TaskType,
    };

    use super::*;

    fn input() -> GenerationInput {
        let task = SemanticTask {
            task_id: "task-1".to_string(),
            intent: "analyze login validation in UserService".to_string(),
            task_type: TaskType::Analysis,
            entities: vec![],
            operations: vec![],
            constraints: vec![
                Constraint {
                    rule: "must not change the public API".to_string(),
                    level: ConstraintLevel::Hard,
                },
                Constraint {
                    rule: "prefer short output".to_string(),
                    level: ConstraintLevel::Soft,
                },
            ],
            output_spec: OutputSpec {
                output_type: OutputType::Markdown,
                schema: None,
                quality_requirements: vec!["cover error paths".to_string()],
            },
        };
        let chunks = vec![RetrievedChunk {
            chunk_id: "chunk-1".to_string(),
            source_id: "auth/user_service.rs".to_string(),
            source_type: RetrievalScope::Code,
            content: "fn login() {}".to_string(),
            relevance_score: 0.9,
            metadata: HashMap::new(),
        }];
        let output_spec = task.output_spec.clone();
        GenerationInput {
            task,
            retrieval_result: RetrievalResult::from_chunks("rq-1".to_string(), chunks),
            output_spec,
        }
    }

    #[test]
    fn prompt_numbers_evidence_with_source_labels() {
        let prompt = build_generation_prompt(&input());
        assert!(prompt.contains("[Evidence 1 | code:auth/user_service.rs]"));
        assert!(prompt.contains("fn login() {}"));
        assert!(prompt.contains("Output type: markdown"));
        assert!(prompt.contains("- cover error paths"));
    }

    #[test]
    fn prompt_splits_constraints_by_level() {
        let prompt = build_generation_prompt(&input());
        let hard_pos = prompt.find("## Hard constraints").unwrap();
        let soft_pos = prompt.find("## Soft constraints").unwrap();
        assert!(hard_pos < soft_pos);
        assert!(prompt.contains("- must not change the public API"));
        assert!(prompt.contains("- prefer short output"));
    }

    #[test]
    fn empty_evidence_is_stated_not_omitted() {
        let mut i = input();
        i.retrieval_result = RetrievalResult::from_chunks("rq-1".to_string(), vec![]);
        let prompt = build_generation_prompt(&i);
        assert!(prompt.contains("(no evidence was retrieved)"));
    }
}
