//! Repair-retry protocol shared by every LLM-backed stage
//!
//! When a stage's structured output fails to parse or violates its schema, the
//! call is reissued exactly once with an addendum demanding strictly valid
//! JSON. A second failure is fatal for the stage. Upstream call failures are
//! never retried; the protocol repairs malformed content, not failed calls.

use crate::llm::{LanguageModel, LlmError};

/// Instruction appended to the system prompt on the repair attempt.
pub const REPAIR_ADDENDUM: &str = "\n\nThe previous output was invalid JSON. \
Respond with exactly one valid JSON value that strictly follows the rules above. \
Do not output explanations, markdown, or code fences.";

/// Why a structured response was unusable. Json covers syntactically invalid
/// output; Schema covers well-formed JSON that breaks the stage's contract
/// (missing/extra fields, illegal enum values, violated invariants).
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("schema violation: {0}")]
    Schema(String),
}

/// Terminal outcome of a repaired stage call.
#[derive(Debug, thiserror::Error)]
pub enum RepairError {
    /// The language-model call itself failed. Surfaced unchanged, no retry.
    #[error("language model call failed: {0}")]
    Upstream(#[from] LlmError),

    /// Both the first attempt and the repair attempt produced invalid output.
    #[error("output still invalid after repair attempt: {0}")]
    InvalidAfterRepair(#[source] StructureError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Repair,
}

/// Run one completion with at most one repair reissue, parsing the response
/// with `parse`. The attempt state machine enforces the at-most-one-repair
/// invariant for every caller uniformly.
pub(crate) async fn complete_with_repair<T, F>(
    llm: &dyn LanguageModel,
    stage: &'static str,
    system_prompt: &str,
    user_prompt: &str,
    temperature: f32,
    parse: F,
) -> Result<T, RepairError>
where
    F: Fn(&str) -> Result<T, StructureError>,
{
    let mut attempt = Attempt::First;

    loop {
        let output = match attempt {
            Attempt::First => {
                tracing::debug!(stage, "Issuing language-model call");
                llm.complete(system_prompt, user_prompt, temperature).await?
            }
            Attempt::Repair => {
                let repaired_prompt = format!("{system_prompt}{REPAIR_ADDENDUM}");
                llm.complete(&repaired_prompt, user_prompt, temperature)
                    .await?
            }
        };

        match parse(&output) {
            Ok(value) => return Ok(value),
            Err(e) => match attempt {
                Attempt::First => {
                    tracing::warn!(
                        stage,
                        error = %e,
                        "Structured output invalid, issuing repair attempt"
                    );
                    attempt = Attempt::Repair;
                }
                Attempt::Repair => {
                    tracing::error!(
                        stage,
                        error = %e,
                        "Structured output invalid after repair attempt"
                    );
                    return Err(RepairError::InvalidAfterRepair(e));
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::llm::testing::{FailingModel, ScriptedModel};

    use super::*;

    fn parse_number(output: &str) -> Result<i64, StructureError> {
        output
            .trim()
            .parse()
            .map_err(|_| StructureError::Json(format!("not a number: {output}")))
    }

    #[tokio::test]
    async fn first_valid_response_needs_no_repair() {
        let llm = ScriptedModel::new(vec!["42"]);
        let value = complete_with_repair(&llm, "test", "sys", "user", 0.0, parse_number)
            .await
            .unwrap();
        assert_eq!(value, 42);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn invalid_then_valid_succeeds_with_second_response() {
        let llm = ScriptedModel::new(vec!["not json", "7"]);
        let value = complete_with_repair(&llm, "test", "sys", "user", 0.0, parse_number)
            .await
            .unwrap();
        assert_eq!(value, 7);

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        // First call uses the original prompt; repair call appends the addendum.
        assert_eq!(calls[0].0, "sys");
        assert!(calls[1].0.starts_with("sys"));
        assert!(calls[1].0.contains("previous output was invalid JSON"));
        // User content is reused verbatim.
        assert_eq!(calls[0].1, calls[1].1);
    }

    #[tokio::test]
    async fn two_invalid_responses_are_fatal() {
        let llm = ScriptedModel::new(vec!["nope", "still nope"]);
        let err = complete_with_repair(&llm, "test", "sys", "user", 0.0, parse_number)
            .await
            .unwrap_err();
        assert!(matches!(err, RepairError::InvalidAfterRepair(_)));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn upstream_failure_is_not_retried() {
        let llm = FailingModel;
        let err = complete_with_repair(&llm, "test", "sys", "user", 0.0, parse_number)
            .await
            .unwrap_err();
        assert!(matches!(err, RepairError::Upstream(_)));
    }
}
