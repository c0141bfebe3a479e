//! Requirement structuring service
//!
//! Parses a free-text user requirement into a [`Requirement`] record via the
//! language-model capability, enforcing the stage's JSON contract with one
//! repair retry on invalid output.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::llm::{CONTRACT_TEMPERATURE, LanguageModel};
use crate::model::{Requirement, RequirementWarning};
use crate::service::repair::{StructureError, complete_with_repair};

pub mod error;
pub mod prompts;

pub use error::RequirementParseError;

use prompts::REQUIREMENT_SYSTEM_PROMPT;

/// Default confidence applied when the model omits the field.
const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Turns raw user text into a structured [`Requirement`].
#[async_trait]
pub trait RequirementParser: Send + Sync {
    async fn parse(&self, raw_text: &str) -> Result<Requirement, RequirementParseError>;
}

/// Decode target for the model's JSON output. `deny_unknown_fields` makes any
/// field outside the allowed set a schema violation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRequirement {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    stage: Option<String>,
    #[serde(default)]
    core_intent: Option<String>,
    #[serde(default)]
    entities: Option<Vec<String>>,
    #[serde(default)]
    operations: Option<Vec<String>>,
    #[serde(default)]
    non_functional: Option<Vec<String>>,
    #[serde(default)]
    constraints: Option<Vec<String>>,
    #[serde(default)]
    implicit_signals: Option<Vec<String>>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    warnings: Option<Vec<RequirementWarning>>,
    #[serde(default)]
    assumptions: Option<Vec<String>>,
}

/// Language-model-backed requirement parser (temperature 0).
pub struct LlmRequirementParser {
    llm: Arc<dyn LanguageModel>,
}

impl LlmRequirementParser {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl RequirementParser for LlmRequirementParser {
    async fn parse(&self, raw_text: &str) -> Result<Requirement, RequirementParseError> {
        let requirement = complete_with_repair(
            self.llm.as_ref(),
            "requirement",
            REQUIREMENT_SYSTEM_PROMPT,
            raw_text,
            CONTRACT_TEMPERATURE,
            parse_output,
        )
        .await?;

        tracing::info!(
            core_intent = %requirement.core_intent,
            confidence = requirement.confidence,
            warnings = requirement.warnings.len(),
            "Requirement structured"
        );

        Ok(requirement)
    }
}

/// Parse and validate one model response into a [`Requirement`], applying
/// field-level defaults (empty lists, confidence 0.8).
fn parse_output(output: &str) -> Result<Requirement, StructureError> {
    // Two-step decode so syntax errors and contract violations stay distinct.
    let value: serde_json::Value =
        serde_json::from_str(output).map_err(|e| StructureError::Json(e.to_string()))?;

    let raw: RawRequirement =
        serde_json::from_value(value).map_err(|e| StructureError::Schema(e.to_string()))?;

    let core_intent = match raw.core_intent {
        Some(intent) if !intent.trim().is_empty() => intent,
        _ => {
            return Err(StructureError::Schema(
                "core_intent must be present and non-empty".to_string(),
            ));
        }
    };

    let confidence = raw.confidence.unwrap_or(DEFAULT_CONFIDENCE);
    if !(0.0..=1.0).contains(&confidence) {
        return Err(StructureError::Schema(format!(
            "confidence must be within [0, 1], got {confidence}"
        )));
    }

    let warnings = raw.warnings.unwrap_or_default();
    if confidence < 0.7 && warnings.is_empty() {
        return Err(StructureError::Schema(format!(
            "confidence {confidence} < 0.7 requires at least one warning"
        )));
    }

    Ok(Requirement {
        domain: raw.domain,
        stage: raw.stage,
        core_intent,
        entities: raw.entities.unwrap_or_default(),
        operations: raw.operations.unwrap_or_default(),
        non_functional: raw.non_functional.unwrap_or_default(),
        constraints: raw.constraints.unwrap_or_default(),
        implicit_signals: raw.implicit_signals.unwrap_or_default(),
        confidence,
        warnings,
        assumptions: raw.assumptions.unwrap_or_default(),
    })
}
