//! Intent analysis service
//!
//! Classifies a [`Requirement`] into an [`IntentAnalysis`]. Two functionally
//! interchangeable strategies: a rule-based analyzer (predictable, debuggable)
//! and a language-model-backed one under the shared repair protocol. Callers
//! depend on the [`IntentAnalyzer`] trait and never on the strategy.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::llm::{CONTRACT_TEMPERATURE, LanguageModel};
use crate::model::{ComplexityLevel, IntentAnalysis, PrimaryIntent, Requirement, SecondaryIntent};
use crate::service::repair::{StructureError, complete_with_repair};

pub mod error;
pub mod prompts;

pub use error::IntentAnalysisError;

use prompts::INTENT_SYSTEM_PROMPT;

#[async_trait]
pub trait IntentAnalyzer: Send + Sync {
    async fn analyze(&self, requirement: &Requirement)
    -> Result<IntentAnalysis, IntentAnalysisError>;
}

// Keyword tables over the requirement's operation vocabulary
// (design / implement / analyze / review / refactor / debug / plan / generate).
// Primary intent priority: design > generate > analyze > review.
const DESIGN_KEYWORDS: &[&str] = &["design", "architect", "model"];
const GENERATE_KEYWORDS: &[&str] = &["generate", "implement", "create", "build", "write", "plan"];
const ANALYZE_KEYWORDS: &[&str] = &["analyze", "debug", "inspect", "investigate", "examine"];
const REVIEW_KEYWORDS: &[&str] = &["review", "audit"];

const RISK_KEYWORDS: &[&str] = &["risk", "evaluate", "assess"];
const REFACTOR_KEYWORDS: &[&str] = &["refactor", "restructure", "cleanup"];

fn any_operation_matches(operations: &[String], keywords: &[&str]) -> bool {
    operations.iter().any(|op| {
        let op = op.to_lowercase();
        keywords.iter().any(|kw| op.contains(kw))
    })
}

/// Deterministic rule-based analyzer.
pub struct RuleBasedIntentAnalyzer;

impl RuleBasedIntentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn detect_primary_intent(requirement: &Requirement) -> PrimaryIntent {
        let ops = &requirement.operations;

        if any_operation_matches(ops, DESIGN_KEYWORDS) {
            return PrimaryIntent::Design;
        }
        if any_operation_matches(ops, GENERATE_KEYWORDS) {
            return PrimaryIntent::Generate;
        }
        if any_operation_matches(ops, ANALYZE_KEYWORDS) {
            return PrimaryIntent::Analyze;
        }
        if any_operation_matches(ops, REVIEW_KEYWORDS) {
            return PrimaryIntent::Review;
        }

        PrimaryIntent::Generate
    }

    fn detect_secondary_intents(requirement: &Requirement) -> Vec<SecondaryIntent> {
        let mut secondary = Vec::new();

        if any_operation_matches(&requirement.operations, RISK_KEYWORDS) {
            secondary.push(SecondaryIntent::RiskAnalysis);
        }

        if !requirement.non_functional.is_empty() {
            secondary.push(SecondaryIntent::ConstraintCheck);
        }

        if any_operation_matches(&requirement.operations, REFACTOR_KEYWORDS) {
            secondary.push(SecondaryIntent::Refactor);
        }

        secondary
    }

    fn assess_complexity(
        requirement: &Requirement,
        secondary_intents: &[SecondaryIntent],
    ) -> ComplexityLevel {
        if secondary_intents.len() >= 2 {
            return ComplexityLevel::High;
        }

        // Design-stage work is never simple.
        if requirement.stage.as_deref() == Some("design") {
            return ComplexityLevel::High;
        }

        if requirement.entities.len() >= 4 || requirement.constraints.len() >= 2 {
            return ComplexityLevel::Medium;
        }

        ComplexityLevel::Low
    }

    fn extract_key_decisions(requirement: &Requirement, primary: PrimaryIntent) -> Vec<String> {
        let mut decisions = Vec::new();

        if primary == PrimaryIntent::Design {
            decisions.push("whether domain modeling is required".to_string());
            decisions.push("whether the structure must accommodate future extension".to_string());
        }

        if !requirement.non_functional.is_empty() {
            decisions.push("how non-functional requirements shape the design".to_string());
        }

        decisions
    }

    fn identify_risks(requirement: &Requirement, primary: PrimaryIntent) -> Vec<String> {
        let mut risks = Vec::new();

        if requirement.entities.is_empty() {
            risks.push("no concrete entities were named in the requirement".to_string());
        }

        if primary == PrimaryIntent::Design {
            risks.push("design output is costly to change once adopted".to_string());
        }

        if !requirement.constraints.is_empty() {
            risks.push("stated constraints may limit solution flexibility".to_string());
        }

        risks
    }

    fn build_assumptions(requirement: &Requirement) -> Vec<String> {
        let mut assumptions = Vec::new();

        if let Some(domain) = &requirement.domain {
            assumptions.push(format!("domain is {domain}"));
        }

        if let Some(stage) = &requirement.stage {
            assumptions.push(format!("current stage is {stage}"));
        }

        assumptions
    }
}

impl Default for RuleBasedIntentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentAnalyzer for RuleBasedIntentAnalyzer {
    async fn analyze(
        &self,
        requirement: &Requirement,
    ) -> Result<IntentAnalysis, IntentAnalysisError> {
        let primary_intent = Self::detect_primary_intent(requirement);
        let secondary_intents = Self::detect_secondary_intents(requirement);
        let complexity_level = Self::assess_complexity(requirement, &secondary_intents);

        let analysis = IntentAnalysis {
            primary_intent,
            key_decisions: Self::extract_key_decisions(requirement, primary_intent),
            risks: Self::identify_risks(requirement, primary_intent),
            assumptions: Self::build_assumptions(requirement),
            secondary_intents,
            complexity_level,
        };

        tracing::debug!(
            primary_intent = %analysis.primary_intent,
            secondary = analysis.secondary_intents.len(),
            complexity = ?analysis.complexity_level,
            "Intent analyzed (rule-based)"
        );

        Ok(analysis)
    }
}

/// Decode target for the model's JSON output: exactly the six IntentAnalysis
/// fields, enums restricted to their strict sets.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIntentAnalysis {
    primary_intent: PrimaryIntent,
    secondary_intents: Vec<SecondaryIntent>,
    complexity_level: ComplexityLevel,
    key_decisions: Vec<String>,
    risks: Vec<String>,
    assumptions: Vec<String>,
}

impl From<RawIntentAnalysis> for IntentAnalysis {
    fn from(raw: RawIntentAnalysis) -> Self {
        IntentAnalysis {
            primary_intent: raw.primary_intent,
            secondary_intents: raw.secondary_intents,
            complexity_level: raw.complexity_level,
            key_decisions: raw.key_decisions,
            risks: raw.risks,
            assumptions: raw.assumptions,
        }
    }
}

/// Language-model-backed analyzer under the shared repair protocol.
pub struct LlmIntentAnalyzer {
    llm: Arc<dyn LanguageModel>,
}

impl LlmIntentAnalyzer {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }
}

fn parse_output(output: &str) -> Result<IntentAnalysis, StructureError> {
    let value: serde_json::Value =
        serde_json::from_str(output).map_err(|e| StructureError::Json(e.to_string()))?;

    let raw: RawIntentAnalysis =
        serde_json::from_value(value).map_err(|e| StructureError::Schema(e.to_string()))?;

    Ok(raw.into())
}

#[async_trait]
impl IntentAnalyzer for LlmIntentAnalyzer {
    async fn analyze(
        &self,
        requirement: &Requirement,
    ) -> Result<IntentAnalysis, IntentAnalysisError> {
        let user_prompt = serde_json::to_string_pretty(requirement)
            .map_err(|e| IntentAnalysisError::Invalid(StructureError::Schema(e.to_string())))?;

        let analysis = complete_with_repair(
            self.llm.as_ref(),
            "intent",
            INTENT_SYSTEM_PROMPT,
            &user_prompt,
            CONTRACT_TEMPERATURE,
            parse_output,
        )
        .await?;

        tracing::debug!(
            primary_intent = %analysis.primary_intent,
            secondary = analysis.secondary_intents.len(),
            complexity = ?analysis.complexity_level,
            "Intent analyzed (language model)"
        );

        Ok(analysis)
    }
}
