use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary intent class of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryIntent {
    Generate,
    Analyze,
    Design,
    Review,
}

impl fmt::Display for PrimaryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimaryIntent::Generate => "generate",
            PrimaryIntent::Analyze => "analyze",
            PrimaryIntent::Design => "design",
            PrimaryIntent::Review => "review",
        };
        write!(f, "{s}")
    }
}

/// Auxiliary or implied intents detected alongside the primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryIntent {
    RiskAnalysis,
    ConstraintCheck,
    Refactor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Low => "low",
            ComplexityLevel::Medium => "medium",
            ComplexityLevel::High => "high",
        }
    }
}

// Classification of a Requirement: what kind of task it is, how complex it is,
// and what must be decided before executing it.
// - key_decisions: judgments the task cannot proceed without
// - risks: potential failure points
// - assumptions: premises the analysis silently accepts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub primary_intent: PrimaryIntent,
    pub secondary_intents: Vec<SecondaryIntent>,
    pub complexity_level: ComplexityLevel,
    pub key_decisions: Vec<String>,
    pub risks: Vec<String>,
    pub assumptions: Vec<String>,
}

impl IntentAnalysis {
    /// Whether the task needs decomposition into multiple steps.
    pub fn is_complex(&self) -> bool {
        self.complexity_level == ComplexityLevel::High
    }
}
