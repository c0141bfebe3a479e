use serde::{Deserialize, Serialize};

/// Structural risk flags the requirement parser may attach to its output.
///
/// This is a closed vocabulary: the language model must pick from these values,
/// and anything else is a schema violation (repairable, see the requirement
/// service).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementWarning {
    MultipleIntents,
    CoreIntentWeak,
    AmbiguousScope,
    UnclearTarget,
    MissingKeyEntity,
    UnknownEntity,
    OperationUnclear,
    ConstraintMissing,
    NonFunctionalUnclear,
    DomainUncertain,
    StageUncertain,
    ImplicitAssumptionHeavy,
}

// Structured restatement of a user's free-text request.
// - core_intent: the one thing the user most wants done (always present)
// - entities / operations: nouns and verbs lifted from the input, never invented
// - confidence: the model's self-assessment that this restatement is faithful
// - warnings: enum-valued risk flags; required non-empty when confidence < 0.7
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub domain: Option<String>,
    pub stage: Option<String>,
    pub core_intent: String,
    pub entities: Vec<String>,
    pub operations: Vec<String>,
    pub non_functional: Vec<String>,
    pub constraints: Vec<String>,
    pub implicit_signals: Vec<String>,
    pub confidence: f64,
    pub warnings: Vec<RequirementWarning>,
    pub assumptions: Vec<String>,
}
