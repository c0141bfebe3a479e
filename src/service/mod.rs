pub mod generation;
pub mod intent;
pub mod query;
pub mod repair;
pub mod requirement;
pub mod task;
pub mod validation;

pub use generation::{GenerationError, GenerationExecutor, GenerationInputBuilder, Generator};
pub use intent::{IntentAnalysisError, IntentAnalyzer, LlmIntentAnalyzer, RuleBasedIntentAnalyzer};
pub use query::RetrievalQueryBuilder;
pub use repair::{RepairError, StructureError};
pub use requirement::{LlmRequirementParser, RequirementParseError, RequirementParser};
pub use task::{LlmTaskBuilder, RuleBasedTaskBuilder, SemanticTaskBuildError, SemanticTaskBuilder};
