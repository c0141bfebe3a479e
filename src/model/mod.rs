pub mod config;
pub mod generation;
pub mod intent;
pub mod requirement;
pub mod retrieval;
pub mod semantic;

pub use config::{GenerationSettings, LlmSettings, PipelineConfig};
pub use generation::{GenerationInput, GenerationResult};
pub use intent::{ComplexityLevel, IntentAnalysis, PrimaryIntent, SecondaryIntent};
pub use requirement::{Requirement, RequirementWarning};
pub use retrieval::{
    RetrievalQuery, RetrievalResult, RetrievalScope, RetrievedChunk, mean_relevance,
};
pub use semantic::{
    ActionKind, Constraint, ConstraintLevel, EntityRef, EntityType, Operation, OutputSpec,
    OutputType, SemanticTask, TaskType,
};
