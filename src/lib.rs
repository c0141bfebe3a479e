//! Staged semantic execution over natural-language requirements.
//!
//! Raw user text flows through fixed intermediate representations, one stage
//! at a time:
//!
//! ```text
//! raw text -> Requirement -> IntentAnalysis -> SemanticTask[]
//!          -> RetrievalQuery[] -> RetrievalResult[] -> GenerationResult
//! ```
//!
//! Stages that call a language model enforce a strict JSON contract at
//! temperature 0, with one repair retry on invalid output. Everything after
//! task construction is deterministic: retrieval queries are derived by rules,
//! and generation consumes a frozen evidence set it cannot reopen.
//!
//! [`pipeline::SemanticExecutionPipeline`] wires the stages together; each
//! stage is also usable on its own through its capability trait.

pub mod llm;
pub mod model;
pub mod pipeline;
pub mod retriever;
pub mod service;

pub use pipeline::{PipelineError, PipelineRun, SemanticExecutionPipeline};
