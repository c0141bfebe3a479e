//! Retrieval capability consumed by the pipeline
//!
//! A retriever turns a validated [`RetrievalQuery`] into a ranked
//! [`RetrievalResult`]. Vector stores, embedders and index maintenance live
//! behind this trait and are out of the core's scope.

mod in_memory;

use async_trait::async_trait;

use crate::model::{RetrievalQuery, RetrievalResult};

pub use in_memory::InMemoryRetriever;

/// Upstream retrieval failure. Surfaced to the caller unchanged; the core
/// never retries a failed backend call.
#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    #[error("retrieval backend request failed: {0}")]
    BackendError(String),

    #[error("retrieval backend returned malformed hits: {0}")]
    MalformedHits(String),
}

/// One query-in / result-out round-trip against the retrieval backend.
/// Scores must come back in [0, 1].
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn execute(&self, query: &RetrievalQuery) -> Result<RetrievalResult, RetrieverError>;
}
