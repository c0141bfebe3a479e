//! In-memory keyword retriever for tests and dry runs

use async_trait::async_trait;

use crate::model::{RetrievalQuery, RetrievalResult, RetrievedChunk};

use super::{Retriever, RetrieverError};

/// Matches seeded chunks by case-insensitive keyword containment.
///
/// Confidence is the mean relevance of the matched chunks, 0.0 when nothing
/// matched. Useful to exercise the full pipeline without a vector store.
pub struct InMemoryRetriever {
    chunks: Vec<RetrievedChunk>,
}

impl InMemoryRetriever {
    pub fn new(chunks: Vec<RetrievedChunk>) -> Self {
        Self { chunks }
    }
}

#[async_trait]
impl Retriever for InMemoryRetriever {
    async fn execute(&self, query: &RetrievalQuery) -> Result<RetrievalResult, RetrieverError> {
        let keywords: Vec<String> = query.keywords.iter().map(|k| k.to_lowercase()).collect();

        let matched: Vec<RetrievedChunk> = self
            .chunks
            .iter()
            .filter(|chunk| {
                let content = chunk.content.to_lowercase();
                keywords.iter().any(|kw| content.contains(kw))
            })
            .cloned()
            .collect();

        tracing::debug!(
            query_id = %query.query_id,
            scope = %query.scope,
            matched = matched.len(),
            "In-memory retrieval executed"
        );

        Ok(RetrievalResult::from_chunks(query.query_id.clone(), matched))
    }
}
