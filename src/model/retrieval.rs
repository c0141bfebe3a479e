use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::model::semantic::EntityRef;

/// Which corpus a query searches, and which corpus a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalScope {
    Code,
    Doc,
    Api,
}

impl RetrievalScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalScope::Code => "code",
            RetrievalScope::Doc => "doc",
            RetrievalScope::Api => "api",
        }
    }
}

impl fmt::Display for RetrievalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Deterministic request to the retrieval backend: what to look for, where, and
// how to filter. Keywords are deduplicated and order-preserving; filter values
// are JSON-safe by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalQuery {
    pub query_id: String,
    pub scope: RetrievalScope,
    pub keywords: Vec<String>,
    pub entity_refs: Vec<EntityRef>,
    #[serde(default)]
    pub filters: BTreeMap<String, serde_json::Value>,
}

/// Smallest evidence unit returned by retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk_id: String,
    pub source_id: String,
    pub source_type: RetrievalScope,
    pub content: String,
    /// Backend relevance in [0, 1].
    pub relevance_score: f64,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

// Aggregated retrieval outcome for one query. Confidence is the mean chunk
// relevance, 0.0 when nothing matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub query_id: String,
    pub chunks: Vec<RetrievedChunk>,
    pub confidence: f64,
    pub total_hits: usize,
}

impl RetrievalResult {
    /// Build a result from chunks, deriving confidence and hit count.
    pub fn from_chunks(query_id: String, chunks: Vec<RetrievedChunk>) -> Self {
        let confidence = mean_relevance(&chunks);
        let total_hits = chunks.len();
        Self {
            query_id,
            chunks,
            confidence,
            total_hits,
        }
    }
}

/// Mean relevance score of a chunk set, 0.0 for an empty set.
pub fn mean_relevance(chunks: &[RetrievedChunk]) -> f64 {
    if chunks.is_empty() {
        return 0.0;
    }
    chunks.iter().map(|c| c.relevance_score).sum::<f64>() / chunks.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, score: f64) -> RetrievedChunk {
        RetrievedChunk {
            chunk_id: id.to_string(),
            source_id: format!("src-{id}"),
            source_type: RetrievalScope::Code,
            content: "fn login() {}".to_string(),
            relevance_score: score,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn mean_relevance_of_empty_set_is_zero() {
        assert_eq!(mean_relevance(&[]), 0.0);
    }

    #[test]
    fn from_chunks_derives_confidence_and_hits() {
        let result = RetrievalResult::from_chunks(
            "rq-1".to_string(),
            vec![chunk("a", 0.8), chunk("b", 0.4)],
        );
        assert!((result.confidence - 0.6).abs() < 1e-9);
        assert_eq!(result.total_hits, 2);
    }
}
