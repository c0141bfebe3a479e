//! Structural validation for RetrievedChunk and RetrievalResult
//!
//! A result may legitimately carry zero chunks (a query can match nothing);
//! identifiers, content and score ranges are what this guards.

use thiserror::Error;

use crate::model::{RetrievalResult, RetrievedChunk};

#[derive(Debug, Error)]
pub enum RetrievedChunkValidationError {
    #[error("chunk_id must not be empty")]
    EmptyChunkId,

    #[error("chunk[{chunk_id}]: source_id must not be empty")]
    EmptySourceId { chunk_id: String },

    #[error("chunk[{chunk_id}]: content must not be empty")]
    EmptyContent { chunk_id: String },

    #[error("chunk[{chunk_id}]: relevance_score {score} outside [0, 1]")]
    RelevanceOutOfRange { chunk_id: String, score: f64 },
}

#[derive(Debug, Error)]
pub enum RetrievalResultValidationError {
    #[error("query_id must not be empty")]
    EmptyQueryId,

    #[error("result[{query_id}]: {source}")]
    InvalidChunk {
        query_id: String,
        #[source]
        source: RetrievedChunkValidationError,
    },

    #[error("result[{query_id}]: confidence {confidence} outside [0, 1]")]
    ConfidenceOutOfRange { query_id: String, confidence: f64 },
}

pub fn validate_chunk(chunk: &RetrievedChunk) -> Result<(), RetrievedChunkValidationError> {
    if chunk.chunk_id.trim().is_empty() {
        return Err(RetrievedChunkValidationError::EmptyChunkId);
    }

    if chunk.source_id.trim().is_empty() {
        return Err(RetrievedChunkValidationError::EmptySourceId {
            chunk_id: chunk.chunk_id.clone(),
        });
    }

    if chunk.content.trim().is_empty() {
        return Err(RetrievedChunkValidationError::EmptyContent {
            chunk_id: chunk.chunk_id.clone(),
        });
    }

    if !(0.0..=1.0).contains(&chunk.relevance_score) {
        return Err(RetrievedChunkValidationError::RelevanceOutOfRange {
            chunk_id: chunk.chunk_id.clone(),
            score: chunk.relevance_score,
        });
    }

    Ok(())
}

pub fn validate_result(result: &RetrievalResult) -> Result<(), RetrievalResultValidationError> {
    if result.query_id.trim().is_empty() {
        return Err(RetrievalResultValidationError::EmptyQueryId);
    }

    for chunk in &result.chunks {
        validate_chunk(chunk).map_err(|source| RetrievalResultValidationError::InvalidChunk {
            query_id: result.query_id.clone(),
            source,
        })?;
    }

    if !(0.0..=1.0).contains(&result.confidence) {
        return Err(RetrievalResultValidationError::ConfidenceOutOfRange {
            query_id: result.query_id.clone(),
            confidence: result.confidence,
        });
    }

    Ok(())
}
