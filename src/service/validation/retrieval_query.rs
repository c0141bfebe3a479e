//! Structural validation for RetrievalQuery
//!
//! Guards the retrieval boundary: no empty searches, no unanchored entity
//! refs. Short-circuits on the first violation.

use thiserror::Error;

use crate::model::RetrievalQuery;

#[derive(Debug, Error)]
pub enum RetrievalQueryValidationError {
    #[error("query_id must not be empty")]
    EmptyQueryId,

    #[error("query[{query_id}]: keywords must not be empty")]
    EmptyKeywords { query_id: String },

    #[error("query[{query_id}]: keywords must be non-blank strings")]
    BlankKeyword { query_id: String },

    #[error("query[{query_id}]: entity_ref.name must not be empty")]
    EmptyEntityRefName { query_id: String },
}

pub fn validate_query(query: &RetrievalQuery) -> Result<(), RetrievalQueryValidationError> {
    if query.query_id.trim().is_empty() {
        return Err(RetrievalQueryValidationError::EmptyQueryId);
    }

    if query.keywords.is_empty() {
        return Err(RetrievalQueryValidationError::EmptyKeywords {
            query_id: query.query_id.clone(),
        });
    }

    if query.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(RetrievalQueryValidationError::BlankKeyword {
            query_id: query.query_id.clone(),
        });
    }

    // Entity refs are optional anchors; when present they must be named.
    // Scope and filter values are constrained by their types.
    for entity_ref in &query.entity_refs {
        if entity_ref.name.trim().is_empty() {
            return Err(RetrievalQueryValidationError::EmptyEntityRefName {
                query_id: query.query_id.clone(),
            });
        }
    }

    Ok(())
}
