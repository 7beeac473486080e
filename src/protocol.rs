//! Wire types exchanged between the chat form and the query endpoint.
//!
//! ```text
//! POST /   Content-Type: application/json
//! -> { "query": "How do I peer two VPCs?" }
//! <- { "response": "..." }
//! ```

use serde::{Deserialize, Serialize};

/// Request body sent for each chat submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Text captured from the chat input.
    pub query: String,
}

/// Successful answer returned by the query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Assistant text to render.
    pub response: String,
}

/// Error body returned by the query endpoint when no answer could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description of the failure.
    pub error: String,
}
