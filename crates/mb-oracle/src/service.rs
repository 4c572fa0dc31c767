//! Recommendation service boundary

use async_trait::async_trait;

use crate::types::{Recommendation, RecommendationRequest};

/// External recommendation provider. One attempt per call, no retries.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    async fn fetch(&self, request: &RecommendationRequest) -> Result<Recommendation, OracleError>;
}

/// Service call failures. All of them are recovered by the curator.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Service returned an empty answer")]
    EmptyResponse,

    #[error("Malformed answer: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}
