//! Pose estimation error types.

use thiserror::Error;

pub type PoseResult<T> = Result<T, PoseError>;

#[derive(Debug, Error)]
pub enum PoseError {
    #[error("Invalid estimator configuration: {0}")]
    Config(String),

    #[error("Pose service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Asset unreadable: {0}")]
    AssetUnreadable(String),

    #[error("Estimation failed: {0}")]
    EstimationFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PoseError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PoseError::ServiceUnavailable(_) | PoseError::Timeout(_) | PoseError::Network(_)
        )
    }
}
