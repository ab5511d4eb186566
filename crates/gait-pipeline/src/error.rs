//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] gait_models::ModelError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Dataset load failed: {0}")]
    DatasetFailed(String),

    #[error("Media error: {0}")]
    Media(#[from] gait_media::MediaError),

    #[error("Pose error: {0}")]
    Pose(#[from] gait_pose::PoseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn dataset_failed(msg: impl Into<String>) -> Self {
        Self::DatasetFailed(msg.into())
    }
}
