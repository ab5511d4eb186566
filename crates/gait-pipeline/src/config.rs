//! Pipeline configuration.

use std::path::PathBuf;

use gait_models::DEFAULT_KEYPOINT_COUNT;

use crate::error::{PipelineError, PipelineResult};

/// Configuration for one sequence-alignment pass.
#[derive(Debug, Clone)]
pub struct AlignerConfig {
    /// Person identity assigned to every output frame (single-person assumption)
    pub person_id: u32,
    /// Keypoint count for placeholder synthesis
    pub keypoint_count: usize,
    /// Grid spacing in pixels for placeholder synthesis
    pub grid_spacing: f64,
    /// Confidence stamped on placeholder keypoints
    pub placeholder_confidence: f64,
    /// Landmark model identifier passed to the estimator
    pub pose_model: String,
    /// Whether output frames echo annotation metadata
    pub include_metadata: bool,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            person_id: 0,
            keypoint_count: DEFAULT_KEYPOINT_COUNT,
            grid_spacing: 10.0,
            placeholder_confidence: 0.3,
            pose_model: "body25".to_string(),
            include_metadata: false,
        }
    }
}

/// Dataset-run configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// JSON-lines manifest of annotation rows
    pub dataset_path: PathBuf,
    /// Directory the download subsystem caches source videos in
    pub video_cache_dir: PathBuf,
    /// Directory for per-sequence result artifacts
    pub output_dir: PathBuf,
    /// Sequences processed concurrently
    pub max_sequence_parallel: usize,
    /// Skip sequences whose artifact already exists
    pub resume: bool,
    /// Per-sequence alignment settings
    pub aligner: AlignerConfig,
}

impl PipelineConfig {
    /// Create config from environment variables.
    ///
    /// `DATASET_PATH` is required; everything else has a default.
    pub fn from_env() -> PipelineResult<Self> {
        let dataset_path = std::env::var("DATASET_PATH")
            .map_err(|_| PipelineError::config_error("DATASET_PATH is not set"))?;

        let aligner = AlignerConfig {
            person_id: env_parse("PERSON_ID", 0),
            keypoint_count: env_parse("KEYPOINT_COUNT", DEFAULT_KEYPOINT_COUNT),
            grid_spacing: env_parse("GRID_SPACING", 10.0),
            placeholder_confidence: env_parse("PLACEHOLDER_CONFIDENCE", 0.3),
            pose_model: std::env::var("POSE_MODEL").unwrap_or_else(|_| "body25".to_string()),
            include_metadata: env_parse("INCLUDE_METADATA", false),
        };

        Ok(Self {
            dataset_path: PathBuf::from(dataset_path),
            video_cache_dir: PathBuf::from(
                std::env::var("VIDEO_CACHE_DIR").unwrap_or_else(|_| "/tmp/gait/videos".to_string()),
            ),
            output_dir: PathBuf::from(
                std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "/tmp/gait/results".to_string()),
            ),
            max_sequence_parallel: env_parse("MAX_SEQUENCE_PARALLEL", 4),
            resume: env_parse("RESUME", true),
            aligner,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
