//! The pose-estimation port the core pipeline depends on.

use async_trait::async_trait;
use std::path::Path;

use gait_models::{BoundingBox, Keypoint};

use crate::error::PoseResult;

/// Keypoints estimated from a single image.
///
/// Coordinates are pixel-space relative to `pixel_width`/`pixel_height`,
/// the dimensions the estimator actually used. Implementations that crop
/// to a supplied bounding box must re-offset by the box origin before
/// returning, so callers always receive full-image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePose {
    pub keypoints: Vec<Keypoint>,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Keypoints estimated for every frame of a video.
///
/// `frames[i]` holds the keypoints of decode index `i` (0-based, decode
/// order). Dimensions are those of the decoded stream as the estimator
/// saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoPose {
    pub frames: Vec<Vec<Keypoint>>,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Abstraction over pose-estimation backends.
///
/// Implementations must return pixel-space coordinates; any internal
/// normalization is undone before returning. Batch capability is an
/// explicit flag checked once by callers.
#[async_trait]
pub trait PoseEstimationPort: Send + Sync {
    /// Estimate keypoints for one image, optionally crop-assisted by a
    /// region of interest in the image's own pixel space. Returned
    /// coordinates are always relative to the full image.
    async fn estimate_image_keypoints(
        &self,
        image_path: &Path,
        model: &str,
        bbox: Option<&BoundingBox>,
    ) -> PoseResult<ImagePose>;

    /// Estimate keypoints for every decoded frame of a video.
    ///
    /// Fails with [`crate::PoseError::AssetUnreadable`] when the video
    /// cannot be opened.
    async fn estimate_video_keypoints(&self, video_path: &Path, model: &str)
        -> PoseResult<VideoPose>;

    /// Stable identifier of the estimator configuration (model variant,
    /// thresholds), used in caching keys so results invalidate when the
    /// configuration changes.
    fn cache_fingerprint(&self) -> String;

    /// Whether whole-video batch estimation is available.
    fn supports_batch_video(&self) -> bool;

    /// Implementation name for logging.
    fn name(&self) -> &'static str;
}
