//! Pose keypoints and the positional joint convention.
//!
//! Keypoints are positional: `keypoints[i]` names a specific joint per the
//! configured landmark model, never by name. Consumers index with the
//! constants in [`joints`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default keypoint count for placeholder synthesis (BODY_25-sized grid).
pub const DEFAULT_KEYPOINT_COUNT: usize = 25;

/// Joint indices for the positional keypoint layout.
///
/// The hip/ankle indices follow the OpenPose-style ordering the datasets
/// were annotated against.
pub mod joints {
    /// Right hip x/y index.
    pub const RIGHT_HIP: usize = 8;
    /// Right ankle index.
    pub const RIGHT_ANKLE: usize = 10;
    /// Left hip index.
    pub const LEFT_HIP: usize = 11;
    /// Left ankle index.
    pub const LEFT_ANKLE: usize = 13;
}

/// A single 2D pose keypoint in pixel space.
///
/// Coordinates are relative to the pixel dimensions carried alongside
/// them (`source_pixel_width/height`), which are the dimensions the
/// producer actually used. Downstream consumers rescale with these, never
/// with the annotation-space dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Keypoint {
    /// X coordinate in pixels
    pub x: f64,
    /// Y coordinate in pixels
    pub y: f64,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
    /// Pixel width of the frame the coordinates are relative to
    pub source_pixel_width: u32,
    /// Pixel height of the frame the coordinates are relative to
    pub source_pixel_height: u32,
}

impl Keypoint {
    /// Create a keypoint with no source dimensions stamped yet.
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self {
            x,
            y,
            confidence,
            source_pixel_width: 0,
            source_pixel_height: 0,
        }
    }

    /// Stamp the pixel dimensions the coordinates are relative to.
    pub fn with_source_dims(mut self, width: u32, height: u32) -> Self {
        self.source_pixel_width = width;
        self.source_pixel_height = height;
        self
    }

    /// Euclidean distance to another keypoint.
    pub fn distance_to(&self, other: &Keypoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Which producer generated a frame's keypoints.
///
/// Preserved on every output frame so a dataset run can be audited for
/// how much of it is real estimator output versus synthetic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum KeypointOrigin {
    /// Taken from a whole-video batch estimation result
    BatchEstimated,
    /// Estimated from a single decoded frame
    FrameEstimated,
    /// Synthesized placeholder grid anchored on the annotation bbox
    Placeholder,
}

impl KeypointOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeypointOrigin::BatchEstimated => "batch_estimated",
            KeypointOrigin::FrameEstimated => "frame_estimated",
            KeypointOrigin::Placeholder => "placeholder",
        }
    }

    /// Whether the keypoints came from a real estimator.
    pub fn is_estimated(&self) -> bool {
        !matches!(self, KeypointOrigin::Placeholder)
    }
}

impl fmt::Display for KeypointOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Keypoint::new(0.0, 0.0, 1.0);
        let b = Keypoint::new(3.0, 4.0, 1.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_source_dims_stamp() {
        let k = Keypoint::new(10.0, 20.0, 0.9).with_source_dims(1920, 1080);
        assert_eq!(k.source_pixel_width, 1920);
        assert_eq!(k.source_pixel_height, 1080);
    }

    #[test]
    fn test_origin_labels() {
        assert_eq!(KeypointOrigin::Placeholder.as_str(), "placeholder");
        assert!(!KeypointOrigin::Placeholder.is_estimated());
        assert!(KeypointOrigin::BatchEstimated.is_estimated());
    }
}
