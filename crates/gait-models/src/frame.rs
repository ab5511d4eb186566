//! Pose-annotated output frames.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::annotation::SequenceId;
use crate::bbox::BoundingBox;
use crate::keypoint::{Keypoint, KeypointOrigin};

/// Optional echo of annotation metadata on an output frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameMetadata {
    pub sequence_id: SequenceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gait_event: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_view: Option<String>,

    /// Original annotation-space bounding box
    pub bounding_box: BoundingBox,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_reference: Option<String>,
}

/// One annotated frame with aligned pose keypoints.
///
/// The frame number is the original, unmodified 1-based annotation value;
/// output frames are never renumbered. Keypoints are positional
/// (index = joint id) and carry the pixel dimensions they are relative
/// to. The real estimator and the placeholder synthesizer emit the same
/// schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseAnnotatedFrame {
    /// 1-based frame number copied from the source annotation row
    pub frame_number: i64,

    /// Person identity within the frame (single-person assumption)
    pub person_id: u32,

    /// Which producer generated the keypoints
    pub origin: KeypointOrigin,

    /// Positional keypoints in pixel space
    pub keypoints: Vec<Keypoint>,

    /// Echoed annotation metadata, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FrameMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_round_trips_through_json() {
        let frame = PoseAnnotatedFrame {
            frame_number: 1757,
            person_id: 0,
            origin: KeypointOrigin::Placeholder,
            keypoints: vec![Keypoint::new(1.0, 2.0, 0.5).with_source_dims(1280, 720)],
            metadata: None,
        };
        let json = serde_json::to_string(&frame).unwrap();
        let back: PoseAnnotatedFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, frame);
        assert!(!json.contains("metadata"));
    }
}
