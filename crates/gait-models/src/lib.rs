//! Shared data models for the gait-analysis backend.
//!
//! This crate provides Serde-serializable types for:
//! - Annotation rows (per-frame bounding boxes tied to source videos)
//! - Bounding-box geometry and coordinate-space rescaling
//! - Pose keypoints and positional joint conventions
//! - Pose-annotated frames emitted by the alignment pipeline

pub mod annotation;
pub mod bbox;
pub mod error;
pub mod frame;
pub mod keypoint;

// Re-export common types
pub use annotation::{AnnotationRow, AnnotationVideoMeta, SequenceId};
pub use bbox::BoundingBox;
pub use error::{ModelError, ModelResult};
pub use frame::{FrameMetadata, PoseAnnotatedFrame};
pub use keypoint::{joints, Keypoint, KeypointOrigin, DEFAULT_KEYPOINT_COUNT};
