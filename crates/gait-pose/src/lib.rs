//! Pose estimation boundary for the gait pipeline.
//!
//! This crate provides:
//! - The [`PoseEstimationPort`] trait the core pipeline depends on
//! - A deterministic placeholder keypoint synthesizer for rows no
//!   estimator can serve
//! - An HTTP client implementation of the port backed by an external
//!   pose-estimation service

pub mod error;
pub mod placeholder;
pub mod port;
pub mod remote;
pub mod types;

pub use error::{PoseError, PoseResult};
pub use placeholder::generate_keypoint_grid;
pub use port::{ImagePose, PoseEstimationPort, VideoPose};
pub use remote::{RemotePoseConfig, RemotePoseEstimator};
