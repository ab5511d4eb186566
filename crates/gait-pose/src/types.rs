//! Pose service request/response types.
//!
//! The service operates on paths into a shared volume and replies with
//! landmarks normalized to `[0, 1]`; the client denormalizes to pixel
//! space before anything crosses the port boundary.

use serde::{Deserialize, Serialize};

use gait_models::BoundingBox;

/// Request for single-image estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEstimateRequest {
    /// Path to the input image
    pub image_path: String,
    /// Landmark model identifier
    pub model: String,
    /// Optional region of interest for crop assist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Minimum landmark confidence the service should apply
    pub min_confidence: f64,
}

/// Request for whole-video estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEstimateRequest {
    /// Path to the input video
    pub video_path: String,
    /// Landmark model identifier
    pub model: String,
    /// Minimum landmark confidence the service should apply
    pub min_confidence: f64,
}

/// A single landmark, normalized to the estimation dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WireLandmark {
    /// Normalized x in [0, 1]
    pub x: f64,
    /// Normalized y in [0, 1]
    pub y: f64,
    /// Landmark visibility/confidence in [0, 1]
    pub visibility: f64,
}

/// Response for single-image estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEstimateResponse {
    /// Pixel width the service estimated against
    pub pixel_width: u32,
    /// Pixel height the service estimated against
    pub pixel_height: u32,
    /// Normalized landmarks, positional by joint id
    pub landmarks: Vec<WireLandmark>,
}

/// Response for whole-video estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEstimateResponse {
    /// Pixel width the service estimated against
    pub pixel_width: u32,
    /// Pixel height the service estimated against
    pub pixel_height: u32,
    /// One landmark list per decoded frame, 0-based decode order
    pub frames: Vec<Vec<WireLandmark>>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}
