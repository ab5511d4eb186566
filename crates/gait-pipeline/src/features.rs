//! Biomechanical feature extraction over pose-annotated frames.
//!
//! Joints are positional (index = joint id); the ankle and hip indices
//! come from [`gait_models::joints`]. Distances are divided by each
//! frame's source pixel height so summary statistics stay comparable
//! across sequences estimated at different resolutions.

use serde::{Deserialize, Serialize};

use gait_models::{joints, Keypoint, PoseAnnotatedFrame};

/// Summary statistics for one feature series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub mean: f64,
    pub std: f64,
    pub max: f64,
    pub min: f64,
    /// Frames (or frame pairs) that contributed a sample
    pub samples: usize,
}

/// Summarized gait features for one sequence.
///
/// A feature is `None` when no frame supplied the joints it needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GaitFeatures {
    /// Ankle-to-ankle separation, per frame, height-normalized
    pub step_length: Option<FeatureSummary>,
    /// Hip-center lateral displacement across consecutive frames,
    /// height-normalized
    pub trunk_sway: Option<FeatureSummary>,
}

/// Extract summarized gait features from an aligned sequence.
///
/// Frames missing the joints a feature needs are skipped for that
/// feature only; extraction never fails.
pub fn extract_features(frames: &[PoseAnnotatedFrame]) -> GaitFeatures {
    let step_series: Vec<f64> = frames
        .iter()
        .filter_map(|f| step_length_sample(&f.keypoints))
        .collect();

    let hip_series: Vec<f64> = frames
        .iter()
        .filter_map(|f| hip_center_x_sample(&f.keypoints))
        .collect();
    let sway_series: Vec<f64> = hip_series.windows(2).map(|w| (w[1] - w[0]).abs()).collect();

    GaitFeatures {
        step_length: summarize(&step_series),
        trunk_sway: summarize(&sway_series),
    }
}

/// Height-normalized ankle separation for one frame.
fn step_length_sample(keypoints: &[Keypoint]) -> Option<f64> {
    let right = keypoints.get(joints::RIGHT_ANKLE)?;
    let left = keypoints.get(joints::LEFT_ANKLE)?;
    Some(right.distance_to(left) / frame_height(right))
}

/// Height-normalized hip-center x-coordinate for one frame.
fn hip_center_x_sample(keypoints: &[Keypoint]) -> Option<f64> {
    let right = keypoints.get(joints::RIGHT_HIP)?;
    let left = keypoints.get(joints::LEFT_HIP)?;
    Some((right.x + left.x) / 2.0 / frame_height(right))
}

/// Normalization denominator; unstamped keypoints pass through as-is.
fn frame_height(keypoint: &Keypoint) -> f64 {
    if keypoint.source_pixel_height > 0 {
        keypoint.source_pixel_height as f64
    } else {
        1.0
    }
}

fn summarize(series: &[f64]) -> Option<FeatureSummary> {
    if series.is_empty() {
        return None;
    }
    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let variance = series.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let max = series.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = series.iter().cloned().fold(f64::INFINITY, f64::min);

    Some(FeatureSummary {
        mean,
        std: variance.sqrt(),
        max,
        min,
        samples: series.len(),
    })
}
