//! Deterministic placeholder keypoint synthesis.
//!
//! When no estimator is configured, or a row-specific estimation attempt
//! fails, the pipeline still emits keypoints so downstream feature
//! extraction and visualization stay exercisable. The synthesized grid is
//! schema-identical to estimator output; callers never branch on which
//! producer generated a frame's keypoints.

use gait_models::Keypoint;

/// Generate a deterministic square-ish grid of keypoints around a center.
///
/// Layout: `grid_size = floor(sqrt(count))`; keypoint `i` sits at grid
/// cell `(i % grid_size, i / grid_size)`, offset from the center by
/// `spacing` pixels per cell relative to the grid midpoint. Confidence is
/// clamped to `[0.0, 1.0]`. Source dimensions are stamped by the caller.
pub fn generate_keypoint_grid(
    center_x: f64,
    center_y: f64,
    count: usize,
    spacing: f64,
    confidence: f64,
) -> Vec<Keypoint> {
    if count == 0 {
        return Vec::new();
    }

    let grid_size = (count as f64).sqrt().floor() as usize;
    let grid_size = grid_size.max(1);
    let half = (grid_size / 2) as f64;
    let confidence = confidence.clamp(0.0, 1.0);

    (0..count)
        .map(|i| {
            let grid_x = (i % grid_size) as f64;
            let grid_y = (i / grid_size) as f64;
            Keypoint::new(
                center_x + (grid_x - half) * spacing,
                center_y + (grid_y - half) * spacing,
                confidence,
            )
        })
        .collect()
}
