//! Tinetti POMA gait scoring.
//!
//! Maps summarized gait features onto the seven gait items of the
//! Performance-Oriented Mobility Assessment (0-12 gait subscale) and a
//! continuous fall-risk estimate. Thresholds operate on
//! height-normalized units from [`crate::features`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::features::{FeatureSummary, GaitFeatures};

/// Maximum score of the gait-only subscale.
pub const GAIT_MAX_SCORE: u32 = 12;

/// Maximum score of the full POMA scale (gait + balance).
pub const POMA_MAX_SCORE: u32 = 28;

/// Per-item gait component scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GaitComponentScores {
    /// Gait initiation (0-1)
    pub initiation: u8,
    /// Right step length (0-1)
    pub right_step_length: u8,
    /// Right foot clearance (0-1)
    pub right_foot_clearance: u8,
    /// Left step length (0-1)
    pub left_step_length: u8,
    /// Left foot clearance (0-1)
    pub left_foot_clearance: u8,
    /// Step symmetry (0-1)
    pub step_symmetry: u8,
    /// Step continuity (0-1)
    pub step_continuity: u8,
    /// Path deviation (0-2)
    pub path_deviation: u8,
    /// Trunk sway (0-2)
    pub trunk_sway: u8,
    /// Walking stance (0-1)
    pub walking_stance: u8,
}

impl GaitComponentScores {
    /// Sum of all component scores (0-12).
    pub fn total(&self) -> u32 {
        [
            self.initiation,
            self.right_step_length,
            self.right_foot_clearance,
            self.left_step_length,
            self.left_foot_clearance,
            self.step_symmetry,
            self.step_continuity,
            self.path_deviation,
            self.trunk_sway,
            self.walking_stance,
        ]
        .iter()
        .map(|&v| v as u32)
        .sum()
    }
}

/// Categorical fall-risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Continuous and categorical fall-risk estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallRisk {
    /// Total score the estimate was derived from
    pub total_score: u32,
    /// Risk in [0, 1]; 0 = best mobility, 1 = worst
    pub risk_score: f64,
    pub level: RiskLevel,
}

// Thresholds in height-normalized units (fractions of frame height).
const MIN_STEP_MEAN: f64 = 0.02;
const STEP_LENGTH_TARGET: f64 = 0.08;
const FOOT_CLEARANCE_TARGET: f64 = 0.12;
const SYMMETRY_CV_LIMIT: f64 = 0.5;
const CONTINUITY_MIN_RATIO: f64 = 0.25;
const PATH_STEADY_STD: f64 = 0.01;
const PATH_ACCEPTABLE_STD: f64 = 0.025;
const SWAY_STEADY_MEAN: f64 = 0.01;
const SWAY_ACCEPTABLE_MEAN: f64 = 0.03;
const STANCE_MIN_STEP: f64 = 0.05;
const STANCE_MAX_STEP: f64 = 0.25;

/// Score the gait components from summarized features.
///
/// Features that are absent score zero for the items that need them.
pub fn score_gait(features: &GaitFeatures) -> GaitComponentScores {
    let mut scores = GaitComponentScores::default();

    if let Some(step) = &features.step_length {
        scores.initiation = score_if(step.samples > 0 && step.mean > MIN_STEP_MEAN);
        scores.right_step_length = score_if(step.mean > STEP_LENGTH_TARGET);
        scores.left_step_length = score_if(step.mean > STEP_LENGTH_TARGET);
        scores.right_foot_clearance = score_if(step.max > FOOT_CLEARANCE_TARGET);
        scores.left_foot_clearance = score_if(step.max > FOOT_CLEARANCE_TARGET);
        scores.step_symmetry = score_if(coefficient_of_variation(step) < SYMMETRY_CV_LIMIT);
        scores.step_continuity = score_if(step.mean > 0.0 && step.min > CONTINUITY_MIN_RATIO * step.mean);
        scores.walking_stance =
            score_if(step.mean > STANCE_MIN_STEP && step.mean < STANCE_MAX_STEP);
    }

    if let Some(sway) = &features.trunk_sway {
        scores.path_deviation = if sway.std < PATH_STEADY_STD {
            2
        } else if sway.std < PATH_ACCEPTABLE_STD {
            1
        } else {
            0
        };
        scores.trunk_sway = if sway.mean < SWAY_STEADY_MEAN {
            2
        } else if sway.mean < SWAY_ACCEPTABLE_MEAN {
            1
        } else {
            0
        };
    }

    scores
}

/// Map a total score to a fall-risk estimate.
///
/// Totals above the gait subscale are interpreted against the full POMA
/// scale. `risk = clamp(1 - total/max, 0, 1)`, banded at thirds.
pub fn assess_fall_risk(total_score: u32) -> FallRisk {
    let max_score = if total_score <= GAIT_MAX_SCORE {
        GAIT_MAX_SCORE
    } else {
        POMA_MAX_SCORE
    };
    let risk_score = (1.0 - total_score as f64 / max_score as f64).clamp(0.0, 1.0);

    let level = if risk_score < 1.0 / 3.0 {
        RiskLevel::Low
    } else if risk_score < 2.0 / 3.0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    };

    FallRisk {
        total_score,
        risk_score,
        level,
    }
}

fn score_if(condition: bool) -> u8 {
    condition as u8
}

fn coefficient_of_variation(summary: &FeatureSummary) -> f64 {
    if summary.mean.abs() > f64::EPSILON {
        summary.std / summary.mean
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(mean: f64, std: f64, max: f64, min: f64) -> FeatureSummary {
        FeatureSummary {
            mean,
            std,
            max,
            min,
            samples: 10,
        }
    }

    #[test]
    fn test_full_score_at_gait_max() {
        let risk = assess_fall_risk(12);
        assert_eq!(risk.risk_score, 0.0);
        assert_eq!(risk.level, RiskLevel::Low);
        assert_eq!(risk.level.to_string(), "Low Risk");
    }

    #[test]
    fn test_zero_score_is_maximum_risk() {
        let risk = assess_fall_risk(0);
        assert_eq!(risk.risk_score, 1.0);
        assert_eq!(risk.level, RiskLevel::High);
        assert_eq!(risk.level.to_string(), "High Risk");
    }

    #[test]
    fn test_totals_above_twelve_use_full_scale() {
        let risk = assess_fall_risk(28);
        assert_eq!(risk.risk_score, 0.0);
        assert_eq!(risk.level, RiskLevel::Low);

        let mid = assess_fall_risk(14);
        assert!((mid.risk_score - 0.5).abs() < 1e-9);
        assert_eq!(mid.level, RiskLevel::Moderate);
    }

    #[test]
    fn test_steady_gait_scores_all_components() {
        let features = GaitFeatures {
            step_length: Some(summary(0.15, 0.02, 0.18, 0.12)),
            trunk_sway: Some(summary(0.005, 0.005, 0.01, 0.001)),
        };
        let scores = score_gait(&features);
        assert_eq!(scores.total(), 12);
        assert_eq!(assess_fall_risk(scores.total()).level, RiskLevel::Low);
    }

    #[test]
    fn test_absent_features_score_zero() {
        let scores = score_gait(&GaitFeatures::default());
        assert_eq!(scores.total(), 0);
        assert_eq!(assess_fall_risk(scores.total()).level, RiskLevel::High);
    }

    #[test]
    fn test_erratic_sway_loses_path_and_trunk_points() {
        let features = GaitFeatures {
            step_length: Some(summary(0.15, 0.02, 0.18, 0.12)),
            trunk_sway: Some(summary(0.06, 0.04, 0.12, 0.01)),
        };
        let scores = score_gait(&features);
        assert_eq!(scores.path_deviation, 0);
        assert_eq!(scores.trunk_sway, 0);
        assert_eq!(scores.total(), 8);
    }
}
