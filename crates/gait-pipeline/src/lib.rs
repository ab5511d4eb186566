//! Frame-to-pose alignment pipeline and gait-risk scoring.
//!
//! This crate drives annotation rows through pose alignment and derives
//! Tinetti POMA gait scores:
//! - [`SequencePoseAligner`] converts one sequence's rows into
//!   pose-annotated frames with per-video batch caching
//! - [`features`] summarizes biomechanical statistics over the frames
//! - [`tinetti`] maps statistics to clinical component scores and risk
//! - [`DatasetOrchestrator`] runs the whole dataset with resumable
//!   per-sequence artifacts

pub mod aligner;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod orchestrator;
pub mod tinetti;

pub use aligner::{
    AlignedSequence, PlaceholderReason, RowOutcome, RowRecord, SequencePoseAligner, SequenceReport,
};
pub use config::{AlignerConfig, PipelineConfig};
pub use error::{PipelineError, PipelineResult};
pub use features::{extract_features, FeatureSummary, GaitFeatures};
pub use logging::SequenceLogger;
pub use orchestrator::{DatasetOrchestrator, DatasetReport, SequenceResult};
pub use tinetti::{assess_fall_risk, score_gait, FallRisk, GaitComponentScores, RiskLevel};
