//! Dataset orchestration.
//!
//! Drives the full pipeline over a dataset manifest: load rows, group
//! them by sequence, align each sequence, score it, and persist one JSON
//! artifact per sequence. Sequences are independent, so they run with
//! bounded parallelism, and a rerun resumes by skipping sequences whose
//! artifact already exists.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use gait_models::{AnnotationRow, PoseAnnotatedFrame, SequenceId};
use gait_pose::PoseEstimationPort;

use gait_media::VideoSourceResolver;

use crate::aligner::{SequencePoseAligner, SequenceReport};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::features::{extract_features, GaitFeatures};
use crate::tinetti::{assess_fall_risk, score_gait, FallRisk, GaitComponentScores, RiskLevel};

/// Full per-sequence output, persisted as one artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceResult {
    pub sequence_id: SequenceId,
    pub report: SequenceReport,
    pub features: GaitFeatures,
    pub component_scores: GaitComponentScores,
    pub fall_risk: FallRisk,
    pub frames: Vec<PoseAnnotatedFrame>,
}

/// One line of the dataset report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceSummary {
    pub sequence_id: SequenceId,
    pub rows: usize,
    pub estimated: usize,
    pub placeholder: usize,
    pub tinetti_total: u32,
    pub risk_level: RiskLevel,
}

/// Aggregate result of one dataset run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sequences_total: usize,
    pub sequences_processed: usize,
    pub sequences_skipped: usize,
    pub sequences_failed: usize,
    pub frames_estimated: usize,
    pub frames_placeholder: usize,
    pub sequences: Vec<SequenceSummary>,
}

enum Disposition {
    Skipped,
    Completed(Box<SequenceResult>),
    Failed(String),
}

/// Drives the alignment and scoring pipeline over a whole dataset.
pub struct DatasetOrchestrator {
    config: PipelineConfig,
    aligner: SequencePoseAligner,
    resolver: VideoSourceResolver,
    estimator: Option<Arc<dyn PoseEstimationPort>>,
}

impl DatasetOrchestrator {
    /// Create an orchestrator; `estimator` is `None` for placeholder-only
    /// runs.
    pub fn new(config: PipelineConfig, estimator: Option<Arc<dyn PoseEstimationPort>>) -> Self {
        let aligner = SequencePoseAligner::new(config.aligner.clone());
        let resolver = VideoSourceResolver::new(&config.video_cache_dir);
        Self {
            config,
            aligner,
            resolver,
            estimator,
        }
    }

    /// Run the pipeline over the configured dataset.
    ///
    /// Per-sequence failures are recorded in the report and never abort
    /// the run; only a missing or malformed manifest does.
    pub async fn run(&self) -> PipelineResult<DatasetReport> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4().to_string();

        let rows = load_rows(&self.config.dataset_path)?;
        let groups = group_rows(rows);
        info!(
            run_id = %run_id,
            sequences = groups.len(),
            "Starting dataset run"
        );

        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let mut report = DatasetReport {
            run_id,
            started_at,
            finished_at: started_at,
            sequences_total: groups.len(),
            sequences_processed: 0,
            sequences_skipped: 0,
            sequences_failed: 0,
            frames_estimated: 0,
            frames_placeholder: 0,
            sequences: Vec::with_capacity(groups.len()),
        };

        let parallel = self.config.max_sequence_parallel.max(1);
        for chunk in groups.chunks(parallel) {
            let futures = chunk
                .iter()
                .map(|(sequence_id, rows)| self.process_or_skip(sequence_id, rows));
            for (disposition, (sequence_id, _)) in join_all(futures).await.into_iter().zip(chunk) {
                match disposition {
                    Disposition::Skipped => report.sequences_skipped += 1,
                    Disposition::Failed(message) => {
                        error!(sequence_id = %sequence_id, "Sequence failed: {}", message);
                        report.sequences_failed += 1;
                    }
                    Disposition::Completed(result) => {
                        report.sequences_processed += 1;
                        report.frames_estimated +=
                            result.report.batch_estimated + result.report.frame_estimated;
                        report.frames_placeholder += result.report.placeholder;
                        report.sequences.push(SequenceSummary {
                            sequence_id: result.sequence_id.clone(),
                            rows: result.report.rows_total,
                            estimated: result.report.batch_estimated
                                + result.report.frame_estimated,
                            placeholder: result.report.placeholder,
                            tinetti_total: result.component_scores.total(),
                            risk_level: result.fall_risk.level,
                        });
                    }
                }
            }
        }

        report.finished_at = Utc::now();
        let report_path = self.config.output_dir.join("dataset_report.json");
        tokio::fs::write(&report_path, serde_json::to_string_pretty(&report)?).await?;
        info!(
            processed = report.sequences_processed,
            skipped = report.sequences_skipped,
            failed = report.sequences_failed,
            "Dataset run complete"
        );

        Ok(report)
    }

    async fn process_or_skip(
        &self,
        sequence_id: &SequenceId,
        rows: &[AnnotationRow],
    ) -> Disposition {
        let artifact = self.artifact_path(sequence_id);
        if self.config.resume && artifact.exists() {
            info!(sequence_id = %sequence_id, "Artifact exists, skipping");
            return Disposition::Skipped;
        }

        let result = match self.process_sequence(rows).await {
            Ok(result) => result,
            Err(e) => return Disposition::Failed(e.to_string()),
        };

        if let Err(e) = self.write_artifact(&artifact, &result).await {
            return Disposition::Failed(format!(
                "artifact write failed for {}: {}",
                artifact.display(),
                e
            ));
        }

        Disposition::Completed(Box::new(result))
    }

    /// Align and score one sequence.
    async fn process_sequence(&self, rows: &[AnnotationRow]) -> PipelineResult<SequenceResult> {
        let aligned = self
            .aligner
            .align(rows, self.estimator.as_deref(), &self.resolver)
            .await?;

        let features = extract_features(&aligned.frames);
        let component_scores = score_gait(&features);
        let fall_risk = assess_fall_risk(component_scores.total());

        Ok(SequenceResult {
            sequence_id: aligned.sequence_id,
            report: aligned.report,
            features,
            component_scores,
            fall_risk,
            frames: aligned.frames,
        })
    }

    fn artifact_path(&self, sequence_id: &SequenceId) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.json", sanitize_artifact_name(sequence_id.as_str())))
    }

    async fn write_artifact(&self, path: &Path, result: &SequenceResult) -> PipelineResult<()> {
        let json = serde_json::to_string_pretty(result)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

/// Load annotation rows from a JSON-lines manifest.
pub fn load_rows(path: &Path) -> PipelineResult<Vec<AnnotationRow>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::dataset_failed(format!("cannot read {}: {}", path.display(), e))
    })?;

    let mut rows = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row: AnnotationRow = serde_json::from_str(line).map_err(|e| {
            PipelineError::dataset_failed(format!(
                "{} line {}: {}",
                path.display(),
                lineno + 1,
                e
            ))
        })?;
        rows.push(row);
    }

    if rows.is_empty() {
        warn!(path = %path.display(), "Dataset manifest contained no rows");
    }
    Ok(rows)
}

/// Group rows by sequence, preserving first-seen sequence order and
/// ordering rows by frame number within each group.
///
/// Each group is handed to the aligner wholesale; a sequence is never
/// split across calls.
pub fn group_rows(rows: Vec<AnnotationRow>) -> Vec<(SequenceId, Vec<AnnotationRow>)> {
    let mut order: Vec<SequenceId> = Vec::new();
    let mut groups: HashMap<SequenceId, Vec<AnnotationRow>> = HashMap::new();

    for row in rows {
        if !groups.contains_key(&row.sequence_id) {
            order.push(row.sequence_id.clone());
        }
        groups.entry(row.sequence_id.clone()).or_default().push(row);
    }

    order
        .into_iter()
        .map(|id| {
            let mut rows = groups.remove(&id).unwrap_or_default();
            rows.sort_by_key(|r| r.frame_number);
            (id, rows)
        })
        .collect()
}

/// Sequence ids come from external data; keep artifact names filesystem-safe.
fn sanitize_artifact_name(sequence_id: &str) -> String {
    sequence_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gait_models::{AnnotationVideoMeta, BoundingBox};

    use crate::config::AlignerConfig;

    fn row(sequence: &str, frame_number: i64) -> AnnotationRow {
        AnnotationRow {
            sequence_id: SequenceId::from(sequence),
            frame_number,
            bounding_box: BoundingBox::new(10.0, 20.0, 100.0, 200.0),
            video_metadata: AnnotationVideoMeta {
                width: 1280,
                height: 720,
            },
            source_reference: None,
            gait_event: None,
            camera_view: None,
            gait_pattern_label: None,
            dataset_name: None,
        }
    }

    fn write_manifest(dir: &Path, rows: &[AnnotationRow]) -> PathBuf {
        let path = dir.join("dataset.jsonl");
        let lines: Vec<String> = rows
            .iter()
            .map(|r| serde_json::to_string(r).unwrap())
            .collect();
        std::fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    fn test_config(dir: &Path, dataset_path: PathBuf) -> PipelineConfig {
        PipelineConfig {
            dataset_path,
            video_cache_dir: dir.join("videos"),
            output_dir: dir.join("results"),
            max_sequence_parallel: 2,
            resume: true,
            aligner: AlignerConfig::default(),
        }
    }

    #[test]
    fn test_group_rows_preserves_order_and_sorts_frames() {
        let rows = vec![row("b", 3), row("a", 2), row("b", 1), row("a", 1)];
        let groups = group_rows(rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.as_str(), "b");
        assert_eq!(groups[1].0.as_str(), "a");
        let frame_numbers: Vec<i64> = groups[0].1.iter().map(|r| r.frame_number).collect();
        assert_eq!(frame_numbers, vec![1, 3]);
    }

    #[test]
    fn test_load_rows_skips_blank_lines_and_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");
        let good = serde_json::to_string(&row("s1", 1)).unwrap();
        std::fs::write(&path, format!("{}\n\n{}\n", good, good)).unwrap();
        assert_eq!(load_rows(&path).unwrap().len(), 2);

        std::fs::write(&path, format!("{}\nnot json\n", good)).unwrap();
        let err = load_rows(&path).unwrap_err();
        assert!(matches!(err, PipelineError::DatasetFailed(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_artifact_names_are_filesystem_safe() {
        assert_eq!(sanitize_artifact_name("trial/01 v2"), "trial_01_v2");
        assert_eq!(sanitize_artifact_name("plain-id_3.a"), "plain-id_3.a");
    }

    #[tokio::test]
    async fn test_placeholder_run_processes_and_then_resumes() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![row("s1", 1), row("s1", 2), row("s2", 1), row("s2", 2)];
        let dataset_path = write_manifest(dir.path(), &rows);
        let config = test_config(dir.path(), dataset_path);
        let orchestrator = DatasetOrchestrator::new(config.clone(), None);

        let report = orchestrator.run().await.unwrap();
        assert_eq!(report.sequences_total, 2);
        assert_eq!(report.sequences_processed, 2);
        assert_eq!(report.sequences_skipped, 0);
        assert_eq!(report.sequences_failed, 0);
        assert_eq!(report.frames_placeholder, 4);
        assert_eq!(report.frames_estimated, 0);
        assert!(config.output_dir.join("s1.json").exists());
        assert!(config.output_dir.join("s2.json").exists());
        assert!(config.output_dir.join("dataset_report.json").exists());

        // A second run resumes off the existing artifacts.
        let report = orchestrator.run().await.unwrap();
        assert_eq!(report.sequences_processed, 0);
        assert_eq!(report.sequences_skipped, 2);

        // Artifacts round-trip as SequenceResult.
        let artifact = std::fs::read_to_string(config.output_dir.join("s1.json")).unwrap();
        let result: SequenceResult = serde_json::from_str(&artifact).unwrap();
        assert_eq!(result.sequence_id.as_str(), "s1");
        assert_eq!(result.frames.len(), 2);
        assert_eq!(result.report.placeholder, 2);
    }
}
