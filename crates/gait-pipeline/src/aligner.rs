//! Sequence pose alignment.
//!
//! Converts one sequence's annotation rows into pose-annotated frames,
//! reconciling annotation-space bounding boxes, 1-based frame numbers,
//! and the pixel space of whatever video the estimator actually decoded.
//! Whole-video estimation results are cached per `(path, model,
//! fingerprint)` for the duration of a single [`SequencePoseAligner::align`]
//! call, so a multi-minute video is batch-estimated once per sequence, not
//! once per annotated row.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use gait_media::{extract_frame, ResolvedVideoAsset, SourceResolver};
use gait_models::{
    AnnotationRow, FrameMetadata, Keypoint, KeypointOrigin, PoseAnnotatedFrame, SequenceId,
};
use gait_pose::{generate_keypoint_grid, PoseEstimationPort, VideoPose};

use crate::config::AlignerConfig;
use crate::error::PipelineResult;
use crate::logging::SequenceLogger;

/// Why a row received placeholder keypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderReason {
    /// No estimator configured for this run
    NoEstimator,
    /// The row carries no source reference
    MissingReference,
    /// The reference did not resolve to a cached asset
    UnresolvedSource,
    /// Real estimation was attempted and failed for this row
    EstimationFailed,
}

impl PlaceholderReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderReason::NoEstimator => "no_estimator",
            PlaceholderReason::MissingReference => "missing_reference",
            PlaceholderReason::UnresolvedSource => "unresolved_source",
            PlaceholderReason::EstimationFailed => "estimation_failed",
        }
    }
}

/// How one row's keypoints were produced.
///
/// Rows are never dropped: an unresolvable or failing row substitutes
/// placeholder keypoints and records why, so data-quality problems stay
/// visible in the output instead of silently shrinking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowOutcome {
    BatchEstimated,
    FrameEstimated,
    Placeholder { reason: PlaceholderReason },
}

/// Per-row audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    pub frame_number: i64,
    pub outcome: RowOutcome,
}

/// Audit summary for one aligned sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceReport {
    pub sequence_id: SequenceId,
    pub rows_total: usize,
    pub batch_estimated: usize,
    pub frame_estimated: usize,
    pub placeholder: usize,
    pub outcomes: Vec<RowRecord>,
}

/// Result of aligning one sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSequence {
    pub sequence_id: SequenceId,
    pub frames: Vec<PoseAnnotatedFrame>,
    pub report: SequenceReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    model: String,
    fingerprint: String,
}

enum CacheEntry {
    Ready(Arc<VideoPose>),
    Unavailable,
}

/// Per-call cache of whole-video estimation results.
///
/// Created at the start of one `align` call and dropped when it returns;
/// nothing is shared across sequences, so concurrent conversions need no
/// coordination.
#[derive(Default)]
struct VideoPoseCache {
    entries: HashMap<CacheKey, CacheEntry>,
}

/// Converts one sequence's annotation rows into pose-annotated frames.
pub struct SequencePoseAligner {
    config: AlignerConfig,
}

impl SequencePoseAligner {
    /// Create an aligner with the given configuration.
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }

    /// Align one sequence's rows, in input order.
    ///
    /// Produces exactly one output frame per input row. Only structurally
    /// invalid rows abort the call; every environment failure (missing
    /// cache entry, undecodable frame, estimator error) degrades to
    /// placeholder keypoints for the affected row.
    pub async fn align(
        &self,
        rows: &[AnnotationRow],
        estimator: Option<&dyn PoseEstimationPort>,
        resolver: &dyn SourceResolver,
    ) -> PipelineResult<AlignedSequence> {
        let sequence_id = rows
            .first()
            .map(|r| r.sequence_id.clone())
            .unwrap_or_else(|| SequenceId::from(""));
        let logger = SequenceLogger::new(&sequence_id, "pose_alignment");
        logger.log_start(&format!("{} rows", rows.len()));

        // Resolve each distinct reference once per sequence, not per row.
        let resolved = match estimator {
            Some(_) => self.resolve_references(rows, resolver, &logger).await,
            None => HashMap::new(),
        };

        let mut cache = VideoPoseCache::default();
        let mut frames = Vec::with_capacity(rows.len());
        let mut outcomes = Vec::with_capacity(rows.len());

        for row in rows {
            row.validate()?;

            let (keypoints, outcome) = match (estimator, row.source_reference()) {
                (None, _) => (
                    self.placeholder_keypoints(row),
                    RowOutcome::Placeholder {
                        reason: PlaceholderReason::NoEstimator,
                    },
                ),
                (Some(_), None) => (
                    self.placeholder_keypoints(row),
                    RowOutcome::Placeholder {
                        reason: PlaceholderReason::MissingReference,
                    },
                ),
                (Some(est), Some(reference)) => match resolved.get(reference) {
                    None => (
                        self.placeholder_keypoints(row),
                        RowOutcome::Placeholder {
                            reason: PlaceholderReason::UnresolvedSource,
                        },
                    ),
                    Some(asset) => match self.estimate_row(row, asset, est, &mut cache).await {
                        Ok((keypoints, origin)) => {
                            let outcome = match origin {
                                KeypointOrigin::BatchEstimated => RowOutcome::BatchEstimated,
                                _ => RowOutcome::FrameEstimated,
                            };
                            (keypoints, outcome)
                        }
                        Err(e) => {
                            logger.log_warning(&format!(
                                "estimation failed for frame {}: {}",
                                row.frame_number, e
                            ));
                            (
                                self.placeholder_keypoints(row),
                                RowOutcome::Placeholder {
                                    reason: PlaceholderReason::EstimationFailed,
                                },
                            )
                        }
                    },
                },
            };

            if let RowOutcome::Placeholder { reason } = outcome {
                counter!("gait_placeholder_frames_total", "reason" => reason.as_str())
                    .increment(1);
            }

            let origin = match outcome {
                RowOutcome::BatchEstimated => KeypointOrigin::BatchEstimated,
                RowOutcome::FrameEstimated => KeypointOrigin::FrameEstimated,
                RowOutcome::Placeholder { .. } => KeypointOrigin::Placeholder,
            };

            frames.push(self.assemble_frame(row, keypoints, origin));
            outcomes.push(RowRecord {
                frame_number: row.frame_number,
                outcome,
            });
        }

        let report = build_report(sequence_id.clone(), outcomes);
        logger.log_complete(&format!(
            "{} batch, {} single-frame, {} placeholder",
            report.batch_estimated, report.frame_estimated, report.placeholder
        ));

        Ok(AlignedSequence {
            sequence_id,
            frames,
            report,
        })
    }

    /// Resolve every distinct non-empty reference in the sequence.
    ///
    /// Resolution failures are recorded, not propagated; the affected
    /// rows take the placeholder path.
    async fn resolve_references(
        &self,
        rows: &[AnnotationRow],
        resolver: &dyn SourceResolver,
        logger: &SequenceLogger,
    ) -> HashMap<String, ResolvedVideoAsset> {
        let references: BTreeSet<&str> = rows.iter().filter_map(|r| r.source_reference()).collect();

        let mut resolved = HashMap::new();
        for reference in references {
            match resolver.resolve(reference).await {
                Ok(Some(asset)) => {
                    debug!(
                        reference,
                        path = %asset.local_path.display(),
                        "Resolved source reference"
                    );
                    resolved.insert(reference.to_string(), asset);
                }
                Ok(None) => {
                    counter!("gait_unresolved_sources_total").increment(1);
                    logger.log_warning(&format!("source not in cache: {}", reference));
                }
                Err(e) => {
                    counter!("gait_unresolved_sources_total").increment(1);
                    logger.log_warning(&format!("resolution failed for {}: {}", reference, e));
                }
            }
        }
        resolved
    }

    /// Real-estimation attempt for one row: batch cache hit, else
    /// single-frame decode and image estimation.
    async fn estimate_row(
        &self,
        row: &AnnotationRow,
        asset: &ResolvedVideoAsset,
        estimator: &dyn PoseEstimationPort,
        cache: &mut VideoPoseCache,
    ) -> PipelineResult<(Vec<Keypoint>, KeypointOrigin)> {
        let frame_index = row.decode_index();

        if let Some(batch) = self.batch_pose(cache, asset, estimator).await {
            if frame_index >= 0 && (frame_index as usize) < batch.frames.len() {
                let keypoints = batch.frames[frame_index as usize]
                    .iter()
                    .map(|k| k.with_source_dims(batch.pixel_width, batch.pixel_height))
                    .collect();
                return Ok((keypoints, KeypointOrigin::BatchEstimated));
            }
            debug!(
                frame_index,
                batch_frames = batch.frames.len(),
                "Frame index outside batch result, decoding single frame"
            );
        }

        // Per-frame fallback: decode exactly this frame into a fresh temp
        // dir, then estimate on the image with the bbox rescaled from
        // annotation space to the asset's decoded space for crop assist.
        let temp_dir = tempfile::tempdir()?;
        let frame_path = extract_frame(&asset.local_path, frame_index, temp_dir.path()).await?;

        let roi = row.bounding_box.rescale(
            row.video_metadata.width as f64,
            row.video_metadata.height as f64,
            asset.pixel_width as f64,
            asset.pixel_height as f64,
        );

        let pose = estimator
            .estimate_image_keypoints(&frame_path, &self.config.pose_model, Some(&roi))
            .await?;

        let keypoints = pose
            .keypoints
            .iter()
            .map(|k| k.with_source_dims(pose.pixel_width, pose.pixel_height))
            .collect();
        Ok((keypoints, KeypointOrigin::FrameEstimated))
    }

    /// Whole-video estimation result for an asset, computed at most once
    /// per cache key per `align` call.
    async fn batch_pose(
        &self,
        cache: &mut VideoPoseCache,
        asset: &ResolvedVideoAsset,
        estimator: &dyn PoseEstimationPort,
    ) -> Option<Arc<VideoPose>> {
        let key = CacheKey {
            path: asset.local_path.clone(),
            model: self.config.pose_model.clone(),
            fingerprint: estimator.cache_fingerprint(),
        };

        if let Some(entry) = cache.entries.get(&key) {
            return match entry {
                CacheEntry::Ready(pose) => Some(pose.clone()),
                CacheEntry::Unavailable => None,
            };
        }

        let entry = if estimator.supports_batch_video() {
            match estimator
                .estimate_video_keypoints(&asset.local_path, &self.config.pose_model)
                .await
            {
                Ok(pose) => {
                    counter!("gait_batch_estimations_total").increment(1);
                    debug!(
                        path = %asset.local_path.display(),
                        frames = pose.frames.len(),
                        "Cached whole-video pose result"
                    );
                    CacheEntry::Ready(Arc::new(pose))
                }
                Err(e) => {
                    warn!(
                        path = %asset.local_path.display(),
                        error = %e,
                        "Batch estimation failed, rows fall back to single-frame"
                    );
                    CacheEntry::Unavailable
                }
            }
        } else {
            CacheEntry::Unavailable
        };

        let result = match &entry {
            CacheEntry::Ready(pose) => Some(pose.clone()),
            CacheEntry::Unavailable => None,
        };
        cache.entries.insert(key, entry);
        result
    }

    /// Placeholder grid anchored on the row's bbox center, stamped with
    /// the annotation-space dimensions the bbox lives in.
    fn placeholder_keypoints(&self, row: &AnnotationRow) -> Vec<Keypoint> {
        let (cx, cy) = row.bounding_box.center();
        generate_keypoint_grid(
            cx,
            cy,
            self.config.keypoint_count,
            self.config.grid_spacing,
            self.config.placeholder_confidence,
        )
        .into_iter()
        .map(|k| k.with_source_dims(row.video_metadata.width, row.video_metadata.height))
        .collect()
    }

    fn assemble_frame(
        &self,
        row: &AnnotationRow,
        keypoints: Vec<Keypoint>,
        origin: KeypointOrigin,
    ) -> PoseAnnotatedFrame {
        let metadata = self.config.include_metadata.then(|| FrameMetadata {
            sequence_id: row.sequence_id.clone(),
            gait_event: row.gait_event.clone(),
            camera_view: row.camera_view.clone(),
            bounding_box: row.bounding_box,
            source_reference: row.source_reference.clone(),
        });

        PoseAnnotatedFrame {
            frame_number: row.frame_number,
            person_id: self.config.person_id,
            origin,
            keypoints,
            metadata,
        }
    }
}

fn build_report(sequence_id: SequenceId, outcomes: Vec<RowRecord>) -> SequenceReport {
    let batch_estimated = outcomes
        .iter()
        .filter(|r| r.outcome == RowOutcome::BatchEstimated)
        .count();
    let frame_estimated = outcomes
        .iter()
        .filter(|r| r.outcome == RowOutcome::FrameEstimated)
        .count();
    let placeholder = outcomes
        .iter()
        .filter(|r| matches!(r.outcome, RowOutcome::Placeholder { .. }))
        .count();

    SequenceReport {
        sequence_id,
        rows_total: outcomes.len(),
        batch_estimated,
        frame_estimated,
        placeholder,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use gait_media::MediaResult;
    use gait_models::{AnnotationVideoMeta, BoundingBox};
    use gait_pose::{ImagePose, PoseError, PoseResult};

    use crate::error::PipelineError;

    fn row(sequence: &str, frame_number: i64, reference: Option<&str>) -> AnnotationRow {
        AnnotationRow {
            sequence_id: SequenceId::from(sequence),
            frame_number,
            bounding_box: BoundingBox::new(156.0, 125.0, 228.0, 497.0),
            video_metadata: AnnotationVideoMeta {
                width: 1280,
                height: 720,
            },
            source_reference: reference.map(str::to_string),
            gait_event: None,
            camera_view: None,
            gait_pattern_label: None,
            dataset_name: None,
        }
    }

    struct FakeResolver {
        assets: HashMap<String, ResolvedVideoAsset>,
        calls: AtomicUsize,
    }

    impl FakeResolver {
        fn empty() -> Self {
            Self {
                assets: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_asset(reference: &str) -> Self {
            let mut assets = HashMap::new();
            assets.insert(
                reference.to_string(),
                ResolvedVideoAsset {
                    source_reference: reference.to_string(),
                    local_path: PathBuf::from("/fake/cache/video.mp4"),
                    pixel_width: 1920,
                    pixel_height: 1080,
                },
            );
            Self {
                assets,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SourceResolver for FakeResolver {
        async fn resolve(&self, reference: &str) -> MediaResult<Option<ResolvedVideoAsset>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.assets.get(reference).cloned())
        }
    }

    struct SpyEstimator {
        batch_calls: AtomicUsize,
        image_calls: AtomicUsize,
        supports_batch: bool,
        batch_frames: usize,
    }

    impl SpyEstimator {
        fn new(supports_batch: bool, batch_frames: usize) -> Self {
            Self {
                batch_calls: AtomicUsize::new(0),
                image_calls: AtomicUsize::new(0),
                supports_batch,
                batch_frames,
            }
        }
    }

    #[async_trait]
    impl PoseEstimationPort for SpyEstimator {
        async fn estimate_image_keypoints(
            &self,
            _image_path: &Path,
            _model: &str,
            _bbox: Option<&BoundingBox>,
        ) -> PoseResult<ImagePose> {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
            Ok(ImagePose {
                keypoints: vec![Keypoint::new(1.0, 2.0, 0.9); 25],
                pixel_width: 1920,
                pixel_height: 1080,
            })
        }

        async fn estimate_video_keypoints(
            &self,
            _video_path: &Path,
            _model: &str,
        ) -> PoseResult<VideoPose> {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            if self.batch_frames == 0 {
                return Err(PoseError::AssetUnreadable("no frames".to_string()));
            }
            // Each frame's first keypoint encodes its decode index so
            // tests can verify which entry a row consumed.
            let frames = (0..self.batch_frames)
                .map(|i| vec![Keypoint::new(i as f64, 0.0, 0.9); 25])
                .collect();
            Ok(VideoPose {
                frames,
                pixel_width: 1920,
                pixel_height: 1080,
            })
        }

        fn cache_fingerprint(&self) -> String {
            "spy:v1".to_string()
        }

        fn supports_batch_video(&self) -> bool {
            self.supports_batch
        }

        fn name(&self) -> &'static str {
            "spy"
        }
    }

    fn aligner() -> SequencePoseAligner {
        SequencePoseAligner::new(AlignerConfig::default())
    }

    #[tokio::test]
    async fn test_no_estimator_yields_placeholder_grid_per_row() {
        let rows = vec![row("s1", 1757, Some("https://youtu.be/dQw4w9WgXcQ"))];
        let resolver = FakeResolver::empty();

        let aligned = aligner().align(&rows, None, &resolver).await.unwrap();

        assert_eq!(aligned.frames.len(), 1);
        let frame = &aligned.frames[0];
        assert_eq!(frame.frame_number, 1757);
        assert_eq!(frame.person_id, 0);
        assert_eq!(frame.origin, KeypointOrigin::Placeholder);
        assert_eq!(frame.keypoints.len(), 25);
        // 5x5 grid centered on the bbox center (270, 373.5).
        assert_eq!(frame.keypoints[12].x, 270.0);
        assert_eq!(frame.keypoints[12].y, 373.5);
        assert_eq!(frame.keypoints[12].source_pixel_width, 1280);
        assert_eq!(frame.keypoints[12].source_pixel_height, 720);
        // No estimator means no resolution pass at all.
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            aligned.report.outcomes[0].outcome,
            RowOutcome::Placeholder {
                reason: PlaceholderReason::NoEstimator
            }
        );
    }

    #[tokio::test]
    async fn test_single_batch_estimation_for_many_rows_of_one_video() {
        let reference = "https://youtu.be/dQw4w9WgXcQ";
        let rows: Vec<AnnotationRow> = (1..=50).map(|n| row("s1", n, Some(reference))).collect();
        let resolver = FakeResolver::with_asset(reference);
        let estimator = SpyEstimator::new(true, 100);

        let aligned = aligner()
            .align(&rows, Some(&estimator), &resolver)
            .await
            .unwrap();

        assert_eq!(estimator.batch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(estimator.image_calls.load(Ordering::SeqCst), 0);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(aligned.frames.len(), 50);
        assert!(aligned
            .frames
            .iter()
            .all(|f| f.origin == KeypointOrigin::BatchEstimated));
        assert_eq!(aligned.report.batch_estimated, 50);
    }

    #[tokio::test]
    async fn test_rows_consume_zero_based_decode_indices() {
        let reference = "https://youtu.be/dQw4w9WgXcQ";
        let rows = vec![
            row("s1", 1, Some(reference)),
            row("s1", 1757, Some(reference)),
        ];
        let resolver = FakeResolver::with_asset(reference);
        let estimator = SpyEstimator::new(true, 2000);

        let aligned = aligner()
            .align(&rows, Some(&estimator), &resolver)
            .await
            .unwrap();

        // The spy encodes the decode index in each frame's keypoint x.
        assert_eq!(aligned.frames[0].keypoints[0].x, 0.0);
        assert_eq!(aligned.frames[1].keypoints[0].x, 1756.0);
        // Output frame numbers stay 1-based and unmodified.
        assert_eq!(aligned.frames[0].frame_number, 1);
        assert_eq!(aligned.frames[1].frame_number, 1757);
        // Batch dimensions are stamped onto every consumed keypoint.
        assert_eq!(aligned.frames[1].keypoints[0].source_pixel_width, 1920);
        assert_eq!(aligned.frames[1].keypoints[0].source_pixel_height, 1080);
    }

    #[tokio::test]
    async fn test_row_failure_is_isolated_to_that_row() {
        let reference = "https://youtu.be/dQw4w9WgXcQ";
        let mut rows: Vec<AnnotationRow> = (1..=10).map(|n| row("s1", n, Some(reference))).collect();
        // Row 5 points far past the batch result; its single-frame decode
        // fails because the fake asset path does not exist.
        rows[4].frame_number = 9999;
        let resolver = FakeResolver::with_asset(reference);
        let estimator = SpyEstimator::new(true, 100);

        let aligned = aligner()
            .align(&rows, Some(&estimator), &resolver)
            .await
            .unwrap();

        assert_eq!(aligned.frames.len(), 10);
        for (i, frame) in aligned.frames.iter().enumerate() {
            if i == 4 {
                assert_eq!(frame.origin, KeypointOrigin::Placeholder);
                assert_eq!(frame.keypoints.len(), 25);
            } else {
                assert_eq!(frame.origin, KeypointOrigin::BatchEstimated);
            }
        }
        assert_eq!(
            aligned.report.outcomes[4].outcome,
            RowOutcome::Placeholder {
                reason: PlaceholderReason::EstimationFailed
            }
        );
        assert_eq!(aligned.report.batch_estimated, 9);
        assert_eq!(aligned.report.placeholder, 1);
    }

    #[tokio::test]
    async fn test_empty_references_never_drop_rows() {
        let rows: Vec<AnnotationRow> = (1..=5).map(|n| row("s1", n, None)).collect();
        let resolver = FakeResolver::empty();
        let estimator = SpyEstimator::new(true, 100);

        let aligned = aligner()
            .align(&rows, Some(&estimator), &resolver)
            .await
            .unwrap();

        assert_eq!(aligned.frames.len(), 5);
        assert!(aligned.report.outcomes.iter().all(|r| r.outcome
            == RowOutcome::Placeholder {
                reason: PlaceholderReason::MissingReference
            }));
        assert_eq!(estimator.batch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unresolved_source_substitutes_placeholder() {
        let rows = vec![row("s1", 3, Some("https://youtu.be/dQw4w9WgXcQ"))];
        let resolver = FakeResolver::empty();
        let estimator = SpyEstimator::new(true, 100);

        let aligned = aligner()
            .align(&rows, Some(&estimator), &resolver)
            .await
            .unwrap();

        assert_eq!(aligned.frames.len(), 1);
        assert_eq!(
            aligned.report.outcomes[0].outcome,
            RowOutcome::Placeholder {
                reason: PlaceholderReason::UnresolvedSource
            }
        );
    }

    #[tokio::test]
    async fn test_batch_failure_marks_video_unavailable_without_retry() {
        let reference = "https://youtu.be/dQw4w9WgXcQ";
        let rows: Vec<AnnotationRow> = (1..=3).map(|n| row("s1", n, Some(reference))).collect();
        let resolver = FakeResolver::with_asset(reference);
        // Batch call errors; fallback decode also fails on the fake path,
        // so every row degrades to placeholder.
        let estimator = SpyEstimator::new(true, 0);

        let aligned = aligner()
            .align(&rows, Some(&estimator), &resolver)
            .await
            .unwrap();

        // The failed batch is cached as unavailable, not retried per row.
        assert_eq!(estimator.batch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(aligned.frames.len(), 3);
        assert!(aligned
            .frames
            .iter()
            .all(|f| f.origin == KeypointOrigin::Placeholder));
    }

    #[tokio::test]
    async fn test_invalid_bbox_propagates() {
        let mut bad = row("s1", 1, None);
        bad.bounding_box = BoundingBox::new(0.0, 0.0, 0.0, 0.0);
        let resolver = FakeResolver::empty();

        let err = aligner().align(&[bad], None, &resolver).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_metadata_echo_when_requested() {
        let mut config = AlignerConfig::default();
        config.include_metadata = true;
        let aligner = SequencePoseAligner::new(config);

        let mut r = row("s1", 7, None);
        r.gait_event = Some("heel_strike".to_string());
        let resolver = FakeResolver::empty();

        let aligned = aligner.align(&[r], None, &resolver).await.unwrap();
        let metadata = aligned.frames[0].metadata.as_ref().unwrap();
        assert_eq!(metadata.sequence_id.as_str(), "s1");
        assert_eq!(metadata.gait_event.as_deref(), Some("heel_strike"));
        assert_eq!(metadata.bounding_box.left, 156.0);
    }
}
