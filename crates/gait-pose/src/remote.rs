//! HTTP client implementation of the pose-estimation port.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use gait_models::{BoundingBox, Keypoint};

use crate::error::{PoseError, PoseResult};
use crate::port::{ImagePose, PoseEstimationPort, VideoPose};
use crate::types::{
    HealthResponse, ImageEstimateRequest, ImageEstimateResponse, VideoEstimateRequest,
    VideoEstimateResponse, WireLandmark,
};

/// Configuration for the remote pose estimator.
///
/// Construction failure is a typed error; there is no silent fallback to
/// an unconfigured estimator. Callers that want placeholder-only
/// processing simply do not construct one.
#[derive(Debug, Clone)]
pub struct RemotePoseConfig {
    /// Base URL of the pose service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries for retryable failures
    pub max_retries: u32,
    /// Minimum landmark confidence applied by the service
    pub min_confidence: f64,
}

impl Default for RemotePoseConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(600), // whole-video estimation is slow
            max_retries: 2,
            min_confidence: 0.5,
        }
    }
}

impl RemotePoseConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("POSE_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("POSE_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            max_retries: std::env::var("POSE_SERVICE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            min_confidence: std::env::var("POSE_MIN_CONFIDENCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.5),
        }
    }
}

/// Client for the external pose-estimation service.
#[derive(Debug)]
pub struct RemotePoseEstimator {
    http: Client,
    config: RemotePoseConfig,
}

impl RemotePoseEstimator {
    /// Create a new estimator client.
    pub fn new(config: RemotePoseConfig) -> PoseResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(PoseError::config("base_url is empty"));
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PoseError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> PoseResult<Self> {
        Self::new(RemotePoseConfig::from_env())
    }

    /// Check whether the pose service is reachable and healthy.
    pub async fn health_check(&self) -> PoseResult<bool> {
        let url = format!("{}/health", self.config.base_url);
        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                debug!(status = %health.status, "Pose service healthy");
                Ok(health.status == "ok")
            }
            Ok(response) => {
                warn!(status = %response.status(), "Pose service unhealthy");
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "Pose service unreachable");
                Ok(false)
            }
        }
    }

    async fn post_with_retry<Req, Resp>(&self, endpoint: &str, request: &Req) -> PoseResult<Resp>
    where
        Req: serde::Serialize,
        Resp: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let mut last_err = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                debug!(endpoint, attempt, "Retrying pose service request");
            }
            match self.post_once(&url, request).await {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    warn!(endpoint, error = %e, "Retryable pose service failure");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err
            .unwrap_or_else(|| PoseError::RequestFailed(format!("{} exhausted retries", endpoint))))
    }

    async fn post_once<Req, Resp>(&self, url: &str, request: &Req) -> PoseResult<Resp>
    where
        Req: serde::Serialize,
        Resp: serde::de::DeserializeOwned,
    {
        let response = self.http.post(url).json(request).send().await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body = response.text().await.unwrap_or_default();
                Err(PoseError::AssetUnreadable(body))
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                Err(PoseError::ServiceUnavailable(url.to_string()))
            }
            status => Err(PoseError::RequestFailed(format!(
                "{} returned {}",
                url, status
            ))),
        }
    }
}

/// Denormalize service landmarks to pixel-space keypoints.
///
/// The port contract requires pixel coordinates relative to the echoed
/// dimensions; normalization is this implementation's internal concern.
fn denormalize(landmarks: &[WireLandmark], width: u32, height: u32) -> Vec<Keypoint> {
    landmarks
        .iter()
        .map(|lm| {
            Keypoint::new(
                lm.x * width as f64,
                lm.y * height as f64,
                lm.visibility.clamp(0.0, 1.0),
            )
        })
        .collect()
}

#[async_trait]
impl PoseEstimationPort for RemotePoseEstimator {
    async fn estimate_image_keypoints(
        &self,
        image_path: &Path,
        model: &str,
        bbox: Option<&BoundingBox>,
    ) -> PoseResult<ImagePose> {
        let request = ImageEstimateRequest {
            image_path: image_path.to_string_lossy().into_owned(),
            model: model.to_string(),
            bounding_box: bbox.copied(),
            min_confidence: self.config.min_confidence,
        };
        let response: ImageEstimateResponse =
            self.post_with_retry("/estimate/image", &request).await?;

        if response.pixel_width == 0 || response.pixel_height == 0 {
            return Err(PoseError::InvalidResponse(
                "service echoed zero pixel dimensions".to_string(),
            ));
        }

        Ok(ImagePose {
            keypoints: denormalize(
                &response.landmarks,
                response.pixel_width,
                response.pixel_height,
            ),
            pixel_width: response.pixel_width,
            pixel_height: response.pixel_height,
        })
    }

    async fn estimate_video_keypoints(
        &self,
        video_path: &Path,
        model: &str,
    ) -> PoseResult<VideoPose> {
        let request = VideoEstimateRequest {
            video_path: video_path.to_string_lossy().into_owned(),
            model: model.to_string(),
            min_confidence: self.config.min_confidence,
        };
        let response: VideoEstimateResponse =
            self.post_with_retry("/estimate/video", &request).await?;

        if response.pixel_width == 0 || response.pixel_height == 0 {
            return Err(PoseError::InvalidResponse(
                "service echoed zero pixel dimensions".to_string(),
            ));
        }

        let (width, height) = (response.pixel_width, response.pixel_height);
        Ok(VideoPose {
            frames: response
                .frames
                .iter()
                .map(|frame| denormalize(frame, width, height))
                .collect(),
            pixel_width: width,
            pixel_height: height,
        })
    }

    fn cache_fingerprint(&self) -> String {
        format!(
            "remote:{}@minconf={:.2}",
            self.config.base_url.trim_end_matches('/'),
            self.config.min_confidence
        )
    }

    fn supports_batch_video(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "remote-pose-service"
    }
}
