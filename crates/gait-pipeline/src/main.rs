//! Gait dataset processing binary.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gait_pipeline::{DatasetOrchestrator, PipelineConfig};
use gait_pose::{PoseEstimationPort, RemotePoseEstimator};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("gait=info".parse().unwrap())
        .add_directive("hyper=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting gait-pipeline");

    let config = match PipelineConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Pipeline config: {:?}", config);

    // An absent POSE_SERVICE_URL means placeholder-only processing; a
    // present-but-broken configuration is a hard error, never a silent
    // downgrade.
    let estimator: Option<Arc<dyn PoseEstimationPort>> = match std::env::var("POSE_SERVICE_URL") {
        Ok(_) => match RemotePoseEstimator::from_env() {
            Ok(estimator) => {
                if !estimator.health_check().await.unwrap_or(false) {
                    warn!("Pose service health check failed, estimation calls may degrade");
                }
                Some(Arc::new(estimator))
            }
            Err(e) => {
                error!("Failed to construct pose estimator: {}", e);
                std::process::exit(1);
            }
        },
        Err(_) => {
            info!("POSE_SERVICE_URL not set, running in placeholder mode");
            None
        }
    };

    let orchestrator = DatasetOrchestrator::new(config, estimator);
    match orchestrator.run().await {
        Ok(report) => {
            info!(
                run_id = %report.run_id,
                processed = report.sequences_processed,
                skipped = report.sequences_skipped,
                failed = report.sequences_failed,
                frames_estimated = report.frames_estimated,
                frames_placeholder = report.frames_placeholder,
                "Dataset processing finished"
            );
        }
        Err(e) => {
            error!("Dataset processing failed: {}", e);
            std::process::exit(1);
        }
    }
}
