//! Single-frame extraction via the FFmpeg CLI.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Extract one frame from a video by 0-based decode index.
///
/// Writes `frame_{index}.png` into `out_dir` and returns its path. The
/// caller owns `out_dir` and should use a fresh temporary directory per
/// extraction so concurrent conversions never collide.
///
/// Fails with [`MediaError::FrameOutOfRange`] when FFmpeg decodes the
/// whole stream without reaching the requested index.
pub async fn extract_frame(
    video_path: impl AsRef<Path>,
    frame_index: i64,
    out_dir: impl AsRef<Path>,
) -> MediaResult<PathBuf> {
    let video_path = video_path.as_ref();
    let out_dir = out_dir.as_ref();

    if !video_path.exists() {
        return Err(MediaError::FileNotFound(video_path.to_path_buf()));
    }
    if frame_index < 0 {
        return Err(MediaError::FrameOutOfRange {
            path: video_path.to_path_buf(),
            index: frame_index,
        });
    }

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    let output_path = out_dir.join(format!("frame_{}.png", frame_index));
    let select_filter = format!("select=eq(n\\,{})", frame_index);

    debug!(
        video = %video_path.display(),
        frame_index,
        "Extracting single frame"
    );

    let output = Command::new("ffmpeg")
        .arg("-y")
        .args(["-loglevel", "error"])
        .arg("-i")
        .arg(video_path)
        .args(["-vf", &select_filter])
        .args(["-vsync", "0"])
        .args(["-frames:v", "1"])
        .arg(&output_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::ffmpeg_failed(
            format!(
                "frame extraction failed for {} at index {}",
                video_path.display(),
                frame_index
            ),
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
            output.status.code(),
        ));
    }

    // FFmpeg exits 0 even when the select filter matched nothing.
    match std::fs::metadata(&output_path) {
        Ok(meta) if meta.len() > 0 => Ok(output_path),
        _ => Err(MediaError::FrameOutOfRange {
            path: video_path.to_path_buf(),
            index: frame_index,
        }),
    }
}
