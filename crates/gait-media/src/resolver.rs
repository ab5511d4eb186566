//! Cached video asset resolution.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::MediaResult;
use crate::probe::probe_video;
use crate::source_id::extract_source_id;

/// Container extensions the download subsystem writes, in lookup order.
const CACHED_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "webm"];

/// A cached video asset resolved from a source reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVideoAsset {
    /// The reference this asset was resolved from
    pub source_reference: String,
    /// Local path of the cached container file
    pub local_path: PathBuf,
    /// Decoded width in pixels, probed at resolve time
    pub pixel_width: u32,
    /// Decoded height in pixels, probed at resolve time
    pub pixel_height: u32,
}

/// Resolves source references to locally cached decoded-video assets.
///
/// Resolution must be deterministic for a given cache state and performs
/// no retries or downloads; a reference that is valid but not yet cached
/// resolves to `None` exactly like a reference that never will be.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    /// Resolve a source reference to a cached asset, if present.
    async fn resolve(&self, source_reference: &str) -> MediaResult<Option<ResolvedVideoAsset>>;
}

/// Filesystem-backed [`SourceResolver`] over the download cache directory.
#[derive(Debug, Clone)]
pub struct VideoSourceResolver {
    cache_dir: PathBuf,
}

impl VideoSourceResolver {
    /// Create a resolver over a cache directory.
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
        }
    }

    /// The cache directory this resolver looks assets up in.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}

#[async_trait]
impl SourceResolver for VideoSourceResolver {
    /// An asset that exists on disk but cannot be probed is treated as
    /// not cached; the caller's per-row fallback covers it.
    async fn resolve(&self, source_reference: &str) -> MediaResult<Option<ResolvedVideoAsset>> {
        let Some(source_id) = extract_source_id(source_reference) else {
            debug!(reference = source_reference, "No source id in reference");
            return Ok(None);
        };

        let Some(local_path) = find_cached_file(&self.cache_dir, &source_id) else {
            debug!(source_id = %source_id, "Source not in cache");
            return Ok(None);
        };

        match probe_video(&local_path).await {
            Ok(info) => Ok(Some(ResolvedVideoAsset {
                source_reference: source_reference.to_string(),
                local_path,
                pixel_width: info.width,
                pixel_height: info.height,
            })),
            Err(e) => {
                warn!(
                    source_id = %source_id,
                    path = %local_path.display(),
                    error = %e,
                    "Cached asset is unreadable, treating as unresolved"
                );
                Ok(None)
            }
        }
    }
}

/// Find a non-empty cached file for a source id across known extensions.
fn find_cached_file(cache_dir: &Path, source_id: &str) -> Option<PathBuf> {
    for ext in CACHED_VIDEO_EXTENSIONS {
        let candidate = cache_dir.join(format!("{}.{}", source_id, ext));
        if let Ok(meta) = std::fs::metadata(&candidate) {
            if meta.is_file() && meta.len() > 0 {
                return Some(candidate);
            }
        }
    }
    None
}
