//! Cached video asset resolution and frame extraction.
//!
//! This crate provides the consumption side of the video cache:
//! - Resolving a source reference (video URL) to a locally cached asset
//! - FFprobe-based stream probing
//! - Single-frame extraction via the FFmpeg CLI
//!
//! Downloading and populating the cache is a separate subsystem; this
//! crate only looks assets up.

pub mod error;
pub mod frame;
pub mod probe;
pub mod resolver;
pub mod source_id;

pub use error::{MediaError, MediaResult};
pub use frame::extract_frame;
pub use probe::{probe_video, VideoStreamInfo};
pub use resolver::{ResolvedVideoAsset, SourceResolver, VideoSourceResolver};
pub use source_id::extract_source_id;
