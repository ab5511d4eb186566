//! Annotation dataset models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bbox::BoundingBox;
use crate::error::{ModelError, ModelResult};

/// Identifier grouping annotated frames into one physical gait trial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SequenceId(pub String);

impl SequenceId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SequenceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SequenceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Annotation-space resolution the bounding boxes were authored in.
///
/// May differ from the actual decoded video resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationVideoMeta {
    /// Annotation-space width in pixels
    pub width: u32,
    /// Annotation-space height in pixels
    pub height: u32,
}

/// A single structured annotation record.
///
/// Rows are produced by parsing a dataset manifest, immutable thereafter,
/// and consumed once per pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationRow {
    /// Groups rows into one gait trial
    pub sequence_id: SequenceId,

    /// 1-based position of the annotated frame within the full source video
    pub frame_number: i64,

    /// Region of interest in annotation-space coordinates
    pub bounding_box: BoundingBox,

    /// Annotation-space resolution
    pub video_metadata: AnnotationVideoMeta,

    /// Source video reference (e.g. a video URL); may be absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_reference: Option<String>,

    /// Passthrough metadata, not used in alignment logic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gait_event: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_view: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gait_pattern_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
}

impl AnnotationRow {
    /// The source reference, trimmed, with empty strings treated as absent.
    pub fn source_reference(&self) -> Option<&str> {
        self.source_reference
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// 0-based decode index for this row's 1-based frame number.
    ///
    /// Inputs below 1 pass through unchanged rather than going negative
    /// past the annotation convention; bounds checks happen against the
    /// decoded frame list at the consumption site.
    pub fn decode_index(&self) -> i64 {
        if self.frame_number >= 1 {
            self.frame_number - 1
        } else {
            self.frame_number
        }
    }

    /// Validate structural invariants of the row.
    pub fn validate(&self) -> ModelResult<()> {
        self.bounding_box.validate()?;
        if self.sequence_id.as_str().is_empty() {
            return Err(ModelError::invalid_input("row has empty sequence_id"));
        }
        Ok(())
    }
}
