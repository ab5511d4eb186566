//! Bounding-box geometry and coordinate-space rescaling.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Bounding box in pixel coordinates of some annotation or video space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    /// Left edge x-coordinate
    pub left: f64,
    /// Top edge y-coordinate
    pub top: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Center x-coordinate.
    #[inline]
    pub fn cx(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Center y-coordinate.
    #[inline]
    pub fn cy(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.cx(), self.cy())
    }

    /// Box area in pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Validate that the box is usable as a region of interest.
    ///
    /// A degenerate box (non-finite coordinates or non-positive
    /// dimensions) is a structural input error, not an environment
    /// failure, so it surfaces as [`ModelError::InvalidInput`].
    pub fn validate(&self) -> ModelResult<()> {
        let finite = self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        if !finite {
            return Err(ModelError::invalid_input(format!(
                "bounding box has non-finite fields: {:?}",
                self
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ModelError::invalid_input(format!(
                "bounding box has empty extent: {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Rescale between two coordinate frames given their pixel dimensions.
    ///
    /// Returns `self` unchanged when both dimensions already match, so a
    /// same-resolution round trip introduces no floating drift. A zero
    /// source dimension is treated as scale factor 1.0.
    pub fn rescale(&self, from_w: f64, from_h: f64, to_w: f64, to_h: f64) -> BoundingBox {
        if from_w == to_w && from_h == to_h {
            return *self;
        }
        let sx = if from_w > 0.0 { to_w / from_w } else { 1.0 };
        let sy = if from_h > 0.0 { to_h / from_h } else { 1.0 };
        BoundingBox {
            left: self.left * sx,
            top: self.top * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }
}
