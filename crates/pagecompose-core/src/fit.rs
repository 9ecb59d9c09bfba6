//! Fit/fill scaling
//!
//! Maps a source size into a target size under "contain" (Fit) or
//! "cover" (Fill) policy and centers the result.

use crate::error::LayoutError;
use crate::geometry::{Offset, Point, Rect, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Content fully contained, may leave empty space
    #[default]
    Fit,
    /// Content fully covers the target, may overflow
    Fill,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FitResult {
    pub scale: f64,
    /// Position of the scaled content relative to the target's origin.
    /// Negative under Fill when content overflows.
    pub offset: Offset,
    /// Source size after scaling
    pub scaled: Size,
}

impl FitResult {
    /// Rect occupied by the scaled content when the target sits at `origin`
    pub fn placed_rect(&self, origin: Point) -> Rect {
        Rect::new(
            origin.x + self.offset.x,
            origin.y + self.offset.y,
            self.scaled.width,
            self.scaled.height,
        )
    }
}

/// Compute the scale factor and centering offset mapping `source` into `target`
pub fn scale_to_fit(source: Size, target: Size, mode: ScaleMode) -> Result<FitResult, LayoutError> {
    source.validate()?;
    target.validate()?;

    let sx = target.width / source.width;
    let sy = target.height / source.height;
    let scale = match mode {
        ScaleMode::Fit => sx.min(sy),
        ScaleMode::Fill => sx.max(sy),
    };

    let scaled = source.scaled(scale);
    let offset = Point::new(
        (target.width - scaled.width) / 2.0,
        (target.height - scaled.height) / 2.0,
    );

    Ok(FitResult {
        scale,
        offset,
        scaled,
    })
}
