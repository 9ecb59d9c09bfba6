//! Geometry primitives shared by every layout component
//!
//! All lengths are in PDF points (1/72 inch). Canvas coordinates put the
//! origin at the bottom-left corner with y increasing upward.

use crate::error::LayoutError;
use serde::{Deserialize, Serialize};

/// Angles closer than this to a right angle are treated as exact.
pub const ANGLE_EPSILON: f64 = 1e-9;

pub type PageId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a size, rejecting zero, negative and non-finite dimensions
    pub fn new(width: f64, height: f64) -> Result<Self, LayoutError> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(LayoutError::InvalidGeometry(format!(
                "Dimensions must be finite, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "Dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn swapped(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn orientation(&self) -> PageOrientation {
        if (self.width - self.height).abs() < 1.0 {
            PageOrientation::Square
        } else if self.width > self.height {
            PageOrientation::Landscape
        } else {
            PageOrientation::Portrait
        }
    }

    /// Re-orient so the longer side runs along the requested axis.
    /// Square sizes are returned unchanged.
    pub fn with_orientation(&self, orientation: PageOrientation) -> Self {
        match orientation {
            PageOrientation::Portrait if self.width > self.height => self.swapped(),
            PageOrientation::Landscape if self.height > self.width => self.swapped(),
            _ => *self,
        }
    }

    /// US Letter, portrait
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
        }
    }

    /// A4, portrait
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PageOrientation {
    Portrait,
    Landscape,
    Square,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Translation applied to content before it is drawn
pub type Offset = Point;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether `other` lies entirely inside this rect, within `tolerance`
    pub fn contains_rect(&self, other: &Rect, tolerance: f64) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.top() <= self.top() + tolerance
    }

    /// Smallest rect enclosing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.top().max(other.top()) - y,
        )
    }
}

/// A page owned by an external document. The engine only reads it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SourcePage {
    pub id: PageId,
    pub size: Size,
    /// Current page rotation in degrees, counter-clockwise
    #[serde(default)]
    pub rotation: f64,
}

impl SourcePage {
    pub fn new(id: PageId, size: Size) -> Self {
        Self {
            id,
            size,
            rotation: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Normalize an angle into [0, 360), snapping values within
/// [`ANGLE_EPSILON`] of a right angle onto it.
pub fn normalize_degrees(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    let nearest = (normalized / 90.0).round() * 90.0;
    if (normalized - nearest).abs() < ANGLE_EPSILON {
        nearest % 360.0
    } else {
        normalized
    }
}

pub fn is_right_angle(normalized: f64) -> bool {
    normalized % 90.0 == 0.0
}
