//! Arbitrary-angle rotation
//!
//! Computes the axis-aligned bounding box of a rotated page and the
//! translation that centers the rotated content inside it.

use crate::error::LayoutError;
use crate::fit::ScaleMode;
use crate::geometry::{is_right_angle, normalize_degrees, Offset, Point, Rect, Size, SourcePage};
use crate::plan::{CompositionPlan, Placement, PlanKind, Sheet};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RotationResult {
    /// Angle normalized into [0, 360)
    pub angle: f64,
    pub bounding_size: Size,
    /// Translation applied after rotating about the source origin
    pub content_offset: Offset,
    /// True for quarter turns: the caller can set the page rotation flag
    /// instead of re-embedding the content.
    pub fast_path: bool,
}

/// Rotate `source` counter-clockwise by `angle_degrees`
pub fn rotate(source: Size, angle_degrees: f64) -> Result<RotationResult, LayoutError> {
    if !angle_degrees.is_finite() {
        return Err(LayoutError::InvalidAngle(angle_degrees));
    }
    source.validate()?;

    let angle = normalize_degrees(angle_degrees);

    if is_right_angle(angle) {
        let bounding_size = if angle == 90.0 || angle == 270.0 {
            source.swapped()
        } else {
            source
        };
        return Ok(RotationResult {
            angle,
            bounding_size,
            content_offset: Point::default(),
            fast_path: true,
        });
    }

    let (sin, cos) = angle.to_radians().sin_cos();
    let bounding_size = Size {
        width: source.width * cos.abs() + source.height * sin.abs(),
        height: source.width * sin.abs() + source.height * cos.abs(),
    };

    Ok(RotationResult {
        angle,
        bounding_size,
        content_offset: centering_offset(source, bounding_size, sin, cos),
        fast_path: false,
    })
}

/// Translation that moves `source`, rotated about its bottom-left corner,
/// back into its bounding box. Unlike [`RotationResult::content_offset`]
/// this is also meaningful for quarter turns, where it is exact.
pub fn content_offset(source: Size, angle_degrees: f64) -> Offset {
    let angle = normalize_degrees(angle_degrees);
    match angle {
        a if a == 0.0 => Point::default(),
        a if a == 90.0 => Point::new(source.height, 0.0),
        a if a == 180.0 => Point::new(source.width, source.height),
        a if a == 270.0 => Point::new(0.0, source.width),
        _ => {
            let (sin, cos) = angle.to_radians().sin_cos();
            let bounding_size = Size {
                width: source.width * cos.abs() + source.height * sin.abs(),
                height: source.width * sin.abs() + source.height * cos.abs(),
            };
            centering_offset(source, bounding_size, sin, cos)
        }
    }
}

fn centering_offset(source: Size, bounding: Size, sin: f64, cos: f64) -> Offset {
    // Center of the source after rotating about its bottom-left corner
    let rotated_center_x = source.width / 2.0 * cos - source.height / 2.0 * sin;
    let rotated_center_y = source.width / 2.0 * sin + source.height / 2.0 * cos;
    Point::new(
        bounding.width / 2.0 - rotated_center_x,
        bounding.height / 2.0 - rotated_center_y,
    )
}

/// Size a page occupies once its own rotation is applied
pub fn displayed_size(page: &SourcePage) -> Result<Size, LayoutError> {
    Ok(rotate(page.size, page.rotation)?.bounding_size)
}

/// Plan each page rotated by a further `angle_degrees`, on a sheet sized to
/// its new bounding box. Quarter turns keep the page's size class.
#[instrument(skip_all, fields(pages = pages.len(), angle = angle_degrees))]
pub fn rotate_pages(
    pages: &[SourcePage],
    angle_degrees: f64,
) -> Result<CompositionPlan, LayoutError> {
    if !angle_degrees.is_finite() {
        return Err(LayoutError::InvalidAngle(angle_degrees));
    }
    if pages.is_empty() {
        return Err(LayoutError::EmptyInput("No pages to rotate".into()));
    }

    let mut plan = CompositionPlan::new(PlanKind::Rotate);
    for page in pages {
        let turned = page.with_rotation(page.rotation + angle_degrees);
        let result = rotate(turned.size, turned.rotation)?;
        if !result.fast_path {
            debug!(page = page.id, angle = result.angle, "page needs re-embedding");
        }
        let mut sheet = Sheet::new(result.bounding_size);
        sheet.placements.push(Placement::fit_page(
            &turned,
            Rect::from_size(result.bounding_size),
            ScaleMode::Fit,
        )?);
        plan.sheets.push(sheet);
    }
    Ok(plan)
}

/// Map a point of the unrotated source into bounding-box coordinates
pub fn transform_point(source: Size, angle_degrees: f64, p: Point) -> Point {
    let (sin, cos) = normalize_degrees(angle_degrees).to_radians().sin_cos();
    let offset = content_offset(source, angle_degrees);
    Point::new(
        p.x * cos - p.y * sin + offset.x,
        p.x * sin + p.y * cos + offset.y,
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn corners(size: Size) -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(size.width, 0.0),
            Point::new(0.0, size.height),
            Point::new(size.width, size.height),
        ]
    }

    proptest! {
        /// Property: every rotated corner lands inside the bounding box
        #[test]
        fn rotated_content_is_never_clipped(
            w in 1.0f64..2000.0,
            h in 1.0f64..2000.0,
            angle in -720.0f64..720.0,
        ) {
            let source = Size { width: w, height: h };
            let r = rotate(source, angle).unwrap();
            let tolerance = 1e-6 * (w + h);
            if !r.fast_path {
                prop_assert_eq!(content_offset(source, angle), r.content_offset);
            }
            for corner in corners(source) {
                let p = transform_point(source, angle, corner);
                prop_assert!(p.x >= -tolerance && p.x <= r.bounding_size.width + tolerance);
                prop_assert!(p.y >= -tolerance && p.y <= r.bounding_size.height + tolerance);
            }
        }

        /// Property: off-axis rotation strictly grows the bounding area
        #[test]
        fn off_axis_rotation_grows_area(
            w in 1.0f64..2000.0,
            h in 1.0f64..2000.0,
            angle in 1.0f64..89.0,
            quarter in 0u8..4,
        ) {
            let source = Size { width: w, height: h };
            let r = rotate(source, angle + 90.0 * quarter as f64).unwrap();
            prop_assert!(!r.fast_path);
            prop_assert!(r.bounding_size.width * r.bounding_size.height > w * h);
        }

        /// Property: square sources grow on both axes off the right angles
        #[test]
        fn square_sources_grow_on_both_axes(side in 1.0f64..2000.0, angle in 1.0f64..89.0) {
            let r = rotate(Size { width: side, height: side }, angle).unwrap();
            prop_assert!(r.bounding_size.width > side);
            prop_assert!(r.bounding_size.height > side);
        }
    }
}
