//! Posterize: split one page into a grid of overlapping tiles
//!
//! Regions are measured in the pixel space of the rendered page (origin
//! top-left, y down), since that is what the caller crops from. Each tile
//! becomes its own output sheet.

use crate::error::LayoutError;
use crate::fit::{scale_to_fit, ScaleMode};
use crate::geometry::{Point, Rect, Size, SourcePage};
use crate::grid::GridSpec;
use crate::plan::{CompositionPlan, Placement, PlanKind, Sheet, SourceRegion};
use crate::rotate::displayed_size;
use tracing::{debug, instrument};

/// One tile's sampled region before it is placed on a sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRegion {
    pub row: u32,
    pub col: u32,
    pub region: Rect,
}

/// Compute the sampled regions of a `rendered` image split by `grid`.
///
/// Interior edges are widened by `overlap` so printed tiles can be trimmed
/// and rejoined without a gap; the outer border of the page gets none.
pub fn tile_regions(
    rendered: Size,
    grid: &GridSpec,
    overlap: f64,
) -> Result<Vec<TileRegion>, LayoutError> {
    grid.validate()?;
    rendered.validate()?;
    if !(overlap.is_finite() && overlap >= 0.0) {
        return Err(LayoutError::InvalidOverlap(overlap));
    }

    let tile_width = rendered.width / grid.cols as f64;
    let tile_height = rendered.height / grid.rows as f64;
    if overlap >= tile_width || overlap >= tile_height {
        return Err(LayoutError::OverlapTooLarge {
            overlap,
            tile_width,
            tile_height,
        });
    }

    let mut regions = Vec::with_capacity(grid.cells());
    for row in 0..grid.rows {
        let (sy, height) = span(row, grid.rows, tile_height, overlap);
        for col in 0..grid.cols {
            let (sx, width) = span(col, grid.cols, tile_width, overlap);
            regions.push(TileRegion {
                row,
                col,
                region: Rect::new(sx, sy, width, height),
            });
        }
    }
    Ok(regions)
}

/// Start and length of tile `index` of `count` along one axis
fn span(index: u32, count: u32, tile: f64, overlap: f64) -> (f64, f64) {
    let before = if index > 0 { overlap } else { 0.0 };
    let after = if index + 1 < count { overlap } else { 0.0 };
    (index as f64 * tile - before, tile + before + after)
}

/// Plan a posterized print of `page` rendered at `render_scale`.
///
/// Each tile is scaled into `output_size` (inset by `grid.margin`) with
/// `mode` and centered. Sheets come out row-major, top row first.
#[instrument(skip_all, fields(page = page.id, rows = grid.rows, cols = grid.cols, overlap = overlap))]
pub fn layout_tiles(
    page: &SourcePage,
    render_scale: f64,
    grid: &GridSpec,
    overlap: f64,
    output_size: Size,
    mode: ScaleMode,
) -> Result<CompositionPlan, LayoutError> {
    if !(render_scale.is_finite() && render_scale > 0.0) {
        return Err(LayoutError::InvalidGeometry(format!(
            "Render scale must be positive, got {}",
            render_scale
        )));
    }
    output_size.validate()?;

    let rendered = displayed_size(page)?.scaled(render_scale);
    let regions = tile_regions(rendered, grid, overlap)?;

    let frame = Rect::new(
        grid.margin,
        grid.margin,
        output_size.width - 2.0 * grid.margin,
        output_size.height - 2.0 * grid.margin,
    );

    let mut plan = CompositionPlan::new(PlanKind::Posterize);
    for tile in regions {
        let fit = scale_to_fit(tile.region.size(), frame.size(), mode)?;
        let target_rect = fit.placed_rect(Point::new(frame.x, frame.y));

        let mut sheet = Sheet::new(output_size);
        sheet.placements.push(Placement {
            source_page: page.id,
            target_rect,
            scale: fit.scale,
            rotation_degrees: 0.0,
            origin_offset: Point::new(target_rect.x, target_rect.y),
            source_region: Some(SourceRegion {
                rect: tile.region,
                render_scale,
            }),
        });
        plan.sheets.push(sheet);
    }

    debug!(
        tiles = plan.sheet_count(),
        rendered_width = rendered.width,
        rendered_height = rendered.height,
        "posterize layout complete"
    );
    Ok(plan)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: without overlap, tiles partition the rendered page
        #[test]
        fn zero_overlap_tiles_cover_source_exactly(
            w in 10.0f64..5000.0,
            h in 10.0f64..5000.0,
            rows in 1u32..6,
            cols in 1u32..6,
        ) {
            let rendered = Size { width: w, height: h };
            let regions = tile_regions(rendered, &GridSpec::new(rows, cols), 0.0).unwrap();
            prop_assert_eq!(regions.len(), (rows * cols) as usize);

            let total: f64 = regions.iter().map(|t| t.region.area()).sum();
            prop_assert!((total - w * h).abs() <= 1e-6 * w * h);

            let union = regions
                .iter()
                .map(|t| t.region)
                .reduce(|a, b| a.union(&b))
                .unwrap();
            prop_assert!((union.width - w).abs() < 1e-6 && (union.height - h).abs() < 1e-6);
        }

        /// Property: every region stays within the rendered page
        #[test]
        fn regions_never_leave_the_page(
            w in 100.0f64..5000.0,
            h in 100.0f64..5000.0,
            rows in 1u32..6,
            cols in 1u32..6,
            fraction in 0.0f64..0.99,
        ) {
            let rendered = Size { width: w, height: h };
            let overlap = fraction * (w / cols as f64).min(h / rows as f64);
            let regions = tile_regions(rendered, &GridSpec::new(rows, cols), overlap).unwrap();
            let page = Rect::from_size(rendered);
            for t in regions {
                prop_assert!(page.contains_rect(&t.region, 1e-6));
            }
        }
    }
}
