//! Page composition engine
//!
//! Computes page layout and geometric transforms for N-up sheets, posterized
//! tiles, single-canvas stacks, dimension standardization and arbitrary
//! rotation. Every component returns a [`CompositionPlan`]; rendering and
//! document assembly are left to the caller through [`PageSource`] and
//! [`CanvasBuilder`].

pub mod canvas;
pub mod command;
pub mod error;
pub mod execute;
pub mod fit;
pub mod geometry;
pub mod grid;
pub mod plan;
pub mod rotate;
pub mod stack;
pub mod standardize;
pub mod tiles;

pub use canvas::{CanvasBuilder, PageSource, PixelBuffer, RenderError};
pub use command::{process, LayoutCommand, ProcessMetrics, ProcessResult};
pub use error::LayoutError;
pub use execute::{execute_plan, ExecutionReport};
pub use fit::{scale_to_fit, FitResult, ScaleMode};
pub use geometry::{Offset, PageId, PageOrientation, Point, Rect, Size, SourcePage};
pub use grid::{layout_grid, GridOptions, GridSpec, SheetOrientation};
pub use plan::{
    CompositionPlan, Decoration, LineStyle, Placement, PlanKind, Sheet, SourceRegion,
};
pub use rotate::{rotate, rotate_pages, RotationResult};
pub use stack::{stack, Separator, StackDirection, StackOptions};
pub use standardize::standardize;
pub use tiles::{layout_tiles, tile_regions, TileRegion};

/// Parse page range string like "1-3, 5, 8-10" into sorted unique page numbers.
///
/// Every page must lie in `1..=page_count`; ranges are checked before they
/// are expanded.
pub fn parse_ranges(input: &str, page_count: u32) -> Result<Vec<u32>, LayoutError> {
    use std::collections::BTreeSet;

    let mut pages = BTreeSet::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start: u32 = start
                .trim()
                .parse()
                .map_err(|_| LayoutError::InvalidRange(format!("Invalid start: {}", start)))?;
            let end: u32 = end
                .trim()
                .parse()
                .map_err(|_| LayoutError::InvalidRange(format!("Invalid end: {}", end)))?;

            if start == 0 {
                return Err(LayoutError::InvalidRange("Pages are numbered from 1".into()));
            }
            if start > end {
                return Err(LayoutError::InvalidRange(format!(
                    "Start {} > end {}",
                    start, end
                )));
            }
            check_in_document(end, page_count)?;

            pages.extend(start..=end);
        } else {
            let page: u32 = part
                .parse()
                .map_err(|_| LayoutError::InvalidRange(format!("Invalid page: {}", part)))?;
            if page == 0 {
                return Err(LayoutError::InvalidRange("Pages are numbered from 1".into()));
            }
            check_in_document(page, page_count)?;
            pages.insert(page);
        }
    }

    Ok(pages.into_iter().collect())
}

fn check_in_document(page: u32, page_count: u32) -> Result<(), LayoutError> {
    if page > page_count {
        return Err(LayoutError::InvalidRange(format!(
            "Page {} is out of range (1-{})",
            page, page_count
        )));
    }
    Ok(())
}

/// Pick pages by 1-based position, in the order given.
///
/// An empty `selection` keeps every page.
pub fn select_pages(pages: &[SourcePage], selection: &[u32]) -> Result<Vec<SourcePage>, LayoutError> {
    if selection.is_empty() {
        return Ok(pages.to_vec());
    }
    selection
        .iter()
        .map(|&n| {
            n.checked_sub(1)
                .and_then(|i| pages.get(i as usize))
                .copied()
                .ok_or_else(|| {
                    LayoutError::InvalidRange(format!(
                        "Page {} is out of range (document has {} pages)",
                        n,
                        pages.len()
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: u32) -> Vec<SourcePage> {
        (1..=n).map(|id| SourcePage::new(id * 10, Size::letter())).collect()
    }

    #[test]
    fn test_parse_ranges_single() {
        let result = parse_ranges("5", 20).unwrap();
        assert_eq!(result, vec![5]);
    }

    #[test]
    fn test_parse_ranges_range() {
        let result = parse_ranges("1-3", 20).unwrap();
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_ranges_complex() {
        let result = parse_ranges("1-3, 5, 8-10", 20).unwrap();
        assert_eq!(result, vec![1, 2, 3, 5, 8, 9, 10]);
    }

    #[test]
    fn test_parse_ranges_deduplicates() {
        let result = parse_ranges("1-3, 2-4", 20).unwrap();
        assert_eq!(result, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_ranges_rejects_garbage() {
        assert!(matches!(parse_ranges("a-3", 20), Err(LayoutError::InvalidRange(_))));
        assert!(matches!(parse_ranges("4-2", 20), Err(LayoutError::InvalidRange(_))));
        assert!(matches!(parse_ranges("0", 20), Err(LayoutError::InvalidRange(_))));
    }

    #[test]
    fn test_parse_ranges_checks_page_count_before_expanding() {
        assert!(matches!(
            parse_ranges("1-4000000000", 12),
            Err(LayoutError::InvalidRange(_))
        ));
        assert!(matches!(parse_ranges("13", 12), Err(LayoutError::InvalidRange(_))));
        assert_eq!(parse_ranges("10-12", 12).unwrap(), vec![10, 11, 12]);
    }

    #[test]
    fn test_select_pages_by_position() {
        let selected = select_pages(&pages(5), &[2, 4]).unwrap();
        let ids: Vec<_> = selected.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![20, 40]);
    }

    #[test]
    fn test_select_pages_empty_selection_keeps_all() {
        assert_eq!(select_pages(&pages(3), &[]).unwrap(), pages(3));
    }

    #[test]
    fn test_select_pages_out_of_range() {
        let err = select_pages(&pages(3), &[1, 4]).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidRange(_)));
        assert!(select_pages(&pages(3), &[0]).is_err());
    }
}
