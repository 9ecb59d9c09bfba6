//! N-up grid layout
//!
//! Consumes pages `rows * cols` at a time and places each group on one
//! output sheet. Row 0 is the top row; cells are filled row-major.

use crate::error::LayoutError;
use crate::fit::ScaleMode;
use crate::geometry::{PageOrientation, Rect, Size, SourcePage};
use crate::plan::{CompositionPlan, Decoration, LineStyle, Placement, PlanKind, Sheet};
use crate::rotate::displayed_size;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Upper bound on `rows * cols`, far beyond any printable grid
pub const MAX_GRID_CELLS: u64 = 10_000;

/// Uniform grid over a target rect
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    /// Space between adjacent cells
    #[serde(default)]
    pub gutter: f64,
    /// Space between the grid and the sheet edge
    #[serde(default)]
    pub margin: f64,
}

impl GridSpec {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            gutter: 0.0,
            margin: 0.0,
        }
    }

    pub fn with_spacing(mut self, gutter: f64, margin: f64) -> Self {
        self.gutter = gutter;
        self.margin = margin;
        self
    }

    /// Grid for the pages-per-sheet choices offered by the N-up tool
    pub fn for_pages_per_sheet(n: u32) -> Result<Self, LayoutError> {
        let (rows, cols) = match n {
            1 => (1, 1),
            2 => (1, 2),
            4 => (2, 2),
            6 => (2, 3),
            8 => (2, 4),
            9 => (3, 3),
            16 => (4, 4),
            _ => {
                return Err(LayoutError::InvalidGrid(format!(
                    "Unsupported pages per sheet: {}",
                    n
                )))
            }
        };
        Ok(Self::new(rows, cols))
    }

    /// Saturates rather than overflowing; [`GridSpec::validate`] bounds it
    pub fn cells(&self) -> usize {
        (self.rows as usize).saturating_mul(self.cols as usize)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let cells = self.rows as u64 * self.cols as u64;
        if cells == 0 {
            return Err(LayoutError::InvalidGrid(format!(
                "Grid must have at least one cell, got {}x{}",
                self.rows, self.cols
            )));
        }
        if cells > MAX_GRID_CELLS {
            return Err(LayoutError::InvalidGrid(format!(
                "Grid {}x{} exceeds {} cells",
                self.rows, self.cols, MAX_GRID_CELLS
            )));
        }
        if !(self.gutter.is_finite() && self.gutter >= 0.0) {
            return Err(LayoutError::InvalidGrid(format!(
                "Gutter must be non-negative, got {}",
                self.gutter
            )));
        }
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(LayoutError::InvalidGrid(format!(
                "Margin must be non-negative, got {}",
                self.margin
            )));
        }
        Ok(())
    }

    /// Size of one cell on a sheet of `sheet` size
    pub fn cell_size(&self, sheet: Size) -> Result<Size, LayoutError> {
        let cols = self.cols as f64;
        let rows = self.rows as f64;
        let width = (sheet.width - 2.0 * self.margin - self.gutter * (cols - 1.0)) / cols;
        let height = (sheet.height - 2.0 * self.margin - self.gutter * (rows - 1.0)) / rows;
        if width <= 0.0 || height <= 0.0 {
            return Err(LayoutError::InvalidGrid(format!(
                "Margin and gutter leave no room for cells ({:.2}x{:.2})",
                width, height
            )));
        }
        Ok(Size { width, height })
    }

    /// Rect of the cell at row-major index `index`
    pub fn cell_rect(&self, sheet: Size, cell: Size, index: usize) -> Rect {
        let cols = self.cols as usize;
        let row = (index / cols) as f64;
        let col = (index % cols) as f64;
        Rect::new(
            self.margin + col * (cell.width + self.gutter),
            sheet.height - self.margin - (row + 1.0) * cell.height - row * self.gutter,
            cell.width,
            cell.height,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SheetOrientation {
    Portrait,
    Landscape,
    /// Follow the first page's aspect ratio combined with the grid's
    #[default]
    Auto,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GridOptions {
    #[serde(default)]
    pub orientation: SheetOrientation,
    /// Draw a border around each placed page
    #[serde(default)]
    pub border: Option<LineStyle>,
}

/// Pick the sheet orientation for an "auto" N-up layout.
///
/// A wide grid of landscape pages wants a landscape sheet; a square grid
/// has no preference and stays portrait.
pub fn auto_orientation(first_page: Size, grid: &GridSpec) -> PageOrientation {
    if grid.rows == grid.cols {
        return PageOrientation::Portrait;
    }
    let grid_aspect = grid.cols as f64 / grid.rows as f64;
    if grid_aspect * first_page.aspect_ratio() > 1.0 {
        PageOrientation::Landscape
    } else {
        PageOrientation::Portrait
    }
}

/// Lay out `pages` onto sheets of `sheet_size`, `grid.cells()` per sheet.
///
/// Pages are always fitted (never clipped) into their cell and centered.
/// The last sheet may hold fewer pages; empty cells get no placement.
#[instrument(skip_all, fields(pages = pages.len(), rows = grid.rows, cols = grid.cols))]
pub fn layout_grid(
    pages: &[SourcePage],
    sheet_size: Size,
    grid: &GridSpec,
    options: &GridOptions,
) -> Result<CompositionPlan, LayoutError> {
    grid.validate()?;
    let first = pages
        .first()
        .ok_or_else(|| LayoutError::EmptyInput("No pages to lay out".into()))?;
    sheet_size.validate()?;

    let sheet_size = match options.orientation {
        SheetOrientation::Portrait => sheet_size.with_orientation(PageOrientation::Portrait),
        SheetOrientation::Landscape => sheet_size.with_orientation(PageOrientation::Landscape),
        SheetOrientation::Auto => {
            let orientation = auto_orientation(displayed_size(first)?, grid);
            debug!(?orientation, "auto orientation resolved");
            sheet_size.with_orientation(orientation)
        }
    };

    let cell = grid.cell_size(sheet_size)?;
    let mut plan = CompositionPlan::new(PlanKind::NUp);

    for group in pages.chunks(grid.cells()) {
        let mut sheet = Sheet::new(sheet_size);
        for (index, page) in group.iter().enumerate() {
            let frame = grid.cell_rect(sheet_size, cell, index);
            let placement = Placement::fit_page(page, frame, ScaleMode::Fit)?;
            if let Some(style) = &options.border {
                sheet.decorations.push(Decoration::Border {
                    rect: placement.target_rect,
                    style: style.clone(),
                });
            }
            sheet.placements.push(placement);
        }
        plan.sheets.push(sheet);
    }

    debug!(
        sheets = plan.sheet_count(),
        cell_width = cell.width,
        cell_height = cell.height,
        "grid layout complete"
    );
    Ok(plan)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: every placement stays inside its sheet, and the sheet
        /// count is the ceiling of pages / cells
        #[test]
        fn placements_stay_on_sheet(
            n in 1u32..40,
            rows in 1u32..5,
            cols in 1u32..5,
            w in 50.0f64..2000.0,
            h in 50.0f64..2000.0,
        ) {
            let pages: Vec<_> = (0..n).map(|id| SourcePage::new(id, Size { width: w, height: h })).collect();
            let grid = GridSpec::new(rows, cols).with_spacing(4.0, 12.0);
            let plan = layout_grid(&pages, Size::a4(), &grid, &GridOptions::default()).unwrap();

            let cells = grid.cells();
            prop_assert_eq!(plan.sheet_count(), (n as usize).div_ceil(cells));
            prop_assert_eq!(plan.placement_count(), n as usize);
            for sheet in &plan.sheets {
                let bounds = Rect::from_size(sheet.size);
                for p in &sheet.placements {
                    prop_assert!(bounds.contains_rect(&p.target_rect, 1e-6));
                }
            }
        }
    }
}
