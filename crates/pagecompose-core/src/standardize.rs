//! Standardize page dimensions
//!
//! Puts every page on a sheet of one common size, fitted or filled.

use crate::error::LayoutError;
use crate::fit::ScaleMode;
use crate::geometry::{Rect, Size, SourcePage};
use crate::plan::{CompositionPlan, Placement, PlanKind, Sheet};
use tracing::{debug, instrument};

/// One `target`-sized sheet per page, content scaled with `mode` and
/// centered. Fill placements overflow the sheet; the caller clips.
#[instrument(skip_all, fields(pages = pages.len(), mode = ?mode))]
pub fn standardize(
    pages: &[SourcePage],
    target: Size,
    mode: ScaleMode,
) -> Result<CompositionPlan, LayoutError> {
    if pages.is_empty() {
        return Err(LayoutError::EmptyInput("No pages to standardize".into()));
    }
    target.validate()?;

    let frame = Rect::from_size(target);
    let mut plan = CompositionPlan::new(PlanKind::Standardize);
    for page in pages {
        let mut sheet = Sheet::new(target);
        sheet
            .placements
            .push(Placement::fit_page(page, frame, mode)?);
        plan.sheets.push(sheet);
    }

    debug!(sheets = plan.sheet_count(), "standardize complete");
    Ok(plan)
}
