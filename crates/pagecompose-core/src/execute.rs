//! Run a composition plan against caller-supplied collaborators
//!
//! This is caller-side glue: the layout components only produce plans,
//! and a tool that wants the default drawing behaviour hands its plan,
//! page sources and canvas builder to [`execute_plan`].

use crate::canvas::{CanvasBuilder, PageSource, PixelBuffer};
use crate::error::LayoutError;
use crate::geometry::PageId;
use crate::plan::{CompositionPlan, Decoration, Placement, PlanKind};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ExecutionReport {
    pub sheets: usize,
    pub placements_drawn: usize,
    /// Pages drawn as placeholders because rendering failed
    pub placeholders: Vec<PageId>,
}

/// Draw every sheet of `plan` with `builder`, rasterizing pages from
/// `sources`.
///
/// For stack plans a page that fails to render is replaced by a labelled
/// placeholder so the canvas keeps its dimensions; for every other plan a
/// rendering failure aborts the call.
pub fn execute_plan<B: CanvasBuilder>(
    plan: &CompositionPlan,
    sources: &[&dyn PageSource],
    builder: &mut B,
) -> Result<ExecutionReport, LayoutError> {
    let mut report = ExecutionReport::default();

    for sheet in &plan.sheets {
        let handle = builder.add_page(sheet.size).map_err(build_failed)?;
        report.sheets += 1;

        for placement in &sheet.placements {
            let source = sources
                .iter()
                .find(|s| s.id() == placement.source_page)
                .ok_or_else(|| {
                    LayoutError::RenderFailed(format!(
                        "Page {} was not provided",
                        placement.source_page
                    ))
                })?;

            match rasterize(*source, placement) {
                Ok(image) => {
                    builder
                        .draw_image(handle, &image, &placement.target_rect)
                        .map_err(build_failed)?;
                    report.placements_drawn += 1;
                }
                Err(e) if plan.kind == PlanKind::Stack => {
                    warn!(page = placement.source_page, error = %e, "drawing placeholder");
                    let label = format!("Page {} could not be rendered", placement.source_page);
                    draw_placeholder(builder, handle, placement, &label)?;
                    report.placeholders.push(placement.source_page);
                }
                Err(e) => return Err(e),
            }
        }

        for decoration in &sheet.decorations {
            match decoration {
                Decoration::Line { start, end, style } => builder
                    .draw_line(handle, *start, *end, style)
                    .map_err(build_failed)?,
                Decoration::Border { rect, style } => builder
                    .draw_rect(handle, rect, style)
                    .map_err(build_failed)?,
                Decoration::Placeholder { rect, label } => {
                    builder
                        .draw_rect(handle, rect, &Default::default())
                        .map_err(build_failed)?;
                    builder
                        .draw_label(handle, rect, label)
                        .map_err(build_failed)?;
                }
            }
        }
    }

    debug!(
        sheets = report.sheets,
        drawn = report.placements_drawn,
        placeholders = report.placeholders.len(),
        "plan executed"
    );
    Ok(report)
}

fn rasterize(source: &dyn PageSource, placement: &Placement) -> Result<PixelBuffer, LayoutError> {
    let render_failed = |e: crate::canvas::RenderError| LayoutError::RenderFailed(e.to_string());
    match &placement.source_region {
        Some(region) => {
            let image = source
                .render_to_pixels(region.render_scale)
                .map_err(render_failed)?;
            Ok(image.rotated(source.rotation()).crop(&region.rect))
        }
        None => {
            let image = source
                .render_to_pixels(placement.scale)
                .map_err(render_failed)?;
            Ok(image.rotated(placement.rotation_degrees))
        }
    }
}

fn draw_placeholder<B: CanvasBuilder>(
    builder: &mut B,
    handle: B::Handle,
    placement: &Placement,
    label: &str,
) -> Result<(), LayoutError> {
    builder
        .draw_rect(handle, &placement.target_rect, &Default::default())
        .map_err(build_failed)?;
    builder
        .draw_label(handle, &placement.target_rect, label)
        .map_err(build_failed)
}

fn build_failed<E: std::fmt::Display>(e: E) -> LayoutError {
    LayoutError::BuildFailed(e.to_string())
}
