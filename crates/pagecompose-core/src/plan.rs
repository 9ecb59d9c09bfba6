//! Composition plans
//!
//! A plan is the only output of the layout components: an ordered list of
//! sheets, each holding the placements and decorations the caller draws
//! against its own canvas builder. Plans are plain values, produced fresh
//! per call and never mutated by the engine afterwards.

use crate::error::LayoutError;
use crate::fit::{scale_to_fit, ScaleMode};
use crate::geometry::{normalize_degrees, Offset, PageId, Point, Rect, Size, SourcePage};
use crate::rotate::{content_offset, displayed_size};
use serde::{Deserialize, Serialize};

/// Which component produced a plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlanKind {
    NUp,
    Posterize,
    Stack,
    Standardize,
    Rotate,
}

/// One source page drawn once
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    pub source_page: PageId,
    /// Where the (scaled, rotated) content lands on the sheet
    pub target_rect: Rect,
    pub scale: f64,
    #[serde(default)]
    pub rotation_degrees: f64,
    /// Translation applied after scaling and rotation
    #[serde(default)]
    pub origin_offset: Offset,
    /// Part of the rendered source to draw. `None` draws the whole page.
    #[serde(default)]
    pub source_region: Option<SourceRegion>,
}

/// A crop of the source page rendered at `render_scale`, in pixel space
/// (origin top-left, y down) of the page as displayed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SourceRegion {
    pub rect: Rect,
    pub render_scale: f64,
}

impl Placement {
    /// Fit `page`, with its own rotation applied, into `frame` and center it.
    ///
    /// The caller draws source content as: scale by `scale`, rotate by
    /// `rotation_degrees` about the origin, translate by `origin_offset`.
    pub fn fit_page(page: &SourcePage, frame: Rect, mode: ScaleMode) -> Result<Self, LayoutError> {
        let displayed = displayed_size(page)?;
        let fit = scale_to_fit(displayed, frame.size(), mode)?;
        let target_rect = fit.placed_rect(Point::new(frame.x, frame.y));

        let rotation = normalize_degrees(page.rotation);
        let offset = content_offset(page.size, rotation);

        Ok(Self {
            source_page: page.id,
            target_rect,
            scale: fit.scale,
            rotation_degrees: rotation,
            origin_offset: Point::new(
                target_rect.x + offset.x * fit.scale,
                target_rect.y + offset.y * fit.scale,
            ),
            source_region: None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LineStyle {
    pub thickness: f64,
    /// Hex color, e.g. "#000000"
    pub color: String,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Decoration {
    Line {
        start: Point,
        end: Point,
        style: LineStyle,
    },
    Border {
        rect: Rect,
        style: LineStyle,
    },
    /// Stand-in for a page the renderer could not produce
    Placeholder { rect: Rect, label: String },
}

/// One output page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sheet {
    pub size: Size,
    pub placements: Vec<Placement>,
    #[serde(default)]
    pub decorations: Vec<Decoration>,
}

impl Sheet {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            placements: Vec::new(),
            decorations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositionPlan {
    pub kind: PlanKind,
    pub sheets: Vec<Sheet>,
}

impl CompositionPlan {
    pub fn new(kind: PlanKind) -> Self {
        Self {
            kind,
            sheets: Vec::new(),
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn placement_count(&self) -> usize {
        self.sheets.iter().map(|s| s.placements.len()).sum()
    }

    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.sheets.iter().flat_map(|s| s.placements.iter())
    }

    /// Replace every placement of `page` with a labelled placeholder covering
    /// the same rect, so the sheet keeps its dimensions.
    /// Returns the number of placements replaced.
    pub fn substitute_placeholder(&mut self, page: PageId, label: &str) -> usize {
        let mut replaced = 0;
        for sheet in &mut self.sheets {
            let (failed, kept): (Vec<_>, Vec<_>) = sheet
                .placements
                .drain(..)
                .partition(|p| p.source_page == page);
            sheet.placements = kept;
            for placement in failed {
                sheet.decorations.push(Decoration::Placeholder {
                    rect: placement.target_rect,
                    label: label.to_string(),
                });
                replaced += 1;
            }
        }
        replaced
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
