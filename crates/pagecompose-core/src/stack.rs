//! Combine a page sequence onto one long canvas
//!
//! Pages keep their natural size. The canvas grows along the stacking axis
//! and is as thick as the largest page across it.

use crate::error::LayoutError;
use crate::fit::ScaleMode;
use crate::geometry::{Point, Rect, Size, SourcePage};
use crate::plan::{CompositionPlan, Decoration, LineStyle, Placement, PlanKind, Sheet};
use crate::rotate::displayed_size;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StackDirection {
    /// Left to right
    Horizontal,
    /// Top to bottom
    #[default]
    Vertical,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Separator {
    pub thickness: f64,
    /// Draw in `color` rather than plain black
    #[serde(default)]
    pub color_enabled: bool,
    #[serde(default = "default_separator_color")]
    pub color: String,
}

fn default_separator_color() -> String {
    "#000000".to_string()
}

impl Separator {
    pub fn style(&self) -> LineStyle {
        LineStyle {
            thickness: self.thickness,
            color: if self.color_enabled {
                self.color.clone()
            } else {
                default_separator_color()
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StackOptions {
    #[serde(default)]
    pub direction: StackDirection,
    #[serde(default)]
    pub spacing: f64,
    #[serde(default)]
    pub separator: Option<Separator>,
}

/// Stack `pages` onto a single canvas.
///
/// Horizontal stacks are vertically centered; vertical stacks run top to
/// bottom and are horizontally centered. Separators sit at the middle of
/// each gap and span the whole cross axis.
#[instrument(skip_all, fields(pages = pages.len(), direction = ?options.direction))]
pub fn stack(pages: &[SourcePage], options: &StackOptions) -> Result<CompositionPlan, LayoutError> {
    if pages.is_empty() {
        return Err(LayoutError::EmptyInput("No pages to combine".into()));
    }
    if !(options.spacing.is_finite() && options.spacing >= 0.0) {
        return Err(LayoutError::InvalidGeometry(format!(
            "Spacing must be non-negative, got {}",
            options.spacing
        )));
    }
    if let Some(separator) = &options.separator {
        if !(separator.thickness.is_finite() && separator.thickness >= 0.0) {
            return Err(LayoutError::InvalidGeometry(format!(
                "Separator thickness must be non-negative, got {}",
                separator.thickness
            )));
        }
    }

    let sizes = pages
        .iter()
        .map(displayed_size)
        .collect::<Result<Vec<_>, _>>()?;
    let spacing = options.spacing;
    let gaps = spacing * (pages.len() - 1) as f64;

    let canvas = match options.direction {
        StackDirection::Horizontal => Size {
            width: sizes.iter().map(|s| s.width).sum::<f64>() + gaps,
            height: sizes.iter().map(|s| s.height).fold(0.0, f64::max),
        },
        StackDirection::Vertical => Size {
            width: sizes.iter().map(|s| s.width).fold(0.0, f64::max),
            height: sizes.iter().map(|s| s.height).sum::<f64>() + gaps,
        },
    };

    let mut sheet = Sheet::new(canvas);
    let separator = options.separator.as_ref().map(Separator::style);
    let mut cursor = 0.0;

    for (index, (page, size)) in pages.iter().zip(&sizes).enumerate() {
        let frame = match options.direction {
            StackDirection::Horizontal => Rect::new(
                cursor,
                (canvas.height - size.height) / 2.0,
                size.width,
                size.height,
            ),
            StackDirection::Vertical => Rect::new(
                (canvas.width - size.width) / 2.0,
                canvas.height - cursor - size.height,
                size.width,
                size.height,
            ),
        };
        sheet
            .placements
            .push(Placement::fit_page(page, frame, ScaleMode::Fit)?);

        cursor += match options.direction {
            StackDirection::Horizontal => size.width,
            StackDirection::Vertical => size.height,
        };

        let is_last = index + 1 == pages.len();
        if let (Some(style), false) = (&separator, is_last) {
            let mid = cursor + spacing / 2.0;
            let (start, end) = match options.direction {
                StackDirection::Horizontal => (Point::new(mid, 0.0), Point::new(mid, canvas.height)),
                StackDirection::Vertical => {
                    let y = canvas.height - mid;
                    (Point::new(0.0, y), Point::new(canvas.width, y))
                }
            };
            sheet.decorations.push(Decoration::Line {
                start,
                end,
                style: style.clone(),
            });
        }
        cursor += spacing;
    }

    debug!(
        width = canvas.width,
        height = canvas.height,
        "stack layout complete"
    );

    Ok(CompositionPlan {
        kind: PlanKind::Stack,
        sheets: vec![sheet],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(id: u32, width: f64, height: f64) -> SourcePage {
        SourcePage::new(id, Size { width, height })
    }

    fn horizontal(spacing: f64) -> StackOptions {
        StackOptions {
            direction: StackDirection::Horizontal,
            spacing,
            separator: None,
        }
    }

    #[test]
    fn test_horizontal_stack_sums_widths() {
        let pages = [page(1, 100.0, 50.0), page(2, 200.0, 50.0)];
        let plan = stack(&pages, &horizontal(10.0)).unwrap();

        assert_eq!(plan.sheet_count(), 1);
        let sheet = &plan.sheets[0];
        assert_eq!(sheet.size, Size { width: 310.0, height: 50.0 });
        assert_eq!(sheet.placements[0].target_rect, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(sheet.placements[1].target_rect, Rect::new(110.0, 0.0, 200.0, 50.0));
        assert_eq!(sheet.placements[1].scale, 1.0);
    }

    #[test]
    fn test_horizontal_stack_centers_short_pages() {
        let pages = [page(1, 100.0, 100.0), page(2, 100.0, 40.0)];
        let plan = stack(&pages, &horizontal(0.0)).unwrap();
        assert_eq!(
            plan.sheets[0].placements[1].target_rect,
            Rect::new(100.0, 30.0, 100.0, 40.0)
        );
    }

    #[test]
    fn test_vertical_stack_runs_top_to_bottom() {
        let pages = [page(1, 100.0, 50.0), page(2, 60.0, 30.0)];
        let options = StackOptions {
            direction: StackDirection::Vertical,
            spacing: 20.0,
            separator: None,
        };
        let plan = stack(&pages, &options).unwrap();
        let sheet = &plan.sheets[0];

        assert_eq!(sheet.size, Size { width: 100.0, height: 100.0 });
        assert_eq!(sheet.placements[0].target_rect, Rect::new(0.0, 50.0, 100.0, 50.0));
        assert_eq!(sheet.placements[1].target_rect, Rect::new(20.0, 0.0, 60.0, 30.0));
    }

    #[test]
    fn test_separators_sit_mid_gap() {
        let pages = [page(1, 100.0, 50.0), page(2, 100.0, 80.0), page(3, 50.0, 50.0)];
        let options = StackOptions {
            direction: StackDirection::Horizontal,
            spacing: 10.0,
            separator: Some(Separator {
                thickness: 2.0,
                color_enabled: true,
                color: "#FF0000".to_string(),
            }),
        };
        let plan = stack(&pages, &options).unwrap();
        let style = LineStyle {
            thickness: 2.0,
            color: "#FF0000".to_string(),
        };

        assert_eq!(
            plan.sheets[0].decorations,
            vec![
                Decoration::Line {
                    start: Point::new(105.0, 0.0),
                    end: Point::new(105.0, 80.0),
                    style: style.clone(),
                },
                Decoration::Line {
                    start: Point::new(215.0, 0.0),
                    end: Point::new(215.0, 80.0),
                    style,
                },
            ]
        );
    }

    #[test]
    fn test_vertical_separator_spans_width() {
        let pages = [page(1, 100.0, 50.0), page(2, 40.0, 50.0)];
        let options = StackOptions {
            direction: StackDirection::Vertical,
            spacing: 10.0,
            separator: Some(Separator {
                thickness: 1.0,
                color_enabled: false,
                color: "#00FF00".to_string(),
            }),
        };
        let plan = stack(&pages, &options).unwrap();
        assert_eq!(
            plan.sheets[0].decorations,
            vec![Decoration::Line {
                start: Point::new(0.0, 55.0),
                end: Point::new(100.0, 55.0),
                style: LineStyle::default(),
            }]
        );
    }

    #[test]
    fn test_rotated_pages_use_displayed_size() {
        let pages = [page(1, 100.0, 50.0).with_rotation(90.0), page(2, 100.0, 50.0)];
        let plan = stack(&pages, &horizontal(0.0)).unwrap();
        assert_eq!(plan.sheets[0].size, Size { width: 150.0, height: 100.0 });
        assert_eq!(plan.sheets[0].placements[0].rotation_degrees, 90.0);
    }

    #[test]
    fn test_single_page_has_no_separator() {
        let options = StackOptions {
            separator: Some(Separator {
                thickness: 1.0,
                color_enabled: false,
                color: default_separator_color(),
            }),
            ..StackOptions::default()
        };
        let plan = stack(&[page(1, 10.0, 10.0)], &options).unwrap();
        assert!(plan.sheets[0].decorations.is_empty());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            stack(&[], &StackOptions::default()),
            Err(LayoutError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_negative_spacing_is_rejected() {
        assert!(matches!(
            stack(&[page(1, 10.0, 10.0)], &horizontal(-5.0)),
            Err(LayoutError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_options_accept_partial_json() {
        let options: StackOptions = serde_json::from_str(
            r#"{"direction":"horizontal","separator":{"thickness":0.5}}"#,
        )
        .unwrap();
        assert_eq!(options.spacing, 0.0);
        let separator = options.separator.unwrap();
        assert!(!separator.color_enabled);
        assert_eq!(separator.color, "#000000");
    }
}
