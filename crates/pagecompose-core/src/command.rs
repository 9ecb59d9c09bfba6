use crate::error::LayoutError;
use crate::fit::ScaleMode;
use crate::geometry::{Size, SourcePage};
use crate::grid::{layout_grid, GridOptions, GridSpec};
use crate::plan::CompositionPlan;
use crate::rotate::rotate_pages;
use crate::stack::{stack, StackOptions};
use crate::standardize::standardize;
use crate::tiles::layout_tiles;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum LayoutCommand {
    NUp {
        pages: Vec<SourcePage>,
        sheet_size: Size,
        grid: GridSpec,
        #[serde(default)]
        options: GridOptions,
    },
    Posterize {
        page: SourcePage,
        render_scale: f64,
        grid: GridSpec,
        #[serde(default)]
        overlap: f64,
        output_size: Size,
        #[serde(default)]
        mode: ScaleMode,
    },
    Stack {
        pages: Vec<SourcePage>,
        #[serde(default)]
        options: StackOptions,
    },
    Standardize {
        pages: Vec<SourcePage>,
        target: Size,
        #[serde(default)]
        mode: ScaleMode,
    },
    Rotate {
        pages: Vec<SourcePage>,
        angle: f64,
    },
}

impl LayoutCommand {
    /// Run the component this command names
    pub fn plan(&self) -> Result<CompositionPlan, LayoutError> {
        match self {
            LayoutCommand::NUp {
                pages,
                sheet_size,
                grid,
                options,
            } => layout_grid(pages, *sheet_size, grid, options),
            LayoutCommand::Posterize {
                page,
                render_scale,
                grid,
                overlap,
                output_size,
                mode,
            } => layout_tiles(page, *render_scale, grid, *overlap, *output_size, *mode),
            LayoutCommand::Stack { pages, options } => stack(pages, options),
            LayoutCommand::Standardize { pages, target, mode } => {
                standardize(pages, *target, *mode)
            }
            LayoutCommand::Rotate { pages, angle } => rotate_pages(pages, *angle),
        }
    }

    /// Number of input pages the command refers to
    pub fn page_count(&self) -> usize {
        match self {
            LayoutCommand::Posterize { .. } => 1,
            LayoutCommand::NUp { pages, .. }
            | LayoutCommand::Stack { pages, .. }
            | LayoutCommand::Standardize { pages, .. }
            | LayoutCommand::Rotate { pages, .. } => pages.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub success: bool,
    /// JSON-encoded composition plan
    pub data: Option<String>,
    pub error: Option<String>,
    pub metrics: Option<ProcessMetrics>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProcessMetrics {
    pub page_count: usize,
    pub sheet_count: usize,
    pub placement_count: usize,
}

impl ProcessResult {
    pub fn failure(error: &LayoutError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            metrics: None,
        }
    }
}

/// Decode a JSON command, plan it and wrap the outcome.
///
/// Never fails: decoding and layout errors are reported in the envelope.
pub fn process(json: &str) -> ProcessResult {
    match run(json) {
        Ok(result) => result,
        Err(e) => ProcessResult::failure(&e),
    }
}

fn run(json: &str) -> Result<ProcessResult, LayoutError> {
    let command: LayoutCommand =
        serde_json::from_str(json).map_err(|e| LayoutError::SerializationError(e.to_string()))?;
    let plan = command.plan()?;
    let data = plan
        .to_json()
        .map_err(|e| LayoutError::SerializationError(e.to_string()))?;

    Ok(ProcessResult {
        success: true,
        data: Some(data),
        error: None,
        metrics: Some(ProcessMetrics {
            page_count: command.page_count(),
            sheet_count: plan.sheet_count(),
            placement_count: plan.placement_count(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanKind;

    #[test]
    fn test_command_deserializes_nup_with_defaults() {
        let json = r#"{
            "type": "NUp",
            "pages": [{"id": 1, "size": {"width": 612, "height": 792}}],
            "sheet_size": {"width": 612, "height": 792},
            "grid": {"rows": 2, "cols": 2}
        }"#;
        let cmd: LayoutCommand = serde_json::from_str(json).unwrap();
        match &cmd {
            LayoutCommand::NUp { options, grid, .. } => {
                assert_eq!(*options, GridOptions::default());
                assert_eq!(grid.gutter, 0.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cmd.plan().unwrap().kind, PlanKind::NUp);
    }

    #[test]
    fn test_command_deserializes_posterize() {
        let json = r#"{
            "type": "Posterize",
            "page": {"id": 3, "size": {"width": 500, "height": 500}},
            "render_scale": 2.0,
            "grid": {"rows": 2, "cols": 2},
            "overlap": 15,
            "output_size": {"width": 612, "height": 792},
            "mode": "fill"
        }"#;
        let cmd: LayoutCommand = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.page_count(), 1);
        assert_eq!(cmd.plan().unwrap().sheet_count(), 4);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"{"type":"Merge","files":[]}"#;
        assert!(serde_json::from_str::<LayoutCommand>(json).is_err());
    }

    #[test]
    fn test_process_reports_metrics() {
        let json = r#"{
            "type": "Rotate",
            "pages": [
                {"id": 1, "size": {"width": 100, "height": 50}},
                {"id": 2, "size": {"width": 100, "height": 50}}
            ],
            "angle": 90
        }"#;
        let result = process(json);
        assert!(result.success, "{:?}", result.error);
        assert_eq!(
            result.metrics,
            Some(ProcessMetrics {
                page_count: 2,
                sheet_count: 2,
                placement_count: 2,
            })
        );
        let plan = CompositionPlan::from_json(result.data.as_deref().unwrap()).unwrap();
        assert_eq!(plan.kind, PlanKind::Rotate);
    }

    #[test]
    fn test_process_reports_layout_error() {
        let json = r#"{"type":"Stack","pages":[]}"#;
        let result = process(json);
        assert!(!result.success);
        assert!(result.data.is_none());
        assert!(result.error.unwrap().contains("No pages"));
    }

    #[test]
    fn test_process_reports_bad_json() {
        let result = process("{not json");
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Serialization error"));
    }
}
