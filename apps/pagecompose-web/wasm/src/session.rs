//! Stateful layout session
//!
//! Holds page metadata for every loaded document plus the current page
//! selection, and turns a tool request into a composition plan. The PDF
//! bytes stay in JavaScript, which renders pages when it draws the plan.

use crate::page_info::PageInfo;
use crate::validation::{summarize, PdfInfo};
use lopdf::Document;
use pagecompose_core::{
    parse_ranges, select_pages, CompositionPlan, GridOptions, GridSpec, LayoutCommand, PageId,
    ScaleMode, Size, SourcePage, StackOptions,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

struct DocumentEntry {
    name: String,
    info: PdfInfo,
    pages: Vec<PageInfo>,
}

/// A tool request against the selected pages
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum LayoutRequest {
    NUp {
        sheet_size: Size,
        grid: GridSpec,
        #[serde(default)]
        options: GridOptions,
    },
    /// N-up from the pages-per-sheet picker
    NUpPreset {
        sheet_size: Size,
        pages_per_sheet: u32,
        #[serde(default)]
        options: GridOptions,
    },
    /// Posterizes the first selected page
    Posterize {
        render_scale: f64,
        grid: GridSpec,
        #[serde(default)]
        overlap: f64,
        output_size: Size,
        #[serde(default)]
        mode: ScaleMode,
    },
    Stack {
        #[serde(default)]
        options: StackOptions,
    },
    Standardize {
        target: Size,
        #[serde(default)]
        mode: ScaleMode,
    },
    Rotate {
        angle: f64,
    },
}

impl LayoutRequest {
    fn into_command(self, pages: Vec<SourcePage>) -> Result<LayoutCommand, String> {
        let command = match self {
            LayoutRequest::NUp {
                sheet_size,
                grid,
                options,
            } => LayoutCommand::NUp {
                pages,
                sheet_size,
                grid,
                options,
            },
            LayoutRequest::NUpPreset {
                sheet_size,
                pages_per_sheet,
                options,
            } => LayoutCommand::NUp {
                pages,
                sheet_size,
                grid: GridSpec::for_pages_per_sheet(pages_per_sheet).map_err(|e| e.to_string())?,
                options,
            },
            LayoutRequest::Posterize {
                render_scale,
                grid,
                overlap,
                output_size,
                mode,
            } => LayoutCommand::Posterize {
                page: pages
                    .first()
                    .copied()
                    .ok_or_else(|| "No page selected to posterize".to_string())?,
                render_scale,
                grid,
                overlap,
                output_size,
                mode,
            },
            LayoutRequest::Stack { options } => LayoutCommand::Stack { pages, options },
            LayoutRequest::Standardize { target, mode } => {
                LayoutCommand::Standardize { pages, target, mode }
            }
            LayoutRequest::Rotate { angle } => LayoutCommand::Rotate { pages, angle },
        };
        Ok(command)
    }
}

/// A page as the session numbers it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionPage {
    /// Session-wide id used in plans (1-indexed, document order)
    pub id: PageId,
    pub document: usize,
    #[serde(flatten)]
    pub info: PageInfo,
}

/// Layout session that holds page metadata in Rust memory
#[wasm_bindgen]
pub struct LayoutSession {
    documents: Vec<DocumentEntry>,
    /// 1-based positions into the session's page list; empty means all
    selection: Vec<u32>,
    progress_callback: Option<js_sys::Function>,
}

impl Default for LayoutSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl LayoutSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            selection: Vec::new(),
            progress_callback: None,
        }
    }

    /// Callback signature: (current: number, total: number, message: string) => void
    #[wasm_bindgen(js_name = setProgressCallback)]
    pub fn set_progress_callback(&mut self, callback: js_sys::Function) {
        self.progress_callback = Some(callback);
    }

    /// Add a document; returns its info as JSON
    #[wasm_bindgen(js_name = addDocument)]
    pub fn add_document(&mut self, name: &str, bytes: &[u8]) -> Result<JsValue, JsValue> {
        let info = self
            .add_document_internal(name, bytes)
            .map_err(|e| JsValue::from_str(&e))?;
        to_js(&info)
    }

    #[wasm_bindgen(js_name = removeDocument)]
    pub fn remove_document(&mut self, index: usize) -> Result<(), JsValue> {
        self.remove_document_internal(index)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// new_order lists current indices in the desired order
    #[wasm_bindgen(js_name = reorderDocuments)]
    pub fn reorder_documents(&mut self, new_order: &[usize]) -> Result<(), JsValue> {
        self.reorder_documents_internal(new_order)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Input: "1-3, 5, 8-10" over the session's page numbering.
    /// An empty string selects every page.
    #[wasm_bindgen(js_name = setPageSelection)]
    pub fn set_page_selection(&mut self, range_str: &str) -> Result<(), JsValue> {
        self.set_page_selection_internal(range_str)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = getSelectedPages)]
    pub fn get_selected_pages(&self) -> Vec<u32> {
        if self.selection.is_empty() {
            (1..=self.get_total_page_count()).collect()
        } else {
            self.selection.clone()
        }
    }

    /// Every page with its session id, owning document and metadata
    #[wasm_bindgen(js_name = getPages)]
    pub fn get_pages(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session_pages())
    }

    #[wasm_bindgen(js_name = getDocumentInfos)]
    pub fn get_document_infos(&self) -> Result<JsValue, JsValue> {
        let infos: Vec<_> = self
            .documents
            .iter()
            .map(|d| DocumentInfoJs {
                name: d.name.clone(),
                page_count: d.info.page_count,
                size_bytes: d.info.size_bytes,
                version: d.info.version.clone(),
                encrypted: d.info.encrypted,
            })
            .collect();
        to_js(&infos)
    }

    #[wasm_bindgen(js_name = getTotalPageCount)]
    pub fn get_total_page_count(&self) -> u32 {
        self.documents.iter().map(|d| d.pages.len() as u32).sum()
    }

    #[wasm_bindgen(js_name = getDocumentCount)]
    pub fn get_document_count(&self) -> usize {
        self.documents.len()
    }

    #[wasm_bindgen(js_name = canPlan)]
    pub fn can_plan(&self) -> bool {
        !self.documents.is_empty()
    }

    /// Plan a layout request over the selected pages
    pub fn plan(&self, request: JsValue) -> Result<JsValue, JsValue> {
        let request: LayoutRequest = serde_wasm_bindgen::from_value(request)
            .map_err(|e| JsValue::from_str(&format!("Invalid request: {}", e)))?;

        self.report_progress(0, 100, "Planning layout...");
        let plan = self
            .plan_internal(request)
            .map_err(|e| JsValue::from_str(&e))?;
        self.report_progress(100, 100, "Complete");

        to_js(&plan)
    }
}

impl LayoutSession {
    fn add_document_internal(&mut self, name: &str, bytes: &[u8]) -> Result<PdfInfo, String> {
        crate::validation::quick_validate(bytes)?;
        let document =
            Document::load_mem(bytes).map_err(|e| format!("Failed to parse PDF: {}", e))?;
        let info = summarize(&document, bytes)?;
        let pages = PageInfo::all_from_document(&document)?;

        self.documents.push(DocumentEntry {
            name: name.to_string(),
            info: info.clone(),
            pages,
        });
        Ok(info)
    }

    fn remove_document_internal(&mut self, index: usize) -> Result<(), String> {
        if index >= self.documents.len() {
            return Err("Document index out of bounds".to_string());
        }
        self.documents.remove(index);
        // Session page numbers after `index` have shifted
        self.selection.clear();
        Ok(())
    }

    fn reorder_documents_internal(&mut self, new_order: &[usize]) -> Result<(), String> {
        if new_order.len() != self.documents.len() {
            return Err("Invalid order: wrong number of indices".to_string());
        }
        let mut seen = vec![false; self.documents.len()];
        for &idx in new_order {
            match seen.get_mut(idx) {
                None => return Err("Invalid order: index out of bounds".to_string()),
                Some(true) => return Err("Invalid order: duplicate index".to_string()),
                Some(slot) => *slot = true,
            }
        }

        let mut slots: Vec<Option<DocumentEntry>> = self.documents.drain(..).map(Some).collect();
        self.documents = new_order.iter().filter_map(|&i| slots[i].take()).collect();
        self.selection.clear();
        Ok(())
    }

    fn set_page_selection_internal(&mut self, range_str: &str) -> Result<(), String> {
        if self.documents.is_empty() {
            return Err("No document loaded".to_string());
        }
        self.selection = parse_ranges(range_str, self.get_total_page_count())
            .map_err(|e| format!("Invalid range: {}", e))?;
        Ok(())
    }

    fn session_pages(&self) -> Vec<SessionPage> {
        self.documents
            .iter()
            .enumerate()
            .flat_map(|(document, entry)| {
                entry.pages.iter().map(move |info| (document, info))
            })
            .enumerate()
            .map(|(index, (document, info))| SessionPage {
                id: index as PageId + 1,
                document,
                info: info.clone(),
            })
            .collect()
    }

    fn source_pages(&self) -> Vec<SourcePage> {
        self.session_pages()
            .iter()
            .map(|p| p.info.source_page(p.id))
            .collect()
    }

    fn plan_internal(&self, request: LayoutRequest) -> Result<CompositionPlan, String> {
        if self.documents.is_empty() {
            return Err("No document loaded".to_string());
        }
        let pages = select_pages(&self.source_pages(), &self.selection).map_err(|e| e.to_string())?;
        request
            .into_command(pages)?
            .plan()
            .map_err(|e| e.to_string())
    }

    fn report_progress(&self, current: u32, total: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            let _ = callback.call3(
                &JsValue::null(),
                &JsValue::from(current),
                &JsValue::from(total),
                &JsValue::from_str(message),
            );
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Document info for JS serialization
#[derive(Serialize)]
struct DocumentInfoJs {
    name: String,
    page_count: u32,
    size_bytes: usize,
    version: String,
    encrypted: bool,
}
