//! WASM bindings for the page composition tools
//!
//! Page metadata is read from PDF bytes in Rust and composition plans come
//! back to JavaScript as plain objects. Rendering and writing the output
//! document stay in JavaScript, which walks the plan sheet by sheet.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { LayoutSession } from './pkg/pagecompose_wasm.js';
//!
//! await init();
//!
//! const session = new LayoutSession();
//! session.addDocument("a.pdf", bytesA);
//! session.addDocument("b.pdf", bytesB);
//! session.setPageSelection("1-3, 5");
//! const plan = session.plan({
//!     type: "NUpPreset",
//!     sheet_size: { width: 612, height: 792 },
//!     pages_per_sheet: 4,
//! });
//! ```

pub mod page_info;
pub mod session;
pub mod validation;

#[cfg(test)]
mod test_pdf;

use lopdf::Document;
use pagecompose_core::LayoutCommand;
use wasm_bindgen::prelude::*;

pub use page_info::PageInfo;
pub use session::{LayoutRequest, LayoutSession, SessionPage};
pub use validation::PdfInfo;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Returns Ok(()) if the bytes look like a complete PDF
#[wasm_bindgen]
pub fn quick_validate(bytes: &[u8]) -> Result<(), JsValue> {
    validation::quick_validate(bytes).map_err(|e| JsValue::from_str(&e))
}

/// Document summary without creating a session
#[wasm_bindgen]
pub fn get_pdf_info(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let info = validation::validate_pdf(bytes).map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&info)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Page metadata for every page of a document
#[wasm_bindgen]
pub fn get_page_infos(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let infos = read_page_infos(bytes).map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&infos)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn read_page_infos(bytes: &[u8]) -> Result<Vec<PageInfo>, String> {
    let document = Document::load_mem(bytes).map_err(|e| format!("Failed to parse PDF: {}", e))?;
    PageInfo::all_from_document(&document)
}

/// Plan a full layout command whose pages the caller already describes
#[wasm_bindgen]
pub fn plan_layout(command: JsValue) -> Result<JsValue, JsValue> {
    let command: LayoutCommand = serde_wasm_bindgen::from_value(command)
        .map_err(|e| JsValue::from_str(&format!("Invalid command: {}", e)))?;
    let plan = command.plan().map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&plan)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// JSON in, JSON out: a `ProcessResult` envelope around the plan
#[wasm_bindgen]
pub fn process_layout(json: &str) -> String {
    let result = pagecompose_core::process(json);
    serde_json::to_string(&result).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"data":null,"error":"Serialization error: {}","metrics":null}}"#,
            e
        )
    })
}
