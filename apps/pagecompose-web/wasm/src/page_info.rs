//! Page metadata read from PDF bytes
//!
//! Turns lopdf page dictionaries into the engine's [`SourcePage`] values.
//! PDF stores `/Rotate` clockwise; the engine works counter-clockwise.

use lopdf::{Dictionary, Document, Object};
use pagecompose_core::rotate::displayed_size;
use pagecompose_core::{PageId, PageOrientation, Size, SourcePage};
use serde::Serialize;

/// Guard against cyclic /Parent chains in damaged files
const MAX_TREE_DEPTH: usize = 32;

/// Information about a single PDF page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageInfo {
    /// Page number within its document (1-indexed)
    pub page_num: u32,
    /// MediaBox width in points
    pub width: f64,
    pub height: f64,
    /// Counter-clockwise rotation in degrees
    pub rotation: f64,
    pub has_content: bool,
    /// Orientation as displayed, rotation applied
    pub orientation: PageOrientation,
}

impl PageInfo {
    pub fn from_document(doc: &Document, page_num: u32) -> Result<Self, String> {
        let pages = doc.get_pages();
        let page_id = pages
            .get(&page_num)
            .ok_or_else(|| format!("Page {} not found", page_num))?;
        let page = doc
            .get_object(*page_id)
            .and_then(|o| o.as_dict())
            .map_err(|_| format!("Page {} is not a dictionary", page_num))?;

        let size = match inherited(doc, page, b"MediaBox") {
            Some(media_box) => box_size(doc, media_box)
                .map_err(|e| format!("Page {}: {}", page_num, e))?,
            None => Size::letter(),
        };
        let rotation = inherited(doc, page, b"Rotate")
            .and_then(|o| o.as_i64().ok())
            .map(counter_clockwise)
            .unwrap_or(0.0);

        let displayed = displayed_size(&SourcePage::new(0, size).with_rotation(rotation))
            .map_err(|e| e.to_string())?;

        Ok(Self {
            page_num,
            width: size.width,
            height: size.height,
            rotation,
            has_content: page.has(b"Contents"),
            orientation: displayed.orientation(),
        })
    }

    pub fn all_from_document(doc: &Document) -> Result<Vec<Self>, String> {
        (1..=doc.get_pages().len() as u32)
            .map(|n| Self::from_document(doc, n))
            .collect()
    }

    pub fn source_page(&self, id: PageId) -> SourcePage {
        SourcePage::new(
            id,
            Size {
                width: self.width,
                height: self.height,
            },
        )
        .with_rotation(self.rotation)
    }
}

/// Look `key` up on the page, then up the page tree
fn inherited<'a>(doc: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut dict = page;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return resolve(doc, value);
        }
        let parent = dict.get(b"Parent").and_then(|p| p.as_reference()).ok()?;
        dict = doc.get_object(parent).and_then(|o| o.as_dict()).ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Size of a [x1 y1 x2 y2] box. Corners may come in any order.
fn box_size(doc: &Document, object: &Object) -> Result<Size, String> {
    let items = object
        .as_array()
        .map_err(|_| "MediaBox is not an array".to_string())?;
    if items.len() != 4 {
        return Err(format!("MediaBox has {} entries, expected 4", items.len()));
    }

    let mut coords = [0.0f64; 4];
    for (slot, item) in coords.iter_mut().zip(items) {
        *slot = match resolve(doc, item) {
            Some(Object::Integer(n)) => *n as f64,
            Some(Object::Real(n)) => *n as f64,
            _ => return Err("MediaBox holds a non-numeric entry".to_string()),
        };
    }

    let size = Size {
        width: (coords[2] - coords[0]).abs(),
        height: (coords[3] - coords[1]).abs(),
    };
    size.validate().map_err(|e| e.to_string())?;
    Ok(size)
}

/// Convert a clockwise /Rotate value into counter-clockwise degrees
fn counter_clockwise(rotate: i64) -> f64 {
    ((360 - rotate.rem_euclid(360)) % 360) as f64
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: converted rotations land in [0, 360) and undo the PDF turn
        #[test]
        fn counter_clockwise_undoes_clockwise(quarter in -8i64..8) {
            let rotate = quarter * 90;
            let ccw = counter_clockwise(rotate);
            prop_assert!((0.0..360.0).contains(&ccw));
            prop_assert_eq!((rotate as f64 + ccw).rem_euclid(360.0), 0.0);
        }
    }
}
