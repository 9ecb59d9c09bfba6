//! Collaborator interfaces
//!
//! The layout components never render or build documents themselves. These
//! traits describe what a caller plugs in to execute a plan: a page source
//! that can rasterize pages, and a canvas builder that assembles output.

use crate::geometry::{normalize_degrees, PageId, Point, Rect, Size};
use crate::plan::LineStyle;
use crate::rotate::{content_offset, rotate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Page {0} has no renderable content")]
    NoContent(PageId),

    #[error("Renderer failed: {0}")]
    Backend(String),
}

/// A page the caller can describe and rasterize
pub trait PageSource {
    fn id(&self) -> PageId;

    fn size(&self) -> Size;

    /// Page rotation in degrees, counter-clockwise
    fn rotation(&self) -> f64;

    /// Rasterize the unrotated page at `scale` pixels per point
    fn render_to_pixels(&self, scale: f64) -> Result<PixelBuffer, RenderError>;
}

/// Output document under construction
pub trait CanvasBuilder {
    type Handle: Copy;
    type Error: std::fmt::Display;

    fn add_page(&mut self, size: Size) -> Result<Self::Handle, Self::Error>;

    fn draw_image(
        &mut self,
        page: Self::Handle,
        image: &PixelBuffer,
        rect: &Rect,
    ) -> Result<(), Self::Error>;

    fn draw_rect(
        &mut self,
        page: Self::Handle,
        rect: &Rect,
        style: &LineStyle,
    ) -> Result<(), Self::Error>;

    fn draw_line(
        &mut self,
        page: Self::Handle,
        start: Point,
        end: Point,
        style: &LineStyle,
    ) -> Result<(), Self::Error>;

    /// Centered text inside `rect`, used for placeholders
    fn draw_label(&mut self, page: Self::Handle, rect: &Rect, text: &str)
        -> Result<(), Self::Error>;
}

/// RGBA8 raster, rows top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Copy out `region`, snapped outward to whole pixels and clamped to
    /// the buffer
    pub fn crop(&self, region: &Rect) -> PixelBuffer {
        let x0 = region.x.floor().clamp(0.0, self.width as f64) as u32;
        let y0 = region.y.floor().clamp(0.0, self.height as f64) as u32;
        let x1 = region.right().ceil().clamp(0.0, self.width as f64) as u32;
        let y1 = region.top().ceil().clamp(0.0, self.height as f64) as u32;

        let width = x1.saturating_sub(x0);
        let height = y1.saturating_sub(y0);
        let mut out = PixelBuffer::new(width, height);
        let row_bytes = width as usize * 4;
        for row in 0..height {
            let src = ((y0 + row) as usize * self.width as usize + x0 as usize) * 4;
            let dst = row as usize * row_bytes;
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        out
    }

    /// Rotate counter-clockwise by `angle_degrees` onto a transparent
    /// buffer sized to the bounding box, sampling nearest pixels
    pub fn rotated(&self, angle_degrees: f64) -> PixelBuffer {
        let angle = normalize_degrees(angle_degrees);
        if angle == 0.0 || self.width == 0 || self.height == 0 {
            return self.clone();
        }
        let source = Size {
            width: self.width as f64,
            height: self.height as f64,
        };
        let Ok(result) = rotate(source, angle) else {
            return self.clone();
        };
        let out_width = (result.bounding_size.width - 1e-6).ceil().max(1.0) as u32;
        let out_height = (result.bounding_size.height - 1e-6).ceil().max(1.0) as u32;
        let offset = content_offset(source, angle);
        let (sin, cos) = angle.to_radians().sin_cos();

        let mut out = PixelBuffer::new(out_width, out_height);
        for oy in 0..out_height {
            for ox in 0..out_width {
                // Pixel center in y-up coordinates, minus the translation
                let qx = ox as f64 + 0.5 - offset.x;
                let qy = out_height as f64 - (oy as f64 + 0.5) - offset.y;
                // Inverse rotation back into the source
                let px = qx * cos + qy * sin;
                let py = -qx * sin + qy * cos;
                if px < 0.0 || py < 0.0 || px >= source.width || py >= source.height {
                    continue;
                }
                let sx = px.floor() as u32;
                let sy = self.height - 1 - (py.floor() as u32).min(self.height - 1);
                if let Some(rgba) = self.pixel(sx, sy) {
                    out.put(ox, oy, rgba);
                }
            }
        }
        out
    }
}
