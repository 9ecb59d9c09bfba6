use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid rotation angle: {0}")]
    InvalidAngle(f64),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Overlap must be a non-negative distance, got {0}")]
    InvalidOverlap(f64),

    #[error("Overlap {overlap} leaves no content in a {tile_width}x{tile_height} tile")]
    OverlapTooLarge {
        overlap: f64,
        tile_width: f64,
        tile_height: f64,
    },

    #[error("Nothing to compose: {0}")]
    EmptyInput(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Page rendering failed: {0}")]
    RenderFailed(String),

    #[error("Canvas build failed: {0}")]
    BuildFailed(String),
}
