use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// Zero width/height, a size that overflows, or a pixel buffer whose
    /// length is not `width * height`.
    #[error("invalid dimensions {width}x{height} for a buffer of {pixels} pixels")]
    InvalidDimensions {
        width: usize,
        height: usize,
        pixels: usize,
    },
    #[error("invalid engine parameters: {0}")]
    InvalidParams(String),
    #[error("cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: usize, y: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
