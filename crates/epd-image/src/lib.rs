//! Image preparation for seven-color e-paper panels.
//!
//! Turns an arbitrary raster image (or a block of text) into a bitmap of
//! an exact size whose pixels are all members of the fixed panel palette.
//! Every operation takes its input by reference and returns a new buffer.

pub mod dither;
pub mod fit;
pub mod font;
pub mod palette;
pub mod pipeline;
pub mod rotate;
pub mod text;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use dither::{is_quantized, quantize};
pub use fit::{FitMode, fit_image};
pub use font::{FontError, TextFont};
pub use palette::{PALETTE, PaletteColor, index_image};
pub use pipeline::{PrepareOptions, prepare};
pub use rotate::{orient, rotate};
pub use text::{HorizontalAlign, Line, TextLayout, VerticalAlign, render_text, wrap_text};

/// Native resolution of the 5.65" seven-color panel.
pub const PANEL_WIDTH: u32 = 600;
pub const PANEL_HEIGHT: u32 = 448;

/// Errors raised when a precondition of the pipeline is violated.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Invalid target dimensions {width}x{height}: both must be positive")]
    InvalidTargetSize { width: u32, height: u32 },

    #[error("Source image has no pixels ({width}x{height})")]
    EmptySource { width: u32, height: u32 },

    #[error("Invalid font size {0}: must be positive")]
    InvalidFontSize(u32),

    #[error("Invalid line spacing {0}: must be a positive finite number")]
    InvalidLineSpacing(f32),

    #[error("Pixel at ({x}, {y}) is not a palette color")]
    OffPalette { x: u32, y: u32 },
}

/// Result type alias for image preparation.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Error returned when parsing an option name such as `fit` or `center`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Reject zero-sized targets before any pixel work starts.
pub(crate) fn check_target(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidTargetSize { width, height });
    }
    Ok(())
}

/// Reject sources without pixels.
pub(crate) fn check_source(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ImageError::EmptySource { width, height });
    }
    Ok(())
}
