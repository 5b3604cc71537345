//! Display sink for seven-color e-paper panels.
//!
//! Probes for a hardware panel driver through an injected loader and falls
//! back to a simulation sink that writes a PNG preview when no driver is
//! available.

pub mod display;
pub mod driver;
pub mod options;
pub mod probe;

// Re-exports for convenience
pub use display::EpaperDisplay;
pub use driver::{DriverLoader, NoDriverLoader, PanelDriver};
pub use options::{DisplayOptions, Orientation};
pub use probe::{Capability, probe};

/// File written by the simulation sink (and by hardware write fallbacks).
pub const PREVIEW_FILE_NAME: &str = "last_output.png";

/// Errors that can occur during display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Unsupported display model: {0}")]
    UnsupportedModel(String),

    #[error("Panel driver '{module}' not available: {reason}")]
    DriverUnavailable { module: String, reason: String },

    #[error("Panel driver error: {0}")]
    Driver(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encode error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for display operations.
pub type Result<T> = std::result::Result<T, DisplayError>;
