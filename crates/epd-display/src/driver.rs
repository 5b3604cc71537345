//! Panel driver interfaces.
//!
//! A [`PanelDriver`] is the handle to a physical panel; a [`DriverLoader`]
//! knows how to find and construct one for a given driver module name.

use std::path::PathBuf;

use image::RgbImage;

use crate::{DisplayError, Result};

/// Trait implemented by hardware panel drivers.
///
/// Images handed to [`PanelDriver::display`] are already quantized to the
/// panel palette and sized to the panel resolution.
pub trait PanelDriver: Send {
    /// Driver module name (e.g. "epd5in65f").
    fn name(&self) -> &str;

    /// Power up and reset the panel.
    fn init(&mut self) -> Result<()>;

    /// Native resolution reported by the driver, if it reports one.
    fn native_size(&self) -> Option<(u32, u32)>;

    /// Push a full frame to the panel.
    fn display(&mut self, image: &RgbImage) -> Result<()>;

    /// Clear the panel to white.
    fn clear(&mut self) -> Result<()>;

    /// Put the panel into deep sleep.
    fn sleep(&mut self) -> Result<()>;
}

/// Locates and constructs panel drivers.
pub trait DriverLoader {
    /// Load the driver `module`, looking in `search_paths` in order.
    fn load(&self, module: &str, search_paths: &[PathBuf]) -> Result<Box<dyn PanelDriver>>;
}

/// Loader used when no hardware support is compiled in; always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDriverLoader;

impl DriverLoader for NoDriverLoader {
    fn load(&self, module: &str, search_paths: &[PathBuf]) -> Result<Box<dyn PanelDriver>> {
        Err(DisplayError::DriverUnavailable {
            module: module.to_string(),
            reason: format!(
                "no driver loader configured ({} search path(s))",
                search_paths.len()
            ),
        })
    }
}

/// Driver module for a panel model, if the model is supported.
pub fn module_for_model(model: &str) -> Option<&'static str> {
    match model.to_ascii_lowercase().as_str() {
        "5in65f" => Some("epd5in65f"),
        _ => None,
    }
}
