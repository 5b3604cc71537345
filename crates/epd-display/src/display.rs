//! The display facade: hardware panel or PNG preview.
//!
//! Writes are best-effort: a failed hardware write is logged and the frame
//! is saved as a preview instead, so callers never lose the image.

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use tracing::{debug, info, warn};

use crate::driver::{DriverLoader, PanelDriver};
use crate::options::{DisplayOptions, Orientation};
use crate::probe::{Capability, probe};
use crate::{PREVIEW_FILE_NAME, Result};
use epd_image::{PANEL_HEIGHT, PANEL_WIDTH};

/// A panel (real or simulated) with its effective resolution.
pub struct EpaperDisplay {
    driver: Option<Box<dyn PanelDriver>>,
    width: u32,
    height: u32,
    output_dir: PathBuf,
}

impl EpaperDisplay {
    /// Probe for hardware via `loader` and build the display.
    pub fn initialize(options: &DisplayOptions, loader: &dyn DriverLoader) -> Result<Self> {
        let capability = probe(options, loader)?;
        Ok(Self::from_capability(capability, options))
    }

    /// Build the display from an already-probed capability.
    pub fn from_capability(capability: Capability, options: &DisplayOptions) -> Self {
        let (driver, mut width, mut height) = match capability {
            Capability::Hardware {
                driver,
                width,
                height,
            } => (Some(driver), width, height),
            Capability::Simulation => {
                info!(output_dir = %options.output_dir.display(), "Display running in simulation mode");
                (None, PANEL_WIDTH, PANEL_HEIGHT)
            }
        };

        if options.orientation == Orientation::Portrait && width > height {
            std::mem::swap(&mut width, &mut height);
        }
        debug!(width, height, orientation = %options.orientation, "Display geometry");

        Self {
            driver,
            width,
            height,
            output_dir: options.output_dir.clone(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_simulated(&self) -> bool {
        self.driver.is_none()
    }

    /// Path of the preview PNG.
    pub fn preview_path(&self) -> PathBuf {
        self.output_dir.join(PREVIEW_FILE_NAME)
    }

    /// Show a prepared frame.
    pub fn show_image(&mut self, image: &RgbImage) -> Result<()> {
        let Some(driver) = self.driver.as_mut() else {
            return self.save_preview(image);
        };

        match driver.display(image) {
            Ok(()) => {
                info!(driver = driver.name(), "Frame sent to panel");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Display write failed, saving preview instead");
                self.save_preview(image)
            }
        }
    }

    /// Clear the panel; in simulation the preview becomes a blank white frame.
    pub fn clear(&mut self) -> Result<()> {
        match self.driver.as_mut() {
            Some(driver) => {
                if let Err(e) = driver.clear() {
                    warn!(error = %e, "Panel clear failed");
                }
                Ok(())
            }
            None => {
                let blank = RgbImage::from_pixel(self.width, self.height, Rgb([255, 255, 255]));
                self.save_preview(&blank)
            }
        }
    }

    /// Put the panel to sleep. No-op in simulation.
    pub fn sleep(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            if let Err(e) = driver.sleep() {
                debug!(error = %e, "Panel sleep failed");
            }
        }
    }

    fn save_preview(&self, image: &RgbImage) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.preview_path();
        write_png(image, &path)?;
        info!(path = %path.display(), "Preview saved");
        Ok(())
    }
}

fn write_png(image: &RgbImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
