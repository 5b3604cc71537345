//! Runtime configuration loaded from the environment (and `.env`).

use std::path::{Path, PathBuf};

use epd_display::options::{DEFAULT_MODEL, DEFAULT_OUTPUT_DIR};
use epd_display::{DisplayOptions, Orientation};
use tracing::warn;

use super::validation::validate_setting;

/// Vendor checkout searched for the panel driver when present.
pub const DEFAULT_VENDOR_DIR: &str = "vendor/waveshare/RaspberryPi_JetsonNano/python/lib";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model: String,
    pub orientation: Orientation,
    pub output_dir: PathBuf,
    /// Driver search locations, highest priority first.
    pub search_paths: Vec<PathBuf>,
    pub rotate_before_fit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            orientation: Orientation::Landscape,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            search_paths: Vec::new(),
            rotate_before_fit: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Invalid values are logged and replaced by their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let g = |key: &str| -> Option<String> {
            let value = lookup(key)?;
            match validate_setting(key, &value) {
                Ok(()) => Some(value),
                Err(reason) => {
                    warn!(key, value = %value, reason = %reason, "Ignoring invalid setting");
                    None
                }
            }
        };

        let defaults = Self::default();

        let model = g("WAVESHARE_DISPLAY_MODEL")
            .or_else(|| g("EPAPER_MODEL"))
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or(defaults.model);
        let orientation = g("EPAPER_ORIENTATION")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.orientation);
        let output_dir = g("EPAPER_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);
        let rotate_before_fit = g("EPAPER_ROTATE_BEFORE_FIT")
            .map(|v| v == "true")
            .unwrap_or(defaults.rotate_before_fit);

        let mut search_paths = Vec::new();
        if let Some(lib) = g("WAVESHARE_LIB_PATH") {
            search_paths.push(PathBuf::from(lib));
        }
        let vendor = g("EPAPER_VENDOR_DIR").unwrap_or_else(|| DEFAULT_VENDOR_DIR.into());
        if Path::new(&vendor).is_dir() {
            search_paths.push(PathBuf::from(vendor));
        }

        Self {
            model,
            orientation,
            output_dir,
            search_paths,
            rotate_before_fit,
        }
    }

    /// Options for opening the display sink.
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions::new()
            .with_model(self.model.clone())
            .with_orientation(self.orientation)
            .with_search_paths(self.search_paths.clone())
            .with_output_dir(self.output_dir.clone())
    }
}
