//! Display configuration options.
//!
//! The driver search locations are resolved once by the caller and passed
//! in here; nothing in this crate mutates a global search path.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default panel model.
pub const DEFAULT_MODEL: &str = "5in65f";

/// Default directory for preview output.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Logical panel orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
        })
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landscape" => Ok(Self::Landscape),
            "portrait" => Ok(Self::Portrait),
            other => Err(format!("must be 'landscape' or 'portrait', got '{other}'")),
        }
    }
}

/// Configuration options for the display sink.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// Panel model name, e.g. `5in65f`.
    pub model: String,

    pub orientation: Orientation,

    /// Locations a driver loader may search, in priority order.
    pub search_paths: Vec<PathBuf>,

    /// Where the simulation sink writes its preview PNG.
    pub output_dir: PathBuf,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            orientation: Orientation::Landscape,
            search_paths: Vec::new(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl DisplayOptions {
    /// Create options with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the panel model (case-insensitive).
    pub fn with_model(mut self, val: impl Into<String>) -> Self {
        self.model = val.into().to_lowercase();
        self
    }

    /// Builder: set orientation.
    pub fn with_orientation(mut self, val: Orientation) -> Self {
        self.orientation = val;
        self
    }

    /// Builder: set driver search locations.
    pub fn with_search_paths(mut self, val: Vec<PathBuf>) -> Self {
        self.search_paths = val;
        self
    }

    /// Builder: set preview output directory.
    pub fn with_output_dir(mut self, val: impl Into<PathBuf>) -> Self {
        self.output_dir = val.into();
        self
    }
}
