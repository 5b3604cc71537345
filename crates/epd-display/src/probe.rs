//! Hardware capability probe.
//!
//! Decides once, at startup, whether a physical panel is driven or the
//! simulation sink is used. Driver failures are not errors here: they
//! select [`Capability::Simulation`].

use tracing::{info, warn};

use crate::driver::{DriverLoader, PanelDriver, module_for_model};
use crate::options::DisplayOptions;
use crate::{DisplayError, Result};
use epd_image::{PANEL_HEIGHT, PANEL_WIDTH};

/// Outcome of probing for a panel.
pub enum Capability {
    Hardware {
        driver: Box<dyn PanelDriver>,
        width: u32,
        height: u32,
    },
    Simulation,
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hardware {
                driver,
                width,
                height,
            } => f
                .debug_struct("Hardware")
                .field("driver", &driver.name())
                .field("width", width)
                .field("height", height)
                .finish(),
            Self::Simulation => f.write_str("Simulation"),
        }
    }
}

impl Capability {
    pub fn is_hardware(&self) -> bool {
        matches!(self, Self::Hardware { .. })
    }
}

/// Probe for the panel described by `options`.
///
/// Fails only for an unknown model; a missing or failing driver yields
/// [`Capability::Simulation`].
pub fn probe(options: &DisplayOptions, loader: &dyn DriverLoader) -> Result<Capability> {
    let module = module_for_model(&options.model)
        .ok_or_else(|| DisplayError::UnsupportedModel(options.model.clone()))?;

    let mut driver = match loader.load(module, &options.search_paths) {
        Ok(driver) => driver,
        Err(e) => {
            warn!(module, error = %e, "Using simulation mode");
            return Ok(Capability::Simulation);
        }
    };

    if let Err(e) = driver.init() {
        warn!(module, error = %e, "Panel init failed, using simulation mode");
        return Ok(Capability::Simulation);
    }

    let (width, height) = match driver.native_size() {
        Some((w, h)) if w > 0 && h > 0 => (w, h),
        _ => (PANEL_WIDTH, PANEL_HEIGHT),
    };
    info!(module, width, height, "Panel driver initialized");

    Ok(Capability::Hardware {
        driver,
        width,
        height,
    })
}
