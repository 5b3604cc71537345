//! The fixed preparation sequence feeding a display sink.
//!
//! normalize to RGB -> fit -> orient -> quantize -> enforce exact size

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use tracing::{debug, warn};

use crate::fit::{FitMode, fit_image};
use crate::rotate::orient;
use crate::{PANEL_HEIGHT, PANEL_WIDTH, Result, check_source, check_target, dither};

/// Parameters for [`prepare`].
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareOptions {
    pub width: u32,
    pub height: u32,
    pub mode: FitMode,
    pub dither: bool,
    /// Counter-clockwise rotation in degrees.
    pub rotate: i32,
    pub mirror: bool,
    /// Letterbox color for [`FitMode::Fit`].
    pub background: Rgb<u8>,
    /// Orient the source before fitting instead of after.
    ///
    /// The default (after fitting) can change the canvas size when the
    /// rotation is not a multiple of 180 degrees; the final nearest-neighbor
    /// resize then distorts the content. Orienting first avoids that.
    pub rotate_before_fit: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self::new(PANEL_WIDTH, PANEL_HEIGHT)
    }
}

impl PrepareOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            mode: FitMode::Fit,
            dither: true,
            rotate: 0,
            mirror: false,
            background: Rgb([255, 255, 255]),
            rotate_before_fit: false,
        }
    }

    pub fn with_mode(mut self, val: FitMode) -> Self {
        self.mode = val;
        self
    }

    pub fn with_dither(mut self, val: bool) -> Self {
        self.dither = val;
        self
    }

    pub fn with_rotate(mut self, val: i32) -> Self {
        self.rotate = val;
        self
    }

    pub fn with_mirror(mut self, val: bool) -> Self {
        self.mirror = val;
        self
    }

    pub fn with_background(mut self, val: Rgb<u8>) -> Self {
        self.background = val;
        self
    }

    pub fn with_rotate_before_fit(mut self, val: bool) -> Self {
        self.rotate_before_fit = val;
        self
    }
}

/// Prepare `img` for the panel.
///
/// The result is exactly `opts.width` x `opts.height` and contains only
/// palette colors.
pub fn prepare(img: &DynamicImage, opts: &PrepareOptions) -> Result<RgbImage> {
    check_target(opts.width, opts.height)?;
    debug!(
        src_w = img.width(),
        src_h = img.height(),
        width = opts.width,
        height = opts.height,
        mode = opts.mode.as_str(),
        dither = opts.dither,
        rotate = opts.rotate,
        mirror = opts.mirror,
        "Preparing image"
    );

    let rgb = normalize(img);
    check_source(rgb.width(), rgb.height())?;

    let shaped = if opts.rotate_before_fit {
        let oriented = orient(&rgb, opts.rotate, opts.mirror);
        fit_image(&oriented, opts.width, opts.height, opts.mode, opts.background)?
    } else {
        let fitted = fit_image(&rgb, opts.width, opts.height, opts.mode, opts.background)?;
        orient(&fitted, opts.rotate, opts.mirror)
    };

    let quantized = dither::quantize(&shaped, opts.dither);

    if quantized.dimensions() == (opts.width, opts.height) {
        return Ok(quantized);
    }

    // Nearest-neighbor keeps the output inside the palette.
    warn!(
        got_w = quantized.width(),
        got_h = quantized.height(),
        width = opts.width,
        height = opts.height,
        "Rotation changed the canvas size, forcing final size"
    );
    Ok(imageops::resize(
        &quantized,
        opts.width,
        opts.height,
        FilterType::Nearest,
    ))
}

/// Convert any color model (gray, RGBA, 16-bit, ...) to 8-bit RGB.
fn normalize(img: &DynamicImage) -> RgbImage {
    match img {
        DynamicImage::ImageRgb8(rgb) => rgb.clone(),
        other => other.to_rgb8(),
    }
}
