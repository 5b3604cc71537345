//! Geometric fitting of a source image into a canvas of exact dimensions.
//!
//! All resampling uses Lanczos3 filtering. The output of [`fit_image`] is
//! always exactly the requested target size.

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ParseOptionError, Result, check_source, check_target};

/// How a source image is mapped onto the target canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Preserve aspect ratio, pad the shorter axis with the background.
    #[default]
    Fit,
    /// Preserve aspect ratio, crop the overflowing axis.
    Fill,
    /// Ignore aspect ratio.
    Stretch,
}

impl FitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Fill => "fill",
            Self::Stretch => "stretch",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(Self::Fit),
            "fill" => Ok(Self::Fill),
            "stretch" => Ok(Self::Stretch),
            _ => Err(ParseOptionError {
                kind: "fit mode",
                value: s.to_string(),
                expected: "fit, fill, stretch",
            }),
        }
    }
}

/// Map `img` onto a `target_width` x `target_height` canvas.
///
/// `background` is only visible in [`FitMode::Fit`], where it fills the
/// letterbox (or pillarbox) bands around the centered content.
pub fn fit_image(
    img: &RgbImage,
    target_width: u32,
    target_height: u32,
    mode: FitMode,
    background: Rgb<u8>,
) -> Result<RgbImage> {
    check_target(target_width, target_height)?;
    let (src_w, src_h) = img.dimensions();
    check_source(src_w, src_h)?;

    debug!(
        src_w,
        src_h,
        target_width,
        target_height,
        mode = mode.as_str(),
        "Fitting image"
    );

    match mode {
        FitMode::Stretch => Ok(imageops::resize(
            img,
            target_width,
            target_height,
            FilterType::Lanczos3,
        )),
        FitMode::Fit => Ok(letterbox(img, target_width, target_height, background)),
        FitMode::Fill => Ok(cover_and_crop(img, target_width, target_height)),
    }
}

fn aspect_ratio(width: u32, height: u32) -> f64 {
    f64::from(width) / f64::from(height)
}

fn scaled(value: f64) -> u32 {
    (value.round() as u32).max(1)
}

fn letterbox(img: &RgbImage, target_width: u32, target_height: u32, background: Rgb<u8>) -> RgbImage {
    let src_ratio = aspect_ratio(img.width(), img.height());
    let dst_ratio = aspect_ratio(target_width, target_height);

    let (new_w, new_h) = if src_ratio > dst_ratio {
        (target_width, scaled(f64::from(target_width) / src_ratio).min(target_height))
    } else {
        (scaled(f64::from(target_height) * src_ratio).min(target_width), target_height)
    };

    let resized = imageops::resize(img, new_w, new_h, FilterType::Lanczos3);
    let mut canvas = RgbImage::from_pixel(target_width, target_height, background);
    let off_x = (target_width - new_w) / 2;
    let off_y = (target_height - new_h) / 2;
    debug!(new_w, new_h, off_x, off_y, "Letterboxing resized content");
    imageops::replace(&mut canvas, &resized, i64::from(off_x), i64::from(off_y));
    canvas
}

fn cover_and_crop(img: &RgbImage, target_width: u32, target_height: u32) -> RgbImage {
    let src_ratio = aspect_ratio(img.width(), img.height());
    let dst_ratio = aspect_ratio(target_width, target_height);

    // The scaled dimension is always >= its target because the ratio comparison
    // picks the axis that overflows.
    let (new_w, new_h) = if src_ratio > dst_ratio {
        (scaled(f64::from(target_height) * src_ratio).max(target_width), target_height)
    } else {
        (target_width, scaled(f64::from(target_width) / src_ratio).max(target_height))
    };

    let resized = imageops::resize(img, new_w, new_h, FilterType::Lanczos3);
    let left = (new_w - target_width) / 2;
    let top = (new_h - target_height) / 2;
    debug!(new_w, new_h, left, top, "Cropping resized content");
    imageops::crop_imm(&resized, left, top, target_width, target_height).to_image()
}
