//! Orientation transforms: rotation by arbitrary degrees and mirroring.
//!
//! Angles are counter-clockwise. Quarter turns are exact pixel transposes;
//! any other angle is resampled with bicubic interpolation onto a canvas
//! expanded so that no corner is clipped.

use image::imageops;
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::debug;

/// Color of the area uncovered by a non-quarter-turn rotation.
pub const ROTATION_FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Rotate by `degrees`, then flip left-right if `mirror` is set.
pub fn orient(img: &RgbImage, degrees: i32, mirror: bool) -> RgbImage {
    let rotated = rotate(img, degrees);
    if mirror {
        debug!("Mirroring image horizontally");
        imageops::flip_horizontal(&rotated)
    } else {
        rotated
    }
}

/// Rotate an image counter-clockwise by `degrees`.
///
/// Multiples of 360 return an identical copy.
pub fn rotate(img: &RgbImage, degrees: i32) -> RgbImage {
    let (w, h) = img.dimensions();
    match degrees.rem_euclid(360) {
        0 => img.clone(),
        90 => {
            debug!(w, h, "Rotating image 90 degrees counter-clockwise");
            imageops::rotate270(img)
        }
        180 => {
            debug!(w, h, "Rotating image 180 degrees");
            imageops::rotate180(img)
        }
        270 => {
            debug!(w, h, "Rotating image 270 degrees counter-clockwise");
            imageops::rotate90(img)
        }
        d => rotate_expand(img, d as f32),
    }
}

/// Size of the smallest canvas holding `width` x `height` rotated by `degrees`.
pub fn expanded_size(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    let theta = f64::from(degrees).to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let (w, h) = (f64::from(width), f64::from(height));
    // Trim float noise so an exact integer extent does not round up.
    let span = |v: f64| ((v - 1e-6).ceil() as u32).max(1);
    (span(w * cos + h * sin), span(w * sin + h * cos))
}

fn rotate_expand(img: &RgbImage, degrees: f32) -> RgbImage {
    let (w, h) = img.dimensions();
    let (new_w, new_h) = expanded_size(w, h, degrees);
    debug!(w, h, new_w, new_h, degrees, "Rotating image with bicubic resampling");

    // Image y grows downward, so a counter-clockwise turn is a negative angle.
    let projection = Projection::translate(new_w as f32 / 2.0, new_h as f32 / 2.0)
        * Projection::rotate(-degrees.to_radians())
        * Projection::translate(-(w as f32) / 2.0, -(h as f32) / 2.0);

    let mut out = RgbImage::from_pixel(new_w, new_h, ROTATION_FILL);
    warp_into(img, &projection, Interpolation::Bicubic, ROTATION_FILL, &mut out);
    out
}
