//! Palette quantization with optional Floyd-Steinberg error diffusion.

use image::{Rgb, RgbImage};
use tracing::debug;

use crate::palette::{NearestLookup, PaletteColor};

/// Quantize to the panel palette.
///
/// The nearest-color lookup lives only for the duration of this call.
pub fn quantize(img: &RgbImage, dither: bool) -> RgbImage {
    let mut lookup = NearestLookup::default();
    if dither {
        floyd_steinberg_dither(img, &mut lookup)
    } else {
        nearest_color_map(img, &mut lookup)
    }
}

/// Map every pixel independently to its nearest palette color.
fn nearest_color_map(img: &RgbImage, lookup: &mut NearestLookup) -> RgbImage {
    let (width, height) = img.dimensions();
    debug!(width, height, "Mapping pixels to nearest palette color");

    let mut output = RgbImage::new(width, height);
    for (src, dst) in img.pixels().zip(output.pixels_mut()) {
        *dst = lookup.get(src.0).rgb();
    }
    output
}

/// Floyd-Steinberg error diffusion in raster order.
///
/// Error distribution pattern:
/// - Right:        7/16
/// - Bottom-left:  3/16
/// - Bottom:       5/16
/// - Bottom-right: 1/16
///
/// Weighted errors accumulate unscaled per pixel; the sum is divided by 16
/// once and the result clamped to 0..=255 only when that pixel is quantized.
fn floyd_steinberg_dither(img: &RgbImage, lookup: &mut NearestLookup) -> RgbImage {
    let (width, height) = img.dimensions();
    debug!(width, height, "Applying Floyd-Steinberg dithering");

    let w = width as usize;
    let mut errors: Vec<[i32; 3]> = vec![[0; 3]; w * height as usize];

    let mut output = RgbImage::new(width, height);
    for (x, y, src) in img.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        let acc = errors[y * w + x];
        let value: [i32; 3] =
            std::array::from_fn(|c| (i32::from(src.0[c]) + acc[c] / 16).clamp(0, 255));

        let chosen = lookup.get(value.map(|c| c as u8));
        let new = chosen.rgb().0.map(i32::from);
        let error = [value[0] - new[0], value[1] - new[1], value[2] - new[2]];
        output.put_pixel(x as u32, y as u32, chosen.rgb());

        distribute_error(&mut errors, x, y, w, height as usize, error);
    }

    debug!("Floyd-Steinberg dithering complete");
    output
}

/// Add weighted quantization error to not-yet-visited neighbors.
fn distribute_error(
    errors: &mut [[i32; 3]],
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    error: [i32; 3],
) {
    let mut spread = |nx: usize, ny: usize, weight: i32| {
        let acc = &mut errors[ny * width + nx];
        for (a, e) in acc.iter_mut().zip(error) {
            *a += e * weight;
        }
    };

    // Right: 7/16
    if x + 1 < width {
        spread(x + 1, y, 7);
    }
    if y + 1 < height {
        // Bottom-left: 3/16
        if x > 0 {
            spread(x - 1, y + 1, 3);
        }
        // Bottom: 5/16
        spread(x, y + 1, 5);
        // Bottom-right: 1/16
        if x + 1 < width {
            spread(x + 1, y + 1, 1);
        }
    }
}

/// True when every pixel of `img` is exactly a palette color.
pub fn is_quantized(img: &RgbImage) -> bool {
    img.pixels().all(|p: &Rgb<u8>| PaletteColor::from_rgb(*p).is_some())
}
