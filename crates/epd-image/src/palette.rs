//! The fixed seven-color panel palette.
//!
//! Order follows the panel driver's index convention (black and white
//! first), so a color's position doubles as its index in packed output.

use std::collections::HashMap;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::{ImageError, Result};

/// Palette RGB values in device index order.
pub const PALETTE: [Rgb<u8>; 7] = [
    Rgb([0, 0, 0]),
    Rgb([255, 255, 255]),
    Rgb([0, 255, 0]),
    Rgb([0, 0, 255]),
    Rgb([255, 0, 0]),
    Rgb([255, 255, 0]),
    Rgb([255, 165, 0]),
];

/// A member of the panel palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteColor {
    Black,
    White,
    Green,
    Blue,
    Red,
    Yellow,
    Orange,
}

impl PaletteColor {
    /// All colors in device index order.
    pub const ALL: [PaletteColor; 7] = [
        Self::Black,
        Self::White,
        Self::Green,
        Self::Blue,
        Self::Red,
        Self::Yellow,
        Self::Orange,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn rgb(self) -> Rgb<u8> {
        PALETTE[self as usize]
    }

    /// Exact palette member for `rgb`, if any.
    pub fn from_rgb(rgb: Rgb<u8>) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.rgb() == rgb)
    }

    /// Nearest palette color by squared Euclidean distance in RGB.
    ///
    /// Ties resolve to the lower index.
    pub fn nearest(rgb: [u8; 3]) -> Self {
        let mut best = Self::Black;
        let mut best_dist = u32::MAX;
        for color in Self::ALL {
            let d = distance_sq(rgb, color.rgb().0);
            if d < best_dist {
                best = color;
                best_dist = d;
            }
        }
        best
    }
}

fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}

/// Memoized nearest-color lookup scoped to a single quantization call.
#[derive(Debug, Default)]
pub(crate) struct NearestLookup {
    cache: HashMap<[u8; 3], PaletteColor>,
}

impl NearestLookup {
    pub(crate) fn get(&mut self, rgb: [u8; 3]) -> PaletteColor {
        *self
            .cache
            .entry(rgb)
            .or_insert_with(|| PaletteColor::nearest(rgb))
    }
}

/// Convert a quantized image to one palette index per pixel, row-major.
pub fn index_image(img: &RgbImage) -> Result<Vec<u8>> {
    img.enumerate_pixels()
        .map(|(x, y, px)| {
            PaletteColor::from_rgb(*px)
                .map(PaletteColor::index)
                .ok_or(ImageError::OffPalette { x, y })
        })
        .collect()
}
