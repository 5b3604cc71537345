//! Font resolution, measurement and drawing.
//!
//! A [`TextFont`] is either an outline font loaded from disk (rendered with
//! ab_glyph/imageproc) or one of the built-in ASCII bitmap fonts. Loading
//! an outline font is fallible; [`TextFont::resolve`] turns any failure into
//! the built-in font so text rendering never aborts.

use std::convert::Infallible;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use embedded_graphics::Pixel;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point, Size};
use embedded_graphics::mono_font::ascii::{
    FONT_4X6, FONT_5X8, FONT_6X10, FONT_6X13, FONT_7X14, FONT_8X13, FONT_9X15, FONT_9X18,
    FONT_10X20,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::{debug, warn};

/// Built-in fonts ordered by glyph height, then width.
const BUILTIN_FONTS: [&MonoFont<'static>; 9] = [
    &FONT_4X6, &FONT_5X8, &FONT_6X10, &FONT_6X13, &FONT_8X13, &FONT_7X14, &FONT_9X15, &FONT_9X18,
    &FONT_10X20,
];

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Font file not readable: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported font data: {0}")]
    InvalidFont(#[from] ab_glyph::InvalidFont),
}

/// A font ready to measure and draw text at a fixed size.
pub enum TextFont {
    Outline { font: FontVec, scale: PxScale },
    Builtin(&'static MonoFont<'static>),
}

impl std::fmt::Debug for TextFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline { scale, .. } => f
                .debug_struct("Outline")
                .field("scale", &scale.y)
                .finish(),
            Self::Builtin(font) => f
                .debug_tuple("Builtin")
                .field(&font.character_size)
                .finish(),
        }
    }
}

impl TextFont {
    /// Load an outline font (TTF/OTF) from `path` at `size` pixels.
    pub fn load(path: &Path, size: u32) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        let font = FontVec::try_from_vec(data)?;
        debug!(path = %path.display(), size, "Loaded outline font");
        Ok(Self::Outline {
            font,
            scale: PxScale::from(size as f32),
        })
    }

    /// The tallest built-in font whose glyphs fit within `size` pixels.
    pub fn builtin(size: u32) -> Self {
        let font = BUILTIN_FONTS
            .iter()
            .copied()
            .filter(|f| f.character_size.height <= size)
            .last()
            .unwrap_or(BUILTIN_FONTS[0]);
        Self::Builtin(font)
    }

    /// Load `path` if given, falling back to the built-in font on any error.
    pub fn resolve(path: Option<&Path>, size: u32) -> Self {
        let Some(path) = path else {
            return Self::builtin(size);
        };
        match Self::load(path, size) {
            Ok(font) => font,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Font load failed, using built-in font");
                Self::builtin(size)
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }

    /// Bounding-box width and height of `text` rendered as a single line.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            Self::Outline { font, scale } => text_size(*scale, font, text),
            Self::Builtin(font) => {
                let n = text.chars().count() as u32;
                if n == 0 {
                    return (0, 0);
                }
                let width = n * font.character_size.width + (n - 1) * font.character_spacing;
                (width, font.character_size.height)
            }
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`). Off-canvas pixels are clipped.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        match self {
            Self::Outline { font, scale } => draw_text_mut(canvas, color, x, y, *scale, font, text),
            Self::Builtin(font) => {
                let [r, g, b] = color.0;
                let style = MonoTextStyle::new(font, Rgb888::new(r, g, b));
                let text = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top);
                let _ = text.draw(&mut ImageTarget(canvas));
            }
        }
    }
}

/// Adapts an `RgbImage` to the embedded-graphics draw target interface.
struct ImageTarget<'a>(&'a mut RgbImage);

impl OriginDimensions for ImageTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl DrawTarget for ImageTarget<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.0.dimensions();
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            if x >= width || y >= height {
                continue;
            }
            self.0.put_pixel(x, y, Rgb([color.r(), color.g(), color.b()]));
        }
        Ok(())
    }
}
