//! Text layout and rasterization.
//!
//! Provides greedy word-wrapping, uniform line-height measurement and
//! aligned drawing of a text block onto a background-filled canvas.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::font::TextFont;
use crate::{ImageError, ParseOptionError, Result, check_target};

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: u32 = 28;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl FromStr for HorizontalAlign {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(ParseOptionError {
                kind: "horizontal alignment",
                value: s.to_string(),
                expected: "left, center, right",
            }),
        }
    }
}

impl FromStr for VerticalAlign {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "middle" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            _ => Err(ParseOptionError {
                kind: "vertical alignment",
                value: s.to_string(),
                expected: "top, middle, bottom",
            }),
        }
    }
}

impl fmt::Display for HorizontalAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        })
    }
}

impl fmt::Display for VerticalAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        })
    }
}

/// Layout and styling for [`render_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub align: HorizontalAlign,
    pub valign: VerticalAlign,
    /// Greedy word-wrap to the canvas width. When off, only explicit line
    /// breaks split lines.
    pub wrap: bool,
    /// Outline font file; `None` selects the built-in font.
    pub font_path: Option<PathBuf>,
    pub font_size: u32,
    /// Multiplier applied to the tallest line to get the uniform line pitch.
    pub line_spacing: f32,
    pub text_color: Rgb<u8>,
    pub background: Rgb<u8>,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            align: HorizontalAlign::Left,
            valign: VerticalAlign::Top,
            wrap: true,
            font_path: None,
            font_size: DEFAULT_FONT_SIZE,
            line_spacing: 1.0,
            text_color: Rgb([0, 0, 0]),
            background: Rgb([255, 255, 255]),
        }
    }
}

impl TextLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_align(mut self, val: HorizontalAlign) -> Self {
        self.align = val;
        self
    }

    pub fn with_valign(mut self, val: VerticalAlign) -> Self {
        self.valign = val;
        self
    }

    pub fn with_wrap(mut self, val: bool) -> Self {
        self.wrap = val;
        self
    }

    pub fn with_font_path(mut self, val: Option<PathBuf>) -> Self {
        self.font_path = val;
        self
    }

    pub fn with_font_size(mut self, val: u32) -> Self {
        self.font_size = val;
        self
    }

    pub fn with_line_spacing(mut self, val: f32) -> Self {
        self.line_spacing = val;
        self
    }

    pub fn with_text_color(mut self, val: Rgb<u8>) -> Self {
        self.text_color = val;
        self
    }

    pub fn with_background(mut self, val: Rgb<u8>) -> Self {
        self.background = val;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.font_size == 0 {
            return Err(ImageError::InvalidFontSize(self.font_size));
        }
        if !self.line_spacing.is_finite() || self.line_spacing <= 0.0 {
            return Err(ImageError::InvalidLineSpacing(self.line_spacing));
        }
        Ok(())
    }
}

/// One laid-out line of text with its measured size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub width: u32,
    pub height: u32,
}

impl Line {
    fn measure(font: &TextFont, text: String) -> Self {
        let (width, height) = font.measure(&text);
        Self {
            text,
            width,
            height,
        }
    }
}

/// Greedily wrap `text` into lines no wider than `max_width` pixels.
///
/// Any run of whitespace, including line breaks, separates words. A word
/// that is wider than `max_width` on its own stays unbroken on its own line.
/// Always returns at least one (possibly empty) line.
pub fn wrap_text(font: &TextFont, text: &str, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        if !current.is_empty() {
            let trial = format!("{} {word}", current.join(" "));
            let (width, _) = font.measure(&trial);
            if width > max_width {
                lines.push(current.join(" "));
                current.clear();
            }
        }
        current.push(word);
    }

    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Split on explicit line breaks only.
///
/// `\r\n`, a lone `\r` and the other Unicode line separators all break a
/// line; a trailing break does not add an empty line.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let Some(i) = rest.find(is_line_break) else {
            lines.push(rest.to_string());
            break;
        };
        lines.push(rest[..i].to_string());
        let brk = &rest[i..];
        let skip = if brk.starts_with("\r\n") {
            2
        } else {
            brk.chars().next().map_or(1, char::len_utf8)
        };
        rest = &brk[skip..];
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Render `text` into a `width` x `height` RGB image.
///
/// The font is resolved from `layout.font_path`; an unreadable or invalid
/// font silently falls back to the built-in bitmap font. Text that does
/// not fit is clipped by the canvas edges rather than rejected.
pub fn render_text(text: &str, width: u32, height: u32, layout: &TextLayout) -> Result<RgbImage> {
    check_target(width, height)?;
    layout.validate()?;

    let font = TextFont::resolve(layout.font_path.as_deref(), layout.font_size);
    let mut canvas = RgbImage::from_pixel(width, height, layout.background);

    let raw_lines = if layout.wrap {
        wrap_text(&font, text, width)
    } else {
        split_lines(text)
    };
    let lines: Vec<Line> = raw_lines
        .into_iter()
        .map(|l| Line::measure(&font, l))
        .collect();

    let line_height = uniform_line_height(&lines, layout.line_spacing);
    let block_height = line_height.saturating_mul(lines.len() as i64);
    let (width_i, height_i) = (i64::from(width), i64::from(height));

    let mut y = match layout.valign {
        VerticalAlign::Top => 0,
        VerticalAlign::Middle => (height_i - block_height).div_euclid(2),
        VerticalAlign::Bottom => (height_i - block_height).max(0),
    };

    debug!(
        lines = lines.len(),
        line_height,
        block_height,
        builtin_font = font.is_builtin(),
        "Laying out text block"
    );

    for line in &lines {
        let line_w = i64::from(line.width);
        let x = match layout.align {
            HorizontalAlign::Left => 0,
            HorizontalAlign::Center => (width_i - line_w).div_euclid(2),
            HorizontalAlign::Right => (width_i - line_w).max(0),
        };
        let visible = y < height_i && y + i64::from(line.height) > 0;
        if visible && !line.text.is_empty() {
            font.draw(&mut canvas, clamp_i32(x), clamp_i32(y), &line.text, layout.text_color);
        }
        y = y.saturating_add(line_height);
    }

    Ok(canvas)
}

/// Tallest line scaled by `spacing`, truncated, within `1..=u32::MAX`.
fn uniform_line_height(lines: &[Line], spacing: f32) -> i64 {
    let tallest = lines.iter().map(|l| l.height).max().unwrap_or(0);
    ((f64::from(tallest) * f64::from(spacing)) as i64).clamp(1, i64::from(u32::MAX))
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    /// 6x10 built-in font: every character is 6px wide, lines are 10px tall.
    fn font() -> TextFont {
        TextFont::builtin(10)
    }

    fn layout() -> TextLayout {
        TextLayout::new().with_font_size(10)
    }

    /// Bounding box (min_x, min_y, max_x, max_y) of non-background pixels.
    fn ink_bounds(img: &RgbImage, background: Rgb<u8>) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in img.enumerate_pixels() {
            if *p == background {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds
    }

    #[test]
    fn test_wrap_breaks_before_overflowing_word() {
        // "Hello World" = 66px, each word = 30px
        let lines = wrap_text(&font(), "Hello World", 50);
        assert_eq!(lines, vec!["Hello".to_string(), "World".to_string()]);
    }

    #[test]
    fn test_wrap_keeps_fitting_words_together() {
        let lines = wrap_text(&font(), "a b c d", 1000);
        assert_eq!(lines, vec!["a b c d".to_string()]);
    }

    #[test]
    fn test_wrap_never_exceeds_width_except_long_words() {
        let f = font();
        let text = "the quick brown fox jumps over the extraordinarily lazy dog";
        let max_width = 60;
        for line in wrap_text(&f, text, max_width) {
            let (w, _) = f.measure(&line);
            let single_word = !line.contains(' ');
            assert!(w <= max_width || single_word, "line '{line}' is {w}px");
        }
    }

    #[test]
    fn test_wrap_long_word_stays_on_own_line() {
        let lines = wrap_text(&font(), "hi extraordinarily ok", 30);
        assert_eq!(
            lines,
            vec!["hi".to_string(), "extraordinarily".to_string(), "ok".to_string()]
        );
    }

    #[test]
    fn test_wrap_treats_newlines_as_spaces() {
        let lines = wrap_text(&font(), "one\ntwo\r\n three", 1000);
        assert_eq!(lines, vec!["one two three".to_string()]);
    }

    #[test]
    fn test_wrap_empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text(&font(), "", 100), vec![String::new()]);
        assert_eq!(wrap_text(&font(), "   \n ", 100), vec![String::new()]);
    }

    #[test]
    fn test_split_lines_honors_explicit_breaks() {
        assert_eq!(
            split_lines("first line\nsecond"),
            vec!["first line".to_string(), "second".to_string()]
        );
        assert_eq!(split_lines(""), vec![String::new()]);
    }

    #[test]
    fn test_empty_text_renders_background_only() {
        let bg = Rgb([0, 255, 0]);
        let img = render_text("", 40, 30, &layout().with_background(bg)).unwrap();
        assert_eq!(img.dimensions(), (40, 30));
        assert!(img.pixels().all(|p| *p == bg));
    }

    #[test]
    fn test_single_glyph_centered() {
        let l = layout()
            .with_align(HorizontalAlign::Center)
            .with_valign(VerticalAlign::Middle);
        let img = render_text("X", 100, 100, &l).unwrap();

        // glyph cell is 6x10 placed at (47, 45)
        let (x0, y0, x1, y1) = ink_bounds(&img, WHITE).unwrap();
        assert!(x0 >= 47 && x1 < 53, "x range {x0}..={x1}");
        assert!(y0 >= 45 && y1 < 55, "y range {y0}..={y1}");
        let mid_x = (x0 + x1) / 2;
        let mid_y = (y0 + y1) / 2;
        assert!(mid_x.abs_diff(50) <= 2 && mid_y.abs_diff(50) <= 3);
    }

    #[test]
    fn test_right_and_bottom_alignment() {
        let l = layout()
            .with_align(HorizontalAlign::Right)
            .with_valign(VerticalAlign::Bottom);
        let img = render_text("AB", 60, 40, &l).unwrap();
        let (x0, y0, x1, y1) = ink_bounds(&img, WHITE).unwrap();
        // cell spans x 48..60, y 30..40
        assert!(x0 >= 48 && x1 < 60);
        assert!(y0 >= 30 && y1 < 40);
    }

    #[test]
    fn test_text_color_is_applied() {
        let red = Rgb([255, 0, 0]);
        let img = render_text("Hi", 40, 20, &layout().with_text_color(red)).unwrap();
        assert!(img.pixels().any(|p| *p == red));
        assert!(img.pixels().all(|p| *p == red || *p == WHITE));
    }

    #[test]
    fn test_line_spacing_moves_second_line() {
        let tight = render_text("A\nB", 20, 60, &layout().with_wrap(false)).unwrap();
        let loose = render_text(
            "A\nB",
            20,
            60,
            &layout().with_wrap(false).with_line_spacing(2.0),
        )
        .unwrap();
        let (_, _, _, tight_bottom) = ink_bounds(&tight, WHITE).unwrap();
        let (_, _, _, loose_bottom) = ink_bounds(&loose, WHITE).unwrap();
        assert!(loose_bottom >= tight_bottom + 10);
    }

    #[test]
    fn test_overflowing_middle_block_is_not_rejected() {
        let text = "l1\nl2\nl3\nl4\nl5";
        let l = layout().with_wrap(false).with_valign(VerticalAlign::Middle);
        let img = render_text(text, 20, 20, &l).unwrap();
        assert_eq!(img.dimensions(), (20, 20));
        assert!(img.pixels().any(|p| *p == BLACK));
    }

    #[test]
    fn test_unreadable_font_does_not_abort() {
        let l = layout().with_font_path(Some(PathBuf::from("/nonexistent/font.ttf")));
        let img = render_text("fallback", 80, 20, &l).unwrap();
        assert!(img.pixels().any(|p| *p == BLACK));
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(matches!(
            render_text("x", 0, 10, &layout()),
            Err(ImageError::InvalidTargetSize { .. })
        ));
        assert!(matches!(
            render_text("x", 10, 10, &layout().with_font_size(0)),
            Err(ImageError::InvalidFontSize(0))
        ));
        assert!(matches!(
            render_text("x", 10, 10, &layout().with_line_spacing(0.0)),
            Err(ImageError::InvalidLineSpacing(_))
        ));
    }

    #[test]
    fn test_uniform_line_height() {
        let lines = vec![
            Line {
                text: "a".into(),
                width: 6,
                height: 10,
            },
            Line {
                text: String::new(),
                width: 0,
                height: 0,
            },
        ];
        assert_eq!(uniform_line_height(&lines, 1.0), 10);
        assert_eq!(uniform_line_height(&lines, 1.25), 12);
        assert_eq!(uniform_line_height(&lines[1..], 1.0), 1);
    }

    #[test]
    fn test_parse_alignment() {
        assert_eq!("Center".parse::<HorizontalAlign>().unwrap(), HorizontalAlign::Center);
        assert_eq!("bottom".parse::<VerticalAlign>().unwrap(), VerticalAlign::Bottom);
        assert!("justify".parse::<HorizontalAlign>().is_err());
    }

    #[test]
    fn test_split_lines_on_every_break_style() {
        assert_eq!(split_lines("a\rb\r\nc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\u{2028}b\x0c"), vec!["a", "b"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("one\n"), vec!["one"]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn test_lone_carriage_return_starts_new_line() {
        let img = render_text("A\rB", 20, 30, &layout().with_wrap(false)).unwrap();
        let (_, y0, x1, y1) = ink_bounds(&img, WHITE).unwrap();
        // two 6x10 glyph rows, not one 18px-wide line
        assert!(x1 < 6, "x1={x1}");
        assert!(y0 < 10 && y1 >= 10, "y0={y0} y1={y1}");
    }

    #[test]
    fn test_huge_line_spacing_does_not_overflow() {
        let l = layout().with_wrap(false).with_line_spacing(1e30);
        let img = render_text("a\nb", 20, 20, &l).unwrap();
        assert_eq!(img.dimensions(), (20, 20));
        // first line at the top, second pushed far below the canvas
        let (_, y0, _, y1) = ink_bounds(&img, WHITE).unwrap();
        assert!(y0 < 10 && y1 < 10, "y0={y0} y1={y1}");

        for valign in [VerticalAlign::Middle, VerticalAlign::Bottom] {
            let img = render_text("a\nb", 20, 20, &l.clone().with_valign(valign)).unwrap();
            assert_eq!(img.dimensions(), (20, 20));
        }
    }
}
