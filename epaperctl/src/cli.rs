//! Command-line interface definition.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use epd_image::text::DEFAULT_FONT_SIZE;
use epd_image::{FitMode, HorizontalAlign, VerticalAlign};
use image::Rgb;

#[derive(Debug, Parser)]
#[command(name = "epaperctl")]
#[command(about = "Waveshare 5.65\" seven-color e-paper uploader")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// Display an image
    Image {
        /// Path to the image file
        path: PathBuf,

        /// Geometry mode: fit, fill or stretch
        #[arg(long, default_value = "fit")]
        mode: FitMode,

        /// Floyd-Steinberg dithering (0 or 1)
        #[arg(long, default_value = "1", value_parser = parse_flag, action = ArgAction::Set)]
        dither: bool,

        /// Counter-clockwise rotation in degrees
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        rotate: i32,

        /// Mirror horizontally after rotating (0 or 1)
        #[arg(long, default_value = "0", value_parser = parse_flag, action = ArgAction::Set)]
        mirror: bool,
    },
    /// Display text
    Text {
        /// Text to render; `\n` starts a new paragraph
        text: String,

        /// Path to a .ttf/.otf font (falls back to the built-in font)
        #[arg(long)]
        font: Option<PathBuf>,

        /// Font size in pixels
        #[arg(long, alias = "font_size", default_value_t = DEFAULT_FONT_SIZE)]
        font_size: u32,

        /// Horizontal alignment: left, center or right
        #[arg(long, default_value = "left")]
        align: HorizontalAlign,

        /// Vertical alignment: top, middle or bottom
        #[arg(long, default_value = "top")]
        valign: VerticalAlign,

        /// Wrap long lines at word boundaries (0 or 1)
        #[arg(long, default_value = "1", value_parser = parse_flag, action = ArgAction::Set)]
        wrap: bool,

        /// Line height multiplier
        #[arg(long, alias = "line_spacing", default_value_t = 1.0)]
        line_spacing: f32,

        /// Text color as `#rrggbb` or `r,g,b`
        #[arg(long, alias = "text_color", default_value = "#000000", value_parser = parse_rgb)]
        text_color: Rgb<u8>,

        /// Background color as `#rrggbb` or `r,g,b`
        #[arg(long, default_value = "#ffffff", value_parser = parse_rgb)]
        background: Rgb<u8>,
    },
    /// Clear the display
    Clear,
}

/// Integer or boolean switch: any non-zero integer is on.
pub fn parse_flag(s: &str) -> Result<bool, String> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "true" => return Ok(true),
        "false" => return Ok(false),
        _ => {}
    }
    s.parse::<i64>()
        .map(|v| v != 0)
        .map_err(|_| format!("expected an integer or true/false, got '{s}'"))
}

/// Parse `#rrggbb` (or `rrggbb`) and `r,g,b` color notations.
pub fn parse_rgb(s: &str) -> Result<Rgb<u8>, String> {
    let s = s.trim();

    if s.contains(',') {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(format!("expected three components, got '{s}'"));
        };
        let channel = |v: &str| {
            v.parse::<u8>()
                .map_err(|_| format!("color component must be 0-255, got '{v}'"))
        };
        return Ok(Rgb([channel(*r)?, channel(*g)?, channel(*b)?]));
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("expected #rrggbb, got '{s}'"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("invalid hex color '{s}'"))
    };
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Commands {
        let argv = std::iter::once("epaperctl").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_image_defaults() {
        assert_eq!(
            parse(&["image", "photo.jpg"]),
            Commands::Image {
                path: PathBuf::from("photo.jpg"),
                mode: FitMode::Fit,
                dither: true,
                rotate: 0,
                mirror: false,
            }
        );
    }

    #[test]
    fn test_image_options() {
        assert_eq!(
            parse(&[
                "image", "photo.jpg", "--mode", "fill", "--dither", "0", "--rotate", "-90",
                "--mirror", "1",
            ]),
            Commands::Image {
                path: PathBuf::from("photo.jpg"),
                mode: FitMode::Fill,
                dither: false,
                rotate: -90,
                mirror: true,
            }
        );
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["epaperctl", "image", "a.png", "--mode", "zoom"]).is_err());
    }

    #[test]
    fn test_text_defaults() {
        let Commands::Text {
            font,
            font_size,
            align,
            valign,
            wrap,
            line_spacing,
            text_color,
            background,
            ..
        } = parse(&["text", "Hello"])
        else {
            panic!("expected text command");
        };
        assert_eq!(font, None);
        assert_eq!(font_size, 28);
        assert_eq!(align, HorizontalAlign::Left);
        assert_eq!(valign, VerticalAlign::Top);
        assert!(wrap);
        assert_eq!(line_spacing, 1.0);
        assert_eq!(text_color, Rgb([0, 0, 0]));
        assert_eq!(background, Rgb([255, 255, 255]));
    }

    #[test]
    fn test_text_accepts_underscore_aliases() {
        let Commands::Text {
            font_size,
            align,
            wrap,
            text_color,
            ..
        } = parse(&[
            "text", "Hi", "--font_size", "40", "--align", "center", "--wrap", "0",
            "--text-color", "255,0,0",
        ])
        else {
            panic!("expected text command");
        };
        assert_eq!(font_size, 40);
        assert_eq!(align, HorizontalAlign::Center);
        assert!(!wrap);
        assert_eq!(text_color, Rgb([255, 0, 0]));
    }

    #[test]
    fn test_clear() {
        assert_eq!(parse(&["clear"]), Commands::Clear);
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["epaperctl"]).is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Ok(true));
        assert_eq!(parse_flag("0"), Ok(false));
        assert_eq!(parse_flag("2"), Ok(true));
        assert_eq!(parse_flag("true"), Ok(true));
        assert!(parse_flag("on").is_err());
    }

    #[test]
    fn test_parse_rgb() {
        assert_eq!(parse_rgb("#ff8000"), Ok(Rgb([255, 128, 0])));
        assert_eq!(parse_rgb("00FF00"), Ok(Rgb([0, 255, 0])));
        assert_eq!(parse_rgb("10, 20, 30"), Ok(Rgb([10, 20, 30])));
        assert!(parse_rgb("#ff80").is_err());
        assert!(parse_rgb("300,0,0").is_err());
        assert!(parse_rgb("1,2").is_err());
    }
}
