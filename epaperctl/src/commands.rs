//! Subcommand handlers.

use std::path::Path;

use anyhow::{Context, bail};
use epd_display::{DriverLoader, EpaperDisplay, NoDriverLoader};
use epd_image::{FitMode, PrepareOptions, TextLayout, prepare, render_text};
use image::DynamicImage;
use tracing::info;

use crate::cli::Commands;
use crate::config::AppConfig;

/// Run `command` against the display described by `config`.
pub fn run(command: &Commands, config: &AppConfig) -> anyhow::Result<()> {
    run_with_loader(command, config, &NoDriverLoader)
}

/// Like [`run`], probing for panel hardware through `loader`.
pub fn run_with_loader(
    command: &Commands,
    config: &AppConfig,
    loader: &dyn DriverLoader,
) -> anyhow::Result<()> {
    // Fail on a missing file before touching the panel.
    if let Commands::Image { path, .. } = command {
        if !path.exists() {
            bail!("image not found: {}", path.display());
        }
    }

    let mut display = EpaperDisplay::initialize(&config.display_options(), loader)
        .context("failed to open display")?;

    match command {
        Commands::Image {
            path,
            mode,
            dither,
            rotate,
            mirror,
        } => {
            let opts = PrepareOptions::new(display.width(), display.height())
                .with_mode(*mode)
                .with_dither(*dither)
                .with_rotate(*rotate)
                .with_mirror(*mirror)
                .with_rotate_before_fit(config.rotate_before_fit);
            show_image_file(&mut display, path, &opts)
        }
        Commands::Text {
            text,
            font,
            font_size,
            align,
            valign,
            wrap,
            line_spacing,
            text_color,
            background,
        } => {
            let layout = TextLayout::new()
                .with_font_path(font.clone())
                .with_font_size(*font_size)
                .with_align(*align)
                .with_valign(*valign)
                .with_wrap(*wrap)
                .with_line_spacing(*line_spacing)
                .with_text_color(*text_color)
                .with_background(*background);
            show_text(&mut display, text, &layout)
        }
        Commands::Clear => display.clear().context("failed to clear display"),
    }
}

fn show_image_file(
    display: &mut EpaperDisplay,
    path: &Path,
    opts: &PrepareOptions,
) -> anyhow::Result<()> {
    let img = image::open(path).with_context(|| format!("failed to decode {}", path.display()))?;
    info!(path = %path.display(), width = img.width(), height = img.height(), "Loaded image");

    let prepared = prepare(&img, opts)?;
    display.show_image(&prepared)?;
    Ok(())
}

fn show_text(display: &mut EpaperDisplay, text: &str, layout: &TextLayout) -> anyhow::Result<()> {
    let (width, height) = (display.width(), display.height());
    let rendered = render_text(text, width, height, layout)?;

    let opts = PrepareOptions::new(width, height).with_mode(FitMode::Fit);
    let prepared = prepare(&DynamicImage::ImageRgb8(rendered), &opts)?;
    display.show_image(&prepared)?;
    Ok(())
}
