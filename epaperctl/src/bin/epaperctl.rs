//! `epaperctl`: push images or text to a seven-color e-paper panel.
//!
//! Without panel hardware the frame is written to `<output_dir>/last_output.png`.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use epaperctl_lib::cli::Cli;
use epaperctl_lib::config::AppConfig;
use epaperctl_lib::{commands, load_dotenv};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    load_dotenv();
    let config = AppConfig::load();

    commands::run(&cli.command, &config)
}
