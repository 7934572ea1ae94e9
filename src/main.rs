mod app;
mod config;
mod headless;
mod input;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use image::RgbaImage;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(name = "ripple")]
#[command(about = "Water ripples over an image, in the terminal", long_about = None)]
pub(crate) struct Args {
    /// Image to ripple. A generated test pattern is used when omitted.
    image: Option<PathBuf>,

    /// FPS cap (render rate). Each frame runs the configured sub-steps.
    #[arg(long)]
    fps: Option<u32>,

    /// JSON settings file (fps_cap, brush, engine)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulate at the image's own size instead of fitting the terminal
    #[arg(long, default_value_t = false)]
    no_fit: bool,

    /// Render frames to a PNG instead of opening the terminal UI
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Output PNG for headless mode
    #[arg(long, default_value = "ripple.png")]
    output: PathBuf,

    /// Split each sub-step across worker threads
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Damped-wave sub-steps per frame
    #[arg(long)]
    substeps: Option<u32>,

    /// Refraction strength as a right shift of the height gradient
    #[arg(long)]
    gamma_shift: Option<u32>,
}

pub(crate) fn load_source(path: Option<&Path>) -> Result<RgbaImage> {
    match path {
        Some(p) => Ok(image::open(p)
            .with_context(|| format!("could not decode {}", p.display()))?
            .to_rgba8()),
        None => Ok(ripple::pixel::test_pattern(160, 96)),
    }
}

/// Headless runs log to stderr (filtered by `RUST_LOG`). The TUI owns the
/// screen, so it keeps the library's records silent.
fn install_logger(args: &Args) -> bool {
    args.headless && env_logger::try_init().is_ok()
}

fn main() -> Result<()> {
    let args = Args::parse();
    install_logger(&args);
    let settings = config::Settings::resolve(&args)?;
    let source = load_source(args.image.as_deref())?;

    if args.headless {
        headless::run(&args, &settings, source)
    } else {
        app::run(&args, settings, source)
    }
}
