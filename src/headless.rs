use anyhow::{anyhow, Context, Result};
use image::RgbaImage;
use ripple::{pixel, Brush, RippleSim, Stroke};
use std::time::Instant;

use crate::config::Settings;
use crate::Args;

/// Drags the brush across the middle of the image, lets the waves run for
/// `args.frames` frames and writes the final display image.
pub(crate) fn run(args: &Args, settings: &Settings, source: RgbaImage) -> Result<()> {
    let (w, h) = source.dimensions();
    let started = Instant::now();
    let sim = simulate(&source, settings, args.frames)?;
    let elapsed = started.elapsed();

    let img = pixel::to_image(w, h, sim.display())
        .ok_or_else(|| anyhow!("display plane does not match {w}x{h}"))?;
    img.save(&args.output)
        .with_context(|| format!("could not write {}", args.output.display()))?;

    println!(
        "{} frames of {}x{} -> {} ({:.2} ms/frame)",
        sim.frames(),
        w,
        h,
        args.output.display(),
        elapsed.as_secs_f64() * 1000.0 / sim.frames().max(1) as f64
    );
    Ok(())
}

fn simulate(source: &RgbaImage, settings: &Settings, frames: u32) -> Result<RippleSim> {
    let (w, h) = source.dimensions();
    let mut sim = RippleSim::new(
        w as usize,
        h as usize,
        &pixel::from_image(source),
        settings.engine,
    )
    .context("could not set up the simulation")?;

    let brush = Brush::new(settings.brush);
    let mut stroke = Stroke::new();
    let (cx, cy) = (w as i64 / 2, h as i64 / 2);
    stroke.press(&brush, sim.buffers_mut(), cx - w as i64 / 4, cy);
    stroke.drag(&brush, sim.buffers_mut(), cx + w as i64 / 4, cy);
    stroke.release();

    for _ in 0..frames {
        sim.iterate();
    }
    Ok(sim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_distorts_the_image() {
        let source = pixel::test_pattern(64, 40);
        let sim = simulate(&source, &Settings::default(), 8).unwrap();
        assert_eq!(sim.frames(), 8);
        assert_ne!(sim.display(), &pixel::from_image(&source)[..]);
    }

    #[test]
    fn zero_frames_leaves_the_source() {
        let source = pixel::test_pattern(16, 16);
        let sim = simulate(&source, &Settings::default(), 0).unwrap();
        assert_eq!(sim.display(), &pixel::from_image(&source)[..]);
    }
}
