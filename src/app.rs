use anyhow::{Context, Result};
use image::RgbaImage;
use ripple::{pixel, Brush, EngineParams, RippleSim, Stroke};
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::input::{collect_input_nonblocking, Action};
use crate::render::{draw_text, image_to_cells, Terminal, Viewport};
use crate::Args;

pub(crate) struct App {
    settings: Settings,
    source: RgbaImage,
    fit: bool,
    sim: RippleSim,
    brush: Brush,
    stroke: Stroke,
    term: Terminal,
    paused: bool,
    should_quit: bool,
    iterate_time: Duration,
    fps: f32,
}

pub(crate) fn run(args: &Args, settings: Settings, source: RgbaImage) -> Result<()> {
    let mut app = App::init(settings, source, !args.no_fit)?;
    let res = app.run();
    app.term.end()?;
    res
}

/// Builds a fresh session for `source`, fitted to the terminal when asked.
fn new_session(
    source: &RgbaImage,
    fit: bool,
    term: &Terminal,
    params: EngineParams,
) -> Result<RippleSim> {
    let img = if fit {
        let (w, h) = Viewport::fitted_size(term.cols, term.rows);
        pixel::fit(source.clone(), w, h)
    } else {
        source.clone()
    };
    let (w, h) = img.dimensions();
    RippleSim::new(w as usize, h as usize, &pixel::from_image(&img), params)
        .context("could not set up the simulation")
}

/// Lowers the refraction shift by one, stopping at 6. A shift already below
/// that (from a settings file) is left alone.
fn gamma_down(shift: u32) -> u32 {
    if shift > 6 {
        shift - 1
    } else {
        shift
    }
}

impl App {
    fn init(settings: Settings, source: RgbaImage, fit: bool) -> Result<Self> {
        let term = Terminal::begin()?;
        let sim = new_session(&source, fit, &term, settings.engine)?;
        let brush = Brush::new(settings.brush);
        Ok(Self {
            settings,
            source,
            fit,
            sim,
            brush,
            stroke: Stroke::new(),
            term,
            paused: false,
            should_quit: false,
            iterate_time: Duration::ZERO,
            fps: 0.0,
        })
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            cols: self.term.cols,
            rows: self.term.rows,
            img_w: self.sim.width(),
            img_h: self.sim.height(),
        }
    }

    fn run(&mut self) -> Result<()> {
        let frame_dt = Duration::from_secs_f32(1.0 / self.settings.fps_cap as f32);
        let mut fps_timer = Instant::now();
        let mut frames: u32 = 0;

        while !self.should_quit {
            let frame_start = Instant::now();

            if self.term.resize_if_needed()? && self.fit {
                // A new canvas size means a new session; old waves are dropped.
                self.sim = new_session(&self.source, self.fit, &self.term, *self.sim.params())?;
                self.stroke.release();
            }

            for action in collect_input_nonblocking(frame_dt)? {
                self.apply(action)?;
                if self.should_quit {
                    break;
                }
            }

            if !self.paused {
                let t0 = Instant::now();
                self.sim.iterate();
                self.iterate_time = t0.elapsed();
            }

            self.render_frame()?;

            frames += 1;
            if fps_timer.elapsed() >= Duration::from_millis(500) {
                self.fps = frames as f32 / fps_timer.elapsed().as_secs_f32();
                fps_timer = Instant::now();
                frames = 0;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_dt {
                std::thread::sleep(frame_dt - elapsed);
            }
        }
        Ok(())
    }

    fn apply(&mut self, action: Action) -> Result<()> {
        let mut params = *self.sim.params();
        match action {
            Action::Quit => self.should_quit = true,
            Action::TogglePause => self.paused = !self.paused,
            Action::Calm => self.sim.calm(),
            Action::GammaUp => params.gamma_shift = (params.gamma_shift + 1).min(20),
            Action::GammaDown => params.gamma_shift = gamma_down(params.gamma_shift),
            Action::SubstepsUp => params.substeps = (params.substeps + 1).min(16),
            Action::SubstepsDown => params.substeps = params.substeps.saturating_sub(1).max(1),
            Action::ToggleParallel => params.parallel = !params.parallel,
            Action::Press(col, row) => {
                if let Some((x, y)) = self.viewport().screen_to_image(col, row) {
                    self.stroke.press(&self.brush, self.sim.buffers_mut(), x, y);
                }
            }
            Action::Drag(col, row) => match self.viewport().screen_to_image(col, row) {
                Some((x, y)) => self.stroke.drag(&self.brush, self.sim.buffers_mut(), x, y),
                None => self.stroke.release(),
            },
            Action::Release => self.stroke.release(),
        }
        if params != *self.sim.params() {
            self.sim.set_params(params)?;
        }
        Ok(())
    }

    fn render_frame(&mut self) -> Result<()> {
        let vp = self.viewport();
        image_to_cells(self.sim.display(), vp, &mut self.term.cur);

        let p = self.sim.params();
        let hud = format!(
            "ripple {}x{}  iterate:{:>6.2}ms  fps:{:>5.1}  substeps:{}  gamma:{}  parallel:{}{}  | drag: push  C calm  [ ] gamma  -/+ substeps  P parallel  SPACE pause  Q quit",
            self.sim.width(),
            self.sim.height(),
            self.iterate_time.as_secs_f64() * 1000.0,
            self.fps,
            p.substeps,
            p.gamma_shift,
            if p.parallel { "on" } else { "off" },
            if self.paused { "  [paused]" } else { "" },
        );
        draw_text(&mut self.term.cur, 0, 0, &hud);

        self.term.present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_down_never_raises_the_shift() {
        assert_eq!(gamma_down(12), 11);
        assert_eq!(gamma_down(7), 6);
        assert_eq!(gamma_down(6), 6);
        assert_eq!(gamma_down(3), 3);
        assert_eq!(gamma_down(0), 0);
    }
}
