//! Pointer-driven force injection.
//!
//! The engine only reads and damps force; this is the writer that feeds it.
//! Overlapping stamps combine with `max`, so dragging over the same spot keeps
//! the strongest push instead of piling up.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::grid::GridBuffers;

/// Largest accepted stamp half-width.
pub const MAX_RADIUS: i32 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushParams {
    /// Half-width of the square stamp, in cells.
    pub radius: i32,
    /// Peak force at the stamp centre (fixed-point).
    pub amplitude: i32,
    /// Gaussian exponent: `amplitude * exp(-falloff * (p² + q²))`.
    pub falloff: f64,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self {
            radius: 11,
            amplitude: 0x20_0000,
            falloff: 0.2,
        }
    }
}

impl BrushParams {
    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_RADIUS).contains(&self.radius) {
            return Err(EngineError::InvalidParams(format!(
                "brush radius must be within 0..={MAX_RADIUS}, got {}",
                self.radius
            )));
        }
        if !self.falloff.is_finite() || self.falloff < 0.0 {
            return Err(EngineError::InvalidParams(format!(
                "brush falloff must be finite and non-negative, got {}",
                self.falloff
            )));
        }
        Ok(())
    }
}

/// Precomputed Gaussian stamp.
#[derive(Clone, Debug)]
pub struct Brush {
    radius: i32,
    side: usize,
    matrix: Vec<i32>,
}

impl Brush {
    /// Radius is clamped to `0..=MAX_RADIUS`; call `BrushParams::validate`
    /// first to reject it instead.
    pub fn new(params: BrushParams) -> Self {
        let radius = params.radius.clamp(0, MAX_RADIUS);
        let side = (2 * radius + 1) as usize;
        let mut matrix = Vec::with_capacity(side * side);
        for p in -radius..=radius {
            for q in -radius..=radius {
                let d2 = (p * p + q * q) as f64;
                let v = (params.amplitude as f64 * (-params.falloff * d2).exp()).floor();
                matrix.push(v as i32);
            }
        }
        Self {
            radius,
            side,
            matrix,
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Weight at offset `(q, p)` from the centre (column, row). Both must lie
    /// in `-radius..=radius`.
    fn weight(&self, q: i32, p: i32) -> i32 {
        let row = (p + self.radius) as usize;
        let col = (q + self.radius) as usize;
        self.matrix[row * self.side + col]
    }

    /// Stamps the brush centred on `(x, y)`; cells off the grid are skipped.
    pub fn apply(&self, buffers: &mut GridBuffers, x: i64, y: i64) {
        let grid = buffers.grid();
        let force = buffers.force_mut();
        let r = self.radius;
        for p in -r..=r {
            let ty = y + p as i64;
            for q in -r..=r {
                let tx = x + q as i64;
                if !grid.contains(tx, ty) {
                    continue;
                }
                let i = grid.idx(tx as usize, ty as usize);
                force[i] = force[i].max(self.weight(q, p));
            }
        }
    }
}

/// Tracks a drag so fast pointer moves still leave a continuous trail.
#[derive(Clone, Debug, Default)]
pub struct Stroke {
    last: Option<(i64, i64)>,
}

impl Stroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    pub fn press(&mut self, brush: &Brush, buffers: &mut GridBuffers, x: i64, y: i64) {
        self.last = Some((x, y));
        brush.apply(buffers, x, y);
    }

    /// Stamps along the segment from the previous position. A move with no
    /// press in progress does nothing.
    pub fn drag(&mut self, brush: &Brush, buffers: &mut GridBuffers, x: i64, y: i64) {
        let Some((lx, ly)) = self.last else {
            return;
        };
        for (cx, cy) in segment(lx, ly, x, y) {
            brush.apply(buffers, cx, cy);
        }
        brush.apply(buffers, x, y);
        self.last = Some((x, y));
    }

    pub fn release(&mut self) {
        self.last = None;
    }
}

/// Points at unit steps `t = 0, 1, .. < r` along the segment, `r` being its
/// length; each coordinate is rounded to the nearest cell.
fn segment(x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<(i64, i64)> {
    let dx = (x1 - x0) as f64;
    let dy = (y1 - y0) as f64;
    let r = (dx * dx + dy * dy).sqrt();
    let mut out = Vec::new();
    let mut t = 0.0;
    while t < r {
        let s = t / r;
        out.push((
            (x0 as f64 + dx * s).round() as i64,
            (y0 as f64 + dy * s).round() as i64,
        ));
        t += 1.0;
    }
    out
}
