//! Damped discrete wave update.
//!
//! One sub-step reads a frozen `current` height plane and writes the `next`
//! one, updating velocity and force in place. Border cells are never visited,
//! so whatever they hold (zero unless written externally) acts as a fixed
//! boundary.

use rayon::prelude::*;

use crate::fixed::{cap, shr};
use crate::grid::{Grid, GridBuffers};
use crate::params::EngineParams;

#[derive(Clone, Copy, Debug)]
pub struct WaveIntegrator {
    params: EngineParams,
}

impl WaveIntegrator {
    pub fn new(params: EngineParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Runs all configured sub-steps, swapping height roles after each one.
    pub fn advance(&self, buffers: &mut GridBuffers) {
        for _ in 0..self.params.substeps {
            self.substep(buffers);
        }
    }

    pub fn substep(&self, buffers: &mut GridBuffers) {
        let grid = buffers.grid();
        let w = grid.width();
        let rows = grid.interior_rows();
        let span = rows.start * w..rows.end * w;
        let first_row = rows.start;

        let (u0, u1) = buffers.heights.split();
        let next = &mut u1[span.clone()];
        let vel = &mut buffers.velocity[span.clone()];
        let force = &mut buffers.force[span];

        if self.params.parallel {
            next.par_chunks_mut(w)
                .zip(vel.par_chunks_mut(w))
                .zip(force.par_chunks_mut(w))
                .enumerate()
                .for_each(|(k, ((next, vel), force))| {
                    step_row(&self.params, grid, u0, first_row + k, next, vel, force);
                });
        } else {
            for (k, ((next, vel), force)) in next
                .chunks_mut(w)
                .zip(vel.chunks_mut(w))
                .zip(force.chunks_mut(w))
                .enumerate()
            {
                step_row(&self.params, grid, u0, first_row + k, next, vel, force);
            }
        }

        buffers.heights.swap();
    }
}

/// Updates the interior cells of row `y`. `next`, `vel` and `force` are that
/// row's slices; `u0` is the whole current plane.
fn step_row(
    p: &EngineParams,
    grid: Grid,
    u0: &[i32],
    y: usize,
    next: &mut [i32],
    vel: &mut [i32],
    force: &mut [i32],
) {
    let w = grid.width();
    for x in grid.interior_cols() {
        let c = grid.idx(x, y);
        let u_cen = u0[c] as i64;
        let u_north = u0[c - w] as i64;
        let u_south = u0[c + w] as i64;
        let u_west = u0[c - 1] as i64;
        let u_east = u0[c + 1] as i64;

        let uxx = shr(u_west + u_east, 1) - u_cen;
        let uyy = shr(u_north + u_south, 1) - u_cen;

        // Two clamped additions, never one combined sum.
        let mut v = vel[x] as i64;
        v = cap(v + shr(uxx, 1)) as i64;
        v = cap(v + shr(uyy, 1)) as i64;

        let f = force[x] as i64;
        next[x] = cap(f + cap(u_cen + v) as i64);

        force[x] = cap(f - shr(f, p.force_damping_shift));
        vel[x] = cap(v - shr(v, p.velocity_damping_shift));
    }
}
