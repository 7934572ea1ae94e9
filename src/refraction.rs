//! Turns the height field into a displaced copy of the master image.

use rayon::prelude::*;

use crate::grid::{Grid, GridBuffers};

#[derive(Clone, Copy, Debug)]
pub struct RefractionRenderer {
    gamma_shift: u32,
    parallel: bool,
}

impl RefractionRenderer {
    pub fn new(gamma_shift: u32, parallel: bool) -> Self {
        Self {
            gamma_shift,
            parallel,
        }
    }

    /// Rewrites the whole display plane from the current heights.
    pub fn render(&self, buffers: &mut GridBuffers) {
        let grid = buffers.grid();
        let w = grid.width();
        let heights = buffers.heights.current();
        let master = &buffers.master;
        let display = &mut buffers.display;

        if self.parallel {
            display.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
                self.render_row(grid, heights, master, y, row);
            });
        } else {
            for (y, row) in display.chunks_mut(w).enumerate() {
                self.render_row(grid, heights, master, y, row);
            }
        }
    }

    fn render_row(&self, grid: Grid, u: &[i32], master: &[u32], y: usize, row: &mut [u32]) {
        for (x, out) in row.iter_mut().enumerate() {
            let src = self.source_index(grid, u, x, y);
            *out = master[src];
        }
    }

    /// Master-image index sampled for cell `(x, y)`. Borders and samples that
    /// would land off the grid use the cell's own index.
    pub fn source_index(&self, grid: Grid, u: &[i32], x: usize, y: usize) -> usize {
        let here = grid.idx(x, y);
        if grid.is_border(x, y) {
            return here;
        }
        let w = grid.width();
        let ux = u[here + 1] as i64 - u[here - 1] as i64;
        let uy = u[here + w] as i64 - u[here - w] as i64;

        let rx = x as i64 + (ux >> self.gamma_shift);
        let ry = y as i64 + (uy >> self.gamma_shift);
        if grid.contains(rx, ry) {
            grid.idx(rx as usize, ry as usize)
        } else {
            here
        }
    }
}
