use crate::error::{EngineError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    size: usize,
}

impl Grid {
    /// Fails for a zero side or when `width * height` does not fit a `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        match width.checked_mul(height) {
            Some(size) if size > 0 => Ok(Self {
                width,
                height,
                size,
            }),
            _ => Err(EngineError::InvalidDimensions {
                width,
                height,
                pixels: 0,
            }),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Rows `1..h-1`; empty for grids shorter than three rows.
    pub fn interior_rows(&self) -> std::ops::Range<usize> {
        1..self.height.saturating_sub(1).max(1)
    }

    pub fn interior_cols(&self) -> std::ops::Range<usize> {
        1..self.width.saturating_sub(1).max(1)
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}

/// Two height planes whose current/next roles flip on `swap()`.
#[derive(Clone, Debug)]
pub struct HeightBuffers {
    planes: [Vec<i32>; 2],
    current: usize,
}

impl HeightBuffers {
    fn new(size: usize) -> Self {
        Self {
            planes: [vec![0; size], vec![0; size]],
            current: 0,
        }
    }

    pub fn current(&self) -> &[i32] {
        &self.planes[self.current]
    }

    pub fn next(&self) -> &[i32] {
        &self.planes[1 - self.current]
    }

    /// Read-only current plane alongside the writable next plane.
    pub(crate) fn split(&mut self) -> (&[i32], &mut [i32]) {
        let (a, b) = self.planes.split_at_mut(1);
        if self.current == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        }
    }

    #[cfg(test)]
    pub(crate) fn current_mut(&mut self) -> &mut [i32] {
        &mut self.planes[self.current]
    }

    fn clear(&mut self) {
        for plane in &mut self.planes {
            plane.fill(0);
        }
    }

    pub(crate) fn swap(&mut self) {
        self.current = 1 - self.current;
    }

    /// Index (0 or 1) of the plane currently playing the "current" role.
    pub fn current_index(&self) -> usize {
        self.current
    }
}

/// All per-cell state of one simulated image.
#[derive(Clone, Debug)]
pub struct GridBuffers {
    grid: Grid,
    pub(crate) display: Vec<u32>,
    pub(crate) master: Vec<u32>,
    pub(crate) heights: HeightBuffers,
    pub(crate) velocity: Vec<i32>,
    pub(crate) force: Vec<i32>,
}

impl GridBuffers {
    pub fn new(width: usize, height: usize, pixels: &[u32]) -> Result<Self> {
        let grid = Grid::new(width, height).map_err(|_| EngineError::InvalidDimensions {
            width,
            height,
            pixels: pixels.len(),
        })?;
        if pixels.len() != grid.size() {
            return Err(EngineError::InvalidDimensions {
                width,
                height,
                pixels: pixels.len(),
            });
        }
        let n = grid.size();
        Ok(Self {
            grid,
            display: pixels.to_vec(),
            master: pixels.to_vec(),
            heights: HeightBuffers::new(n),
            velocity: vec![0; n],
            force: vec![0; n],
        })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn display(&self) -> &[u32] {
        &self.display
    }

    pub fn master(&self) -> &[u32] {
        &self.master
    }

    pub fn heights(&self) -> &HeightBuffers {
        &self.heights
    }

    pub fn velocity(&self) -> &[i32] {
        &self.velocity
    }

    pub fn force(&self) -> &[i32] {
        &self.force
    }

    /// The only plane external code may write: force injected between frames.
    pub fn force_mut(&mut self) -> &mut [i32] {
        &mut self.force
    }

    pub fn force_at(&self, x: usize, y: usize) -> Result<i32> {
        self.check(x, y)?;
        Ok(self.force[self.grid.idx(x, y)])
    }

    pub fn set_force(&mut self, x: usize, y: usize, value: i32) -> Result<()> {
        self.check(x, y)?;
        let i = self.grid.idx(x, y);
        self.force[i] = value;
        Ok(())
    }

    /// Flattens the surface: heights, velocity and force back to zero and the
    /// display back to the master image.
    pub fn calm(&mut self) {
        self.heights.clear();
        self.velocity.fill(0);
        self.force.fill(0);
        self.display.copy_from_slice(&self.master);
    }

    fn check(&self, x: usize, y: usize) -> Result<()> {
        if x < self.width() && y < self.height() {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds { x, y })
        }
    }
}
