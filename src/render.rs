use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use ripple::pixel::unpack_rgba;
use std::io::{self, Write};

/// Rows reserved at the top for the status line.
pub(crate) const HUD_ROWS: u16 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
}

/// Maps terminal cells onto the simulated image. Each cell covers two pixel
/// rows (upper-half block: foreground on top, background below).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) img_w: usize,
    pub(crate) img_h: usize,
}

impl Viewport {
    /// Image size that fills the drawable area exactly.
    pub(crate) fn fitted_size(cols: u16, rows: u16) -> (u32, u32) {
        let draw_rows = rows.saturating_sub(HUD_ROWS).max(1);
        (cols.max(1) as u32, draw_rows as u32 * 2)
    }

    fn draw_rows(&self) -> u16 {
        self.rows.saturating_sub(HUD_ROWS)
    }

    /// Nearest image pixel for sub-row `sub` (0..2*draw_rows) and column `col`.
    fn pixel_at(&self, col: u16, sub: usize) -> (usize, usize) {
        let x = col as usize * self.img_w / self.cols.max(1) as usize;
        let y = sub * self.img_h / (self.draw_rows().max(1) as usize * 2);
        (x.min(self.img_w - 1), y.min(self.img_h - 1))
    }

    /// Image pixel under a terminal position, `None` over the HUD or past the
    /// drawable area.
    pub(crate) fn screen_to_image(&self, col: u16, row: u16) -> Option<(i64, i64)> {
        if row < HUD_ROWS || col >= self.cols || row - HUD_ROWS >= self.draw_rows() {
            return None;
        }
        let (x, y) = self.pixel_at(col, (row - HUD_ROWS) as usize * 2);
        Some((x as i64, y as i64))
    }
}

fn to_color(v: u32) -> Color {
    let [r, g, b, _] = unpack_rgba(v);
    Color::Rgb { r, g, b }
}

/// Half-block rendering of `pixels` into the area below the HUD.
pub(crate) fn image_to_cells(pixels: &[u32], vp: Viewport, out: &mut CellBuffer) {
    for row in 0..vp.draw_rows() {
        for col in 0..vp.cols {
            let (tx, ty) = vp.pixel_at(col, row as usize * 2);
            let (bx, by) = vp.pixel_at(col, row as usize * 2 + 1);
            out.set(
                col,
                row + HUD_ROWS,
                Cell {
                    ch: '▀',
                    fg: to_color(pixels[ty * vp.img_w + tx]),
                    bg: to_color(pixels[by * vp.img_w + bx]),
                },
            );
        }
    }
}

pub(crate) fn draw_text(out: &mut CellBuffer, x: u16, y: u16, text: &str) {
    let mut cx = x;
    for ch in text.chars() {
        if cx >= out.w {
            break;
        }
        out.set(
            cx,
            y,
            Cell {
                ch,
                fg: Color::White,
                bg: Color::Black,
            },
        );
        cx += 1;
    }
    for fill in cx..out.w {
        out.set(fill, y, Cell::default());
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    active: bool,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            active: true,
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            DisableMouseCapture,
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        execute!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.end();
    }
}
