use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, SetForegroundColor};

/// A single character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        color: Color::Reset,
    };
}

/// Character-cell frame buffer, drawn off screen and flushed once per frame
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resizes the buffer and blanks it
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::BLANK; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Sets a cell, ignoring coordinates off the canvas
    pub fn plot(&mut self, x: isize, y: isize, ch: char, color: Color) {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = Cell { ch, color };
        }
    }

    /// Rounds fractional cell coordinates and plots
    pub fn plot_f(&mut self, x: f64, y: f64, ch: char, color: Color) {
        self.plot(x.round() as isize, y.round() as isize, ch, color);
    }

    /// Writes `text` left to right starting at `(x, y)`, clipped to the canvas
    pub fn draw_text(&mut self, x: isize, y: isize, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.plot(x + i as isize, y, ch, color);
        }
    }

    /// Draws a line between two points using Bresenham's algorithm.
    ///
    /// The segment is clipped to the canvas (plus a one-cell margin) first,
    /// so far off-canvas endpoints cost no more than an on-canvas line.
    pub fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, ch: char, color: Color) {
        let bounds = (-1.0, -1.0, self.width as f64, self.height as f64);
        let Some((x0, y0, x1, y1)) = clip_segment((x0, y0, x1, y1), bounds) else {
            return;
        };
        let (mut x0, mut y0, x1, y1) = (
            x0.round() as isize,
            y0.round() as isize,
            x1.round() as isize,
            y1.round() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        loop {
            self.plot(x0, y0, ch, color);

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Draws an ellipse outline centred on `(cx, cy)`.
    ///
    /// Terminal cells are roughly twice as tall as they are wide, so callers
    /// pass a horizontal radius about double the vertical one to get a circle.
    pub fn draw_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, ch: char, color: Color) {
        let steps = ((rx.max(ry) * 8.0).ceil() as usize).max(16);
        for i in 0..steps {
            let angle = i as f64 / steps as f64 * std::f64::consts::TAU;
            let (sin_a, cos_a) = angle.sin_cos();
            self.plot_f(cx + rx * cos_a, cy + ry * sin_a, ch, color);
        }
    }

    /// Queues the whole buffer to `out`; the caller flushes
    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            queue!(out, MoveTo(0, y as u16))?;
            for cell in &self.cells[y * self.width..(y + 1) * self.width] {
                if current != Some(cell.color) {
                    queue!(out, SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, SetForegroundColor(Color::Reset))?;
        Ok(())
    }
}

/// Clips a segment to the box `(min_x, min_y, max_x, max_y)` (Liang-Barsky).
///
/// Returns `None` when the segment misses the box or has a non-finite
/// coordinate.
fn clip_segment(
    (x0, y0, x1, y1): (f64, f64, f64, f64),
    (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
) -> Option<(f64, f64, f64, f64)> {
    let dx = x1 - x0;
    let dy = y1 - y0;
    if !(dx.is_finite() && dy.is_finite() && x0.is_finite() && y0.is_finite()) {
        return None;
    }
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [(-dx, x0 - min_x), (dx, max_x - x0), (-dy, y0 - min_y), (dy, max_y - y0)] {
        if p == 0.0 {
            // Parallel to this edge and outside it
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    let (cx0, cy0) = (x0 + t0 * dx, y0 + t0 * dy);
    let (cx1, cy1) = (x0 + t1 * dx, y0 + t1 * dy);
    // Keep rounding error from pushing the ends back out of the box
    Some((
        cx0.clamp(min_x, max_x),
        cy0.clamp(min_y, max_y),
        cx1.clamp(min_x, max_x),
        cy1.clamp(min_y, max_y),
    ))
}

/// Blends two RGB colours, `t = 0` giving `from` and `t = 1` giving `to`
pub fn lerp_color(from: (u8, u8, u8), to: (u8, u8, u8), t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
    Color::Rgb {
        r: mix(from.0, to.0),
        g: mix(from.1, to.1),
        b: mix(from.2, to.2),
    }
}
