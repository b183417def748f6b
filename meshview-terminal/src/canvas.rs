//! Half-block pixel canvas for terminal rendering
//!
//! Each terminal cell shows two vertically stacked pixels: the upper half
//! block glyph is drawn with the top pixel as foreground and the bottom
//! pixel as background.

use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use meshview_core::{Color, Point2D};
use std::io::Write;

const UPPER_HALF_BLOCK: char = '\u{2580}';

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

const CLIP_MARGIN: f64 = 1e-6;

/// RGB pixel buffer drawn to the terminal two rows per cell
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    /// Canvas covering `cols` x `rows` terminal cells.
    pub fn for_cells(cols: u16, rows: u16) -> Self {
        Self::new(cols as usize, rows as usize * 2)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Color::BLACK; width * height];
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Pixels outside the canvas are discarded.
    fn plot(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Even-odd scanline fill, sampling at pixel centres
    ///
    /// A pixel is covered when its centre lies in the half-open span
    /// `[left, right)`, so zero-area polygons cover nothing.
    pub fn fill_polygon(&mut self, points: &[Point2D], color: Color) {
        if points.len() < 3 || self.width == 0 || self.height == 0 {
            return;
        }
        let (min_y, max_y) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        if !min_y.is_finite() || !max_y.is_finite() {
            return;
        }

        let first_row = (min_y - 0.5).ceil().max(0.0) as i64;
        let last_row = ((max_y - 0.5).ceil() - 1.0).min(self.height as f64 - 1.0) as i64;
        let last_col = self.width as f64 - 1.0;
        let mut crossings = Vec::with_capacity(points.len());

        for y in first_row..=last_row {
            let sample_y = y as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sample_y) != (b.y <= sample_y) {
                    let t = (sample_y - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(f64::total_cmp);

            for span in crossings.chunks_exact(2) {
                let x0 = (span[0] - 0.5).ceil().max(0.0);
                let x1 = ((span[1] - 0.5).ceil() - 1.0).min(last_col);
                if x1 < x0 {
                    continue;
                }
                for x in x0 as i64..=x1 as i64 {
                    self.plot(x, y, color);
                }
            }
        }
    }

    /// Bresenham line between the pixels containing `from` and `to`
    ///
    /// The segment is clipped to the canvas first, so the walk never
    /// leaves the visible pixels.
    pub fn draw_line(&mut self, from: Point2D, to: Point2D, color: Color) {
        let Some((from, to)) = self.clip(from, to) else {
            return;
        };
        let (mut x0, mut y0) = (from.x.floor() as i64, from.y.floor() as i64);
        let (x1, y1) = (to.x.floor() as i64, to.y.floor() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, color);
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

    /// Cohen-Sutherland clip of a segment to the pixel area `[0, w) x [0, h)`.
    fn clip(&self, mut from: Point2D, mut to: Point2D) -> Option<(Point2D, Point2D)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
            return None;
        }
        // Largest coordinates that still floor into the last column and row.
        let max_x = self.width as f64 - CLIP_MARGIN;
        let max_y = self.height as f64 - CLIP_MARGIN;

        // Bounded, as rounding can leave a clipped point just outside.
        for _ in 0..8 {
            let code_from = outcode(from, max_x, max_y);
            let code_to = outcode(to, max_x, max_y);
            if code_from | code_to == INSIDE {
                return Some((from, to));
            }
            if code_from & code_to != INSIDE {
                return None;
            }

            let moving_from = code_from != INSIDE;
            let (a, b, code) = if moving_from {
                (from, to, code_from)
            } else {
                (to, from, code_to)
            };
            let clipped = if code & BOTTOM != 0 {
                let t = (max_y - a.y) / (b.y - a.y);
                Point2D::new(a.x + t * (b.x - a.x), max_y)
            } else if code & TOP != 0 {
                let t = -a.y / (b.y - a.y);
                Point2D::new(a.x + t * (b.x - a.x), 0.0)
            } else if code & RIGHT != 0 {
                let t = (max_x - a.x) / (b.x - a.x);
                Point2D::new(max_x, a.y + t * (b.y - a.y))
            } else {
                let t = -a.x / (b.x - a.x);
                Point2D::new(0.0, a.y + t * (b.y - a.y))
            };
            if !(clipped.x.is_finite() && clipped.y.is_finite()) {
                return None;
            }
            if moving_from {
                from = clipped;
            } else {
                to = clipped;
            }
        }
        None
    }

    /// Write the canvas starting at terminal row `top_row`.
    pub fn draw<W: Write>(&self, writer: &mut W, top_row: u16) -> std::io::Result<()> {
        let mut current: Option<(Color, Color)> = None;
        for (cell_row, y) in (0..self.height).step_by(2).enumerate() {
            writer.queue(cursor::MoveTo(0, top_row + cell_row as u16))?;
            for x in 0..self.width {
                let top = self.pixels[y * self.width + x];
                let bottom = self.pixel(x, y + 1).unwrap_or(Color::BLACK);
                if current != Some((top, bottom)) {
                    writer.queue(SetForegroundColor(to_term(top)))?;
                    writer.queue(SetBackgroundColor(to_term(bottom)))?;
                    current = Some((top, bottom));
                }
                writer.queue(Print(UPPER_HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn outcode(p: Point2D, max_x: f64, max_y: f64) -> u8 {
    let mut code = INSIDE;
    if p.x < 0.0 {
        code |= LEFT;
    } else if p.x > max_x {
        code |= RIGHT;
    }
    if p.y < 0.0 {
        code |= TOP;
    } else if p.y > max_y {
        code |= BOTTOM;
    }
    code
}

fn to_term(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}
