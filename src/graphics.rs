use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use cycloid::math::{point_on_circle, Point};

/// One character cell of the canvas
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            glyph: ' ',
            color: Color::Reset,
        }
    }
}

/// Character buffer drawn into once per frame and flushed to the terminal
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
            cells: vec![Cell::default(); width * height],
        }
    }

    #[cfg(test)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[cfg(test)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Sets a cell, ignoring coordinates outside the canvas
    pub fn plot(&mut self, x: isize, y: isize, glyph: char, color: Color) {
        if x >= 0 && x < self.width as isize && y >= 0 && y < self.height as isize {
            self.cells[y as usize * self.width + x as usize] = Cell { glyph, color };
        }
    }

    /// Writes `text` starting at `(x, y)`, clipped to the canvas
    pub fn draw_text(&mut self, x: isize, y: isize, text: &str, color: Color) {
        for (i, glyph) in text.chars().enumerate() {
            self.plot(x + i as isize, y, glyph, color);
        }
    }

    /// Queues the whole buffer to `out`. The caller flushes.
    pub fn flush_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (row, line) in self.cells.chunks(self.width.max(1)).enumerate() {
            queue!(out, MoveTo(0, row as u16))?;
            let mut current = None;
            for cell in line {
                if current != Some(cell.color) {
                    queue!(out, SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                queue!(out, Print(cell.glyph))?;
            }
        }
        queue!(out, ResetColor)
    }
}

/// Maps world coordinates onto canvas cells.
///
/// Terminal cells are about twice as tall as they are wide, so one world unit
/// spans twice as many columns as rows.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    scale: f64,
    origin: Point,
    offset: [f64; 2],
}

impl Viewport {
    /// Fits the world rectangle `(min, max)` into a canvas of the given size
    pub fn fit(min: Point, max: Point, width: usize, height: usize) -> Self {
        let span_x = (max.x - min.x).max(f64::EPSILON);
        let span_y = (max.y - min.y).max(f64::EPSILON);
        let scale = ((width as f64 - 1.0) / (2.0 * span_x))
            .min((height as f64 - 1.0) / span_y)
            .max(f64::EPSILON);
        let offset = [
            ((width as f64 - 1.0) - 2.0 * span_x * scale) / 2.0,
            ((height as f64 - 1.0) - span_y * scale) / 2.0,
        ];
        Viewport {
            scale,
            origin: min,
            offset,
        }
    }

    pub fn project(&self, p: &Point) -> [f64; 2] {
        [
            (p.x - self.origin.x) * self.scale * 2.0 + self.offset[0],
            (p.y - self.origin.y) * self.scale + self.offset[1],
        ]
    }

    /// Canvas rows covered by one world unit
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Draws a line between two points in the canvas using Bresenham's algorithm
pub fn draw_line(canvas: &mut Canvas, from: [f64; 2], to: [f64; 2], glyph: char, color: Color) {
    let (mut x0, mut y0, x1, y1) = (
        from[0].round() as isize,
        from[1].round() as isize,
        to[0].round() as isize,
        to[1].round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        canvas.plot(x0, y0, glyph, color);

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

/// Draws a polyline through consecutive points
pub fn draw_polyline<'a, I>(
    canvas: &mut Canvas,
    view: &Viewport,
    points: I,
    glyph: char,
    color: Color,
) where
    I: IntoIterator<Item = &'a Point>,
{
    let mut last: Option<[f64; 2]> = None;
    for p in points {
        let screen = view.project(p);
        match last {
            Some(prev) => draw_line(canvas, prev, screen, glyph, color),
            None => canvas.plot(
                screen[0].round() as isize,
                screen[1].round() as isize,
                glyph,
                color,
            ),
        }
        last = Some(screen);
    }
}

/// Draws the outline of a circle in world space
pub fn draw_circle(
    canvas: &mut Canvas,
    view: &Viewport,
    center: &Point,
    radius: f64,
    color: Color,
) {
    // Enough segments that neighbouring samples land in adjacent cells.
    let circumference = radius * view.scale() * 2.0 * std::f64::consts::TAU;
    let segments = (circumference.ceil() as usize).clamp(12, 720);
    let step = std::f64::consts::TAU / segments as f64;
    let outline: Vec<Point> = (0..=segments)
        .map(|i| point_on_circle(center, radius, i as f64 * step))
        .collect();
    draw_polyline(canvas, view, &outline, '.', color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_ignores_out_of_bounds() {
        let mut canvas = Canvas::new(4, 3);
        canvas.plot(-1, 0, '#', Color::White);
        canvas.plot(4, 0, '#', Color::White);
        canvas.plot(0, 3, '#', Color::White);
        assert!((0..3).all(|y| (0..4).all(|x| canvas.get(x, y) == Some(Cell::default()))));
        assert_eq!(canvas.get(4, 0), None);
    }

    #[test]
    fn horizontal_line_fills_cells() {
        let mut canvas = Canvas::new(10, 1);
        draw_line(&mut canvas, [1.0, 0.0], [5.0, 0.0], '*', Color::Red);
        let drawn: String = (0..10)
            .map(|x| canvas.get(x, 0).map_or('?', |c| c.glyph))
            .collect();
        assert_eq!(drawn, " *****    ");
    }

    #[test]
    fn viewport_keeps_world_inside_canvas() {
        let view = Viewport::fit(Point::new(-10.0, -10.0), Point::new(10.0, 10.0), 80, 24);
        for corner in [Point::new(-10.0, -10.0), Point::new(10.0, 10.0)] {
            let [x, y] = view.project(&corner);
            assert!((-0.5..79.5).contains(&x), "x = {x}");
            assert!((-0.5..23.5).contains(&y), "y = {y}");
        }
    }

    #[test]
    fn text_is_clipped() {
        let mut canvas = Canvas::new(3, 1);
        canvas.draw_text(1, 0, "abc", Color::White);
        assert_eq!(canvas.get(1, 0).map(|c| c.glyph), Some('a'));
        assert_eq!(canvas.get(2, 0).map(|c| c.glyph), Some('b'));
    }
}
