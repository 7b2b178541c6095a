use image::{Rgb, RgbImage};

use crate::accumulator::Accumulator;
use crate::classifier::quarter_circle;
use crate::config::Config;
use crate::error::Result;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const CURVE: Rgb<u8> = Rgb([0, 0, 0]);
const CURVE_SAMPLES: usize = 100;
const CURVE_WIDTH: u32 = 2;

/// Maps data coordinates onto canvas pixels, y growing upward.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    x_bounds: (f64, f64),
    y_bounds: (f64, f64),
    width: u32,
    height: u32,
}

impl Viewport {
    fn to_pixel(&self, x: f64, y: f64) -> Option<(i64, i64)> {
        let (x0, x1) = self.x_bounds;
        let (y0, y1) = self.y_bounds;
        if x < x0 || x > x1 || y < y0 || y > y1 {
            return None;
        }
        let px = ((x - x0) / (x1 - x0) * (self.width - 1) as f64).round() as i64;
        let py = ((y1 - y) / (y1 - y0) * (self.height - 1) as f64).round() as i64;
        Some((px, py))
    }
}

pub struct Renderer {
    viewport: Viewport,
    point_size: u32,
    canvas: RgbImage,
}

impl Renderer {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut renderer = Renderer {
            viewport: Viewport {
                x_bounds: config.x_bounds,
                y_bounds: config.y_bounds,
                width: config.width,
                height: config.height,
            },
            point_size: config.point_size,
            canvas: RgbImage::from_pixel(config.width, config.height, BACKGROUND),
        };
        renderer.draw_curve();
        Ok(renderer)
    }

    pub fn frame(&self) -> &RgbImage {
        &self.canvas
    }

    /// Full redraw: background, reference curve, then every point so far.
    pub fn draw(&mut self, acc: &Accumulator) -> &RgbImage {
        for pixel in self.canvas.pixels_mut() {
            *pixel = BACKGROUND;
        }
        self.draw_curve();
        for (point, class) in acc.points() {
            if let Some((px, py)) = self.viewport.to_pixel(point.x, point.y) {
                stamp(&mut self.canvas, px, py, self.point_size, Rgb(class.color()));
            }
        }
        &self.canvas
    }

    fn draw_curve(&mut self) {
        let step = 1.0 / (CURVE_SAMPLES - 1) as f64;
        let pixels: Vec<(i64, i64)> = (0..CURVE_SAMPLES)
            .map(|i| (i as f64 * step).min(1.0))
            .filter_map(|x| self.viewport.to_pixel(x, quarter_circle(x)))
            .collect();

        for pair in pixels.windows(2) {
            draw_line(&mut self.canvas, pair[0], pair[1], CURVE_WIDTH, CURVE);
        }
    }
}

/// Fills a `size`x`size` square centered on (cx, cy), clipped to the canvas.
fn stamp(img: &mut RgbImage, cx: i64, cy: i64, size: u32, color: Rgb<u8>) {
    let size = size as i64;
    let start_x = cx - size / 2;
    let start_y = cy - size / 2;
    for y in start_y..start_y + size {
        for x in start_x..start_x + size {
            if x >= 0 && y >= 0 && x < img.width() as i64 && y < img.height() as i64 {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

// Bresenham
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), width: u32, color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp(img, x, y, width, color);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
