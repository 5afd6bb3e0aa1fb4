//! Software rasterization of overlay frames.
//!
//! Used natively to save overlay previews. Strokes are centered on the
//! rectangle's edges like a 2D canvas; text commands are not rasterized.

use image::{Rgba as Pixel, RgbaImage};

use crate::constants::Rgba;
use crate::render::{DrawCommand, Frame};

impl Frame {
    /// Paint the frame onto a transparent buffer of the frame's size.
    pub fn rasterize(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width, self.height);
        for command in &self.commands {
            paint(&mut img, command);
        }
        img
    }
}

fn paint(img: &mut RgbaImage, command: &DrawCommand) {
    match command {
        DrawCommand::Clear => {
            for p in img.pixels_mut() {
                *p = Pixel([0, 0, 0, 0]);
            }
        }
        DrawCommand::StrokeRect {
            x,
            y,
            width,
            height,
            color,
            line_width,
        } => {
            let (x0, x1) = ordered(*x, x + width);
            let (y0, y1) = ordered(*y, y + height);
            let h = line_width / 2.0;
            // top, bottom, left, right
            fill(img, x0 - h, y0 - h, x1 + h, y0 + h, *color);
            fill(img, x0 - h, y1 - h, x1 + h, y1 + h, *color);
            fill(img, x0 - h, y0 + h, x0 + h, y1 - h, *color);
            fill(img, x1 - h, y0 + h, x1 + h, y1 - h, *color);
        }
        DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            let (x0, x1) = ordered(*x, x + width);
            let (y0, y1) = ordered(*y, y + height);
            fill(img, x0, y0, x1, y1, *color);
        }
        DrawCommand::Text { .. } => {}
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Blend `color` over every pixel whose center lies in `[x0, x1) x [y0, y1)`.
fn fill(img: &mut RgbaImage, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let (w, h) = img.dimensions();
    let cols = pixel_span(x0, x1, w);
    let rows = pixel_span(y0, y1, h);

    for py in rows {
        for px in cols.clone() {
            let dst = img.get_pixel_mut(px, py);
            *dst = blend(*dst, color);
        }
    }
}

fn pixel_span(start: f32, end: f32, limit: u32) -> std::ops::Range<u32> {
    let clamp = |v: f32| (v - 0.5).ceil().clamp(0.0, limit as f32) as u32;
    clamp(start)..clamp(end)
}

/// Source-over compositing.
fn blend(dst: Pixel<u8>, src: Rgba) -> Pixel<u8> {
    let sa = f32::from(src.a) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Pixel([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| {
        let c = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    Pixel([
        channel(src.r, dst[0]),
        channel(src.g, dst[1]),
        channel(src.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}
