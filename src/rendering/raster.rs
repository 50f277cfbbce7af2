//! Rasterizer: paint commands to an RGBA buffer, encoded as PNG.
//!
//! Text is drawn greeked: every non-space glyph becomes a solid block in
//! its cell, which keeps the exported layout readable as a layout without
//! bundling fonts.

use super::layout::glyph_width;
use super::paint::{PaintCommand, Rgba};
use super::path::flatten;
use super::Screenshot;
use crate::{Error, Result};
use image::{DynamicImage, ImageOutputFormat, Rgba as Pixel, RgbaImage};
use std::io::Cursor;

/// Largest edge (in device pixels) the rasterizer accepts
pub const MAX_DIMENSION: u32 = 16384;

struct Canvas {
    img: RgbaImage,
    scale: f32,
}

impl Canvas {
    fn blend(&mut self, x: i64, y: i64, rgba: Rgba) {
        if x < 0 || y < 0 || x >= self.img.width() as i64 || y >= self.img.height() as i64 {
            return;
        }
        let px = self.img.get_pixel_mut(x as u32, y as u32);
        let a = rgba.3 as u32;
        if a == 255 {
            *px = Pixel([rgba.0, rgba.1, rgba.2, 255]);
            return;
        }
        let inv = 255 - a;
        let mix = |src: u8, dst: u8| ((src as u32 * a + dst as u32 * inv) / 255) as u8;
        let [r, g, b, da] = px.0;
        *px = Pixel([
            mix(rgba.0, r),
            mix(rgba.1, g),
            mix(rgba.2, b),
            (a + da as u32 * inv / 255).min(255) as u8,
        ]);
    }

    /// Fill a rectangle given in logical units.
    fn fill(&mut self, x: f32, y: f32, w: f32, h: f32, rgba: Rgba) {
        let s = self.scale;
        let x0 = (x * s).round() as i64;
        let y0 = (y * s).round() as i64;
        let x1 = ((x + w) * s).round() as i64;
        let y1 = ((y + h) * s).round() as i64;
        for py in y0.max(0)..y1.min(self.img.height() as i64) {
            for px in x0.max(0)..x1.min(self.img.width() as i64) {
                self.blend(px, py, rgba);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn dashed_rect(&mut self, x: f32, y: f32, w: f32, h: f32, t: f32, dash: f32, rgba: Rgba) {
        let dash = dash.max(1.0);
        let mut pos = 0.0;
        while pos < w {
            let len = dash.min(w - pos);
            self.fill(x + pos, y, len, t, rgba);
            self.fill(x + pos, y + h - t, len, t, rgba);
            pos += dash * 2.0;
        }
        let mut pos = 0.0;
        while pos < h {
            let len = dash.min(h - pos);
            self.fill(x, y + pos, t, len, rgba);
            self.fill(x + w - t, y + pos, t, len, rgba);
            pos += dash * 2.0;
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, font_px: u32, rgba: Rgba) {
        let em = font_px as f32;
        let mut cx = x;
        for c in text.chars() {
            let w = glyph_width(c, font_px) as f32;
            if !c.is_whitespace() {
                let inset = (em / 10.0).max(1.0);
                self.fill(cx + inset / 2.0, y + inset, w - inset, em - 2.0 * inset, rgba);
            }
            cx += w;
        }
    }

    /// Stroke a polyline (logical units) by stamping discs along it.
    fn stroke(&mut self, points: &[(f32, f32)], width: f32, rgba: Rgba) {
        let s = self.scale;
        let r = (width * s / 2.0).max(0.5);
        let stamp = |canvas: &mut Canvas, cx: f32, cy: f32| {
            let (x0, x1) = ((cx - r).floor() as i64, (cx + r).ceil() as i64);
            let (y0, y1) = ((cy - r).floor() as i64, (cy + r).ceil() as i64);
            for py in y0..=y1 {
                for px in x0..=x1 {
                    let dx = px as f32 + 0.5 - cx;
                    let dy = py as f32 + 0.5 - cy;
                    if dx * dx + dy * dy <= r * r {
                        canvas.blend(px, py, rgba);
                    }
                }
            }
        };
        if let [(x, y)] = points {
            stamp(self, x * s, y * s);
            return;
        }
        let bounds = (-r, -r, self.img.width() as f32 + r, self.img.height() as f32 + r);
        for pair in points.windows(2) {
            let a = (pair[0].0 * s, pair[0].1 * s);
            let b = (pair[1].0 * s, pair[1].1 * s);
            let Some(((ax, ay), (bx, by))) = clip_segment(a, b, bounds) else {
                continue;
            };
            let len = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
            let steps = (len / 0.5).ceil().max(1.0) as usize;
            for i in 0..=steps {
                let t = i as f32 / steps as f32;
                stamp(self, ax + (bx - ax) * t, ay + (by - ay) * t);
            }
        }
    }
}

/// Clip the segment `a`-`b` to `(min_x, min_y, max_x, max_y)` (Liang-Barsky).
/// Returns `None` when nothing of it is inside or a coordinate is not finite.
fn clip_segment(a: (f32, f32), b: (f32, f32), bounds: (f32, f32, f32, f32)) -> Option<((f32, f32), (f32, f32))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    if ![a.0, a.1, dx, dy].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (min_x, min_y, max_x, max_y) = bounds;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [(-dx, a.0 - min_x), (dx, max_x - a.0), (-dy, a.1 - min_y), (dy, max_y - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    Some(((a.0 + dx * t0, a.1 + dy * t0), (a.0 + dx * t1, a.1 + dy * t1)))
}

/// Rasterize `commands` onto a `width`x`height` logical page at `scale`.
pub fn rasterize(commands: &[PaintCommand], width: u32, height: u32, scale: u32) -> Result<Screenshot> {
    if scale == 0 {
        return Err(Error::RenderError("scale must be at least 1".into()));
    }
    let (pw, ph) = (width.saturating_mul(scale), height.saturating_mul(scale));
    if pw == 0 || ph == 0 || pw > MAX_DIMENSION || ph > MAX_DIMENSION {
        return Err(Error::RenderError(format!(
            "image of {}x{} pixels is outside 1..={} per edge",
            pw, ph, MAX_DIMENSION
        )));
    }

    let mut canvas = Canvas {
        img: RgbaImage::from_pixel(pw, ph, Pixel([255, 255, 255, 255])),
        scale: scale as f32,
    };

    for cmd in commands {
        match cmd {
            PaintCommand::SolidRect { x, y, width, height, rgba } => {
                canvas.fill(*x as f32, *y as f32, *width as f32, *height as f32, *rgba);
            }
            PaintCommand::DashedRect { x, y, width, height, thickness, dash, rgba } => {
                canvas.dashed_rect(
                    *x as f32,
                    *y as f32,
                    *width as f32,
                    *height as f32,
                    *thickness as f32,
                    *dash as f32,
                    *rgba,
                );
            }
            PaintCommand::Text { x, y, text, font_px, rgba } => {
                canvas.text(*x as f32, *y as f32, text, *font_px, *rgba);
            }
            PaintCommand::Path { x, y, size, segments, stroke, rgba } => {
                let unit = *size as f32 / 100.0;
                for line in flatten(segments) {
                    let pts: Vec<(f32, f32)> = line
                        .iter()
                        .map(|p| (*x as f32 + p.x * unit, *y as f32 + p.y * unit))
                        .collect();
                    canvas.stroke(&pts, stroke * unit, *rgba);
                }
            }
        }
    }

    encode_png(canvas.img).map(|png_data| Screenshot { width: pw, height: ph, png_data })
}

fn encode_png(img: RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .map_err(|e| Error::RenderError(format!("PNG encoding failed: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::path::parse_path;

    fn pixel(shot: &Screenshot, x: u32, y: u32) -> [u8; 4] {
        let img = image::load_from_memory(&shot.png_data).unwrap().to_rgba8();
        img.get_pixel(x, y).0
    }

    #[test]
    fn rasterize_scales_dimensions() {
        let shot = rasterize(&[], 128, 64, 2).unwrap();
        assert_eq!((shot.width, shot.height), (256, 128));
        assert_eq!(&shot.png_data[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn solid_rect_is_filled_at_scale() {
        let cmds = [PaintCommand::SolidRect { x: 10, y: 10, width: 5, height: 5, rgba: (255, 0, 0, 255) }];
        let shot = rasterize(&cmds, 32, 32, 2).unwrap();
        assert_eq!(pixel(&shot, 25, 25), [255, 0, 0, 255]);
        assert_eq!(pixel(&shot, 5, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn path_strokes_diagonal() {
        let cmds = [PaintCommand::Path {
            x: 0,
            y: 0,
            size: 100,
            segments: parse_path("M0 0 L100 100").unwrap(),
            stroke: 3.0,
            rgba: (0, 0, 0, 255),
        }];
        let shot = rasterize(&cmds, 100, 100, 1).unwrap();
        assert_eq!(pixel(&shot, 50, 50), [0, 0, 0, 255]);
        assert_eq!(pixel(&shot, 90, 10), [255, 255, 255, 255]);
    }

    #[test]
    fn far_off_canvas_paths_are_clipped() {
        let cmds = [PaintCommand::Path {
            x: 0,
            y: 0,
            size: 100,
            segments: parse_path("M-1e8 50 L1e8 50 M50 50 L50 1e30 M3e38 1e38 L-3e38 1e38").unwrap(),
            stroke: 2.0,
            rgba: (0, 0, 0, 255),
        }];
        let shot = rasterize(&cmds, 100, 100, 2).unwrap();
        assert_eq!(pixel(&shot, 20, 100), [0, 0, 0, 255]);
        assert_eq!(pixel(&shot, 100, 180), [0, 0, 0, 255]);
        assert_eq!(pixel(&shot, 20, 20), [255, 255, 255, 255]);
    }

    #[test]
    fn clip_segment_keeps_inside_part() {
        let bounds = (0.0, 0.0, 10.0, 10.0);
        assert_eq!(clip_segment((-10.0, 5.0), (30.0, 5.0), bounds), Some(((0.0, 5.0), (10.0, 5.0))));
        assert_eq!(clip_segment((2.0, 2.0), (3.0, 3.0), bounds), Some(((2.0, 2.0), (3.0, 3.0))));
        assert_eq!(clip_segment((-5.0, -5.0), (-1.0, 20.0), bounds), None);
        assert_eq!(clip_segment((0.0, 0.0), (f32::INFINITY, 0.0), bounds), None);
        assert_eq!(clip_segment((3e38, 5.0), (-3e38, 5.0), bounds), None);
    }

    #[test]
    fn oversized_or_empty_pages_are_rejected() {
        assert!(rasterize(&[], 0, 10, 2).is_err());
        assert!(rasterize(&[], MAX_DIMENSION, 10, 2).is_err());
        assert!(rasterize(&[], 10, 10, 0).is_err());
    }
}
