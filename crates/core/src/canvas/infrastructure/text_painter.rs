use std::collections::HashMap;
use std::fs;
use std::path::Path;

use fontdue::{Font, FontSettings, Metrics};
use image::RgbaImage;

use crate::canvas::domain::text_layout::{place_lines, LineExtents};
use crate::canvas::infrastructure::canvas_error::CanvasError;
use crate::canvas::infrastructure::raster_canvas::blend_pixel;

struct GlyphBitmap {
    metrics: Metrics,
    coverage: Vec<u8>,
}

/// Rasterizes text with one loaded font, caching glyph bitmaps per size.
pub(crate) struct TextPainter {
    font: Font,
    glyph_cache: HashMap<(char, u32), GlyphBitmap>,
}

impl TextPainter {
    pub(crate) fn load(path: &Path) -> Result<Self, CanvasError> {
        let bytes = fs::read(path).map_err(|e| CanvasError::FontLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|e| {
            CanvasError::FontLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            font,
            glyph_cache: HashMap::new(),
        })
    }

    /// Ink bounds of a single line at `size` pixels.
    pub(crate) fn extents(&self, line: &str, size: f32) -> LineExtents {
        let mut left = f32::INFINITY;
        let mut top = f32::INFINITY;
        for (c, pen) in self.pen_positions(line, size) {
            let m = self.font.metrics(c, size);
            if m.width == 0 || m.height == 0 {
                continue;
            }
            left = left.min(pen + m.xmin as f32);
            top = top.min(-(m.ymin + m.height as i32) as f32);
        }
        if left.is_finite() {
            LineExtents {
                x_bearing: left,
                y_bearing: top,
            }
        } else {
            LineExtents::default()
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn draw(
        &mut self,
        surface: &mut RgbaImage,
        x: f32,
        y: f32,
        size: f32,
        row_pitch: f32,
        text: &str,
        color: [u8; 3],
    ) {
        let lines = place_lines(text, x, y, row_pitch, |line| self.extents(line, size));
        for line in lines {
            let origin_x = line.x;
            let baseline = line.baseline.round() as i64;
            for (c, pen) in self.pen_positions(line.text, size) {
                let glyph = self.glyph(c, size);
                if glyph.metrics.width == 0 || glyph.metrics.height == 0 {
                    continue;
                }
                let left = (origin_x + pen).round() as i64 + i64::from(glyph.metrics.xmin);
                let top = baseline - i64::from(glyph.metrics.ymin) - glyph.metrics.height as i64;
                blend_glyph(surface, left, top, glyph, color);
            }
        }
    }

    /// Pen x offset of every character on a line, with kerning applied.
    fn pen_positions(&self, line: &str, size: f32) -> Vec<(char, f32)> {
        let mut pen = 0.0;
        let mut previous = None;
        let mut positions = Vec::with_capacity(line.len());
        for c in line.chars() {
            if let Some(prev) = previous {
                pen += self.font.horizontal_kern(prev, c, size).unwrap_or(0.0);
            }
            positions.push((c, pen));
            pen += self.font.metrics(c, size).advance_width;
            previous = Some(c);
        }
        positions
    }

    fn glyph(&mut self, c: char, size: f32) -> &GlyphBitmap {
        let font = &self.font;
        self.glyph_cache
            .entry((c, size.to_bits()))
            .or_insert_with(|| {
                let (metrics, coverage) = font.rasterize(c, size);
                GlyphBitmap { metrics, coverage }
            })
    }
}

fn blend_glyph(surface: &mut RgbaImage, left: i64, top: i64, glyph: &GlyphBitmap, color: [u8; 3]) {
    let (width, height) = (i64::from(surface.width()), i64::from(surface.height()));
    for row in 0..glyph.metrics.height {
        let py = top + row as i64;
        if py < 0 || py >= height {
            continue;
        }
        for col in 0..glyph.metrics.width {
            let px = left + col as i64;
            if px < 0 || px >= width {
                continue;
            }
            let coverage = glyph.coverage[row * glyph.metrics.width + col];
            if coverage == 0 {
                continue;
            }
            blend_pixel(surface.get_pixel_mut(px as u32, py as u32), color, coverage);
        }
    }
}
