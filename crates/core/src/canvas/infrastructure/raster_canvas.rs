use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::canvas::domain::image_source::{required_len, ImageSource, BYTES_PER_PIXEL};
use crate::canvas::infrastructure::canvas_error::CanvasError;
use crate::canvas::infrastructure::font_resolver;
use crate::canvas::infrastructure::text_painter::TextPainter;
use crate::shared::constants::TEXT_COLOR;

/// An RGBA raster surface that thumbnails and header are painted onto
/// before a single PNG export.
///
/// Starts fully transparent. Every drawing call is self-contained: there
/// is no transform or clip state carried between calls.
pub struct Canvas {
    surface: RgbaImage,
    fonts: HashMap<String, TextPainter>,
    font_files: HashMap<String, PathBuf>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: RgbaImage::new(width, height),
            fonts: HashMap::new(),
            font_files: HashMap::new(),
        }
    }

    /// Pins `family` to a specific font file instead of searching the
    /// installed fonts.
    pub fn register_font(&mut self, family: &str, path: &Path) {
        self.fonts.remove(family);
        self.font_files.insert(family.to_string(), path.to_path_buf());
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.surface.get_pixel(x, y).0
    }

    /// Paints exactly `w` x `h` opaque pixels at `(x, y)`; nothing outside
    /// the rectangle is touched.
    pub fn fill_rect(&mut self, rgb: [u8; 3], x: i64, y: i64, w: u32, h: u32) {
        let (right, bottom) = (x + i64::from(w), y + i64::from(h));
        for py in y.max(0)..bottom.min(i64::from(self.height())) {
            for px in x.max(0)..right.min(i64::from(self.width())) {
                self.surface
                    .put_pixel(px as u32, py as u32, Rgba([rgb[0], rgb[1], rgb[2], 0xff]));
            }
        }
    }

    /// Fills `w` x `h` at `(x, y)` and strokes a 1px outline centred on the
    /// rectangle's edge, so the ring just outside gets half coverage.
    pub fn draw_filled_rect(&mut self, rgb: [u8; 3], x: i64, y: i64, w: u32, h: u32) {
        self.fill_rect(rgb, x, y, w, h);

        let (right, bottom) = (x + i64::from(w), y + i64::from(h));
        for py in (y - 1)..=bottom {
            for px in (x - 1)..=right {
                let on_column = px == x - 1 || px == right;
                let on_row = py == y - 1 || py == bottom;
                let coverage = match (on_column, on_row) {
                    (true, true) => 64,
                    (true, false) | (false, true) => 128,
                    (false, false) => continue,
                };
                if let Some(dst) = self.pixel_mut(px, py) {
                    blend_pixel(dst, rgb, coverage);
                }
            }
        }
    }

    /// Draws newline-separated `text` top-left anchored at `(x, y)` using
    /// the installed font best matching `family`. Empty text is a no-op.
    #[allow(clippy::too_many_arguments)]
    pub fn write_text(
        &mut self,
        x: f32,
        y: f32,
        family: &str,
        size: f32,
        row_pitch: f32,
        text: &str,
    ) -> Result<(), CanvasError> {
        if text.is_empty() {
            return Ok(());
        }
        if !self.fonts.contains_key(family) {
            let explicit = self.font_files.get(family).map(PathBuf::as_path);
            let path = font_resolver::resolve(family, explicit).map_err(|source| {
                CanvasError::FontUnavailable {
                    family: family.to_string(),
                    source,
                }
            })?;
            log::debug!("Using font {} for family {family:?}", path.display());
            self.fonts
                .insert(family.to_string(), TextPainter::load(&path)?);
        }
        if let Some(painter) = self.fonts.get_mut(family) {
            painter.draw(&mut self.surface, x, y, size, row_pitch, text, TEXT_COLOR);
        }
        Ok(())
    }

    /// Paints `source` with its top-left corner at `(offset_x, offset_y)`,
    /// scaled to `width` x `height`. The fourth byte of each source pixel is
    /// ignored; painted pixels are opaque.
    pub fn write_image(
        &mut self,
        source: &dyn ImageSource,
        offset_x: i64,
        offset_y: i64,
        width: u32,
        height: u32,
    ) -> Result<(), CanvasError> {
        let (src_w, src_h, stride) = (source.width(), source.height(), source.stride());
        let required = required_len(src_w, src_h, stride);
        let data = source.data();
        if data.len() < required || stride < src_w as usize * BYTES_PER_PIXEL {
            return Err(CanvasError::InvalidSource {
                width: src_w,
                height: src_h,
                len: data.len(),
                required,
            });
        }
        if src_w == 0 || src_h == 0 || width == 0 || height == 0 {
            return Ok(());
        }

        let tile = RgbaImage::from_fn(src_w, src_h, |x, y| {
            let idx = y as usize * stride + x as usize * BYTES_PER_PIXEL;
            Rgba([data[idx + 2], data[idx + 1], data[idx], 0xff])
        });
        let tile = if (src_w, src_h) == (width, height) {
            tile
        } else {
            imageops::resize(&tile, width, height, FilterType::Triangle)
        };

        imageops::replace(&mut self.surface, &tile, offset_x, offset_y);
        Ok(())
    }

    /// Encodes the surface as PNG at `path`, creating parent directories.
    pub fn export(&self, path: &Path) -> Result<(), CanvasError> {
        let encode_err = |source| CanvasError::Encode {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| encode_err(image::ImageError::IoError(e)))?;
        }
        self.surface
            .save_with_format(path, ImageFormat::Png)
            .map_err(encode_err)
    }

    fn pixel_mut(&mut self, x: i64, y: i64) -> Option<&mut Rgba<u8>> {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return None;
        }
        Some(self.surface.get_pixel_mut(x as u32, y as u32))
    }
}

/// Source-over blend of an opaque color at `coverage` (0-255).
pub(crate) fn blend_pixel(dst: &mut Rgba<u8>, rgb: [u8; 3], coverage: u8) {
    let alpha = u16::from(coverage);
    if alpha == 0 {
        return;
    }
    let inv_alpha = 255 - alpha;
    for channel in 0..3 {
        let src = u16::from(rgb[channel]);
        let under = u16::from(dst[channel]);
        dst[channel] = ((src * alpha + under * inv_alpha + 127) / 255) as u8;
    }
    dst[3] = (alpha + (u16::from(dst[3]) * inv_alpha + 127) / 255) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{HEADER_BACKGROUND, HEADER_FONT_FAMILY};
    use crate::test_support::PixelBuffer;

    #[test]
    fn test_new_canvas_is_transparent() {
        let canvas = Canvas::new(4, 3);
        assert_eq!((canvas.width(), canvas.height()), (4, 3));
        assert_eq!(canvas.pixel(3, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_filled_rect_covers_interior() {
        let mut canvas = Canvas::new(20, 20);
        canvas.draw_filled_rect(HEADER_BACKGROUND, 0, 0, 20, 10);
        assert_eq!(canvas.pixel(0, 0), [255, 255, 240, 255]);
        assert_eq!(canvas.pixel(19, 9), [255, 255, 240, 255]);
    }

    #[test]
    fn test_filled_rect_stroke_half_covers_outer_ring() {
        let mut canvas = Canvas::new(20, 20);
        canvas.draw_filled_rect([200, 0, 0], 5, 5, 4, 4);
        assert_eq!(canvas.pixel(6, 6), [200, 0, 0, 255]);
        assert_eq!(canvas.pixel(6, 9)[3], 128);
        assert_eq!(canvas.pixel(4, 6)[3], 128);
        assert_eq!(canvas.pixel(4, 4)[3], 64);
        assert_eq!(canvas.pixel(10, 10), [0, 0, 0, 0]);
    }

    #[test]
    fn test_fill_rect_leaves_neighbours_untouched() {
        let mut canvas = Canvas::new(20, 10);
        canvas
            .write_image(&PixelBuffer::filled(10, 10, [255, 255, 255]), 0, 0, 10, 10)
            .unwrap();
        canvas.fill_rect([0, 0, 0], 10, 0, 10, 10);

        assert_eq!(canvas.pixel(9, 5), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(5, 5), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(10, 5), [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(19, 9), [0, 0, 0, 255]);
    }

    #[test]
    fn test_filled_rect_clips_to_surface() {
        let mut canvas = Canvas::new(5, 5);
        canvas.draw_filled_rect([1, 2, 3], -3, -3, 100, 100);
        assert_eq!(canvas.pixel(0, 0), [1, 2, 3, 255]);
        assert_eq!(canvas.pixel(4, 4), [1, 2, 3, 255]);
    }

    #[test]
    fn test_write_image_one_to_one_exact() {
        let mut canvas = Canvas::new(10, 10);
        let buffer = PixelBuffer::filled(4, 3, [10, 200, 30]);
        canvas.write_image(&buffer, 2, 5, 4, 3).unwrap();

        assert_eq!(canvas.pixel(2, 5), [10, 200, 30, 255]);
        assert_eq!(canvas.pixel(5, 7), [10, 200, 30, 255]);
        assert_eq!(canvas.pixel(1, 5), [0, 0, 0, 0]);
        assert_eq!(canvas.pixel(6, 5), [0, 0, 0, 0]);
        assert_eq!(canvas.pixel(2, 8), [0, 0, 0, 0]);
    }

    #[test]
    fn test_write_image_scales_to_target() {
        let mut canvas = Canvas::new(16, 16);
        let buffer = PixelBuffer::filled(2, 2, [50, 60, 70]);
        canvas.write_image(&buffer, 4, 4, 8, 8).unwrap();

        assert_eq!(canvas.pixel(4, 4), [50, 60, 70, 255]);
        assert_eq!(canvas.pixel(11, 11), [50, 60, 70, 255]);
        assert_eq!(canvas.pixel(12, 12), [0, 0, 0, 0]);
    }

    #[test]
    fn test_write_image_does_not_mutate_source() {
        let mut canvas = Canvas::new(4, 4);
        let buffer = PixelBuffer::filled(2, 2, [9, 8, 7]);
        let before = buffer.clone();
        canvas.write_image(&buffer, 0, 0, 4, 4).unwrap();
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_write_image_calls_compose_independently() {
        let mut canvas = Canvas::new(8, 4);
        canvas
            .write_image(&PixelBuffer::filled(1, 1, [255, 0, 0]), 0, 0, 4, 4)
            .unwrap();
        canvas
            .write_image(&PixelBuffer::filled(2, 2, [0, 0, 255]), 4, 0, 4, 4)
            .unwrap();
        assert_eq!(canvas.pixel(3, 3), [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(4, 0), [0, 0, 255, 255]);
    }

    #[test]
    fn test_write_image_partially_offscreen_is_clipped() {
        let mut canvas = Canvas::new(4, 4);
        let buffer = PixelBuffer::filled(4, 4, [1, 1, 1]);
        canvas.write_image(&buffer, 2, 2, 4, 4).unwrap();
        assert_eq!(canvas.pixel(3, 3), [1, 1, 1, 255]);
        assert_eq!(canvas.pixel(1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_write_image_rejects_short_source() {
        struct Short;
        impl ImageSource for Short {
            fn width(&self) -> u32 {
                4
            }
            fn height(&self) -> u32 {
                4
            }
            fn stride(&self) -> usize {
                16
            }
            fn data(&self) -> &[u8] {
                &[0; 10]
            }
        }
        let mut canvas = Canvas::new(4, 4);
        assert!(matches!(
            canvas.write_image(&Short, 0, 0, 4, 4),
            Err(CanvasError::InvalidSource { required: 64, .. })
        ));
    }

    #[test]
    fn test_export_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");

        let mut canvas = Canvas::new(12, 8);
        canvas
            .write_image(&PixelBuffer::filled(6, 4, [12, 34, 56]), 6, 4, 6, 4)
            .unwrap();
        canvas.export(&path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (12, 8));
        assert_eq!(img.get_pixel(6, 4).0, [12, 34, 56, 255]);
        assert_eq!(img.get_pixel(11, 7).0, [12, 34, 56, 255]);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_export_is_repeatable_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.png");
        let canvas = Canvas::new(2, 2);
        canvas.export(&path).unwrap();
        canvas.export(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_export_to_unwritable_path_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let canvas = Canvas::new(2, 2);
        let err = canvas.export(&blocker.join("out.png")).unwrap_err();
        assert!(matches!(err, CanvasError::Encode { .. }));
        assert_eq!(err.operation(), Some("write_png"));
    }

    #[test]
    fn test_write_empty_text_needs_no_font() {
        let mut canvas = Canvas::new(4, 4);
        canvas.register_font("Nope", Path::new("/nonexistent/font.ttf"));
        assert!(canvas.write_text(0.0, 0.0, "Nope", 20.0, 10.0, "").is_ok());
    }

    #[test]
    fn test_write_text_with_missing_registered_font_fails() {
        let mut canvas = Canvas::new(4, 4);
        canvas.register_font("Nope", Path::new("/nonexistent/font.ttf"));
        assert!(matches!(
            canvas.write_text(0.0, 0.0, "Nope", 20.0, 10.0, "abc"),
            Err(CanvasError::FontUnavailable { .. })
        ));
    }

    #[test]
    fn test_write_text_inks_header() {
        let mut canvas = Canvas::new(300, 120);
        canvas.draw_filled_rect(HEADER_BACKGROUND, 0, 0, 300, 120);
        match canvas.write_text(10.0, 0.0, HEADER_FONT_FAMILY, 20.0, 10.0, "File Name: a.mp4") {
            Ok(()) => {}
            Err(CanvasError::FontUnavailable { .. }) => return,
            Err(e) => panic!("unexpected error: {e}"),
        }
        let dark = canvas
            .surface
            .pixels()
            .any(|p| p[0] < 128 && p[1] < 128 && p[2] < 128);
        assert!(dark);
    }

    #[test]
    fn test_blend_pixel_full_and_half_coverage() {
        let mut px = Rgba([0, 0, 0, 0]);
        blend_pixel(&mut px, [255, 255, 255], 255);
        assert_eq!(px.0, [255, 255, 255, 255]);

        let mut px = Rgba([0, 0, 0, 255]);
        blend_pixel(&mut px, [200, 100, 0], 128);
        assert_eq!(px.0, [100, 50, 0, 255]);
    }
}
