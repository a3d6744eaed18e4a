//! Label text rasterization.
//!
//! Glyph outlines come from a user-configured font file; coverage is
//! alpha-blended straight onto the canvas. Without a configured font the
//! renderer places label shapes normally but draws nothing.

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use tiny_skia::{Pixmap, PremultipliedColorU8};

use super::error::{RenderError, RenderResult};
use super::style::Rgb;

/// A loaded label font.
pub struct LabelFont {
    font: FontVec,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl LabelFont {
    /// Loads a TTF/OTF file. Labels look best with a bold face.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| RenderError::FontLoad(path.to_path_buf(), e.to_string()))?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| RenderError::FontLoad(path.to_path_buf(), e.to_string()))?;
        Ok(Self { font })
    }

    /// Draws `text` with its baseline starting at `(x, y)` canvas pixels.
    pub fn draw_text(&self, pixmap: &mut Pixmap, text: &str, x: f32, y: f32, px: f32, color: Rgb) {
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);

        let mut caret = point(x, y);
        let mut previous = None;
        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret.x += scaled.kern(prev, glyph_id);
            }
            let glyph = glyph_id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);

            let Some(outlined) = scaled.outline_glyph(glyph) else {
                continue;
            };
            let glyph_bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px_x = glyph_bounds.min.x as i32 + gx as i32;
                let px_y = glyph_bounds.min.y as i32 + gy as i32;
                blend_pixel(pixmap, px_x, px_y, color, coverage);
            });
        }
    }
}

/// Source-over blend of one covered pixel.
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Rgb, coverage: f32) {
    if x < 0 || y < 0 || x >= pixmap.width() as i32 || y >= pixmap.height() as i32 {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let index = y as usize * pixmap.width() as usize + x as usize;
    let pixels = pixmap.pixels_mut();
    let dst = pixels[index];

    let blend =
        |src: u8, dst: u8| (f32::from(src) * alpha + f32::from(dst) * (1.0 - alpha)) as u8;
    let r = blend(color.0, dst.red());
    let g = blend(color.1, dst.green());
    let b = blend(color.2, dst.blue());
    let a = (255.0 * alpha + f32::from(dst.alpha()) * (1.0 - alpha)) as u8;
    if let Some(premultiplied) = PremultipliedColorU8::from_rgba(r.min(a), g.min(a), b.min(a), a) {
        pixels[index] = premultiplied;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::style::BLACK;

    #[test]
    fn loading_a_missing_font_fails() {
        let err = LabelFont::load("/nonexistent/label.ttf").unwrap_err();
        assert!(matches!(err, RenderError::FontLoad(..)));
    }

    #[test]
    fn loading_garbage_bytes_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"not a font").unwrap();
        let err = LabelFont::load(file.path()).unwrap_err();
        assert!(matches!(err, RenderError::FontLoad(..)));
    }

    #[test]
    fn blending_full_coverage_writes_the_color() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        blend_pixel(&mut pixmap, 1, 1, BLACK, 1.0);
        let pixel = pixmap.pixels()[4 + 1];
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (0, 0, 0));
    }

    #[test]
    fn blending_outside_the_canvas_is_ignored() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        blend_pixel(&mut pixmap, -1, 0, BLACK, 1.0);
        blend_pixel(&mut pixmap, 0, 99, BLACK, 1.0);
        assert!(pixmap.pixels().iter().all(|p| p.red() == 255));
    }
}
