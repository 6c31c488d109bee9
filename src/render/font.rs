//! Font catalog: text measurement and line rasterization.
//!
//! Two kinds of faces back a [`FontSpec`] family name:
//!
//! - **Built-in bitmap faces** (Spleen PSF2, embedded): always available,
//!   fully deterministic, scaled to the requested pixel size by nearest
//!   neighbour. Any family with no registered TTF resolves here.
//! - **TTF faces** registered at runtime, rendered through `ab_glyph` with
//!   anti-aliased coverage.
//!
//! Rasterized lines come back as an f32 coverage buffer (0.0 = none,
//! 1.0 = full) that the surface composites in its text color.

use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontArc, ScaleFont};
use spleen_font::{PSF2Font, FONT_12X24, FONT_6X12};

use crate::error::CardError;

/// A rasterized line of text as a coverage buffer.
pub struct TextRaster {
    pub width: usize,
    pub height: usize,
    /// Row-major coverage values in [0, 1].
    pub coverage: Vec<f32>,
}

/// Resolves family names to faces. Families are matched case-insensitively;
/// unregistered families fall back to the built-in bitmap face.
#[derive(Default)]
pub struct FontCatalog {
    ttf: HashMap<String, FontArc>,
}

impl FontCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a TTF face for `family` from a font file on disk.
    pub fn register_ttf_file(&mut self, family: &str, path: &Path) -> Result<(), CardError> {
        let bytes = std::fs::read(path)
            .map_err(|e| CardError::Render(format!("font file {}: {}", path.display(), e)))?;
        self.register_ttf_bytes(family, bytes)
    }

    /// Register a TTF face for `family` from raw font bytes.
    pub fn register_ttf_bytes(&mut self, family: &str, bytes: Vec<u8>) -> Result<(), CardError> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| CardError::Render(format!("invalid font data for '{family}': {e}")))?;
        self.ttf.insert(family.to_lowercase(), font);
        Ok(())
    }

    fn ttf_face(&self, family: &str) -> Option<&FontArc> {
        self.ttf.get(&family.to_lowercase())
    }

    /// Advance width of `text` at pixel size `size`.
    pub fn measure(&self, text: &str, family: &str, size: f32) -> f32 {
        match self.ttf_face(family) {
            Some(font) => measure_ttf(font, text, size),
            None => text.chars().count() as f32 * bitmap_advance(size),
        }
    }

    /// Rasterize a single line of `text` at pixel size `size`.
    pub fn raster_line(&self, text: &str, family: &str, size: f32) -> TextRaster {
        match self.ttf_face(family) {
            Some(font) => raster_ttf(font, text, size),
            None => raster_bitmap(text, size),
        }
    }
}

/// Per-character advance of the bitmap face. Spleen glyphs are 2:1.
fn bitmap_advance(size: f32) -> f32 {
    (size / 2.0).max(1.0)
}

// ============================================================================
// BITMAP FACE
// ============================================================================

/// Rasterize with the Spleen bitmap face, scaled by nearest neighbour.
///
/// The 6x12 face serves small sizes and the 12x24 face everything else, so
/// scaling stays close to integral.
fn raster_bitmap(text: &str, size: f32) -> TextRaster {
    let cell_h = (size.round().max(1.0)) as usize;
    let cell_w = ((size / 2.0).round().max(1.0)) as usize;
    let chars: Vec<char> = text.chars().collect();
    let width = (cell_w * chars.len()).max(1);
    let height = cell_h;
    let mut coverage = vec![0.0f32; width * height];

    // Unknown characters come back blank; their advance is still consumed.
    if size <= 16.0 {
        let (src_w, src_h) = (6usize, 12usize);
        let mut spleen = PSF2Font::new(FONT_6X12).unwrap();
        for (i, ch) in chars.iter().enumerate() {
            let mut cell = vec![0u8; src_w * src_h];
            let utf8 = ch.to_string();
            if let Some(glyph) = spleen.glyph_for_utf8(utf8.as_bytes()) {
                for (gy, row) in glyph.enumerate() {
                    for (gx, on) in row.enumerate() {
                        if gy < src_h && gx < src_w && on {
                            cell[gy * src_w + gx] = 1;
                        }
                    }
                }
            }
            blit_scaled(&cell, src_w, src_h, &mut coverage, width, i * cell_w, cell_w, cell_h);
        }
    } else {
        let (src_w, src_h) = (12usize, 24usize);
        let mut spleen = PSF2Font::new(FONT_12X24).unwrap();
        for (i, ch) in chars.iter().enumerate() {
            let mut cell = vec![0u8; src_w * src_h];
            let utf8 = ch.to_string();
            if let Some(glyph) = spleen.glyph_for_utf8(utf8.as_bytes()) {
                for (gy, row) in glyph.enumerate() {
                    for (gx, on) in row.enumerate() {
                        if gy < src_h && gx < src_w && on {
                            cell[gy * src_w + gx] = 1;
                        }
                    }
                }
            }
            blit_scaled(&cell, src_w, src_h, &mut coverage, width, i * cell_w, cell_w, cell_h);
        }
    }

    TextRaster {
        width,
        height,
        coverage,
    }
}

/// Nearest-neighbour blit of a source glyph into one character cell.
fn blit_scaled(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    dst: &mut [f32],
    dst_stride: usize,
    dst_x: usize,
    cell_w: usize,
    cell_h: usize,
) {
    for dy in 0..cell_h {
        let sy = dy * src_h / cell_h;
        for dx in 0..cell_w {
            let sx = dx * src_w / cell_w;
            if src[sy * src_w + sx] != 0 {
                dst[dy * dst_stride + dst_x + dx] = 1.0;
            }
        }
    }
}

// ============================================================================
// TTF FACE
// ============================================================================

fn measure_ttf(font: &FontArc, text: &str, size: f32) -> f32 {
    let scaled = font.as_scaled(size);
    text.chars()
        .map(|ch| scaled.h_advance(font.glyph_id(ch)))
        .sum()
}

/// Rasterize a line with anti-aliased glyph coverage. The line box spans
/// ascent to descent; glyphs sit on the baseline at `ascent`.
fn raster_ttf(font: &FontArc, text: &str, size: f32) -> TextRaster {
    let scaled = font.as_scaled(size);

    let mut glyphs = Vec::new();
    let mut caret = 0.0f32;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        glyphs.push((id, caret));
        caret += scaled.h_advance(id);
    }

    let width = (caret.ceil() as usize).max(1);
    let ascent = scaled.ascent();
    let descent = scaled.descent();
    let height = ((ascent - descent).ceil() as usize).max(1);
    let mut coverage = vec![0.0f32; width * height];

    for &(id, gx) in &glyphs {
        let glyph = id.with_scale_and_position(size, ab_glyph::point(gx, ascent));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, c| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                if x >= 0 && (x as usize) < width && y >= 0 && (y as usize) < height {
                    let idx = y as usize * width + x as usize;
                    coverage[idx] = (coverage[idx] + c).min(1.0);
                }
            });
        }
    }

    TextRaster {
        width,
        height,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_measurement_is_per_character() {
        let catalog = FontCatalog::new();
        let one = catalog.measure("H", "Arial", 18.0);
        let five = catalog.measure("Hello", "Arial", 18.0);
        assert_eq!(one, 9.0);
        assert_eq!(five, one * 5.0);
    }

    #[test]
    fn bitmap_measurement_scales_with_size() {
        let catalog = FontCatalog::new();
        assert_eq!(catalog.measure("ab", "Arial", 32.0), 32.0);
        assert_eq!(catalog.measure("ab", "Arial", 14.0), 14.0);
    }

    #[test]
    fn bitmap_raster_has_ink() {
        let catalog = FontCatalog::new();
        let raster = catalog.raster_line("Hi!", "Arial", 18.0);
        assert_eq!(raster.height, 18);
        assert_eq!(raster.width, 9 * 3);
        assert!(raster.coverage.iter().any(|&c| c > 0.0));
    }

    #[test]
    fn bitmap_raster_empty_text() {
        let catalog = FontCatalog::new();
        let raster = catalog.raster_line("", "Arial", 18.0);
        assert!(raster.coverage.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn small_sizes_use_the_small_face() {
        let catalog = FontCatalog::new();
        let raster = catalog.raster_line("X", "Arial", 14.0);
        assert_eq!(raster.width, 7);
        assert_eq!(raster.height, 14);
        assert!(raster.coverage.iter().any(|&c| c > 0.0));
    }

    #[test]
    fn bogus_ttf_bytes_are_a_render_error() {
        let mut catalog = FontCatalog::new();
        let err = catalog.register_ttf_bytes("Fancy", vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, CardError::Render(_)));
        // Family still resolves to the bitmap fallback
        assert!(catalog.measure("x", "Fancy", 18.0) > 0.0);
    }

    #[test]
    fn family_lookup_is_case_insensitive() {
        let catalog = FontCatalog::new();
        // Both spellings hit the same (bitmap) face and agree
        assert_eq!(
            catalog.measure("word", "Georgia", 24.0),
            catalog.measure("word", "georgia", 24.0)
        );
    }
}
