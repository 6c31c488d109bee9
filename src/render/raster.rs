//! RGBA raster implementation of [`DrawSurface`].
//!
//! Pixels are straight-alpha RGBA composited source-over, starting from a
//! fully transparent surface. Shape strokes are drawn inside the shape
//! bounds so a slot's drawn bounding box equals its declared geometry
//! exactly. Coordinates arrive in panel-space units and are mapped to
//! device pixels through the scale recorded by [`DrawSurface::begin`].

use std::io::Cursor;

use image::{Rgba, RgbaImage};

use crate::error::CardError;
use crate::render::font::FontCatalog;
use crate::render::surface::{Color, DrawSurface, Fill, FontSpec, Rect};
use crate::template::TextAlign;

/// An in-memory RGBA drawing surface with an attached font catalog.
pub struct RasterSurface {
    image: RgbaImage,
    scale: f32,
    fonts: FontCatalog,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterSurface {
    pub fn new() -> Self {
        Self::with_fonts(FontCatalog::new())
    }

    pub fn with_fonts(fonts: FontCatalog) -> Self {
        Self {
            image: RgbaImage::new(1, 1),
            scale: 1.0,
            fonts,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Whether any pixel is non-transparent. Blank-output checks are a
    /// caller concern, not the renderer's.
    pub fn has_content(&self) -> bool {
        self.image.pixels().any(|p| p[3] > 0)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Lossless PNG export (previews, golden files).
    pub fn encode_png(&self) -> Result<Vec<u8>, CardError> {
        let mut out = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| CardError::Render(format!("PNG encode: {e}")))?;
        Ok(out)
    }

    fn dev(&self, v: f32) -> i64 {
        (v * self.scale).round() as i64
    }

    /// Source-over composite of one pixel. Out-of-bounds writes are dropped.
    fn composite_px(&mut self, x: i64, y: i64, color: Color, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let (w, h) = self.image.dimensions();
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return;
        }
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        let sa = alpha.clamp(0.0, 1.0);
        let da = px[3] as f32 / 255.0;
        let oa = sa + da * (1.0 - sa);
        if oa <= 0.0 {
            return;
        }
        let blend = |sc: u8, dc: u8| {
            (((sc as f32) * sa + (dc as f32) * da * (1.0 - sa)) / oa).round() as u8
        };
        *px = Rgba([
            blend(color.r, px[0]),
            blend(color.g, px[1]),
            blend(color.b, px[2]),
            (oa * 255.0).round() as u8,
        ]);
    }

    /// Paint every device pixel of `bounds` whose panel-space center passes
    /// `contains`, colored by `fill` (gradients span the `bounds` box).
    fn paint_region(
        &mut self,
        bounds: Rect,
        fill: &Fill<'_>,
        contains: impl Fn(f32, f32) -> bool,
    ) {
        let x0 = self.dev(bounds.x);
        let y0 = self.dev(bounds.y);
        let x1 = self.dev(bounds.x + bounds.width);
        let y1 = self.dev(bounds.y + bounds.height);
        let scale = self.scale;

        match fill {
            Fill::Solid { color, opacity } => {
                for y in y0..y1 {
                    for x in x0..x1 {
                        let px = (x as f32 + 0.5) / scale;
                        let py = (y as f32 + 0.5) / scale;
                        if contains(px, py) {
                            self.composite_px(x, y, *color, *opacity);
                        }
                    }
                }
            }
            Fill::Gradient { gradient, opacity } => {
                let (p1, p2) = gradient.endpoints(bounds.width, bounds.height);
                let dx = p2.0 - p1.0;
                let dy = p2.1 - p1.1;
                let len2 = dx * dx + dy * dy;
                for y in y0..y1 {
                    for x in x0..x1 {
                        let px = (x as f32 + 0.5) / scale;
                        let py = (y as f32 + 0.5) / scale;
                        if !contains(px, py) {
                            continue;
                        }
                        let rx = px - bounds.x;
                        let ry = py - bounds.y;
                        let t = if len2 <= f32::EPSILON {
                            0.0
                        } else {
                            (((rx - p1.0) * dx + (ry - p1.1) * dy) / len2).clamp(0.0, 1.0)
                        };
                        self.composite_px(x, y, gradient.color_at(t), *opacity);
                    }
                }
            }
        }
    }
}

/// Pixel-center containment for a rounded rectangle.
fn rounded_contains(px: f32, py: f32, rect: Rect, radius: f32) -> bool {
    if px < rect.x || px > rect.x + rect.width || py < rect.y || py > rect.y + rect.height {
        return false;
    }
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    let cx = px.clamp(rect.x + r, rect.x + rect.width - r);
    let cy = py.clamp(rect.y + r, rect.y + rect.height - r);
    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy <= r * r
}

impl DrawSurface for RasterSurface {
    fn begin(&mut self, width: f32, height: f32, scale: f32) -> Result<(), CardError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(CardError::Render(format!("invalid render scale {scale}")));
        }
        let w = (width * scale).round().max(1.0) as u32;
        let h = (height * scale).round().max(1.0) as u32;
        self.image = RgbaImage::new(w, h);
        self.scale = scale;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CardError> {
        for p in self.image.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill<'_>) -> Result<(), CardError> {
        self.paint_region(rect, fill, |_, _| true);
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) -> Result<(), CardError> {
        let x0 = self.dev(rect.x);
        let y0 = self.dev(rect.y);
        let x1 = self.dev(rect.x + rect.width);
        let y1 = self.dev(rect.y + rect.height);
        let w = ((width * self.scale).round() as i64).max(1);
        for y in y0..y1 {
            for x in x0..x1 {
                let edge = x < x0 + w || x >= x1 - w || y < y0 + w || y >= y1 - w;
                if edge {
                    self.composite_px(x, y, color, 1.0);
                }
            }
        }
        Ok(())
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, fill: &Fill<'_>) -> Result<(), CardError> {
        let bounds = Rect::new(cx - radius, cy - radius, radius * 2.0, radius * 2.0);
        self.paint_region(bounds, fill, |px, py| {
            let dx = px - cx;
            let dy = py - cy;
            dx * dx + dy * dy <= radius * radius
        });
        Ok(())
    }

    fn stroke_circle(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
        width: f32,
    ) -> Result<(), CardError> {
        let inner = (radius - width).max(0.0);
        let bounds = Rect::new(cx - radius, cy - radius, radius * 2.0, radius * 2.0);
        self.paint_region(bounds, &Fill::solid(color, 1.0), |px, py| {
            let dx = px - cx;
            let dy = py - cy;
            let d2 = dx * dx + dy * dy;
            d2 <= radius * radius && d2 >= inner * inner
        });
        Ok(())
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, fill: &Fill<'_>) -> Result<(), CardError> {
        self.paint_region(rect, fill, |px, py| rounded_contains(px, py, rect, radius));
        Ok(())
    }

    fn stroke_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        color: Color,
        width: f32,
    ) -> Result<(), CardError> {
        let inner = Rect::new(
            rect.x + width,
            rect.y + width,
            (rect.width - 2.0 * width).max(0.0),
            (rect.height - 2.0 * width).max(0.0),
        );
        let inner_radius = (radius - width).max(0.0);
        self.paint_region(rect, &Fill::solid(color, 1.0), |px, py| {
            rounded_contains(px, py, rect, radius)
                && !(inner.width > 0.0
                    && inner.height > 0.0
                    && rounded_contains(px, py, inner, inner_radius))
        });
        Ok(())
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        self.fonts.measure(text, &font.family, font.size)
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: &FontSpec,
        color: Color,
        align: TextAlign,
    ) -> Result<(), CardError> {
        if text.is_empty() {
            return Ok(());
        }
        let line_width = self.measure_text(text, font);
        let x0 = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - line_width / 2.0,
            TextAlign::Right => x - line_width,
        };
        let raster = self.fonts.raster_line(text, &font.family, font.size * self.scale);
        let dx0 = (x0 * self.scale).round() as i64;
        let dy0 = (y * self.scale).round() as i64;
        for ry in 0..raster.height {
            for rx in 0..raster.width {
                let c = raster.coverage[ry * raster.width + rx];
                if c > 0.0 {
                    self.composite_px(dx0 + rx as i64, dy0 + ry as i64, color, c);
                }
            }
        }
        Ok(())
    }

    fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, CardError> {
        // JPEG carries no alpha; flatten over white like a browser export.
        let (w, h) = self.image.dimensions();
        let mut rgb = image::RgbImage::new(w, h);
        for (x, y, p) in self.image.enumerate_pixels() {
            let a = p[3] as f32 / 255.0;
            let over = |c: u8| (c as f32 * a + 255.0 * (1.0 - a)).round() as u8;
            rgb.put_pixel(x, y, image::Rgb([over(p[0]), over(p[1]), over(p[2])]));
        }
        let mut out = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| CardError::Render(format!("JPEG encode: {e}")))?;
        Ok(out)
    }
}
