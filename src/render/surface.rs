//! Abstract 2D drawing surface.
//!
//! The renderer consumes any raster surface implementing [`DrawSurface`]:
//! pixel sizing with a coordinate scale, clearing, solid/gradient fills,
//! stroked and filled rectangle/circle/rounded-rectangle, and text
//! measurement/drawing with font, color and alignment control. The browser
//! canvas played this role in the original application; [`RasterSurface`]
//! plays it here.
//!
//! All geometry is in unscaled panel-space units. The surface applies the
//! scale passed to [`DrawSurface::begin`] so the renderer's logic is
//! identical for screen previews and print output.
//!
//! [`RasterSurface`]: super::raster::RasterSurface

use crate::error::CardError;
use crate::render::gradient::LinearGradient;
use crate::template::TextAlign;

/// sRGB color, 8 bits per channel. Alpha is carried separately as opacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// Parse `#rgb` or `#rrggbb`. Returns `None` for anything else.
    pub fn from_hex(value: &str) -> Option<Color> {
        let hex = value.strip_prefix('#')?;
        match hex.len() {
            3 => {
                let mut it = hex.chars();
                let (r, g, b) = (it.next()?, it.next()?, it.next()?);
                let expand = |c: char| {
                    let d = c.to_digit(16)? as u8;
                    Some(d * 16 + d)
                };
                Some(Color {
                    r: expand(r)?,
                    g: expand(g)?,
                    b: expand(b)?,
                })
            }
            6 => {
                let channel = |s: &str| u8::from_str_radix(s, 16).ok();
                Some(Color {
                    r: channel(&hex[0..2])?,
                    g: channel(&hex[2..4])?,
                    b: channel(&hex[4..6])?,
                })
            }
            _ => None,
        }
    }

    /// Hex form, always `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Axis-aligned rectangle in panel-space units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Font request: a family name resolved by the surface's font catalog and
/// a pixel size in panel-space units.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// Fill style for shape operations.
#[derive(Debug, Clone)]
pub enum Fill<'a> {
    Solid { color: Color, opacity: f32 },
    Gradient {
        gradient: &'a LinearGradient,
        opacity: f32,
    },
}

impl Fill<'_> {
    pub fn solid(color: Color, opacity: f32) -> Fill<'static> {
        Fill::Solid { color, opacity }
    }
}

/// Raster drawing surface capability set.
///
/// Text drawing uses top-of-line baseline semantics: `y` is the top edge of
/// the line box. The `align` parameter interprets `x` as the left edge,
/// center, or right edge of the drawn text respectively.
pub trait DrawSurface {
    /// Size the surface to `round(width * scale)` × `round(height * scale)`
    /// device pixels and record the scale applied to subsequent coordinates.
    fn begin(&mut self, width: f32, height: f32, scale: f32) -> Result<(), CardError>;

    /// Reset every pixel to fully transparent.
    fn clear(&mut self) -> Result<(), CardError>;

    fn fill_rect(&mut self, rect: Rect, fill: &Fill<'_>) -> Result<(), CardError>;

    /// Stroke drawn inside the rectangle bounds.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) -> Result<(), CardError>;

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, fill: &Fill<'_>) -> Result<(), CardError>;

    /// Stroke drawn inside the circle radius.
    fn stroke_circle(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
        width: f32,
    ) -> Result<(), CardError>;

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, fill: &Fill<'_>) -> Result<(), CardError>;

    fn stroke_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        color: Color,
        width: f32,
    ) -> Result<(), CardError>;

    /// Measured advance width of `text` in panel-space units.
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32;

    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: &FontSpec,
        color: Color,
        align: TextAlign,
    ) -> Result<(), CardError>;

    /// Export the surface as a lossy-compressed raster image.
    fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, CardError>;
}
