//! # Panel Renderer
//!
//! Deterministically paints one panel's visual representation onto a
//! [`DrawSurface`] at a requested scale. Steps, in order:
//!
//! 1. Size the surface to `round(panel × scale)` device pixels; everything
//!    after works in unscaled panel-space units.
//! 2. Clear the surface.
//! 3. Paint the background (solid color, parsed linear gradient, or the
//!    solid-white placeholder for image/pattern and malformed gradients).
//! 4. Draw text-slot placeholders in list order: size-tier font, alignment
//!    anchor, greedy word-wrap against real measurement, clipped to the
//!    slot's vertical bound.
//! 5. Draw image-slot placeholders in list order: neutral shape plus a
//!    centered label.
//!
//! The renderer owns no persistent state; rendering twice with identical
//! input onto a fresh surface produces pixel-identical output. Any surface
//! failure aborts the remaining steps and carries its message out as a
//! [`CardError::Render`]-family error.

pub mod font;
pub mod gradient;
pub mod lifecycle;
pub mod raster;
pub mod surface;

pub use font::FontCatalog;
pub use lifecycle::{RequestToken, ViewLifecycle, ViewState};
pub use raster::RasterSurface;
pub use surface::{Color, DrawSurface, Fill, FontSpec, Rect};

use std::collections::HashMap;

use crate::error::CardError;
use crate::template::{Background, ImageSlot, Panel, SlotShape, TextAlign, TextSlot};

/// Scale-down factor for screen previews.
pub const PREVIEW_SCALE: f32 = 0.3;

/// Print output renders 1:1; panel dimensions are already print-resolution
/// pixels.
pub const PRINT_SCALE: f32 = 1.0;

// Image-slot placeholder palette.
const SLOT_FILL: Color = Color { r: 0xf3, g: 0xf4, b: 0xf6 };
const SLOT_STROKE: Color = Color { r: 0xd1, g: 0xd5, b: 0xdb };
const SLOT_LABEL: Color = Color { r: 0x9c, g: 0xa3, b: 0xaf };
const SLOT_STROKE_WIDTH: f32 = 2.0;
const SLOT_LABEL_SIZE: f32 = 16.0;

/// Render a panel's placeholder representation.
pub fn render_panel<S: DrawSurface>(
    panel: &Panel,
    surface: &mut S,
    scale: f32,
) -> Result<(), CardError> {
    render_panel_with_text(panel, surface, scale, &HashMap::new())
}

/// Render a panel with user-filled text values overriding slot
/// placeholders. Keys are slot ids; values are clamped to each slot's
/// `maxLength`.
pub fn render_panel_with_text<S: DrawSurface>(
    panel: &Panel,
    surface: &mut S,
    scale: f32,
    text_values: &HashMap<String, String>,
) -> Result<(), CardError> {
    let w = panel.dimensions.width as f32;
    let h = panel.dimensions.height as f32;

    surface.begin(w, h, scale)?;
    surface.clear()?;

    paint_background(&panel.background, surface, w, h)?;

    for slot in &panel.text_slots {
        let value = text_values.get(&slot.id).map(String::as_str);
        draw_text_slot(slot, surface, value)?;
    }
    for slot in &panel.image_slots {
        draw_image_slot(slot, surface)?;
    }

    Ok(())
}

fn paint_background<S: DrawSurface>(
    background: &Background,
    surface: &mut S,
    w: f32,
    h: f32,
) -> Result<(), CardError> {
    let full = Rect::new(0.0, 0.0, w, h);
    match background {
        Background::Color { value, opacity } => match Color::from_hex(value) {
            Some(color) => surface.fill_rect(full, &Fill::solid(color, *opacity)),
            // Same fallback contract as a malformed gradient.
            None => surface.fill_rect(full, &Fill::solid(Color::WHITE, 1.0)),
        },
        Background::Gradient { value, opacity } => {
            match gradient::parse_linear_gradient(value) {
                Some(g) => surface.fill_rect(
                    full,
                    &Fill::Gradient {
                        gradient: &g,
                        opacity: *opacity,
                    },
                ),
                None => surface.fill_rect(full, &Fill::solid(Color::WHITE, 1.0)),
            }
        }
        // Image and pattern backgrounds are not implemented yet: explicit
        // solid-white placeholder at full opacity.
        Background::Image { .. } | Background::Pattern { .. } => {
            surface.fill_rect(full, &Fill::solid(Color::WHITE, 1.0))
        }
    }
}

fn draw_text_slot<S: DrawSurface>(
    slot: &TextSlot,
    surface: &mut S,
    value: Option<&str>,
) -> Result<(), CardError> {
    let font = FontSpec::new(slot.default_font.clone(), slot.default_size.px());
    let color = Color::from_hex(slot.color()).unwrap_or(Color::BLACK);

    // Filled values respect the slot limit; placeholders are template-authored.
    let text = match value {
        Some(v) => clamp_chars(v, slot.max_length),
        None => slot.placeholder.clone(),
    };

    let anchor_x = match slot.text_align {
        TextAlign::Left => slot.position.x,
        TextAlign::Center => slot.position.x + slot.size.width / 2.0,
        TextAlign::Right => slot.position.x + slot.size.width,
    };

    let lines = wrap_text(&text, slot.size.width, |s| surface.measure_text(s, &font));
    let line_height = font.size * slot.line_height_multiplier();

    for (i, line) in lines.iter().enumerate() {
        let y = slot.position.y + i as f32 * line_height;
        // Skip lines whose bottom edge would leave the slot.
        if y + line_height <= slot.position.y + slot.size.height {
            surface.draw_text(line, anchor_x, y, &font, color, slot.text_align)?;
        }
    }

    Ok(())
}

fn draw_image_slot<S: DrawSurface>(slot: &ImageSlot, surface: &mut S) -> Result<(), CardError> {
    let rect = Rect::new(
        slot.position.x,
        slot.position.y,
        slot.size.width,
        slot.size.height,
    );
    let fill = Fill::solid(SLOT_FILL, 1.0);

    match slot.shape() {
        SlotShape::Rectangle => {
            surface.fill_rect(rect, &fill)?;
            surface.stroke_rect(rect, SLOT_STROKE, SLOT_STROKE_WIDTH)?;
        }
        SlotShape::Circle => {
            let cx = rect.x + rect.width / 2.0;
            let cy = rect.y + rect.height / 2.0;
            let radius = rect.width.min(rect.height) / 2.0;
            surface.fill_circle(cx, cy, radius, &fill)?;
            surface.stroke_circle(cx, cy, radius, SLOT_STROKE, SLOT_STROKE_WIDTH)?;
        }
        SlotShape::RoundedRectangle { radius } => {
            surface.fill_rounded_rect(rect, radius, &fill)?;
            surface.stroke_rounded_rect(rect, radius, SLOT_STROKE, SLOT_STROKE_WIDTH)?;
        }
    }

    let label_font = FontSpec::new("Arial", SLOT_LABEL_SIZE);
    surface.draw_text(
        slot.label(),
        rect.x + rect.width / 2.0,
        rect.y + rect.height / 2.0 - SLOT_LABEL_SIZE / 2.0,
        &label_font,
        SLOT_LABEL,
        TextAlign::Center,
    )
}

/// Greedy word wrap. A line accumulates words while its measured width
/// stays strictly below `max_width`; the first word that would exceed it
/// starts a new line. A single word wider than the slot is placed alone,
/// not hyphenated.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut words = text.split(' ');
    let mut current = words.next().unwrap_or("").to_string();
    let mut lines = Vec::new();

    for word in words {
        let candidate = format!("{current} {word}");
        if measure(&candidate) < max_width {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    lines.push(current);
    lines
}

/// Truncate to at most `max` characters.
fn clamp_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
