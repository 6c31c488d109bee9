//! Template validation.
//!
//! The renderer assumes slot geometry fits its panel; this validator is
//! where that invariant is actually enforced. Errors are collected, not
//! short-circuited, so a template author sees every problem at once.

use super::{Background, Panel, Template};

/// Collected validation outcome.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// Validate a whole template: identity, category values are already
/// type-checked by deserialization; this checks the value-level invariants.
pub fn validate_template(template: &Template) -> ValidationReport {
    let mut report = ValidationReport::default();

    if template.id.trim().is_empty() {
        report.push("template id is required");
    }
    if template.name.trim().is_empty() {
        report.push("template name is required");
    } else if template.name.len() > 100 {
        report.push("template name must be at most 100 characters");
    }

    for (kind, panel) in template.panels.iter() {
        validate_panel(panel, &format!("panel '{}'", kind), &mut report);
    }

    report
}

/// Validate one panel: positive dimensions, opacity range, hex colors,
/// and the slot containment invariant.
pub fn validate_panel(panel: &Panel, context: &str, report: &mut ValidationReport) {
    let dims = panel.dimensions;
    if dims.width == 0 || dims.height == 0 {
        report.push(format!(
            "{context}: dimensions must be positive (got {}x{})",
            dims.width, dims.height
        ));
        // Containment checks against a degenerate panel are noise.
        return;
    }

    let opacity = panel.background.opacity();
    if !(0.0..=1.0).contains(&opacity) {
        report.push(format!("{context}: background opacity {opacity} is outside [0, 1]"));
    }
    if let Background::Color { value, .. } = &panel.background {
        if !is_hex_color(value) {
            report.push(format!("{context}: background color '{value}' is not a hex color"));
        }
    }

    let (pw, ph) = (dims.width as f32, dims.height as f32);

    for slot in &panel.text_slots {
        let slot_ctx = format!("{context}, text slot '{}'", slot.id);
        check_bounds(slot.position.x, slot.position.y, slot.size.width, slot.size.height, pw, ph, &slot_ctx, report);
        if slot.max_length == 0 {
            report.push(format!("{slot_ctx}: maxLength must be positive"));
        }
        if let Some(color) = &slot.default_color {
            if !is_hex_color(color) {
                report.push(format!("{slot_ctx}: color '{color}' is not a hex color"));
            }
        }
        if let Some(lh) = slot.line_height {
            if lh <= 0.0 {
                report.push(format!("{slot_ctx}: lineHeight must be positive"));
            }
        }
    }

    for slot in &panel.image_slots {
        let slot_ctx = format!("{context}, image slot '{}'", slot.id);
        check_bounds(slot.position.x, slot.position.y, slot.size.width, slot.size.height, pw, ph, &slot_ctx, report);
        if let Some(radius) = slot.border_radius {
            if radius < 0.0 {
                report.push(format!("{slot_ctx}: borderRadius must not be negative"));
            }
        }
    }
}

fn check_bounds(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    panel_w: f32,
    panel_h: f32,
    context: &str,
    report: &mut ValidationReport,
) {
    if x < 0.0 || y < 0.0 {
        report.push(format!("{context}: position ({x}, {y}) is negative"));
    }
    if w <= 0.0 || h <= 0.0 {
        report.push(format!("{context}: size ({w}, {h}) must be positive"));
    }
    if x + w > panel_w || y + h > panel_h {
        report.push(format!(
            "{context}: extends to ({}, {}), outside the {panel_w}x{panel_h} panel",
            x + w,
            y + h
        ));
    }
}

/// `#rgb` or `#rrggbb`, hex digits only.
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}
