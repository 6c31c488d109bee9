//! CSS-style linear-gradient parsing.
//!
//! Backgrounds may carry a `linear-gradient(...)` description. This module
//! is the dedicated grammar for it: a successful parse yields a structured
//! [`LinearGradient`] (angle plus ordered color stops); any failure is a
//! `None`, and the renderer substitutes a solid white fill. Parsing never
//! panics on malformed input.
//!
//! Accepted form:
//!
//! ```text
//! linear-gradient([<angle>deg,] <color> <pct>%, <color> <pct>%, ...)
//! ```
//!
//! The angle defaults to 90° when absent. Stop colors are hex
//! (`#rgb`/`#rrggbb`); every stop must carry a `%` offset.

use crate::render::surface::Color;

/// One parsed color stop. `offset` is normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub color: Color,
    pub offset: f32,
}

/// A parsed linear gradient: angle in degrees plus ordered stops.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub angle_deg: f32,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// Gradient endpoints spanning the full `width`×`height` box.
    ///
    /// The axis is a vector from the box center rotated by `(angle − 90)`
    /// degrees; the first endpoint (offset 0) sits at center plus the
    /// rotated half-extent, the second at center minus it.
    pub fn endpoints(&self, width: f32, height: f32) -> ((f32, f32), (f32, f32)) {
        let rad = (self.angle_deg - 90.0).to_radians();
        let (cx, cy) = (width / 2.0, height / 2.0);
        let dx = rad.cos() * width / 2.0;
        let dy = rad.sin() * height / 2.0;
        ((cx + dx, cy + dy), (cx - dx, cy - dy))
    }

    /// Interpolated color at normalized position `t` along the axis.
    pub fn color_at(&self, t: f32) -> Color {
        let stops = &self.stops;
        debug_assert!(!stops.is_empty());
        if t <= stops[0].offset {
            return stops[0].color;
        }
        for pair in stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f32::EPSILON {
                    return b.color;
                }
                let f = (t - a.offset) / span;
                return lerp_color(a.color, b.color, f);
            }
        }
        stops[stops.len() - 1].color
    }
}

fn lerp_color(a: Color, b: Color, f: f32) -> Color {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * f).round() as u8;
    Color {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
    }
}

/// Parse a `linear-gradient(...)` description. `None` means the caller
/// should fall back to solid white.
pub fn parse_linear_gradient(value: &str) -> Option<LinearGradient> {
    let start = value.find("linear-gradient(")? + "linear-gradient(".len();
    let rest = &value[start..];
    let end = rest.find(')')?;
    let inner = &rest[..end];

    let mut params = inner.split(',').map(str::trim).peekable();

    let angle_deg = match params.peek() {
        Some(first) if first.ends_with("deg") => {
            let angle = first.trim_end_matches("deg").trim().parse::<f32>().ok()?;
            params.next();
            angle
        }
        _ => 90.0,
    };

    let mut stops = Vec::new();
    for param in params {
        stops.push(parse_stop(param)?);
    }
    if stops.is_empty() {
        return None;
    }

    Some(LinearGradient { angle_deg, stops })
}

/// Parse one `<color> <pct>%` stop.
fn parse_stop(param: &str) -> Option<GradientStop> {
    let (color_part, pct_part) = param.rsplit_once(char::is_whitespace)?;
    let pct = pct_part.strip_suffix('%')?.trim().parse::<f32>().ok()?;
    let color = Color::from_hex(color_part.trim())?;
    Some(GradientStop {
        color,
        offset: pct / 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_stop_gradient_with_angle() {
        let g = parse_linear_gradient("linear-gradient(45deg, #fff 0%, #000 100%)").unwrap();
        assert_eq!(g.angle_deg, 45.0);
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[0], GradientStop { color: Color::WHITE, offset: 0.0 });
        assert_eq!(g.stops[1], GradientStop { color: Color::BLACK, offset: 1.0 });
    }

    #[test]
    fn angle_defaults_to_90() {
        let g = parse_linear_gradient("linear-gradient(#ff0000 0%, #0000ff 50%)").unwrap();
        assert_eq!(g.angle_deg, 90.0);
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[1].offset, 0.5);
    }

    #[test]
    fn missing_percent_markers_fail() {
        assert_eq!(parse_linear_gradient("linear-gradient(45deg, #fff, #000)"), None);
    }

    #[test]
    fn garbage_fails_without_panicking() {
        assert_eq!(parse_linear_gradient(""), None);
        assert_eq!(parse_linear_gradient("radial-gradient(#fff 0%, #000 100%)"), None);
        assert_eq!(parse_linear_gradient("linear-gradient("), None);
        assert_eq!(parse_linear_gradient("linear-gradient()"), None);
        assert_eq!(parse_linear_gradient("linear-gradient(45deg)"), None);
        assert_eq!(parse_linear_gradient("linear-gradient(45deg, chartreuse 0%)"), None);
    }

    #[test]
    fn endpoints_for_90_degrees_run_horizontally() {
        let g = parse_linear_gradient("linear-gradient(90deg, #fff 0%, #000 100%)").unwrap();
        let ((x1, y1), (x2, y2)) = g.endpoints(200.0, 100.0);
        assert!((x1 - 200.0).abs() < 1e-4);
        assert!((y1 - 50.0).abs() < 1e-4);
        assert!(x2.abs() < 1e-4);
        assert!((y2 - 50.0).abs() < 1e-4);
    }

    #[test]
    fn endpoints_for_180_degrees_run_vertically() {
        let g = parse_linear_gradient("linear-gradient(180deg, #fff 0%, #000 100%)").unwrap();
        let ((x1, y1), (x2, y2)) = g.endpoints(200.0, 100.0);
        assert!((x1 - 100.0).abs() < 1e-4);
        assert!((y1 - 100.0).abs() < 1e-4);
        assert!((x2 - 100.0).abs() < 1e-4);
        assert!(y2.abs() < 1e-4);
    }

    #[test]
    fn color_interpolation_midpoint() {
        let g = parse_linear_gradient("linear-gradient(90deg, #000000 0%, #ffffff 100%)").unwrap();
        let mid = g.color_at(0.5);
        assert_eq!(mid, Color { r: 128, g: 128, b: 128 });
        // Clamped outside the stop range
        assert_eq!(g.color_at(-1.0), Color::BLACK);
        assert_eq!(g.color_at(2.0), Color::WHITE);
    }

    #[test]
    fn interior_stops_bracket() {
        let g = parse_linear_gradient(
            "linear-gradient(90deg, #000000 0%, #ff0000 50%, #ffffff 100%)",
        )
        .unwrap();
        assert_eq!(g.color_at(0.5), Color { r: 255, g: 0, b: 0 });
        assert_eq!(g.color_at(0.25), Color { r: 128, g: 0, b: 0 });
    }
}
