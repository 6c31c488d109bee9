//! # Template Data Model
//!
//! A single type hierarchy that is both the Rust API and the JSON record
//! format. Template records are one JSON document per template, camelCase
//! keys, with exactly four named panels:
//!
//! ```json
//! {
//!   "id": "blank-canvas-01",
//!   "name": "Blank Canvas",
//!   "category": "blank",
//!   "createdAt": "2024-03-01T00:00:00Z",
//!   "panels": { "front": {...}, "back": {...}, "insideLeft": {...}, "insideRight": {...} }
//! }
//! ```
//!
//! Background and slot-shape unions are closed tagged variants so render
//! code matches exhaustively instead of comparing strings.

pub mod store;
pub mod validate;

pub use store::{LoadFailure, TemplateStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CATEGORIES
// ============================================================================

/// Fixed template category enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateCategory {
    Birthday,
    Holiday,
    ThankYou,
    GetWell,
    Blank,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 5] = [
        TemplateCategory::Birthday,
        TemplateCategory::Holiday,
        TemplateCategory::ThankYou,
        TemplateCategory::GetWell,
        TemplateCategory::Blank,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateCategory::Birthday => "birthday",
            TemplateCategory::Holiday => "holiday",
            TemplateCategory::ThankYou => "thank-you",
            TemplateCategory::GetWell => "get-well",
            TemplateCategory::Blank => "blank",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Category filter for gallery queries. `All` is the identity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(TemplateCategory),
}

impl CategoryFilter {
    /// Whether a template of the given category passes this filter.
    pub fn matches(self, category: TemplateCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => c == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => f.write_str(c.as_str()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

// ============================================================================
// TEMPLATE
// ============================================================================

/// One card template: identity, gallery metadata, and the four panels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub category: TemplateCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub panels: Panels,
    #[serde(default)]
    pub metadata: Option<TemplateMetadata>,
}

impl Template {
    pub fn panel(&self, kind: PanelKind) -> &Panel {
        self.panels.get(kind)
    }

    /// Metadata tags, or empty when the template carries no metadata.
    pub fn tags(&self) -> &[String] {
        self.metadata.as_ref().map(|m| m.tags.as_slice()).unwrap_or(&[])
    }
}

/// Optional gallery metadata attached to a template record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub version: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Minutes to complete.
    #[serde(default)]
    pub estimated_time: Option<u32>,
    #[serde(default)]
    pub color_scheme: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

// ============================================================================
// PANELS
// ============================================================================

/// The four printable faces of a quarter-fold card. All four are required;
/// a record missing one fails to deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panels {
    pub front: Panel,
    pub back: Panel,
    pub inside_left: Panel,
    pub inside_right: Panel,
}

impl Panels {
    pub fn get(&self, kind: PanelKind) -> &Panel {
        match kind {
            PanelKind::Front => &self.front,
            PanelKind::Back => &self.back,
            PanelKind::InsideLeft => &self.inside_left,
            PanelKind::InsideRight => &self.inside_right,
        }
    }

    /// Panels in canonical order (front, back, insideLeft, insideRight).
    pub fn iter(&self) -> impl Iterator<Item = (PanelKind, &Panel)> {
        PanelKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

/// Identifies one of the four card faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelKind {
    Front,
    Back,
    InsideLeft,
    InsideRight,
}

impl PanelKind {
    pub const ALL: [PanelKind; 4] = [
        PanelKind::Front,
        PanelKind::Back,
        PanelKind::InsideLeft,
        PanelKind::InsideRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PanelKind::Front => "front",
            PanelKind::Back => "back",
            PanelKind::InsideLeft => "insideLeft",
            PanelKind::InsideRight => "insideRight",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(PanelKind::Front),
            "back" => Ok(PanelKind::Back),
            "insideLeft" | "inside-left" => Ok(PanelKind::InsideLeft),
            "insideRight" | "inside-right" => Ok(PanelKind::InsideRight),
            other => Err(format!("unknown panel '{}'", other)),
        }
    }
}

/// One card face: a background plus ordered slot lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: String,
    pub name: String,
    pub background: Background,
    #[serde(default)]
    pub text_slots: Vec<TextSlot>,
    #[serde(default)]
    pub image_slots: Vec<ImageSlot>,
    pub dimensions: Dimensions,
}

/// Panel pixel dimensions. Must be positive (checked by the validator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// BACKGROUND
// ============================================================================

fn default_opacity() -> f32 {
    1.0
}

/// Panel background: a closed tagged variant. Only `Color` and `Gradient`
/// render fully; `Image` and `Pattern` fall back to solid white (explicit
/// placeholder policy until the asset pipeline exists).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    Color {
        /// Hex color, e.g. `#ffd166`.
        value: String,
        #[serde(default = "default_opacity")]
        opacity: f32,
    },
    Gradient {
        /// CSS-style `linear-gradient(...)` description.
        value: String,
        #[serde(default = "default_opacity")]
        opacity: f32,
    },
    Image {
        /// URL, unresolved for now.
        value: String,
        #[serde(default = "default_opacity")]
        opacity: f32,
    },
    Pattern {
        value: String,
        #[serde(default = "default_opacity")]
        opacity: f32,
    },
}

impl Background {
    pub fn opacity(&self) -> f32 {
        match self {
            Background::Color { opacity, .. }
            | Background::Gradient { opacity, .. }
            | Background::Image { opacity, .. }
            | Background::Pattern { opacity, .. } => *opacity,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Background::Color { value, .. }
            | Background::Gradient { value, .. }
            | Background::Image { value, .. }
            | Background::Pattern { value, .. } => value,
        }
    }
}

// ============================================================================
// SLOTS
// ============================================================================

/// Position in panel-space units, relative to the panel's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Size in panel-space units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Font size tier. Maps to point sizes in panel-space units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontTier {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
}

impl FontTier {
    /// Fixed size-tier table: small=14, medium=18, large=24, extra-large=32.
    pub fn px(self) -> f32 {
        match self {
            FontTier::Small => 14.0,
            FontTier::Medium => 18.0,
            FontTier::Large => 24.0,
            FontTier::ExtraLarge => 32.0,
        }
    }
}

/// Horizontal text alignment within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A placeholder region awaiting user-supplied text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSlot {
    pub id: String,
    pub placeholder: String,
    pub position: Position,
    pub size: Size,
    pub max_length: usize,
    #[serde(default = "default_font_family")]
    pub default_font: String,
    #[serde(default)]
    pub default_size: FontTier,
    #[serde(default)]
    pub default_color: Option<String>,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Line-height multiplier. `None` means the 1.4 default.
    #[serde(default)]
    pub line_height: Option<f32>,
}

fn default_font_family() -> String {
    "Arial".to_string()
}

impl TextSlot {
    pub fn line_height_multiplier(&self) -> f32 {
        self.line_height.unwrap_or(1.4)
    }

    pub fn color(&self) -> &str {
        self.default_color.as_deref().unwrap_or("#000000")
    }
}

/// A placeholder region awaiting a user-supplied image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSlot {
    pub id: String,
    pub position: Position,
    pub size: Size,
    pub shape: ShapeKind,
    /// Corner radius for rounded rectangles. `None` means the 10 default.
    #[serde(default)]
    pub border_radius: Option<f32>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatio>,
}

impl ImageSlot {
    /// Resolve the declared shape to a render-ready variant.
    pub fn shape(&self) -> SlotShape {
        match self.shape {
            ShapeKind::Rectangle => SlotShape::Rectangle,
            ShapeKind::Circle => SlotShape::Circle,
            ShapeKind::RoundedRectangle => SlotShape::RoundedRectangle {
                radius: self.border_radius.unwrap_or(10.0),
            },
        }
    }

    pub fn label(&self) -> &str {
        self.placeholder.as_deref().unwrap_or("Image")
    }
}

/// Declared slot shape, as it appears in template JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    RoundedRectangle,
}

/// Resolved slot shape with the corner radius applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotShape {
    Rectangle,
    Circle,
    RoundedRectangle { radius: f32 },
}

/// Aspect-ratio constraint for image slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "square")]
    Square,
    #[serde(rename = "4:3")]
    FourThree,
    #[serde(rename = "16:9")]
    SixteenNine,
    #[serde(rename = "3:2")]
    ThreeTwo,
}

impl AspectRatio {
    /// Width/height ratio, or `None` for unconstrained.
    pub fn ratio(self) -> Option<f32> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::Square => Some(1.0),
            AspectRatio::FourThree => Some(4.0 / 3.0),
            AspectRatio::SixteenNine => Some(16.0 / 9.0),
            AspectRatio::ThreeTwo => Some(3.0 / 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_template_json() -> &'static str {
        r##"{
            "id": "blank-canvas-01",
            "name": "Blank Canvas",
            "category": "blank",
            "description": "Start from scratch",
            "thumbnail": "/thumbs/blank.png",
            "author": "Cartolina",
            "createdAt": "2024-03-01T00:00:00Z",
            "panels": {
                "front": {
                    "id": "front", "name": "Front",
                    "background": {"type": "color", "value": "#ffffff"},
                    "textSlots": [], "imageSlots": [],
                    "dimensions": {"width": 1275, "height": 1650}
                },
                "back": {
                    "id": "back", "name": "Back",
                    "background": {"type": "color", "value": "#ffffff", "opacity": 0.5},
                    "dimensions": {"width": 1275, "height": 1650}
                },
                "insideLeft": {
                    "id": "inside-left", "name": "Inside Left",
                    "background": {"type": "gradient", "value": "linear-gradient(45deg, #fff 0%, #000 100%)"},
                    "dimensions": {"width": 1275, "height": 1650}
                },
                "insideRight": {
                    "id": "inside-right", "name": "Inside Right",
                    "background": {"type": "pattern", "value": "dots"},
                    "dimensions": {"width": 1275, "height": 1650}
                }
            },
            "metadata": {"version": "1.0", "tags": ["minimal", "blank"]}
        }"##
    }

    #[test]
    fn template_roundtrip() {
        let template: Template = serde_json::from_str(minimal_template_json()).unwrap();
        assert_eq!(template.category, TemplateCategory::Blank);
        assert_eq!(template.panels.front.dimensions.width, 1275);
        assert_eq!(template.tags(), ["minimal", "blank"]);
        // Missing opacity defaults to 1.0, explicit opacity survives
        assert_eq!(template.panels.front.background.opacity(), 1.0);
        assert_eq!(template.panels.back.background.opacity(), 0.5);
    }

    #[test]
    fn missing_panel_is_an_error() {
        let json = r##"{
            "id": "x", "name": "X", "category": "blank",
            "createdAt": "2024-03-01T00:00:00Z",
            "panels": {
                "front": {
                    "id": "front", "name": "Front",
                    "background": {"type": "color", "value": "#fff"},
                    "dimensions": {"width": 10, "height": 10}
                }
            }
        }"##;
        assert!(serde_json::from_str::<Template>(json).is_err());
    }

    #[test]
    fn background_variants_deserialize_tagged() {
        let bg: Background =
            serde_json::from_str(r#"{"type": "gradient", "value": "linear-gradient(90deg, #fff 0%, #000 100%)"}"#)
                .unwrap();
        assert!(matches!(bg, Background::Gradient { .. }));
    }

    #[test]
    fn font_tier_table() {
        assert_eq!(FontTier::Small.px(), 14.0);
        assert_eq!(FontTier::Medium.px(), 18.0);
        assert_eq!(FontTier::Large.px(), 24.0);
        assert_eq!(FontTier::ExtraLarge.px(), 32.0);
        // Absent tier falls back to medium (18)
        assert_eq!(FontTier::default().px(), 18.0);
    }

    #[test]
    fn tier_and_align_spellings() {
        let tier: FontTier = serde_json::from_str(r#""extra-large""#).unwrap();
        assert_eq!(tier, FontTier::ExtraLarge);
        let align: TextAlign = serde_json::from_str(r#""center""#).unwrap();
        assert_eq!(align, TextAlign::Center);
    }

    #[test]
    fn rounded_rectangle_radius_defaults() {
        let slot: ImageSlot = serde_json::from_str(
            r#"{
                "id": "photo", "position": {"x": 0, "y": 0},
                "size": {"width": 100, "height": 80},
                "shape": "rounded-rectangle"
            }"#,
        )
        .unwrap();
        assert_eq!(slot.shape(), SlotShape::RoundedRectangle { radius: 10.0 });
        assert_eq!(slot.label(), "Image");
    }

    #[test]
    fn category_filter_parsing() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "thank-you".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(TemplateCategory::ThankYou)
        );
        assert!("nonsense".parse::<CategoryFilter>().is_err());
        assert!(CategoryFilter::All.matches(TemplateCategory::GetWell));
        assert!(!CategoryFilter::Only(TemplateCategory::Blank).matches(TemplateCategory::Holiday));
    }

    #[test]
    fn panel_kind_parses_both_spellings() {
        assert_eq!("insideLeft".parse::<PanelKind>().unwrap(), PanelKind::InsideLeft);
        assert_eq!("inside-left".parse::<PanelKind>().unwrap(), PanelKind::InsideLeft);
    }
}
