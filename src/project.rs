//! # Project Data
//!
//! A user's in-progress card: a reference to a template, per-slot filled-in
//! values, and output settings. A project is created when the user starts
//! editing a template, mutated on every slot edit, persisted through the
//! [`storage`](crate::storage) collaborator, and destroyed on explicit
//! delete.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CardError;
use crate::template::{FontTier, Template};

/// A user's in-progress card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub id: String,
    pub name: String,
    pub template_id: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub version: String,
    /// Filled-in values keyed by slot id.
    #[serde(default)]
    pub slots: HashMap<String, SlotValue>,
    pub settings: ProjectSettings,
}

impl ProjectData {
    /// Start a new project from a template.
    pub fn from_template(template: &Template, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            template_id: template.id.clone(),
            created_at: now,
            last_modified: now,
            version: "1.0".into(),
            slots: HashMap::new(),
            settings: ProjectSettings::default(),
        }
    }

    /// Set a text slot's value.
    pub fn set_text(&mut self, slot_id: impl Into<String>, value: impl Into<String>) {
        self.slots.insert(
            slot_id.into(),
            SlotValue::Text {
                value: value.into(),
                font: None,
                color: None,
                size: None,
            },
        );
        self.last_modified = Utc::now();
    }

    /// Set an image slot's value (a data URL or asset reference).
    pub fn set_image(&mut self, slot_id: impl Into<String>, value: impl Into<String>) {
        self.slots.insert(
            slot_id.into(),
            SlotValue::Image {
                value: value.into(),
                original_file_name: None,
            },
        );
        self.last_modified = Utc::now();
    }

    /// Text values by slot id, the shape the renderer overlays onto
    /// placeholders.
    pub fn text_overrides(&self) -> HashMap<String, String> {
        self.slots
            .iter()
            .filter_map(|(id, slot)| match slot {
                SlotValue::Text { value, .. } => Some((id.clone(), value.clone())),
                SlotValue::Image { .. } => None,
            })
            .collect()
    }
}

/// One filled-in slot value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlotValue {
    Text {
        value: String,
        #[serde(default)]
        font: Option<String>,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        size: Option<FontTier>,
    },
    Image {
        /// Image content as a data URL or asset reference.
        value: String,
        #[serde(default)]
        original_file_name: Option<String>,
    },
}

/// Output settings attached to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub paper_size: PaperSize,
    pub fold_type: FoldType,
    /// Print resolution in DPI.
    pub resolution: u32,
    #[serde(default)]
    pub include_guidelines: bool,
    pub margins: Margins,
    pub color_space: ProjectColorSpace,
    /// Bleed in inches.
    #[serde(default)]
    pub bleed_size: f32,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::default(),
            fold_type: FoldType::QuarterFold,
            resolution: 300,
            include_guidelines: true,
            margins: Margins::default(),
            color_space: ProjectColorSpace::Rgb,
            bleed_size: 0.125,
        }
    }
}

/// Physical paper size in inches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperSize {
    pub width: f32,
    pub height: f32,
    pub name: String,
    pub is_landscape: bool,
}

impl Default for PaperSize {
    fn default() -> Self {
        Self {
            width: 11.0,
            height: 9.0,
            name: "11x9".into(),
            is_landscape: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoldType {
    QuarterFold,
    BiFold,
    TriFold,
    SinglePanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectColorSpace {
    #[serde(rename = "RGB")]
    Rgb,
    #[serde(rename = "CMYK")]
    Cmyk,
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 0.25,
            right: 0.25,
            bottom: 0.25,
            left: 0.25,
        }
    }
}

/// Project names: non-empty, at most 100 characters, letters, digits,
/// whitespace, `-`, `_` and `.` only.
pub fn validate_project_name(name: &str) -> Result<(), CardError> {
    if name.trim().is_empty() {
        return Err(CardError::Validation("project name is required".into()));
    }
    if name.len() > 100 {
        return Err(CardError::Validation(
            "project name must be at most 100 characters".into(),
        ));
    }
    let ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '_' | '.'));
    if !ok {
        return Err(CardError::Validation(format!(
            "project name '{name}' contains invalid characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{
        Background, Dimensions, Panel, Panels, TemplateCategory,
    };
    use chrono::TimeZone;

    fn template() -> Template {
        let panel = |name: &str| Panel {
            id: name.into(),
            name: name.into(),
            background: Background::Color {
                value: "#ffffff".into(),
                opacity: 1.0,
            },
            text_slots: vec![],
            image_slots: vec![],
            dimensions: Dimensions { width: 100, height: 100 },
        };
        Template {
            id: "blank-canvas-01".into(),
            name: "Blank Canvas".into(),
            category: TemplateCategory::Blank,
            description: String::new(),
            thumbnail: String::new(),
            author: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            panels: Panels {
                front: panel("front"),
                back: panel("back"),
                inside_left: panel("insideLeft"),
                inside_right: panel("insideRight"),
            },
            metadata: None,
        }
    }

    #[test]
    fn new_project_references_its_template() {
        let project = ProjectData::from_template(&template(), "Mom's birthday");
        assert_eq!(project.template_id, "blank-canvas-01");
        assert!(project.slots.is_empty());
        assert_eq!(project.settings.fold_type, FoldType::QuarterFold);
        assert_eq!(project.settings.resolution, 300);
    }

    #[test]
    fn slot_edits_touch_last_modified() {
        let mut project = ProjectData::from_template(&template(), "p");
        let before = project.last_modified;
        project.set_text("greeting", "Happy Birthday!");
        assert!(project.last_modified >= before);
        assert_eq!(project.slots.len(), 1);
    }

    #[test]
    fn text_overrides_skip_image_slots() {
        let mut project = ProjectData::from_template(&template(), "p");
        project.set_text("greeting", "Hello");
        project.set_image("photo", "data:image/png;base64,AAAA");
        let overrides = project.text_overrides();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides["greeting"], "Hello");
    }

    #[test]
    fn project_roundtrips_through_json() {
        let mut project = ProjectData::from_template(&template(), "roundtrip");
        project.set_text("greeting", "hi");
        let json = serde_json::to_string(&project).unwrap();
        let back: ProjectData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, project.id);
        assert!(matches!(back.slots["greeting"], SlotValue::Text { .. }));
        assert_eq!(back.settings.color_space, ProjectColorSpace::Rgb);
    }

    #[test]
    fn name_validation() {
        assert!(validate_project_name("Mom's card").is_err()); // apostrophe
        assert!(validate_project_name("Moms card_2.draft").is_ok());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name(&"x".repeat(101)).is_err());
    }
}
