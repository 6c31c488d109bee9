//! # Local Persistence
//!
//! File-backed key-value storage for projects, user preferences, recent
//! templates, and the autosave draft, each under a fixed named slot inside
//! a root directory:
//!
//! ```text
//! <root>/projects/<id>.json
//! <root>/preferences.json
//! <root>/recent-templates.json
//! <root>/draft.json
//! ```
//!
//! Everything is serde JSON; a missing file reads back as the empty/default
//! value, and parse failures surface as storage errors.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CardError;
use crate::project::ProjectData;

const PROJECTS_DIR: &str = "projects";
const PREFERENCES_FILE: &str = "preferences.json";
const RECENT_TEMPLATES_FILE: &str = "recent-templates.json";
const DRAFT_FILE: &str = "draft.json";

/// How many recent template ids are retained.
const RECENT_CAP: usize = 10;

/// User preferences persisted between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub theme: Theme,
    pub default_paper_size: String,
    pub auto_save: bool,
    pub show_tooltips: bool,
    #[serde(default)]
    pub favorite_colors: Vec<String>,
    pub default_font: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::Auto,
            default_paper_size: "11x9".into(),
            auto_save: true,
            show_tooltips: true,
            favorite_colors: Vec::new(),
            default_font: "Arial".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Auto,
}

/// Persistence collaborator over one storage root.
pub struct ProjectStorage {
    root: PathBuf,
}

impl ProjectStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // ── projects ────────────────────────────────────────────────────────

    pub fn save_project(&self, project: &ProjectData) -> Result<(), CardError> {
        let dir = self.root.join(PROJECTS_DIR);
        fs::create_dir_all(&dir)
            .map_err(|e| CardError::Storage(format!("{}: {}", dir.display(), e)))?;
        write_json(&dir.join(format!("{}.json", project.id)), project)
    }

    pub fn load_project(&self, id: &str) -> Result<ProjectData, CardError> {
        read_json(&self.root.join(PROJECTS_DIR).join(format!("{id}.json")))?
            .ok_or_else(|| CardError::Storage(format!("project '{id}' not found")))
    }

    pub fn delete_project(&self, id: &str) -> Result<(), CardError> {
        let path = self.root.join(PROJECTS_DIR).join(format!("{id}.json"));
        fs::remove_file(&path)
            .map_err(|e| CardError::Storage(format!("{}: {}", path.display(), e)))
    }

    /// All stored projects, most recently modified first.
    pub fn list_projects(&self) -> Result<Vec<ProjectData>, CardError> {
        let dir = self.root.join(PROJECTS_DIR);
        let mut projects = Vec::new();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(projects),
            Err(e) => return Err(CardError::Storage(format!("{}: {}", dir.display(), e))),
        };
        for entry in entries {
            let entry = entry.map_err(|e| CardError::Storage(e.to_string()))?;
            if entry.path().extension().is_some_and(|ext| ext == "json") {
                if let Some(project) = read_json::<ProjectData>(&entry.path())? {
                    projects.push(project);
                }
            }
        }
        projects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(projects)
    }

    // ── preferences ─────────────────────────────────────────────────────

    pub fn save_preferences(&self, preferences: &UserPreferences) -> Result<(), CardError> {
        self.ensure_root()?;
        write_json(&self.root.join(PREFERENCES_FILE), preferences)
    }

    /// Stored preferences, or the defaults when none were saved yet.
    pub fn load_preferences(&self) -> Result<UserPreferences, CardError> {
        Ok(read_json(&self.root.join(PREFERENCES_FILE))?.unwrap_or_default())
    }

    // ── recent templates ────────────────────────────────────────────────

    /// Record a template as most recently used, deduplicated, capped.
    pub fn push_recent_template(&self, template_id: &str) -> Result<(), CardError> {
        let mut recent = self.recent_templates()?;
        recent.retain(|id| id != template_id);
        recent.insert(0, template_id.to_string());
        recent.truncate(RECENT_CAP);
        self.ensure_root()?;
        write_json(&self.root.join(RECENT_TEMPLATES_FILE), &recent)
    }

    pub fn recent_templates(&self) -> Result<Vec<String>, CardError> {
        Ok(read_json(&self.root.join(RECENT_TEMPLATES_FILE))?.unwrap_or_default())
    }

    // ── draft ───────────────────────────────────────────────────────────

    pub fn save_draft(&self, project: &ProjectData) -> Result<(), CardError> {
        self.ensure_root()?;
        write_json(&self.root.join(DRAFT_FILE), project)
    }

    pub fn load_draft(&self) -> Result<Option<ProjectData>, CardError> {
        read_json(&self.root.join(DRAFT_FILE))
    }

    pub fn clear_draft(&self) -> Result<(), CardError> {
        let path = self.root.join(DRAFT_FILE);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CardError::Storage(format!("{}: {}", path.display(), e))),
        }
    }

    fn ensure_root(&self) -> Result<(), CardError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| CardError::Storage(format!("{}: {}", self.root.display(), e)))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CardError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CardError::Storage(format!("serialize {}: {}", path.display(), e)))?;
    fs::write(path, json).map_err(|e| CardError::Storage(format!("{}: {}", path.display(), e)))
}

/// `Ok(None)` when the file does not exist.
fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, CardError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CardError::Storage(format!("{}: {}", path.display(), e))),
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| CardError::Storage(format!("parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectData;
    use crate::template::{
        Background, Dimensions, Panel, Panels, Template, TemplateCategory,
    };
    use chrono::{TimeZone, Utc};

    fn template(id: &str) -> Template {
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
            id: id.into(),
            name: id.into(),
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
    fn project_save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ProjectStorage::new(dir.path());

        let mut project = ProjectData::from_template(&template("t1"), "my card");
        project.set_text("greeting", "Hello");
        storage.save_project(&project).unwrap();

        let loaded = storage.load_project(&project.id).unwrap();
        assert_eq!(loaded.name, "my card");
        assert_eq!(loaded.slots.len(), 1);

        storage.delete_project(&project.id).unwrap();
        assert!(storage.load_project(&project.id).is_err());
    }

    #[test]
    fn list_orders_by_last_modified() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ProjectStorage::new(dir.path());

        let mut older = ProjectData::from_template(&template("t1"), "older");
        older.last_modified = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut newer = ProjectData::from_template(&template("t1"), "newer");
        newer.last_modified = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        storage.save_project(&older).unwrap();
        storage.save_project(&newer).unwrap();

        let listed = storage.list_projects().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "newer");
    }

    #[test]
    fn empty_root_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ProjectStorage::new(dir.path().join("never-created"));
        assert!(storage.list_projects().unwrap().is_empty());
        assert!(storage.recent_templates().unwrap().is_empty());
        assert!(storage.load_draft().unwrap().is_none());
    }

    #[test]
    fn preferences_default_then_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ProjectStorage::new(dir.path());

        let prefs = storage.load_preferences().unwrap();
        assert_eq!(prefs.theme, Theme::Auto);

        let mut prefs = prefs;
        prefs.theme = Theme::Dark;
        prefs.favorite_colors.push("#ffd166".into());
        storage.save_preferences(&prefs).unwrap();

        let back = storage.load_preferences().unwrap();
        assert_eq!(back.theme, Theme::Dark);
        assert_eq!(back.favorite_colors, ["#ffd166"]);
    }

    #[test]
    fn recent_templates_dedupe_and_cap() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ProjectStorage::new(dir.path());

        for i in 0..12 {
            storage.push_recent_template(&format!("t{i}")).unwrap();
        }
        storage.push_recent_template("t5").unwrap();

        let recent = storage.recent_templates().unwrap();
        assert_eq!(recent.len(), RECENT_CAP);
        assert_eq!(recent[0], "t5");
        assert_eq!(recent.iter().filter(|id| *id == "t5").count(), 1);
    }

    #[test]
    fn draft_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ProjectStorage::new(dir.path());

        let project = ProjectData::from_template(&template("t1"), "draft");
        storage.save_draft(&project).unwrap();
        assert_eq!(storage.load_draft().unwrap().unwrap().name, "draft");

        storage.clear_draft().unwrap();
        assert!(storage.load_draft().unwrap().is_none());
        // clearing twice is fine
        storage.clear_draft().unwrap();
    }
}
