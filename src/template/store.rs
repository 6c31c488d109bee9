//! # Template Store
//!
//! Loads a fixed list of template records from a directory, caches the
//! result after first load, and serves gallery queries from the cache.
//!
//! The store is an explicit cache object: the composing application
//! constructs one at startup and passes it by reference to consumers.
//! There is no invalidation: a record edited externally is not seen until
//! a new store is constructed.
//!
//! ## Load policy
//!
//! Per-file failures do not discard the batch: the successfully parsed
//! subset is served and each failure is recorded as a [`LoadFailure`].
//! [`TemplateStore::load_all`] errors only when every file in the list
//! fails.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::CardError;

use super::{CategoryFilter, Template, TemplateCategory};

/// The fixed template record list shipped in `templates/`.
pub const TEMPLATE_FILES: [&str; 5] = [
    "birthday-balloons-01.json",
    "holiday-winter-01.json",
    "thank-you-floral-01.json",
    "get-well-sunshine-01.json",
    "blank-canvas-01.json",
];

/// One template record that failed to fetch or parse.
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub file: String,
    pub reason: String,
}

/// Cached load result: the parsed subset plus per-file failures.
struct Loaded {
    templates: Vec<Template>,
    failures: Vec<LoadFailure>,
}

/// Read-through template cache over a directory of JSON records.
pub struct TemplateStore {
    dir: PathBuf,
    files: Vec<String>,
    cache: OnceLock<Loaded>,
}

impl TemplateStore {
    /// Store over the default record list in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_files(dir, TEMPLATE_FILES.iter().copied())
    }

    /// Store over a custom record list in `dir`.
    pub fn with_files(
        dir: impl Into<PathBuf>,
        files: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            dir: dir.into(),
            files: files.into_iter().map(Into::into).collect(),
            cache: OnceLock::new(),
        }
    }

    /// All known category filters, `all` first.
    pub fn categories() -> Vec<String> {
        let mut out = vec!["all".to_string()];
        out.extend(TemplateCategory::ALL.iter().map(|c| c.as_str().to_string()));
        out
    }

    /// Load every record (once), returning the cached template list.
    ///
    /// Errors only when the list is non-empty and every file failed.
    pub fn load_all(&self) -> Result<&[Template], CardError> {
        let loaded = self.loaded();
        if loaded.templates.is_empty() && !loaded.failures.is_empty() {
            let first = &loaded.failures[0];
            return Err(CardError::Load(format!(
                "all {} template records failed to load ({}: {})",
                loaded.failures.len(),
                first.file,
                first.reason
            )));
        }
        Ok(&loaded.templates)
    }

    /// Per-file failures recorded during the initial load.
    pub fn load_failures(&self) -> &[LoadFailure] {
        &self.loaded().failures
    }

    /// Look up a template by id.
    pub fn get_by_id(&self, id: &str) -> Option<&Template> {
        self.loaded().templates.iter().find(|t| t.id == id)
    }

    /// Templates passing the category filter, in load order.
    pub fn by_category(&self, filter: CategoryFilter) -> Vec<&Template> {
        self.loaded()
            .templates
            .iter()
            .filter(|t| filter.matches(t.category))
            .collect()
    }

    /// Case-insensitive substring search over name, description, and tags.
    pub fn search(&self, query: &str) -> Vec<&Template> {
        let needle = query.to_lowercase();
        self.loaded()
            .templates
            .iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&needle)
                    || t.description.to_lowercase().contains(&needle)
                    || t.tags().iter().any(|tag| tag.to_lowercase().contains(&needle))
            })
            .collect()
    }

    fn loaded(&self) -> &Loaded {
        self.cache.get_or_init(|| {
            let mut templates = Vec::new();
            let mut failures = Vec::new();

            for file in &self.files {
                match load_record(&self.dir.join(file)) {
                    Ok(template) => templates.push(template),
                    Err(e) => failures.push(LoadFailure {
                        file: file.clone(),
                        reason: e.to_string(),
                    }),
                }
            }

            Loaded { templates, failures }
        })
    }
}

fn load_record(path: &std::path::Path) -> Result<Template, CardError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CardError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| CardError::Load(format!("{}: {}", path.display(), e)))
}
