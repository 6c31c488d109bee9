//! # Cartolina - Quarter-Fold Greeting Card Composer
//!
//! Cartolina composes printable greeting cards from JSON templates: a
//! template gallery, a raster panel renderer, and a print-ready PDF export
//! path. It provides:
//!
//! - **Template store**: loads a fixed set of template records, caches
//!   them, and serves id/category/search queries
//! - **Panel renderer**: deterministically paints one card face
//!   (background, text-slot and image-slot placeholders) onto a raster
//!   surface at preview or print scale
//! - **Page assembler**: places the four rendered faces on a quarter-fold
//!   page with optional fold guides and serializes a PDF
//!
//! ## Quick Start
//!
//! ```no_run
//! use cartolina::{
//!     export::{export_pdf, render_card_panels, ExportSettings},
//!     template::TemplateStore,
//! };
//!
//! let store = TemplateStore::new("templates");
//! store.load_all()?;
//! let template = store
//!     .get_by_id("birthday-balloons-01")
//!     .expect("template missing");
//!
//! // Render all four panels, then export the quarter-fold page once.
//! let panels = render_card_panels(template)?;
//! let pdf = export_pdf(&panels, &ExportSettings::default())?;
//! std::fs::write("card.pdf", pdf)?;
//!
//! # Ok::<(), cartolina::CardError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Template model, store, and validation |
//! | [`render`] | Panel rendering onto raster surfaces |
//! | [`export`] | Quarter-fold page layout and PDF assembly |
//! | [`project`] | In-progress card data |
//! | [`storage`] | Local JSON persistence |
//! | [`error`] | Error types |

pub mod error;
pub mod export;
pub mod project;
pub mod render;
pub mod storage;
pub mod template;

// Re-exports for convenience
pub use error::CardError;
pub use render::RasterSurface;
pub use template::TemplateStore;
