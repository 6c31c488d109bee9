//! # Card Pipeline Tests
//!
//! End-to-end coverage over the shipped template records: load → validate →
//! render panels → assemble the quarter-fold PDF, plus the renderer
//! properties that span modules.

use std::collections::HashMap;

use cartolina::export::{self, ExportSettings, PrintConfig};
use cartolina::render::surface::FontSpec;
use cartolina::render::{self, DrawSurface, RasterSurface};
use cartolina::template::{validate::validate_template, CategoryFilter, PanelKind, TemplateCategory, TemplateStore};

/// Directory with the shipped template records.
const TEMPLATES_DIR: &str = "templates";

fn store() -> TemplateStore {
    TemplateStore::new(TEMPLATES_DIR)
}

// ============================================================================
// TEMPLATE RECORDS
// ============================================================================

#[test]
fn shipped_templates_all_load() {
    let store = store();
    let templates = store.load_all().expect("shipped templates must load");
    assert_eq!(templates.len(), 5);
    assert!(store.load_failures().is_empty(), "{:?}", store.load_failures());
}

#[test]
fn shipped_templates_pass_validation() {
    let store = store();
    for template in store.load_all().unwrap() {
        let report = validate_template(template);
        assert!(
            report.is_valid(),
            "template '{}' is invalid: {:?}",
            template.id,
            report.errors
        );
    }
}

#[test]
fn every_category_is_represented_once() {
    let store = store();
    store.load_all().unwrap();
    for category in TemplateCategory::ALL {
        let matches = store.by_category(CategoryFilter::Only(category));
        assert_eq!(matches.len(), 1, "category {category} should have one template");
    }
    assert_eq!(store.by_category(CategoryFilter::All).len(), 5);
}

#[test]
fn search_hits_tags_and_descriptions() {
    let store = store();
    store.load_all().unwrap();

    let sunshine = store.search("sunshine");
    assert_eq!(sunshine.len(), 1);
    assert_eq!(sunshine[0].id, "get-well-sunshine-01");

    // description word, different case
    assert!(!store.search("GRADIENT").is_empty());
    assert!(store.search("no such thing").is_empty());
}

// ============================================================================
// RENDERING
// ============================================================================

#[test]
fn every_shipped_panel_renders_non_blank_at_preview_scale() {
    let store = store();
    for template in store.load_all().unwrap() {
        for kind in PanelKind::ALL {
            let mut surface = RasterSurface::new();
            render::render_panel(template.panel(kind), &mut surface, render::PREVIEW_SCALE)
                .unwrap_or_else(|e| panic!("{}/{kind}: {e}", template.id));
            assert!(
                surface.has_content(),
                "{}/{kind} rendered blank",
                template.id
            );
        }
    }
}

#[test]
fn gradient_fronts_do_not_fall_back_to_white() {
    let store = store();
    store.load_all().unwrap();
    let template = store.get_by_id("get-well-sunshine-01").unwrap();

    let mut surface = RasterSurface::new();
    render::render_panel(template.panel(PanelKind::Front), &mut surface, 0.1).unwrap();

    // Sample away from slots: the 45° sunshine gradient is never pure white.
    let p = surface.pixel(2, surface.height() - 3);
    assert_ne!((p[0], p[1], p[2]), (255, 255, 255));
}

#[test]
fn word_wrap_respects_slot_widths_across_all_templates() {
    let store = store();
    let surface = RasterSurface::new();

    for template in store.load_all().unwrap() {
        for (_, panel) in template.panels.iter() {
            for slot in &panel.text_slots {
                let font = FontSpec::new(slot.default_font.clone(), slot.default_size.px());
                let lines = render::wrap_text(&slot.placeholder, slot.size.width, |s| {
                    surface.measure_text(s, &font)
                });
                for line in &lines {
                    if line.contains(' ') {
                        let measured = surface.measure_text(line, &font);
                        assert!(
                            measured < slot.size.width,
                            "{}: line '{line}' measures {measured} against width {}",
                            slot.id,
                            slot.size.width
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn render_is_deterministic_across_calls() {
    let store = store();
    store.load_all().unwrap();
    let template = store.get_by_id("birthday-balloons-01").unwrap();

    let mut first = RasterSurface::new();
    render::render_panel(template.panel(PanelKind::Front), &mut first, 0.2).unwrap();
    let mut second = RasterSurface::new();
    render::render_panel(template.panel(PanelKind::Front), &mut second, 0.2).unwrap();

    assert_eq!(first.image().as_raw(), second.image().as_raw());
}

#[test]
fn filled_values_render_differently_from_placeholders() {
    let store = store();
    store.load_all().unwrap();
    let template = store.get_by_id("blank-canvas-01").unwrap();
    let panel = template.panel(PanelKind::Front);

    let mut placeholder = RasterSurface::new();
    render::render_panel(panel, &mut placeholder, 0.3).unwrap();

    let mut values = HashMap::new();
    values.insert("front-title".to_string(), "Congrats!".to_string());
    let mut filled = RasterSurface::new();
    render::render_panel_with_text(panel, &mut filled, 0.3, &values).unwrap();

    assert_ne!(placeholder.image().as_raw(), filled.image().as_raw());
}

// ============================================================================
// PDF EXPORT
// ============================================================================

/// Shrunken print geometry so export tests stay fast.
fn small_print_config() -> PrintConfig {
    PrintConfig {
        paper_width_px: 540,
        paper_height_px: 660,
        panel_width_px: 255,
        panel_height_px: 330,
        dpi: 300.0,
        bleed_px: 0,
    }
}

fn render_small_panels(template_id: &str) -> export::CardPanels {
    let store = store();
    store.load_all().unwrap();
    let template = store.get_by_id(template_id).unwrap();

    let mut images = Vec::new();
    for kind in PanelKind::ALL {
        let mut surface = RasterSurface::new();
        render::render_panel(template.panel(kind), &mut surface, 0.2).unwrap();
        images.push(surface.into_image());
    }
    let mut it = images.into_iter();
    export::CardPanels {
        front: it.next().unwrap(),
        back: it.next().unwrap(),
        inside_left: it.next().unwrap(),
        inside_right: it.next().unwrap(),
    }
}

#[test]
fn scenario_four_panels_export_one_page_with_four_images() {
    let panels = render_small_panels("blank-canvas-01");
    let settings = ExportSettings {
        include_fold_lines: true,
        print: small_print_config(),
        ..Default::default()
    };

    let bytes = export::export_pdf(&panels, &settings).unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();

    assert_eq!(doc.get_pages().len(), 1, "quarter-fold export is single-page");

    let image_streams = doc
        .objects
        .values()
        .filter(|obj| match obj {
            lopdf::Object::Stream(s) => matches!(
                s.dict.get(b"Subtype"),
                Ok(lopdf::Object::Name(n)) if n.as_slice() == b"Image"
            ),
            _ => false,
        })
        .count();
    assert_eq!(image_streams, 4, "one embedded raster per panel");
}

#[test]
fn export_writes_a_readable_file() {
    let panels = render_small_panels("holiday-winter-01");
    let settings = ExportSettings {
        print: small_print_config(),
        ..Default::default()
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("card.pdf");
    export::export_pdf_to_file(&panels, &settings, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..5], b"%PDF-");
    lopdf::Document::load_mem(&bytes).unwrap();
}

#[test]
fn export_metadata_defaults_are_descriptive() {
    let panels = render_small_panels("blank-canvas-01");
    let settings = ExportSettings {
        print: small_print_config(),
        ..Default::default()
    };
    let bytes = export::export_pdf(&panels, &settings).unwrap();

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_object(info_id).unwrap().as_dict().unwrap();
    for key in [b"Title".as_slice(), b"Subject", b"Author", b"Creator", b"CreationDate"] {
        assert!(info.has(key), "missing Info key {}", String::from_utf8_lossy(key));
    }
}
