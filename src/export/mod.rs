//! # Page Layout / PDF Assembler
//!
//! Places four independently rendered panel surfaces onto one physical
//! page sized for a quarter-fold card and serializes it as a PDF: a single
//! page, one lossy-compressed raster per panel scaled to its physical
//! footprint, optional dashed fold guides, and descriptive document
//! metadata.
//!
//! The assembler does not validate panel completeness at run time: the
//! [`CardPanels`] input holds all four images, so "every panel is rendered
//! before export" is a type-level precondition. The canonical flow is
//! [`render_card_panels`] followed by one [`export_pdf`] call.

pub mod layout;

pub use layout::{FoldLine, PageLayout, PrintConfig};

use std::fs;
use std::io::{BufWriter, Cursor};
use std::path::Path;

use chrono::Utc;
use image::RgbaImage;
use printpdf::{
    ColorBits, ColorSpace, ImageTransform, ImageXObject, Line, LineDashPattern, Mm, PdfDocument,
    Point, Px, Rgb,
};

use crate::error::CardError;
use crate::render::{self, RasterSurface};
use crate::template::{PanelKind, Template};

/// Descriptive metadata stamped into the exported document's Info
/// dictionary.
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    pub title: String,
    pub subject: String,
    pub author: String,
    pub creator: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: "Greeting Card".into(),
            subject: "Printable Greeting Card".into(),
            author: "Cartolina".into(),
            creator: "Cartolina Card Composer".into(),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub include_fold_lines: bool,
    /// JPEG quality applied to each embedded panel (1–100).
    pub jpeg_quality: u8,
    pub print: PrintConfig,
    pub metadata: DocumentMetadata,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            include_fold_lines: true,
            jpeg_quality: 95,
            print: PrintConfig::default(),
            metadata: DocumentMetadata::default(),
        }
    }
}

/// The four rendered panel images, ready for assembly.
pub struct CardPanels {
    pub front: RgbaImage,
    pub back: RgbaImage,
    pub inside_left: RgbaImage,
    pub inside_right: RgbaImage,
}

impl CardPanels {
    pub fn get(&self, kind: PanelKind) -> &RgbaImage {
        match kind {
            PanelKind::Front => &self.front,
            PanelKind::Back => &self.back,
            PanelKind::InsideLeft => &self.inside_left,
            PanelKind::InsideRight => &self.inside_right,
        }
    }
}

/// Render all four panels of a template at print scale.
pub fn render_card_panels(template: &Template) -> Result<CardPanels, CardError> {
    let render_one = |kind: PanelKind| -> Result<RgbaImage, CardError> {
        let mut surface = RasterSurface::new();
        render::render_panel(template.panel(kind), &mut surface, render::PRINT_SCALE)?;
        Ok(surface.into_image())
    };
    Ok(CardPanels {
        front: render_one(PanelKind::Front)?,
        back: render_one(PanelKind::Back)?,
        inside_left: render_one(PanelKind::InsideLeft)?,
        inside_right: render_one(PanelKind::InsideRight)?,
    })
}

// Fold-guide style: light dashed neutral, thin fixed width.
const FOLD_LINE_GRAY: f32 = 0.8; // #cccccc
const FOLD_LINE_WIDTH_MM: f32 = 0.2;
const FOLD_DASH_MM: f32 = 2.0;

/// Assemble the quarter-fold page and serialize it to PDF bytes.
pub fn export_pdf(panels: &CardPanels, settings: &ExportSettings) -> Result<Vec<u8>, CardError> {
    let page = PageLayout::from_print_config(&settings.print);

    let (doc, page_idx, layer_idx) = PdfDocument::new(
        &settings.metadata.title,
        Mm(page.page_width_mm),
        Mm(page.page_height_mm),
        "Card",
    );
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    for kind in PanelKind::ALL {
        place_panel(&layer, panels.get(kind), kind, &page, settings)?;
    }

    if settings.include_fold_lines {
        draw_fold_guides(&layer, &page);
    }

    let mut raw = Vec::new();
    {
        let cursor = Cursor::new(&mut raw);
        let mut writer = BufWriter::new(cursor);
        doc.save(&mut writer)
            .map_err(|e| CardError::Export(format!("PDF serialization: {e}")))?;
    }

    stamp_metadata(raw, &settings.metadata)
}

/// Serialize the page straight to a file.
pub fn export_pdf_to_file(
    panels: &CardPanels,
    settings: &ExportSettings,
    path: &Path,
) -> Result<(), CardError> {
    let bytes = export_pdf(panels, settings)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Place one panel raster at its cell, scaled to the physical panel size.
fn place_panel(
    layer: &printpdf::PdfLayerReference,
    image: &RgbaImage,
    kind: PanelKind,
    page: &PageLayout,
    settings: &ExportSettings,
) -> Result<(), CardError> {
    let rgb = lossy_rgb(image, settings.jpeg_quality)?;
    let (px_w, px_h) = rgb.dimensions();

    let xobject = ImageXObject {
        width: Px(px_w as usize),
        height: Px(px_h as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    };
    let pdf_image = printpdf::Image::from(xobject);

    let (x_mm, y_top_mm) = page.position(kind);
    // printpdf's origin is the page's bottom-left; ours is top-left.
    let translate_y = page.page_height_mm - y_top_mm - page.panel_height_mm;

    // At `dpi`, the raster's natural size is px/dpi inches; scale it to the
    // fixed physical panel footprint regardless of the rendered resolution.
    let dpi = settings.print.dpi;
    let natural_w_mm = layout::px_to_mm(px_w as f32, dpi);
    let natural_h_mm = layout::px_to_mm(px_h as f32, dpi);

    pdf_image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x_mm)),
            translate_y: Some(Mm(translate_y)),
            scale_x: Some(page.panel_width_mm / natural_w_mm),
            scale_y: Some(page.panel_height_mm / natural_h_mm),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    Ok(())
}

/// Dashed fold guides, drawn after all panel images.
fn draw_fold_guides(layer: &printpdf::PdfLayerReference, page: &PageLayout) {
    layer.set_outline_color(printpdf::Color::Rgb(Rgb::new(
        FOLD_LINE_GRAY,
        FOLD_LINE_GRAY,
        FOLD_LINE_GRAY,
        None,
    )));
    layer.set_outline_thickness(layout::mm_to_pt(FOLD_LINE_WIDTH_MM));
    let dash = layout::mm_to_pt(FOLD_DASH_MM).round() as i64;
    layer.set_line_dash_pattern(LineDashPattern {
        dash_1: Some(dash),
        gap_1: Some(dash),
        ..Default::default()
    });

    for fold in [page.vertical_fold(), page.horizontal_fold()] {
        let points = vec![
            (
                Point::new(Mm(fold.from.0), Mm(page.page_height_mm - fold.from.1)),
                false,
            ),
            (
                Point::new(Mm(fold.to.0), Mm(page.page_height_mm - fold.to.1)),
                false,
            ),
        ];
        layer.add_line(Line {
            points,
            is_closed: false,
        });
    }

    layer.set_line_dash_pattern(LineDashPattern::default());
}

/// JPEG round-trip: flatten over white, compress at the configured
/// quality, decode back to the RGB pixels that get embedded.
fn lossy_rgb(image: &RgbaImage, quality: u8) -> Result<image::RgbImage, CardError> {
    let (w, h) = image.dimensions();
    let mut rgb = image::RgbImage::new(w, h);
    for (x, y, p) in image.enumerate_pixels() {
        let a = p[3] as f32 / 255.0;
        let over = |c: u8| (c as f32 * a + 255.0 * (1.0 - a)).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([over(p[0]), over(p[1]), over(p[2])]));
    }

    let mut jpeg = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100));
    encoder
        .encode_image(&rgb)
        .map_err(|e| CardError::Export(format!("panel JPEG encode: {e}")))?;

    let decoded = image::load_from_memory(&jpeg)
        .map_err(|e| CardError::Export(format!("panel JPEG decode: {e}")))?;
    Ok(decoded.to_rgb8())
}

/// Rewrite the document Info dictionary with the full metadata set.
fn stamp_metadata(bytes: Vec<u8>, metadata: &DocumentMetadata) -> Result<Vec<u8>, CardError> {
    let mut doc = lopdf::Document::load_mem(&bytes)
        .map_err(|e| CardError::Export(format!("PDF metadata pass: {e}")))?;

    let date = Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
    let info_id = doc.add_object(lopdf::dictionary! {
        "Title" => lopdf::Object::string_literal(metadata.title.clone()),
        "Subject" => lopdf::Object::string_literal(metadata.subject.clone()),
        "Author" => lopdf::Object::string_literal(metadata.author.clone()),
        "Creator" => lopdf::Object::string_literal(metadata.creator.clone()),
        "CreationDate" => lopdf::Object::string_literal(date),
    });
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| CardError::Export(format!("PDF metadata save: {e}")))?;
    Ok(out)
}
