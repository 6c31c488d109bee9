//! Print geometry for the quarter-fold page.
//!
//! All physical math lives here, independent of any PDF library: pixel to
//! millimeter conversion at the configured DPI, the centered 2×2 panel
//! block, and the fold-guide segments. The arrangement on the page is
//!
//! ```text
//! insideLeft | insideRight
//! front      | back
//! ```
//!
//! with the block centered both ways.

use crate::template::PanelKind;

pub const MM_PER_INCH: f32 = 25.4;

/// Convert print-resolution pixels to millimeters.
#[inline]
pub fn px_to_mm(px: f32, dpi: f32) -> f32 {
    px / dpi * MM_PER_INCH
}

/// Convert millimeters to PDF points.
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / MM_PER_INCH
}

/// Standard print dimensions, in pixels at the configured DPI.
///
/// Defaults describe a 9"×11" sheet at 300 DPI holding four
/// 4.25"×5.5" panels.
#[derive(Debug, Clone, Copy)]
pub struct PrintConfig {
    pub paper_width_px: u32,
    pub paper_height_px: u32,
    pub panel_width_px: u32,
    pub panel_height_px: u32,
    pub dpi: f32,
    /// Extra margin beyond trim size, kept for cut-safety aware templates.
    pub bleed_px: u32,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            paper_width_px: 2700,
            paper_height_px: 3300,
            panel_width_px: 1275,
            panel_height_px: 1650,
            dpi: 300.0,
            bleed_px: 9,
        }
    }
}

/// One dashed fold-guide segment, endpoints in page millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldLine {
    pub from: (f32, f32),
    pub to: (f32, f32),
}

/// Physical page layout derived from a [`PrintConfig`].
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub panel_width_mm: f32,
    pub panel_height_mm: f32,
}

impl PageLayout {
    pub fn from_print_config(config: &PrintConfig) -> Self {
        Self {
            page_width_mm: px_to_mm(config.paper_width_px as f32, config.dpi),
            page_height_mm: px_to_mm(config.paper_height_px as f32, config.dpi),
            panel_width_mm: px_to_mm(config.panel_width_px as f32, config.dpi),
            panel_height_mm: px_to_mm(config.panel_height_px as f32, config.dpi),
        }
    }

    /// Top-left corner of the centered 2×2 block.
    pub fn block_origin(&self) -> (f32, f32) {
        (
            (self.page_width_mm - 2.0 * self.panel_width_mm) / 2.0,
            (self.page_height_mm - 2.0 * self.panel_height_mm) / 2.0,
        )
    }

    /// Top-left corner of one panel's cell, in page millimeters from the
    /// page's top-left.
    pub fn position(&self, kind: PanelKind) -> (f32, f32) {
        let (sx, sy) = self.block_origin();
        let (w, h) = (self.panel_width_mm, self.panel_height_mm);
        match kind {
            PanelKind::InsideLeft => (sx, sy),
            PanelKind::InsideRight => (sx + w, sy),
            PanelKind::Front => (sx, sy + h),
            PanelKind::Back => (sx + w, sy + h),
        }
    }

    /// Vertical fold guide: the block's horizontal midpoint, spanning its
    /// full height.
    pub fn vertical_fold(&self) -> FoldLine {
        let (sx, sy) = self.block_origin();
        let x = sx + self.panel_width_mm;
        FoldLine {
            from: (x, sy),
            to: (x, sy + 2.0 * self.panel_height_mm),
        }
    }

    /// Horizontal fold guide: the block's vertical midpoint, spanning its
    /// full width.
    pub fn horizontal_fold(&self) -> FoldLine {
        let (sx, sy) = self.block_origin();
        let y = sy + self.panel_height_mm;
        FoldLine {
            from: (sx, y),
            to: (sx + 2.0 * self.panel_width_mm, y),
        }
    }
}
