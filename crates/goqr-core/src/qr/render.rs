//! Two-color masked QR mark.
//!
//! The dark modules are drawn twice from one shared path: once in black with
//! the glyph punched out, once in the accent color visible only inside the
//! glyph. The result reads as a black code with a colored "X" cut into it.

use std::fmt::Write;

use super::canvas::{SvgCanvas, VectorCanvas, ViewBox};
use super::grid::ModuleGrid;

/// "X" crossbar glyph in a 12×12 box
pub const GLYPH_PATH: &str = "M0,0H4L6,3L8,0H12L8,6L12,12H8L6,9L4,12H0L4,6Z";
pub const GLYPH_BOX: f64 = 12.0;

/// Inset of the glyph from each edge of the grid, in modules
pub const GLYPH_MARGIN: usize = 4;

/// White border around the grid, in modules
pub const QUIET_ZONE: i64 = 4;

/// TEDx red
pub const ACCENT_COLOR: &str = "#da291c";
pub const DARK_COLOR: &str = "#000000";
pub const LIGHT_COLOR: &str = "#ffffff";

/// On-screen size of the rendered document, in pixels
pub const PREVIEW_PX: u32 = 200;

pub const CELLS_ID: &str = "qr";
pub const GLYPH_ID: &str = "x";
pub const BLACK_MASK_ID: &str = "black-mask";
pub const ACCENT_MASK_ID: &str = "red-mask";

/// Where the glyph sits inside the grid's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub scale: f64,
    pub offset: f64,
}

impl GlyphPlacement {
    /// Stretch the glyph box over the grid minus the margin on every side.
    pub fn for_grid(size: usize) -> Self {
        let inner = size as f64 - 2.0 * GLYPH_MARGIN as f64;
        Self {
            scale: inner / GLYPH_BOX,
            offset: GLYPH_MARGIN as f64,
        }
    }

    /// Translate after scaling, so the offset stays in grid units.
    pub fn transform(&self) -> String {
        format!("translate({} {}) scale({})", self.offset, self.offset, self.scale)
    }
}

/// A luminance mask: a full-grid rect in `background` with the glyph painted
/// in `glyph_fill` on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskLayer {
    pub id: &'static str,
    pub background: &'static str,
    pub glyph_fill: &'static str,
}

/// One colored copy of the cells path, seen through a mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub fill: String,
    pub mask_id: &'static str,
}

/// Everything needed to draw the mark; rebuilt on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMark {
    pub size: usize,
    pub cells_path: String,
    pub glyph: GlyphPlacement,
    pub masks: [MaskLayer; 2],
    pub overlays: [Overlay; 2],
}

/// Path data for the union of all dark cells: one closed unit square per
/// dark module, in row order.
pub fn cells_path(grid: &ModuleGrid) -> String {
    let mut d = String::with_capacity(grid.dark_count() * 16);
    for (x, y) in grid.dark_cells() {
        // Writing to a String cannot fail
        let _ = write!(d, "M{},{}h1v1h-1v-1", x, y);
    }
    d
}

/// Lay out the mark in the default accent color.
pub fn render(grid: &ModuleGrid) -> RenderedMark {
    render_with_accent(grid, ACCENT_COLOR)
}

pub fn render_with_accent(grid: &ModuleGrid, accent: &str) -> RenderedMark {
    RenderedMark {
        size: grid.size(),
        cells_path: cells_path(grid),
        glyph: GlyphPlacement::for_grid(grid.size()),
        masks: [
            // Reveal everything except the glyph
            MaskLayer {
                id: BLACK_MASK_ID,
                background: LIGHT_COLOR,
                glyph_fill: DARK_COLOR,
            },
            // Reveal only the glyph
            MaskLayer {
                id: ACCENT_MASK_ID,
                background: DARK_COLOR,
                glyph_fill: LIGHT_COLOR,
            },
        ],
        overlays: [
            Overlay {
                fill: DARK_COLOR.to_string(),
                mask_id: BLACK_MASK_ID,
            },
            Overlay {
                fill: accent.to_string(),
                mask_id: ACCENT_MASK_ID,
            },
        ],
    }
}

impl RenderedMark {
    /// The grid plus the quiet zone on all sides.
    pub fn view_box(&self) -> ViewBox {
        let side = self.size as i64 + 2 * QUIET_ZONE;
        ViewBox {
            x: -QUIET_ZONE,
            y: -QUIET_ZONE,
            width: side,
            height: side,
        }
    }

    /// Replay the mark onto any canvas.
    pub fn draw<C: VectorCanvas>(&self, mut canvas: C) -> C::Output {
        canvas.background(self.view_box(), LIGHT_COLOR);
        canvas.define_path(CELLS_ID, &self.cells_path, None);
        canvas.define_path(GLYPH_ID, GLYPH_PATH, Some(&self.glyph.transform()));
        for mask in &self.masks {
            canvas.define_mask(mask.id, self.size, mask.background, GLYPH_ID, mask.glyph_fill);
        }
        for overlay in &self.overlays {
            canvas.overlay(CELLS_ID, &overlay.fill, overlay.mask_id);
        }
        canvas.finish()
    }

    /// Standalone SVG markup at the preview size.
    pub fn to_svg(&self) -> String {
        self.draw(SvgCanvas::new(self.view_box(), PREVIEW_PX, PREVIEW_PX))
            .to_string()
    }
}
