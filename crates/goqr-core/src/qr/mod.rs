//! QR code generation for go-links.
//!
//! - `grid`: text to `ModuleGrid` through a `QrEncoder` (the `qrcode` crate
//!   at error-correction level H)
//! - `render`: `ModuleGrid` to a two-color masked `RenderedMark`
//! - `canvas`: the `VectorCanvas` drawing seam and its `svg`-crate backend
//! - `export`: redirect URLs and the downloadable file

pub mod canvas;
pub mod export;
pub mod grid;
pub mod render;

pub use canvas::{SvgCanvas, VectorCanvas, ViewBox};
pub use export::{download_file_name, redirect_url, write_svg, DEFAULT_REDIRECT_BASE};
pub use grid::{encode, ModuleGrid, QrEncoder, QrError, QrcodeEncoder};
pub use render::{render, render_with_accent, RenderedMark, ACCENT_COLOR};

/// Encode a URL and lay out the branded mark in one step.
pub fn mark_for_url(url: &str, accent: &str) -> Result<RenderedMark, QrError> {
    let grid = encode(url)?;
    Ok(render_with_accent(&grid, accent))
}
