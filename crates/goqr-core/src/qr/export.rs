use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::utils::sanitize_file_component;

/// Public short-link domain
pub const DEFAULT_REDIRECT_BASE: &str = "https://go.tedxw.co/";

const FILE_PREFIX: &str = "tedxwarwick-qrcode-";

/// Short link for a slug. The slug is used verbatim.
pub fn redirect_url(base: &str, slug: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, slug)
    } else {
        format!("{}/{}", base, slug)
    }
}

/// `tedxwarwick-qrcode-{slug}.svg`, with the slug made filesystem-safe
pub fn download_file_name(slug: &str) -> String {
    format!("{}{}.svg", FILE_PREFIX, sanitize_file_component(slug))
}

/// Write rendered markup into `dir`, returning the file's path.
pub fn write_svg(dir: &Path, slug: &str, svg: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(download_file_name(slug));
    std::fs::write(&path, svg)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = svg.len(), "Wrote QR code");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_redirect_url() {
        assert_eq!(redirect_url(DEFAULT_REDIRECT_BASE, "tickets"), "https://go.tedxw.co/tickets");
        assert_eq!(redirect_url("https://go.example.org", "x"), "https://go.example.org/x");
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name("tickets"), "tedxwarwick-qrcode-tickets.svg");
        assert_eq!(download_file_name("a/b"), "tedxwarwick-qrcode-a_b.svg");
    }

    #[test]
    fn test_write_svg() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let path = write_svg(&out, "tickets", "<svg/>").unwrap();
        assert_eq!(path, out.join("tedxwarwick-qrcode-tickets.svg"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<svg/>");
    }
}
