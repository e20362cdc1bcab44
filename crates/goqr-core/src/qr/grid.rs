use qrcode::types::QrError as GeneratorError;
use qrcode::{Color, EcLevel, QrCode};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QrError {
    #[error("Data too long to fit in a QR code")]
    DataTooLong,

    #[error("QR encoding failed: {0}")]
    Encode(String),
}

impl From<GeneratorError> for QrError {
    fn from(e: GeneratorError) -> Self {
        match e {
            GeneratorError::DataTooLong => QrError::DataTooLong,
            other => QrError::Encode(other.to_string()),
        }
    }
}

/// Square dark/light module matrix, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    size: usize,
    dark: Vec<bool>,
}

impl ModuleGrid {
    /// Build a `size`×`size` grid from a per-cell predicate taking `(x, y)`
    pub fn from_fn<F>(size: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> bool,
    {
        let mut dark = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                dark.push(f(x, y));
            }
        }
        Self { size, dark }
    }

    /// Parse rows of `#` (dark) and anything else (light). Returns `None`
    /// unless the rows form a square.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.chars().count() != size) {
            return None;
        }
        let dark = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| c == '#'))
            .collect();
        Some(Self { size, dark })
    }

    /// Number of modules per side
    pub fn size(&self) -> usize {
        self.size
    }

    /// Out-of-range coordinates are light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.dark[y * self.size + x]
    }

    pub fn dark_count(&self) -> usize {
        self.dark.iter().filter(|d| **d).count()
    }

    /// Dark cells in row order (`y` outer, `x` inner)
    pub fn dark_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.dark
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(move |(i, _)| (i % self.size, i / self.size))
    }
}

/// Anything that can turn text into a module grid.
pub trait QrEncoder {
    fn encode(&self, data: &str) -> Result<ModuleGrid, QrError>;
}

/// `qrcode`-backed encoder. Version is chosen automatically.
#[derive(Debug, Clone, Copy)]
pub struct QrcodeEncoder {
    level: EcLevel,
}

impl QrcodeEncoder {
    /// High error correction, so the colored glyph never hurts readability
    pub fn new() -> Self {
        Self { level: EcLevel::H }
    }
}

impl Default for QrcodeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QrEncoder for QrcodeEncoder {
    fn encode(&self, data: &str) -> Result<ModuleGrid, QrError> {
        let code = QrCode::with_error_correction_level(data, self.level)?;
        let size = code.width();
        let colors = code.to_colors();
        Ok(ModuleGrid::from_fn(size, |x, y| colors[y * size + x] == Color::Dark))
    }
}

/// Encode `data` at error-correction level H.
pub fn encode(data: &str) -> Result<ModuleGrid, QrError> {
    QrcodeEncoder::new().encode(data)
}
