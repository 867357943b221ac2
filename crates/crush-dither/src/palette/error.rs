//! Error types for palette construction and import.

use thiserror::Error;

/// Error type for palette construction and import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// No colors provided in palette
    #[error("palette cannot be empty")]
    EmptyPalette,

    /// A hex list contained no line matching the color grammar
    #[error("no valid hex colors found")]
    NoValidColors,

    /// An image sample contained no pixel with alpha of at least 128
    #[error("no opaque colors found in image")]
    NoOpaqueColors,

    /// Raster data does not match the declared dimensions
    #[error("raster size mismatch: {width}x{height} needs {expected} bytes, got {actual}")]
    RasterSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
