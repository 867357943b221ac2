//! Unified error type for the crush-dither public API.

use thiserror::Error;

use crate::palette::PaletteError;
use crate::pipeline::QuantizeError;

/// Unified error type for the crush-dither public API.
///
/// # Example
///
/// ```
/// use crush_dither::{parse_hex_list, DitherError, Palette};
///
/// fn load(text: &str) -> Result<Palette, DitherError> {
///     Ok(Palette::new("custom", parse_hex_list(text)?)?)
/// }
///
/// assert!(load("#000000\n#ffffff").is_ok());
/// assert!(load("; nothing here").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DitherError {
    /// Palette construction or import failed
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),

    /// The run could not start or was cancelled
    #[error("quantization error: {0}")]
    Quantize(#[from] QuantizeError),
}

impl DitherError {
    /// Whether the run was stopped by its progress sink.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DitherError::Quantize(QuantizeError::Cancelled))
    }
}
