//! Error types for quantization runs.

use thiserror::Error;

/// Error type for a quantization run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantizeError {
    /// Pixel data length does not match `width * height * 4`
    #[error("buffer size mismatch: {width}x{height} needs {expected} bytes, got {actual}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// The progress sink asked the run to stop
    #[error("run cancelled")]
    Cancelled,
}
