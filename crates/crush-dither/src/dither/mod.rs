//! Dithering strategies.
//!
//! Three families of strategies are available, plus `none`:
//!
//! - **Error diffusion** (`floyd`, `falsefloyd`, `atkinson`, `jjn`, `sierra`,
//!   `stucki`): quantization error is pushed onto unvisited neighbors
//!   through a [`Kernel`].
//! - **Ordered** (`bayer2`, `bayer4`, `bayer8`, `bluenoise`): a
//!   position-dependent threshold offset is added before quantization.
//! - **Curve** (`riemersma`): pixels are visited along a Hilbert curve and
//!   each one pulls a decaying weighted sum of the last 16 errors.
//!
//! # Architecture
//!
//! Configuration names a strategy with a [`DitherKind`]. At run start each
//! kind becomes a [`Strategy`], which exposes `sample_offset` (before
//! quantization) and `diffuse` (after quantization). The pipeline combines
//! two strategy slots through those two operations without caring which
//! family either slot belongs to.

mod blue_noise;
mod curve;
mod kernel;
mod ordered;
mod strategy;

pub use blue_noise::{BlueNoise, BLUE_NOISE_SIZE, DEFAULT_BLUE_NOISE_SEED};
pub use curve::{CurveHistory, HilbertPath, HISTORY_CAPACITY};
pub use kernel::*;
pub use ordered::{BayerMatrix, ThresholdSource, BAYER2, BAYER4, BAYER8, OFFSET_SPAN};
pub use strategy::Strategy;

use serde::{Deserialize, Serialize};

/// Dither strategy selection.
///
/// Parsed from the string ids used in configuration. Unknown ids become
/// [`DitherKind::None`] rather than an error.
///
/// # Example
///
/// ```
/// use crush_dither::DitherKind;
///
/// assert_eq!(DitherKind::from_id("jjn"), DitherKind::Jjn);
/// assert_eq!(DitherKind::from_id("blue_noise"), DitherKind::BlueNoise);
/// assert_eq!(DitherKind::from_id("sparkle"), DitherKind::None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DitherKind {
    /// No dithering.
    #[default]
    None,

    /// Floyd-Steinberg error diffusion (100% propagation).
    Floyd,

    /// Three-neighbor Floyd-Steinberg approximation.
    FalseFloyd,

    /// Atkinson error diffusion (75% propagation).
    Atkinson,

    /// Jarvis-Judice-Ninke error diffusion (12 neighbors).
    Jjn,

    /// Sierra Lite error diffusion (3 neighbors).
    Sierra,

    /// Stucki error diffusion (12 neighbors, sharper center).
    Stucki,

    /// 2x2 Bayer ordered dithering.
    Bayer2,

    /// 4x4 Bayer ordered dithering.
    Bayer4,

    /// 8x8 Bayer ordered dithering.
    Bayer8,

    /// Ordered dithering with the synthesized blue-noise texture.
    BlueNoise,

    /// Riemersma dithering along a Hilbert curve.
    Riemersma,
}

impl DitherKind {
    pub const ALL: [DitherKind; 12] = [
        DitherKind::None,
        DitherKind::Floyd,
        DitherKind::FalseFloyd,
        DitherKind::Atkinson,
        DitherKind::Jjn,
        DitherKind::Sierra,
        DitherKind::Stucki,
        DitherKind::Bayer2,
        DitherKind::Bayer4,
        DitherKind::Bayer8,
        DitherKind::BlueNoise,
        DitherKind::Riemersma,
    ];

    /// Parse a strategy id. Unknown ids map to [`DitherKind::None`].
    pub fn from_id(id: &str) -> Self {
        match id {
            "floyd" => DitherKind::Floyd,
            "falsefloyd" => DitherKind::FalseFloyd,
            "atkinson" => DitherKind::Atkinson,
            "jjn" => DitherKind::Jjn,
            "sierra" => DitherKind::Sierra,
            "stucki" => DitherKind::Stucki,
            "bayer2" => DitherKind::Bayer2,
            "bayer4" => DitherKind::Bayer4,
            "bayer8" => DitherKind::Bayer8,
            "bluenoise" | "blue_noise" => DitherKind::BlueNoise,
            "riemersma" => DitherKind::Riemersma,
            _ => DitherKind::None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            DitherKind::None => "none",
            DitherKind::Floyd => "floyd",
            DitherKind::FalseFloyd => "falsefloyd",
            DitherKind::Atkinson => "atkinson",
            DitherKind::Jjn => "jjn",
            DitherKind::Sierra => "sierra",
            DitherKind::Stucki => "stucki",
            DitherKind::Bayer2 => "bayer2",
            DitherKind::Bayer4 => "bayer4",
            DitherKind::Bayer8 => "bayer8",
            DitherKind::BlueNoise => "bluenoise",
            DitherKind::Riemersma => "riemersma",
        }
    }

    /// Human-readable family name.
    pub fn family(self) -> &'static str {
        match self {
            DitherKind::None => "none",
            DitherKind::Floyd
            | DitherKind::FalseFloyd
            | DitherKind::Atkinson
            | DitherKind::Jjn
            | DitherKind::Sierra
            | DitherKind::Stucki => "error_diffusion",
            DitherKind::Bayer2 | DitherKind::Bayer4 | DitherKind::Bayer8 | DitherKind::BlueNoise => {
                "ordered"
            }
            DitherKind::Riemersma => "curve",
        }
    }
}

impl From<String> for DitherKind {
    fn from(id: String) -> Self {
        DitherKind::from_id(&id)
    }
}

impl From<DitherKind> for String {
    fn from(kind: DitherKind) -> Self {
        kind.id().to_string()
    }
}

impl std::fmt::Display for DitherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
