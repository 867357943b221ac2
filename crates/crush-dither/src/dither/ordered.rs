//! Ordered dithering threshold sources.
//!
//! An ordered strategy adds a position-dependent offset to the working color
//! before quantization. Offsets lie in `[-32, 32)` for every source.

use super::blue_noise::BlueNoise;

/// Half-width of the offset range produced by every threshold source.
pub const OFFSET_SPAN: f32 = 64.0;

/// A square Bayer index matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BayerMatrix {
    dim: usize,
    cells: &'static [u8],
}

impl BayerMatrix {
    /// Side length of the matrix.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Raw threshold index at `(x, y)`, tiled.
    #[inline]
    pub fn threshold(&self, x: usize, y: usize) -> u8 {
        self.cells[(y % self.dim) * self.dim + (x % self.dim)]
    }

    /// Offset at `(x, y)`: `(threshold / dim^2 - 0.5) * 64`.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> f32 {
        let n = (self.dim * self.dim) as f32;
        (f32::from(self.threshold(x, y)) / n - 0.5) * OFFSET_SPAN
    }
}

/// 2x2 Bayer matrix.
pub const BAYER2: BayerMatrix = BayerMatrix {
    dim: 2,
    cells: &[0, 2, 3, 1],
};

/// 4x4 Bayer matrix.
pub const BAYER4: BayerMatrix = BayerMatrix {
    dim: 4,
    cells: &[
         0,  8,  2, 10,
        12,  4, 14,  6,
         3, 11,  1,  9,
        15,  7, 13,  5,
    ],
};

/// 8x8 Bayer matrix.
pub const BAYER8: BayerMatrix = BayerMatrix {
    dim: 8,
    cells: &[
         0, 32,  8, 40,  2, 34, 10, 42,
        48, 16, 56, 24, 50, 18, 58, 26,
        12, 44,  4, 36, 14, 46,  6, 38,
        60, 28, 52, 20, 62, 30, 54, 22,
         3, 35, 11, 43,  1, 33,  9, 41,
        51, 19, 59, 27, 49, 17, 57, 25,
        15, 47,  7, 39, 13, 45,  5, 37,
        63, 31, 55, 23, 61, 29, 53, 21,
    ],
};

/// Where an ordered strategy reads its thresholds from.
#[derive(Debug, Clone, Copy)]
pub enum ThresholdSource<'a> {
    Bayer(&'static BayerMatrix),
    BlueNoise(&'a BlueNoise),
}

impl ThresholdSource<'_> {
    /// Offset at `(x, y)`, in `[-32, 32)`.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> f32 {
        match self {
            ThresholdSource::Bayer(matrix) => matrix.offset(x, y),
            ThresholdSource::BlueNoise(noise) => noise.offset(x, y),
        }
    }
}
