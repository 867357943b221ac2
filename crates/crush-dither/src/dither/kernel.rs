//! Error diffusion kernel definitions.
//!
//! This module defines the diffusion kernels for the error diffusion
//! strategies. Each kernel specifies how quantization error is distributed
//! to neighboring pixels that have not been visited yet in raster order.

use crate::color::Rgb;
use crate::pipeline::WorkingImage;

/// An error diffusion kernel.
///
/// Each entry specifies an offset (dx, dy) and a weight for that neighbor.
///
/// # Error Propagation
///
/// The total error propagated is `sum(weights) / divisor`. Most kernels
/// propagate 100% of error (sum equals divisor), but Atkinson intentionally
/// propagates only 75%.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// (dx, dy, weight) entries for error diffusion.
    ///
    /// - `dx`: horizontal offset (positive = right)
    /// - `dy`: vertical offset (0 = current row, positive = below)
    /// - `weight`: numerator of the share, divisor is separate
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    ///
    /// Each neighbor receives `error * weight / divisor`.
    pub divisor: u8,
}

impl Kernel {
    /// Fraction of the error this kernel hands on (1.0 for a full kernel).
    pub fn propagation(&self) -> f32 {
        let sum: u32 = self.entries.iter().map(|&(_, _, w)| u32::from(w)).sum();
        sum as f32 / f32::from(self.divisor)
    }

    /// Spread `error * scale` from `(x, y)` onto its neighbors.
    ///
    /// Neighbors outside the image are silently skipped.
    pub fn diffuse(&self, image: &mut WorkingImage, x: usize, y: usize, error: Rgb, scale: f32) {
        let unit = scale / f32::from(self.divisor);
        for &(dx, dy, w) in self.entries {
            image.add_clipped(
                x as i64 + i64::from(dx),
                y as i64 + i64::from(dy),
                error * (f32::from(w) * unit),
            );
        }
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
};

/// "False" Floyd-Steinberg kernel.
///
/// A cheaper three-neighbor approximation with 100% propagation (8/8).
///
/// ```text
///    X   3
///    3   2
/// ```
pub const FALSE_FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 3), (0, 1, 3), (1, 1, 2)],
    divisor: 8,
};

/// Atkinson dithering kernel.
///
/// Distributes error to 6 neighbors with 75% total propagation (6/8).
/// The discarded quarter keeps highlights and shadows from blooming.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),  // right
        (2, 0, 1),  // two right
        (-1, 1, 1), // bottom-left
        (0, 1, 1),  // bottom
        (1, 1, 1),  // bottom-right
        (0, 2, 1),  // two below
    ],
    divisor: 8,
};

/// Jarvis-Judice-Ninke dithering kernel.
///
/// Distributes error to 12 neighbors over 3 rows with 100% propagation (48/48).
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1
/// ```
pub const JARVIS_JUDICE_NINKE: Kernel = Kernel {
    entries: &[
        (1, 0, 7),
        (2, 0, 5),
        (-2, 1, 3),
        (-1, 1, 5),
        (0, 1, 7),
        (1, 1, 5),
        (2, 1, 3),
        (-2, 2, 1),
        (-1, 2, 3),
        (0, 2, 5),
        (1, 2, 3),
        (2, 2, 1),
    ],
    divisor: 48,
};

/// Sierra Lite dithering kernel.
///
/// Distributes error to 3 neighbors with 100% propagation (4/4).
/// This is what the `sierra` strategy id selects.
///
/// ```text
///    X   2
///    1   1
/// ```
pub const SIERRA_LITE: Kernel = Kernel {
    entries: &[(1, 0, 2), (-1, 1, 1), (0, 1, 1)],
    divisor: 4,
};

/// Stucki dithering kernel.
///
/// Distributes error to 12 neighbors over 3 rows with 100% propagation (42/42).
///
/// ```text
///            X   8   4
///    2   4   8   4   2
///    1   2   4   2   1
/// ```
pub const STUCKI: Kernel = Kernel {
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
        (-2, 2, 1),
        (-1, 2, 2),
        (0, 2, 4),
        (1, 2, 2),
        (2, 2, 1),
    ],
    divisor: 42,
};
