//! Riemersma dithering: Hilbert-curve traversal with an error history.
//!
//! Instead of pushing error onto fixed spatial neighbors, the pixel being
//! quantized pulls a decaying weighted sum of the last [`HISTORY_CAPACITY`]
//! errors along the curve. The curve keeps successive pixels spatially close,
//! so the history acts like a local, direction-free diffusion.

use std::collections::VecDeque;

use crate::color::Rgb;

/// Number of past errors remembered along the curve.
pub const HISTORY_CAPACITY: usize = 16;

/// Decay constant: the i-th most recent error has weight `exp(-i / 8)`.
const DECAY: f32 = 8.0;

/// In-bounds points of a Hilbert curve, in curve order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HilbertPath {
    width: u32,
    height: u32,
    points: Vec<(u32, u32)>,
}

impl HilbertPath {
    /// Build the path for a `width x height` image.
    ///
    /// The curve covers a square of side `next_pow2(max(width, height))` and
    /// keeps only the points inside the image, so every pixel appears
    /// exactly once. Sub-squares outside the image are skipped whole, so a
    /// long thin image costs about as much as a square one of equal area.
    pub fn new(width: u32, height: u32) -> Self {
        let side = u64::from(width.max(height).max(1)).next_power_of_two();
        let mut points = Vec::with_capacity(width as usize * height as usize);

        if width > 0 && height > 0 {
            let order = side.trailing_zeros();
            collect_in_bounds(side, 0, order, width, height, &mut points);
        }

        tracing::debug!(width, height, side, "Built Hilbert path");
        Self {
            width,
            height,
            points,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether this path was built for the given dimensions.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }

    pub fn points(&self) -> &[(u32, u32)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Push the in-bounds points of the curve block starting at `start`.
///
/// A block of `4^order` consecutive distances, aligned to its size, fills an
/// aligned square of side `2^order`.
fn collect_in_bounds(
    side: u64,
    start: u64,
    order: u32,
    width: u32,
    height: u32,
    out: &mut Vec<(u32, u32)>,
) {
    let s = 1u64 << order;
    let (x0, y0) = d2xy(side, start);
    let (ox, oy) = (u64::from(x0) & !(s - 1), u64::from(y0) & !(s - 1));
    if ox >= u64::from(width) || oy >= u64::from(height) {
        return;
    }

    if ox + s <= u64::from(width) && oy + s <= u64::from(height) {
        out.extend((start..start + s * s).map(|d| d2xy(side, d)));
        return;
    }

    // Partially covered, so order >= 1
    let quarter = 1u64 << (2 * (order - 1));
    for q in 0..4 {
        collect_in_bounds(side, start + q * quarter, order - 1, width, height, out);
    }
}

/// Map a distance along a Hilbert curve of side `n` to `(x, y)`.
fn d2xy(n: u64, d: u64) -> (u32, u32) {
    let (mut x, mut y) = (0u64, 0u64);
    let mut t = d;
    let mut s = 1u64;
    while s < n {
        let rx = (t / 2) & 1;
        let ry = (t ^ rx) & 1;
        if ry == 0 {
            if rx == 1 {
                x = s - 1 - x;
                y = s - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }
    (x as u32, y as u32)
}

/// Bounded history of past quantization errors along the curve.
///
/// Created fresh for each run. The most recent error sits at the front.
#[derive(Debug, Clone)]
pub struct CurveHistory {
    errors: VecDeque<Rgb>,
    weights: [f32; HISTORY_CAPACITY],
}

impl Default for CurveHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveHistory {
    pub fn new() -> Self {
        let mut weights = [0.0; HISTORY_CAPACITY];
        for (i, w) in weights.iter_mut().enumerate() {
            *w = (-(i as f32) / DECAY).exp();
        }
        Self {
            errors: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
            weights,
        }
    }

    /// Number of errors currently remembered.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Normalized weights of the active window; they sum to 1.
    pub fn active_weights(&self) -> Vec<f32> {
        let active = &self.weights[..self.errors.len()];
        let total: f32 = active.iter().sum();
        active.iter().map(|w| w / total).collect()
    }

    /// Weighted sum of the remembered errors, or `None` when empty.
    pub fn weighted_error(&self) -> Option<Rgb> {
        if self.errors.is_empty() {
            return None;
        }
        let active = &self.weights[..self.errors.len()];
        let total: f32 = active.iter().sum();
        let sum = self
            .errors
            .iter()
            .zip(active)
            .fold(Rgb::ZERO, |acc, (&e, &w)| acc + e * w);
        Some(sum * (1.0 / total))
    }

    /// Record a new error, evicting the oldest beyond capacity.
    pub fn push(&mut self, error: Rgb) {
        self.errors.push_front(error);
        if self.errors.len() > HISTORY_CAPACITY {
            self.errors.pop_back();
        }
    }
}
