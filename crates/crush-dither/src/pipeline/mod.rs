//! The quantization pipeline.
//!
//! A run goes through these stages:
//!
//! 1. **Tone pass**: contrast, brightness and saturation over the whole image
//! 2. **Traversal**: raster order, or the Hilbert path when an active slot
//!    uses the curve strategy
//! 3. **Per pixel**: add the blended pre-quantization offset, reduce the
//!    color, write it, and hand the error to the post-quantization slots
//! 4. **Progress**: reported every 5% of the traversal and once at the end
//!
//! # Strategy slots
//!
//! A run has a primary and a secondary strategy with weights `1 - mix` and
//! `mix`. A slot is active when its strategy is not `none` and its weight is
//! above zero; inactive slots do not contribute and do not affect traversal.
//! Active slots combine as:
//!
//! - offset: `sum(weight * sample_offset)`, then scaled by the dither amount
//! - error: each slot receives the raw error with scale `amount * weight`
//!
//! The run is strictly sequential: both error diffusion and the curve
//! history depend on pixels processed earlier.

mod buffer;
mod error;
mod quantizer;
mod tone;

pub use buffer::{RasterBuffer, WorkingImage};
pub use error::QuantizeError;
pub use quantizer::Quantizer;
pub use tone::ToneAdjust;

use std::ops::ControlFlow;
use std::sync::Arc;

use crate::color::Rgb;
use crate::dither::{HilbertPath, Strategy};

/// Number of progress reports per run, excluding the final one.
const PROGRESS_STEPS: usize = 20;

/// A strategy paired with its blend weight.
#[derive(Debug)]
struct Slot<'a> {
    strategy: Strategy<'a>,
    weight: f32,
}

impl Slot<'_> {
    #[inline]
    fn is_active(&self) -> bool {
        !self.strategy.is_none() && self.weight > 0.0
    }
}

enum Traversal {
    Raster { width: usize, len: usize },
    Curve(Arc<HilbertPath>),
}

impl Traversal {
    fn len(&self) -> usize {
        match self {
            Traversal::Raster { len, .. } => *len,
            Traversal::Curve(path) => path.len(),
        }
    }

    #[inline]
    fn point(&self, i: usize) -> (usize, usize) {
        match self {
            Traversal::Raster { width, .. } => (i % width, i / width),
            Traversal::Curve(path) => {
                let (x, y) = path.points()[i];
                (x as usize, y as usize)
            }
        }
    }
}

/// One configured quantization run.
///
/// # Example
///
/// ```
/// use crush_dither::{
///     Axes, DistanceMetric, Palette, Pipeline, Quantizer, RasterBuffer, ResolvedPalette,
///     Strategy, ToneAdjust,
/// };
///
/// let palette = Palette::new("bw", vec![[0, 0, 0], [255, 255, 255]]).unwrap();
/// let quantizer = Quantizer::new(
///     ResolvedPalette::Palette(palette),
///     DistanceMetric::Euclidean,
///     Axes::default(),
/// );
/// let pipeline = Pipeline::new(
///     ToneAdjust::default(),
///     quantizer,
///     Strategy::None,
///     Strategy::None,
///     0.5,
///     0.5,
/// );
///
/// let mut raster = RasterBuffer::filled(2, 2, [255, 0, 0]);
/// pipeline.run(&mut raster, |_| std::ops::ControlFlow::Continue(())).unwrap();
/// assert_eq!(raster.pixel(1, 1), [0, 0, 0, 255]);
/// ```
#[derive(Debug)]
pub struct Pipeline<'a> {
    tone: ToneAdjust,
    quantizer: Quantizer,
    slots: [Slot<'a>; 2],
    amount: f32,
    path: Option<Arc<HilbertPath>>,
}

impl<'a> Pipeline<'a> {
    /// Configure a run. `mix` and `amount` are clamped to 0..=1.
    pub fn new(
        tone: ToneAdjust,
        quantizer: Quantizer,
        primary: Strategy<'a>,
        secondary: Strategy<'a>,
        mix: f32,
        amount: f32,
    ) -> Self {
        let mix = clamp_unit(mix);
        Self {
            tone,
            quantizer,
            slots: [
                Slot {
                    strategy: primary,
                    weight: 1.0 - mix,
                },
                Slot {
                    strategy: secondary,
                    weight: mix,
                },
            ],
            amount: clamp_unit(amount),
            path: None,
        }
    }

    /// Whether this run traverses the image along a Hilbert curve.
    pub fn needs_curve(&self) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.is_active() && slot.strategy.is_curve())
    }

    /// Supply a prebuilt Hilbert path.
    ///
    /// Used only when [`needs_curve`](Self::needs_curve) is true and the path
    /// matches the image dimensions; otherwise a path is built on demand.
    pub fn with_path(mut self, path: Arc<HilbertPath>) -> Self {
        self.path = Some(path);
        self
    }

    /// Quantize `raster` in place.
    ///
    /// `progress` receives non-decreasing fractions in 0..=1, ending with
    /// exactly `1.0` on success. Returning [`ControlFlow::Break`] stops the
    /// run; the buffer is then partially processed.
    ///
    /// # Errors
    ///
    /// Returns [`QuantizeError::Cancelled`] when `progress` breaks.
    pub fn run<F>(mut self, raster: &mut RasterBuffer, mut progress: F) -> Result<(), QuantizeError>
    where
        F: FnMut(f32) -> ControlFlow<()>,
    {
        let mut image = WorkingImage::from_raster(raster);
        self.tone.apply_all(&mut image);

        let traversal = if self.needs_curve() {
            let path = match self.path.take() {
                Some(path) if path.fits(raster.width(), raster.height()) => path,
                _ => Arc::new(HilbertPath::new(raster.width(), raster.height())),
            };
            Traversal::Curve(path)
        } else {
            Traversal::Raster {
                width: image.width(),
                len: raster.pixel_count(),
            }
        };

        let total = traversal.len();
        let interval = total.div_ceil(PROGRESS_STEPS).max(1);

        for i in 0..total {
            let (x, y) = traversal.point(i);

            let mut offset = Rgb::ZERO;
            for slot in &self.slots {
                if slot.is_active() {
                    if let Some(o) = slot.strategy.sample_offset(x, y) {
                        offset += o * slot.weight;
                    }
                }
            }

            let working = image.get(x, y) + offset * self.amount;
            let quantized = self.quantizer.quantize(working);
            raster.set_rgb(x as u32, y as u32, quantized.to_bytes());

            let error = working - quantized;
            for slot in &mut self.slots {
                if slot.is_active() {
                    let scale = self.amount * slot.weight;
                    slot.strategy.diffuse(&mut image, x, y, error, scale);
                }
            }

            if i % interval == 0 && progress(i as f32 / total as f32).is_break() {
                tracing::debug!(processed = i, total, "Run cancelled");
                return Err(QuantizeError::Cancelled);
            }
        }

        let _ = progress(1.0);
        Ok(())
    }
}

#[inline]
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
