//! Per-run dither strategy state.

use super::blue_noise::BlueNoise;
use super::curve::CurveHistory;
use super::kernel::{
    Kernel, ATKINSON, FALSE_FLOYD_STEINBERG, FLOYD_STEINBERG, JARVIS_JUDICE_NINKE, SIERRA_LITE,
    STUCKI,
};
use super::ordered::{ThresholdSource, BAYER2, BAYER4, BAYER8};
use super::DitherKind;
use crate::color::Rgb;
use crate::pipeline::WorkingImage;

/// A dither strategy instantiated for one run.
///
/// Every variant answers the same two questions:
///
/// - [`sample_offset`](Self::sample_offset): what to add to the working
///   color before quantization (ordered and curve strategies)
/// - [`diffuse`](Self::diffuse): what to do with the quantization error
///   afterwards (error diffusion and curve strategies)
#[derive(Debug, Clone)]
pub enum Strategy<'a> {
    None,
    ErrorDiffusion(&'static Kernel),
    Ordered(ThresholdSource<'a>),
    Curve(CurveHistory),
}

impl<'a> Strategy<'a> {
    /// Instantiate the strategy for `kind`.
    ///
    /// `blue_noise` is only called for [`DitherKind::BlueNoise`], so the
    /// texture is never built for runs that do not use it.
    pub fn for_kind(kind: DitherKind, blue_noise: impl FnOnce() -> &'a BlueNoise) -> Self {
        match kind {
            DitherKind::None => Strategy::None,
            DitherKind::Floyd => Strategy::ErrorDiffusion(&FLOYD_STEINBERG),
            DitherKind::FalseFloyd => Strategy::ErrorDiffusion(&FALSE_FLOYD_STEINBERG),
            DitherKind::Atkinson => Strategy::ErrorDiffusion(&ATKINSON),
            DitherKind::Jjn => Strategy::ErrorDiffusion(&JARVIS_JUDICE_NINKE),
            DitherKind::Sierra => Strategy::ErrorDiffusion(&SIERRA_LITE),
            DitherKind::Stucki => Strategy::ErrorDiffusion(&STUCKI),
            DitherKind::Bayer2 => Strategy::Ordered(ThresholdSource::Bayer(&BAYER2)),
            DitherKind::Bayer4 => Strategy::Ordered(ThresholdSource::Bayer(&BAYER4)),
            DitherKind::Bayer8 => Strategy::Ordered(ThresholdSource::Bayer(&BAYER8)),
            DitherKind::BlueNoise => Strategy::Ordered(ThresholdSource::BlueNoise(blue_noise())),
            DitherKind::Riemersma => Strategy::Curve(CurveHistory::new()),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Strategy::None)
    }

    pub fn is_curve(&self) -> bool {
        matches!(self, Strategy::Curve(_))
    }

    /// Pre-quantization offset at `(x, y)`, before amount and slot weight.
    ///
    /// Ordered strategies return their threshold offset on all channels.
    /// Curve strategies return the weighted history error, or `None` while
    /// the history is still empty.
    #[inline]
    pub fn sample_offset(&self, x: usize, y: usize) -> Option<Rgb> {
        match self {
            Strategy::Ordered(source) => Some(Rgb::splat(source.offset(x, y))),
            Strategy::Curve(history) => history.weighted_error(),
            Strategy::None | Strategy::ErrorDiffusion(_) => None,
        }
    }

    /// Hand the raw quantization error of `(x, y)` to this strategy.
    ///
    /// Error diffusion spreads `error * scale` onto unvisited neighbors.
    /// The curve strategy records the unscaled error; its share is applied
    /// when the history is sampled.
    #[inline]
    pub fn diffuse(&mut self, image: &mut WorkingImage, x: usize, y: usize, error: Rgb, scale: f32) {
        match self {
            Strategy::ErrorDiffusion(kernel) => kernel.diffuse(image, x, y, error, scale),
            Strategy::Curve(history) => history.push(error),
            Strategy::None | Strategy::Ordered(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::blue_noise::DEFAULT_BLUE_NOISE_SEED;
    use crate::pipeline::RasterBuffer;

    fn no_noise<'a>() -> &'a BlueNoise {
        panic!("blue noise should not be requested")
    }

    #[test]
    fn test_blue_noise_only_built_when_needed() {
        for kind in DitherKind::ALL {
            if kind != DitherKind::BlueNoise {
                let _ = Strategy::for_kind(kind, no_noise);
            }
        }
        let noise = BlueNoise::generate(DEFAULT_BLUE_NOISE_SEED);
        let s = Strategy::for_kind(DitherKind::BlueNoise, || &noise);
        assert!(s.sample_offset(0, 0).is_some());
    }

    #[test]
    fn test_error_diffusion_has_no_offset() {
        let s = Strategy::for_kind(DitherKind::Floyd, no_noise);
        assert_eq!(s.sample_offset(3, 4), None);
    }

    #[test]
    fn test_ordered_offset_is_gray() {
        let s = Strategy::for_kind(DitherKind::Bayer4, no_noise);
        let o = s.sample_offset(1, 2).unwrap();
        assert_eq!(o.r, o.g);
        assert_eq!(o.g, o.b);
    }

    #[test]
    fn test_ordered_and_none_ignore_error() {
        let raster = RasterBuffer::filled(2, 2, [0, 0, 0]);
        let mut image = WorkingImage::from_raster(&raster);
        for kind in [DitherKind::None, DitherKind::Bayer8] {
            let mut s = Strategy::for_kind(kind, no_noise);
            s.diffuse(&mut image, 0, 0, Rgb::splat(50.0), 1.0);
        }
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(image.get(x, y), Rgb::ZERO);
            }
        }
    }

    #[test]
    fn test_curve_records_error() {
        let raster = RasterBuffer::filled(1, 1, [0, 0, 0]);
        let mut image = WorkingImage::from_raster(&raster);
        let mut s = Strategy::for_kind(DitherKind::Riemersma, no_noise);
        assert_eq!(s.sample_offset(0, 0), None);
        s.diffuse(&mut image, 0, 0, Rgb::splat(12.0), 0.25);
        assert_eq!(s.sample_offset(0, 0), Some(Rgb::splat(12.0)));
        assert_eq!(image.get(0, 0), Rgb::ZERO, "curve never writes to the image");
    }
}
