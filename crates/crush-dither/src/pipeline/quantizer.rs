//! Color reduction target for a run.

use crate::color::{DistanceMetric, Rgb};
use crate::palette::{Axes, NearestColorCache, Palette, ProceduralMode, ResolvedPalette};

/// Reduces working colors to output colors.
///
/// In palette mode the quantizer owns the run's nearest-color cache.
#[derive(Debug)]
pub enum Quantizer {
    Palette {
        palette: Palette,
        metric: DistanceMetric,
        cache: NearestColorCache,
    },
    Procedural {
        mode: ProceduralMode,
        axes: Axes,
    },
}

impl Quantizer {
    /// Build the quantizer for a resolved palette with a fresh cache.
    pub fn new(resolved: ResolvedPalette, metric: DistanceMetric, axes: Axes) -> Self {
        match resolved {
            ResolvedPalette::Palette(palette) => Quantizer::Palette {
                palette,
                metric,
                cache: NearestColorCache::new(),
            },
            ResolvedPalette::Procedural(mode) => Quantizer::Procedural { mode, axes },
        }
    }

    #[inline]
    pub fn quantize(&mut self, color: Rgb) -> Rgb {
        match self {
            Quantizer::Palette {
                palette,
                metric,
                cache,
            } => palette.color(palette.find_nearest_cached(color, *metric, cache)),
            Quantizer::Procedural { mode, axes } => mode.apply(color, *axes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_quantizer_fills_cache() {
        let palette = Palette::new("bw", vec![[0, 0, 0], [255, 255, 255]]).unwrap();
        let mut q = Quantizer::new(
            ResolvedPalette::Palette(palette),
            DistanceMetric::Euclidean,
            Axes::default(),
        );
        assert_eq!(q.quantize(Rgb::splat(200.0)), Rgb::splat(255.0));
        assert_eq!(q.quantize(Rgb::splat(20.0)), Rgb::ZERO);
        match q {
            Quantizer::Palette { cache, .. } => assert_eq!(cache.len(), 2),
            Quantizer::Procedural { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_procedural_quantizer() {
        let mut q = Quantizer::new(
            ResolvedPalette::Procedural(ProceduralMode::QuantRgb),
            DistanceMetric::Redmean,
            Axes {
                axis1: 2.0,
                axis2: 0.0,
                axis3: 0.0,
            },
        );
        assert_eq!(q.quantize(Rgb::new(10.0, 200.0, 90.0)), Rgb::new(0.0, 255.0, 0.0));
    }
}
