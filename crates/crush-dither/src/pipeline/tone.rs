//! Global tone adjustment.

use serde::{Deserialize, Serialize};

use super::buffer::WorkingImage;
use crate::color::Rgb;

/// Contrast, brightness and saturation applied once before dithering.
///
/// - `contrast`: -255..=255, 0 leaves contrast unchanged
/// - `brightness`: added to every channel, 0 leaves it unchanged
/// - `saturation`: percent, 100 leaves it unchanged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneAdjust {
    pub contrast: f32,
    pub brightness: f32,
    pub saturation: f32,
}

impl Default for ToneAdjust {
    fn default() -> Self {
        Self {
            contrast: 0.0,
            brightness: 0.0,
            saturation: 100.0,
        }
    }
}

impl ToneAdjust {
    /// Contrast factor: `259 (c + 255) / (255 (259 - c))`.
    ///
    /// Contrast is clamped to -255..=255 so the factor stays finite.
    pub fn contrast_factor(&self) -> f32 {
        let c = self.contrast.clamp(-255.0, 255.0);
        (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
    }

    /// Adjust one color. The result is clamped to 0..=255.
    #[inline]
    pub fn apply(&self, color: Rgb) -> Rgb {
        self.apply_with_factor(color, self.contrast_factor())
    }

    /// Adjust every pixel of `image` in place.
    pub fn apply_all(&self, image: &mut WorkingImage) {
        let factor = self.contrast_factor();
        for px in image.pixels_mut() {
            *px = self.apply_with_factor(*px, factor);
        }
    }

    #[inline]
    fn apply_with_factor(&self, color: Rgb, factor: f32) -> Rgb {
        let stretch = |v: f32| factor * (v - 128.0) + 128.0 + self.brightness;
        let mut c = Rgb::new(stretch(color.r), stretch(color.g), stretch(color.b));

        if self.saturation != 100.0 {
            let gray = Rgb::splat(c.luma());
            c = gray + (c - gray) * (self.saturation / 100.0);
        }

        c.clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RasterBuffer;

    #[test]
    fn test_identity_leaves_pixels_unchanged() {
        let tone = ToneAdjust::default();
        assert_eq!(tone.contrast_factor(), 1.0);
        for r in (0..=255).step_by(17) {
            for g in (0..=255).step_by(51) {
                let c = Rgb::from_u8(r as u8, g as u8, (255 - r) as u8);
                assert_eq!(tone.apply(c), c, "{c:?} changed");
            }
        }
    }

    #[test]
    fn test_brightness_shifts_and_clamps() {
        let tone = ToneAdjust {
            brightness: 40.0,
            ..ToneAdjust::default()
        };
        assert_eq!(tone.apply(Rgb::splat(100.0)), Rgb::splat(140.0));
        assert_eq!(tone.apply(Rgb::splat(240.0)), Rgb::splat(255.0));
    }

    #[test]
    fn test_contrast_pushes_away_from_mid_gray() {
        let tone = ToneAdjust {
            contrast: 64.0,
            ..ToneAdjust::default()
        };
        assert!(tone.apply(Rgb::splat(160.0)).r > 160.0);
        assert!(tone.apply(Rgb::splat(96.0)).r < 96.0);
        assert_eq!(tone.apply(Rgb::splat(128.0)), Rgb::splat(128.0));
    }

    #[test]
    fn test_extreme_contrast_stays_finite() {
        let tone = ToneAdjust {
            contrast: 1000.0,
            ..ToneAdjust::default()
        };
        let c = tone.apply(Rgb::splat(129.0));
        assert!(c.r.is_finite());
    }

    #[test]
    fn test_zero_saturation_is_grayscale() {
        let tone = ToneAdjust {
            saturation: 0.0,
            ..ToneAdjust::default()
        };
        let c = tone.apply(Rgb::new(200.0, 50.0, 10.0));
        assert!((c.r - c.g).abs() < 1e-3 && (c.g - c.b).abs() < 1e-3, "{c:?}");
    }

    #[test]
    fn test_apply_all() {
        let raster = RasterBuffer::filled(2, 1, [100, 100, 100]);
        let mut image = WorkingImage::from_raster(&raster);
        ToneAdjust {
            brightness: -50.0,
            ..ToneAdjust::default()
        }
        .apply_all(&mut image);
        assert_eq!(image.get(1, 0), Rgb::splat(50.0));
    }
}
