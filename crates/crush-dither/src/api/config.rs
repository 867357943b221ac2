//! Per-run configuration.

use serde::{Deserialize, Serialize};

use crate::color::DistanceMetric;
use crate::dither::DitherKind;
use crate::palette::Axes;
use crate::pipeline::ToneAdjust;

/// Everything a single run needs besides the pixels.
///
/// All fields have defaults, so a partial YAML or JSON document is a valid
/// configuration. Out-of-range numbers are clamped where they are used.
///
/// # Example
///
/// ```
/// use crush_dither::{DitherKind, ProcessConfig};
///
/// let config = ProcessConfig::default()
///     .palette("gameboy")
///     .primary(DitherKind::Atkinson)
///     .secondary(DitherKind::None);
///
/// assert_eq!(config.palette, "gameboy");
/// assert_eq!(config.mix, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub contrast: f32,
    pub brightness: f32,
    /// Percent; 100 leaves saturation unchanged.
    pub saturation: f32,
    /// Palette id: built-in, `auto{N}`, `math_*` or an imported palette.
    pub palette: String,
    pub primary: DitherKind,
    pub secondary: DitherKind,
    /// Weight of the secondary strategy, 0..=1.
    pub mix: f32,
    /// Overall dither strength, 0..=1.
    pub amount: f32,
    pub axis1: f32,
    pub axis2: f32,
    pub axis3: f32,
    pub distance: DistanceMetric,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        let tone = ToneAdjust::default();
        let axes = Axes::default();
        Self {
            contrast: tone.contrast,
            brightness: tone.brightness,
            saturation: tone.saturation,
            palette: "auto16".to_string(),
            primary: DitherKind::Bayer8,
            secondary: DitherKind::Jjn,
            mix: 0.5,
            amount: 0.5,
            axis1: axes.axis1,
            axis2: axes.axis2,
            axis3: axes.axis3,
            distance: DistanceMetric::default(),
        }
    }
}

impl ProcessConfig {
    pub fn palette(mut self, id: impl Into<String>) -> Self {
        self.palette = id.into();
        self
    }

    pub fn primary(mut self, kind: DitherKind) -> Self {
        self.primary = kind;
        self
    }

    pub fn secondary(mut self, kind: DitherKind) -> Self {
        self.secondary = kind;
        self
    }

    pub fn mix(mut self, mix: f32) -> Self {
        self.mix = mix;
        self
    }

    pub fn amount(mut self, amount: f32) -> Self {
        self.amount = amount;
        self
    }

    pub fn tone(mut self, contrast: f32, brightness: f32, saturation: f32) -> Self {
        self.contrast = contrast;
        self.brightness = brightness;
        self.saturation = saturation;
        self
    }

    pub fn axes(mut self, axis1: f32, axis2: f32, axis3: f32) -> Self {
        self.axis1 = axis1;
        self.axis2 = axis2;
        self.axis3 = axis3;
        self
    }

    pub fn distance(mut self, metric: DistanceMetric) -> Self {
        self.distance = metric;
        self
    }

    /// The tone pass settings.
    pub fn tone_adjust(&self) -> ToneAdjust {
        ToneAdjust {
            contrast: self.contrast,
            brightness: self.brightness,
            saturation: self.saturation,
        }
    }

    /// The procedural mode parameters.
    pub fn mode_axes(&self) -> Axes {
        Axes {
            axis1: self.axis1,
            axis2: self.axis2,
            axis3: self.axis3,
        }
    }
}
