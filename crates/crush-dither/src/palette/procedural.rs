//! Procedural (formula-driven) color reduction.
//!
//! Instead of searching a palette, these modes compute the output color
//! directly from the working color and up to three axis parameters. The
//! meaning of each axis depends on the mode:
//!
//! | mode           | axis1            | axis2                 | axis3        |
//! |----------------|------------------|-----------------------|--------------|
//! | `dynamic_xy`   | total steps      | red/green bias 0..256 | -            |
//! | `rgb_split`    | red steps        | green steps           | blue steps   |
//! | `luma_chroma`  | luma steps       | chroma steps          | -            |
//! | `bitcrush`     | steps            | black floor 0..255    | -            |
//! | `quant_rgb`    | steps            | -                     | -            |
//! | `quant_hsv`    | steps per h/s/v  | -                     | -            |

use serde::{Deserialize, Serialize};

use crate::color::{
    hsv_to_rgb, quantize_val, rgb_to_hsv, rgb_to_yiq, round_half_up, yiq_to_rgb, Hsv, Rgb, Yiq,
};

/// Palette ids with this prefix select a procedural mode.
pub const PROCEDURAL_PREFIX: &str = "math_";

/// Chroma range divided by the chroma step count in `luma_chroma`.
const CHROMA_SPAN: f32 = 300.0;

/// The six procedural quantizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProceduralMode {
    /// Red/green/blue step counts derived from one budget and a bias axis.
    DynamicXy,
    /// Independent step counts per channel.
    RgbSplit,
    /// Luma quantized by step count, chroma rounded to a fixed step.
    LumaChroma,
    /// Black below a brightness floor, uniform steps above it.
    Bitcrush,
    /// Uniform steps on every RGB channel.
    QuantRgb,
    /// Uniform floored steps on hue, saturation and value.
    QuantHsv,
}

impl ProceduralMode {
    pub const ALL: [ProceduralMode; 6] = [
        ProceduralMode::DynamicXy,
        ProceduralMode::RgbSplit,
        ProceduralMode::LumaChroma,
        ProceduralMode::Bitcrush,
        ProceduralMode::QuantRgb,
        ProceduralMode::QuantHsv,
    ];

    /// Parse a full palette id such as `math_quant_rgb`.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.id() == id)
    }

    /// Palette id selecting this mode.
    pub fn id(self) -> &'static str {
        match self {
            ProceduralMode::DynamicXy => "math_dynamic_xy",
            ProceduralMode::RgbSplit => "math_rgb_split",
            ProceduralMode::LumaChroma => "math_luma_chroma",
            ProceduralMode::Bitcrush => "math_bitcrush",
            ProceduralMode::QuantRgb => "math_quant_rgb",
            ProceduralMode::QuantHsv => "math_quant_hsv",
        }
    }

    /// Reduce a working color.
    ///
    /// The color is clamped to 0..=255 before the formula runs.
    pub fn apply(self, color: Rgb, axes: Axes) -> Rgb {
        let c = color.clamped();
        match self {
            ProceduralMode::DynamicXy => dynamic_xy(c, axes),
            ProceduralMode::RgbSplit => Rgb::new(
                quantize_val(c.r, axes.axis1),
                quantize_val(c.g, axes.axis2),
                quantize_val(c.b, axes.axis3),
            ),
            ProceduralMode::LumaChroma => luma_chroma(c, axes),
            ProceduralMode::Bitcrush => {
                if c.mean() < axes.axis2 {
                    Rgb::ZERO
                } else {
                    uniform(c, axes.axis1)
                }
            }
            ProceduralMode::QuantRgb => uniform(c, axes.axis1),
            ProceduralMode::QuantHsv => quant_hsv(c, axes.axis1),
        }
    }
}

/// The three mode parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    pub axis1: f32,
    pub axis2: f32,
    pub axis3: f32,
}

impl Default for Axes {
    fn default() -> Self {
        Self {
            axis1: 8.0,
            axis2: 50.0,
            axis3: 8.0,
        }
    }
}

fn uniform(c: Rgb, steps: f32) -> Rgb {
    Rgb::new(
        quantize_val(c.r, steps),
        quantize_val(c.g, steps),
        quantize_val(c.b, steps),
    )
}

fn dynamic_xy(c: Rgb, axes: Axes) -> Rgb {
    let qs = axes.axis1;
    let bias = axes.axis2 / 256.0 * 100.0;

    let mut r_steps = qs;
    let mut g_steps = qs;
    let b_steps;
    if bias < 50.0 {
        r_steps = (qs * (bias / 50.0)).floor().max(2.0);
        b_steps = (qs - r_steps + 2.0).max(2.0);
    } else {
        g_steps = (qs * ((100.0 - bias) / 50.0)).floor().max(2.0);
        b_steps = (qs - g_steps + 2.0).max(2.0);
    }

    Rgb::new(
        quantize_val(c.r, r_steps),
        quantize_val(c.g, g_steps),
        quantize_val(c.b, b_steps),
    )
}

fn luma_chroma(c: Rgb, axes: Axes) -> Rgb {
    let yiq = rgb_to_yiq(c);
    let step = CHROMA_SPAN / axes.axis2.max(2.0);
    yiq_to_rgb(Yiq {
        y: quantize_val(yiq.y, axes.axis1),
        i: round_half_up(yiq.i / step) * step,
        q: round_half_up(yiq.q / step) * step,
    })
}

fn quant_hsv(c: Rgb, steps: f32) -> Rgb {
    let n = steps.max(2.0);
    let hsv = rgb_to_hsv(c);
    hsv_to_rgb(Hsv {
        h: (hsv.h * n).floor() / n,
        s: (hsv.s * n).floor() / n,
        v: (hsv.v * n).floor() / n,
    })
}
