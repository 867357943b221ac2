//! HSV and YIQ conversions.
//!
//! Both conversions take and return colors on the 0..=255 scale. HSV
//! components are normalized to 0..=1 (hue included), YIQ components are
//! left on the 0..=255 scale so chroma steps can be expressed in the same
//! units as luma.

use super::quantize::round_half_up;
use super::rgb::{Rgb, LUMA_B, LUMA_G, LUMA_R};

/// Hue, saturation and value, each in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// Luma plus in-phase and quadrature chroma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Yiq {
    pub y: f32,
    pub i: f32,
    pub q: f32,
}

/// Convert an RGB color to HSV.
///
/// Hue is 0 for achromatic colors (max == min).
pub fn rgb_to_hsv(c: Rgb) -> Hsv {
    let r = c.r / 255.0;
    let g = c.g / 255.0;
    let b = c.b / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let s = if max == 0.0 { 0.0 } else { d / max };
    let h = if max == min {
        0.0
    } else if max == r {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };

    Hsv { h, s, v: max }
}

/// Convert HSV back to RGB, rounding each channel to an integer value.
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let Hsv { h, s, v } = hsv;
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (sector as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Rgb::new(
        round_half_up(r * 255.0),
        round_half_up(g * 255.0),
        round_half_up(b * 255.0),
    )
}

/// Convert an RGB color to YIQ.
///
/// Y uses the same luma weights as the tone pass.
pub fn rgb_to_yiq(c: Rgb) -> Yiq {
    Yiq {
        y: LUMA_R * c.r + LUMA_G * c.g + LUMA_B * c.b,
        i: 0.596 * c.r - 0.274 * c.g - 0.322 * c.b,
        q: 0.211 * c.r - 0.523 * c.g + 0.312 * c.b,
    }
}

/// Convert YIQ back to RGB, clamping each channel to 0..=255.
pub fn yiq_to_rgb(yiq: Yiq) -> Rgb {
    let Yiq { y, i, q } = yiq;
    Rgb::new(
        y + 0.956 * i + 0.621 * q,
        y - 0.272 * i - 0.647 * q,
        y - 1.106 * i + 1.703 * q,
    )
    .clamped()
}
