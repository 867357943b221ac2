//! Color types, conversions and distance metrics.
//!
//! Everything in this module works on 0..=255 channel values. Working colors
//! are kept as `f32` so that accumulated dither error may push them outside
//! the displayable range; clamping happens only at the output boundary.
//!
//! - [`Rgb`]: the working color type used throughout the pipeline
//! - [`Hsv`], [`Yiq`]: conversion targets for the procedural quantizers
//! - [`DistanceMetric`]: Euclidean or Redmean nearest-color distance
//! - [`quantize_val`]: uniform-step channel quantization

mod convert;
mod distance;
mod quantize;
mod rgb;

pub use convert::{hsv_to_rgb, rgb_to_hsv, rgb_to_yiq, yiq_to_rgb, Hsv, Yiq};
pub use distance::DistanceMetric;
pub use quantize::{quantize_val, round_half_up};
pub use rgb::{Rgb, LUMA_B, LUMA_G, LUMA_R};
