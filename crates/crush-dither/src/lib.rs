#![allow(clippy::module_inception)]

//! crush-dither: palette and procedural color quantization with combinable
//! dithering.
//!
//! # Quick Start
//!
//! [`Engine`] is the entry point. It takes an RGBA buffer and a
//! [`ProcessConfig`] and returns the quantized buffer:
//!
//! ```
//! use crush_dither::{DitherKind, Engine, ProcessConfig, RasterBuffer};
//!
//! let engine = Engine::new();
//! let config = ProcessConfig::default()
//!     .palette("pico8")
//!     .primary(DitherKind::Bayer4)
//!     .secondary(DitherKind::Floyd)
//!     .mix(0.3);
//!
//! let image = RasterBuffer::filled(8, 8, [120, 80, 200]);
//! let out = engine.process(image, &config, None).unwrap();
//! assert_eq!(out.pixel_count(), 64);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RGBA8 input
//!     |
//!     v
//! [Tone pass]              contrast, brightness, saturation (whole image)
//!     |
//!     v
//! +------------------------------------------------+
//! |  Per pixel (raster order or Hilbert curve)     |
//! |                                                |
//! |  working = pixel + blended ordered/curve offset|
//! |      |                                         |
//! |      v                                         |
//! |  quantize: nearest palette color (cached)      |
//! |            or procedural formula               |
//! |      |                                         |
//! |      v                                         |
//! |  write, error = working - quantized            |
//! |      |                                         |
//! |      v                                         |
//! |  diffuse error / push to curve history         |
//! +------------------------------------------------+
//!     |
//!     v
//! RGBA8 output (alpha untouched)
//! ```
//!
//! # Palettes
//!
//! A palette id resolves to one of ([`resolve_palette`]):
//!
//! - a procedural mode (`math_dynamic_xy`, `math_rgb_split`,
//!   `math_luma_chroma`, `math_bitcrush`, `math_quant_rgb`, `math_quant_hsv`)
//! - a caller-supplied palette, such as one imported with
//!   [`parse_hex_list`] or [`sample_image_colors`]
//! - `auto8`, `auto32` or any other `auto{N}` (EGA)
//! - a built-in: `bw`, `gameboy`, `cga1`, `cga2`, `ega`, `vga`, `pico8`,
//!   `c64`
//!
//! Unknown ids fall back to `vga`.
//!
//! # Strategies
//!
//! Two [`DitherKind`] slots are blended with weights `1 - mix` and `mix`.
//! See the [`dither`] module for the strategy families and
//! [`pipeline`] for how the slots combine.

pub mod api;
pub mod color;
pub mod dither;
pub mod palette;
pub mod pipeline;


pub use api::{DitherError, Engine, ProcessConfig};
pub use color::{quantize_val, DistanceMetric, Rgb};
pub use dither::{DitherKind, Strategy, DEFAULT_BLUE_NOISE_SEED};
pub use palette::{
    builtin, parse_hex_list, resolve_palette, sample_image_colors, Axes, Palette, PaletteError,
    ProceduralMode, ResolvedPalette, BUILTIN_IDS,
};
pub use pipeline::{Pipeline, QuantizeError, Quantizer, RasterBuffer, ToneAdjust};
