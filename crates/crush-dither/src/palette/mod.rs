//! Palettes and the palette resolver.
//!
//! A run either searches a concrete [`Palette`] for the nearest color or
//! reduces colors with a [`ProceduralMode`] formula. [`resolve_palette`]
//! decides which, once per run, from a palette id and an optional
//! caller-supplied palette.
//!
//! User palettes enter through [`parse_hex_list`] and
//! [`sample_image_colors`].

mod builtin;
mod cache;
mod error;
mod import;
mod palette;
mod procedural;
mod resolver;

pub use builtin::{builtin, vga_colors, BUILTIN_IDS};
pub use cache::NearestColorCache;
pub use error::PaletteError;
pub use import::{parse_hex_list, sample_image_colors, MAX_SAMPLED_COLORS};
pub use palette::{NearestMatch, Palette};
pub use procedural::{Axes, ProceduralMode, PROCEDURAL_PREFIX};
pub use resolver::{resolve_palette, ResolvedPalette, AUTO_PREFIX};
