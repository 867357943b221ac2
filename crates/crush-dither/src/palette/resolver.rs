//! Palette id resolution.

use super::builtin::{auto_palette, builtin, fallback};
use super::palette::Palette;
use super::procedural::{ProceduralMode, PROCEDURAL_PREFIX};

/// Prefix of the synthetic `auto{N}` palettes.
pub const AUTO_PREFIX: &str = "auto";

/// What a palette id resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedPalette {
    /// Nearest-color search against a concrete palette.
    Palette(Palette),
    /// Formula-driven reduction, no palette involved.
    Procedural(ProceduralMode),
}

impl ResolvedPalette {
    pub fn is_procedural(&self) -> bool {
        matches!(self, ResolvedPalette::Procedural(_))
    }

    /// Id of the resolved palette or procedural mode.
    pub fn id(&self) -> &str {
        match self {
            ResolvedPalette::Palette(p) => p.id(),
            ResolvedPalette::Procedural(mode) => mode.id(),
        }
    }
}

/// Resolve a palette id once per run.
///
/// Resolution order:
/// 1. ids starting with `math_` select a procedural mode
/// 2. a caller-supplied `custom` palette is used as is
/// 3. `auto{N}` synthesizes a palette from the CGA/VGA/EGA sets
/// 4. a built-in named palette
///
/// Anything that does not resolve falls back to the 256-color VGA palette.
/// This function never fails.
///
/// # Example
///
/// ```
/// use crush_dither::{resolve_palette, ResolvedPalette};
///
/// match resolve_palette("no-such-palette", None) {
///     ResolvedPalette::Palette(p) => assert_eq!(p.id(), "vga"),
///     ResolvedPalette::Procedural(_) => unreachable!(),
/// }
/// ```
pub fn resolve_palette(id: &str, custom: Option<&Palette>) -> ResolvedPalette {
    if id.starts_with(PROCEDURAL_PREFIX) {
        if let Some(mode) = ProceduralMode::from_id(id) {
            return ResolvedPalette::Procedural(mode);
        }
        tracing::warn!(palette = id, "Unknown procedural mode, using vga");
        return ResolvedPalette::Palette(fallback());
    }

    if let Some(custom) = custom {
        return ResolvedPalette::Palette(custom.clone());
    }

    if let Some(count) = id.strip_prefix(AUTO_PREFIX) {
        return ResolvedPalette::Palette(auto_palette(id, count.parse().ok()));
    }

    match builtin(id) {
        Some(palette) => ResolvedPalette::Palette(palette),
        None => {
            tracing::warn!(palette = id, "Unknown palette, using vga");
            ResolvedPalette::Palette(fallback())
        }
    }
}
