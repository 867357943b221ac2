//! Built-in named palettes.
//!
//! Palettes are stored as packed `0xRRGGBB` constants. The 256-entry VGA
//! palette is generated from its ring structure rather than listed.

use super::palette::Palette;

/// Ids of every built-in named palette, in display order.
pub const BUILTIN_IDS: &[&str] = &["bw", "gameboy", "cga1", "cga2", "ega", "vga", "pico8", "c64"];

const BW: &[u32] = &[0x000000, 0xFFFFFF];

const GAMEBOY: &[u32] = &[0x0F380F, 0x306230, 0x8BAC0F, 0x9BBC0F];

const CGA1: &[u32] = &[0x000000, 0x55FFFF, 0xFF55FF, 0xFFFFFF];

const CGA2: &[u32] = &[0x000000, 0x55FF55, 0xFF5555, 0xFFFF55];

const EGA: &[u32] = &[
    0x000000, 0x0000AA, 0x00AA00, 0x00AAAA, 0xAA0000, 0xAA00AA, 0xAA5500, 0xAAAAAA, 0x555555,
    0x5555FF, 0x55FF55, 0x55FFFF, 0xFF5555, 0xFF55FF, 0xFFFF55, 0xFFFFFF,
];

const PICO8: &[u32] = &[
    0x000000, 0x1D2B53, 0x7E2553, 0x008751, 0xAB5236, 0x5F574F, 0xC2C3C7, 0xFFF1E8, 0xFF004D,
    0xFFA300, 0xFFEC27, 0x00E436, 0x29ADFF, 0x83769C, 0xFF77A8, 0xFFCCAA,
];

const C64: &[u32] = &[
    0x000000, 0xFFFFFF, 0x880000, 0xAAFFEE, 0xCC44CC, 0x00CC55, 0x0000AA, 0xEEEE77, 0xDD8855,
    0x664400, 0xFF7777, 0x333333, 0x777777, 0xAAFF66, 0x0088FF, 0xBBBBBB,
];

const VGA_GRAYS: [u8; 16] = [
    0x00, 0x14, 0x20, 0x2C, 0x38, 0x45, 0x51, 0x61, 0x71, 0x82, 0x92, 0xA2, 0xB6, 0xCB, 0xE3, 0xFF,
];

/// Channel levels of the nine VGA hue rings: `[lo, b, c, d, hi]`.
///
/// Three value bands (high, medium, low) each with three saturation bands.
const VGA_RING_LEVELS: [[u8; 5]; 9] = [
    [0x00, 0x41, 0x7D, 0xBE, 0xFF],
    [0x7D, 0x9E, 0xBE, 0xDF, 0xFF],
    [0xB6, 0xC7, 0xDB, 0xEB, 0xFF],
    [0x00, 0x1C, 0x38, 0x55, 0x71],
    [0x38, 0x45, 0x55, 0x61, 0x71],
    [0x51, 0x59, 0x61, 0x69, 0x71],
    [0x00, 0x10, 0x20, 0x30, 0x41],
    [0x20, 0x28, 0x30, 0x38, 0x41],
    [0x2C, 0x30, 0x34, 0x3C, 0x41],
];

/// Hue walk shared by every ring, as indices into a level set.
/// 0 = lo, 1..=3 = intermediate levels, 4 = hi.
const VGA_RING_WALK: [[usize; 3]; 24] = [
    [0, 0, 4],
    [1, 0, 4],
    [2, 0, 4],
    [3, 0, 4],
    [4, 0, 4],
    [4, 0, 3],
    [4, 0, 2],
    [4, 0, 1],
    [4, 0, 0],
    [4, 1, 0],
    [4, 2, 0],
    [4, 3, 0],
    [4, 4, 0],
    [3, 4, 0],
    [2, 4, 0],
    [1, 4, 0],
    [0, 4, 0],
    [0, 4, 1],
    [0, 4, 2],
    [0, 4, 3],
    [0, 4, 4],
    [0, 3, 4],
    [0, 2, 4],
    [0, 1, 4],
];

#[inline]
const fn unpack(hex: u32) -> [u8; 3] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

fn colors(table: &[u32]) -> Vec<[u8; 3]> {
    table.iter().map(|&hex| unpack(hex)).collect()
}

/// The standard 256-color VGA default palette.
pub fn vga_colors() -> Vec<[u8; 3]> {
    let mut out = colors(EGA);
    out.extend(VGA_GRAYS.iter().map(|&v| [v, v, v]));
    for levels in &VGA_RING_LEVELS {
        out.extend(
            VGA_RING_WALK
                .iter()
                .map(|&[r, g, b]| [levels[r], levels[g], levels[b]]),
        );
    }
    out.resize(256, [0, 0, 0]);
    out
}

/// Colors of a built-in palette, or `None` for an unknown id.
pub fn builtin_colors(id: &str) -> Option<Vec<[u8; 3]>> {
    let table = match id {
        "bw" => BW,
        "gameboy" => GAMEBOY,
        "cga1" => CGA1,
        "cga2" => CGA2,
        "ega" => EGA,
        "pico8" => PICO8,
        "c64" => C64,
        "vga" => return Some(vga_colors()),
        _ => return None,
    };
    Some(colors(table))
}

/// Look up a built-in palette by id.
pub fn builtin(id: &str) -> Option<Palette> {
    builtin_colors(id).map(|colors| Palette::from_known(id, colors))
}

/// Synthesize an `auto{N}` palette.
///
/// `auto8` is the two CGA palettes back to back (black appears twice),
/// `auto32` is the first 32 VGA entries, any other count is EGA.
pub fn auto_palette(id: &str, count: Option<u32>) -> Palette {
    let colors = match count {
        Some(8) => {
            let mut c = colors(CGA1);
            c.extend(colors(CGA2));
            c
        }
        Some(32) => {
            let mut c = vga_colors();
            c.truncate(32);
            c
        }
        _ => colors(EGA),
    };
    Palette::from_known(id, colors)
}

/// The palette used when nothing else resolves.
pub fn fallback() -> Palette {
    Palette::from_known("vga", vga_colors())
}
