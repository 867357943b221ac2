//! Palette import from hex lists and sampled images.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use super::error::PaletteError;

/// Maximum number of colors kept when sampling an image.
pub const MAX_SAMPLED_COLORS: usize = 256;

/// Pixel budget for image sampling; larger images are strided.
const SAMPLE_BUDGET: usize = 100_000;

/// Pixels with alpha below this are ignored when sampling.
const MIN_OPAQUE_ALPHA: u8 = 128;

fn hex_line() -> &'static Regex {
    static HEX_LINE: OnceLock<Regex> = OnceLock::new();
    HEX_LINE.get_or_init(|| {
        Regex::new(r"^#?([0-9A-Fa-f]{6})$").expect("hex line pattern is a valid regex")
    })
}

/// Parse a newline-delimited hex color list.
///
/// Each line is trimmed. Empty lines and lines starting with `;` or `//`
/// are comments. A line contributes one color when it is exactly six hex
/// digits, optionally preceded by `#`; anything else is skipped.
///
/// # Errors
///
/// Returns [`PaletteError::NoValidColors`] when no line yields a color.
///
/// # Example
///
/// ```
/// use crush_dither::parse_hex_list;
///
/// let colors = parse_hex_list("; my palette\n#FF0000\n00ff00\nnope\n").unwrap();
/// assert_eq!(colors, vec![[255, 0, 0], [0, 255, 0]]);
/// ```
pub fn parse_hex_list(text: &str) -> Result<Vec<[u8; 3]>, PaletteError> {
    let colors: Vec<[u8; 3]> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(';') && !line.starts_with("//"))
        .filter_map(|line| {
            let digits = hex_line().captures(line)?.get(1)?.as_str();
            let value = u32::from_str_radix(digits, 16).ok()?;
            Some([(value >> 16) as u8, (value >> 8) as u8, value as u8])
        })
        .collect();

    if colors.is_empty() {
        return Err(PaletteError::NoValidColors);
    }
    tracing::debug!(colors = colors.len(), "Parsed hex palette");
    Ok(colors)
}

/// Extract a palette from RGBA pixels.
///
/// Samples every `max(1, w*h / 100000)`-th pixel, ignores pixels with alpha
/// below 128, and keeps unique colors in first-seen order up to 256.
///
/// # Errors
///
/// - [`PaletteError::RasterSize`] when `rgba` is not `width * height * 4` bytes
/// - [`PaletteError::NoOpaqueColors`] when no sampled pixel is opaque enough
pub fn sample_image_colors(
    rgba: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<[u8; 3]>, PaletteError> {
    let pixels = width as usize * height as usize;
    let expected = pixels * 4;
    if rgba.len() != expected {
        return Err(PaletteError::RasterSize {
            width,
            height,
            expected,
            actual: rgba.len(),
        });
    }

    let stride = (pixels / SAMPLE_BUDGET).max(1);
    let mut seen = HashSet::new();
    let mut colors = Vec::new();

    for px in rgba.chunks_exact(4).step_by(stride) {
        if px[3] < MIN_OPAQUE_ALPHA {
            continue;
        }
        let color = [px[0], px[1], px[2]];
        if seen.insert(color) {
            colors.push(color);
            if colors.len() >= MAX_SAMPLED_COLORS {
                break;
            }
        }
    }

    if colors.is_empty() {
        return Err(PaletteError::NoOpaqueColors);
    }
    tracing::debug!(colors = colors.len(), stride, "Sampled image palette");
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_list_skips_comments_and_garbage() {
        let text = "\
; header comment
// another comment

  #112233  
445566
#12345
#GGGGGG
#abcdef
";
        let colors = parse_hex_list(text).unwrap();
        assert_eq!(
            colors,
            vec![[0x11, 0x22, 0x33], [0x44, 0x55, 0x66], [0xAB, 0xCD, 0xEF]]
        );
    }

    #[test]
    fn test_parse_hex_list_rejects_trailing_text() {
        assert_eq!(
            parse_hex_list("#112233 red\nFF0000FF\n").unwrap_err(),
            PaletteError::NoValidColors
        );
    }

    #[test]
    fn test_parse_hex_list_empty_is_error() {
        assert_eq!(parse_hex_list("").unwrap_err(), PaletteError::NoValidColors);
        assert_eq!(
            parse_hex_list("; only comments\n").unwrap_err(),
            PaletteError::NoValidColors
        );
    }

    #[test]
    fn test_parse_hex_list_handles_crlf() {
        let colors = parse_hex_list("#000000\r\n#FFFFFF\r\n").unwrap();
        assert_eq!(colors, vec![[0, 0, 0], [255, 255, 255]]);
    }

    #[test]
    fn test_sample_skips_transparent_and_dedupes() {
        let rgba = [
            255, 0, 0, 255, // red
            0, 255, 0, 10, // transparent green
            255, 0, 0, 200, // red again
            0, 0, 255, 128, // blue, exactly at threshold
        ];
        let colors = sample_image_colors(&rgba, 2, 2).unwrap();
        assert_eq!(colors, vec![[255, 0, 0], [0, 0, 255]]);
    }

    #[test]
    fn test_sample_caps_at_256() {
        let width = 32u32;
        let height = 32u32;
        let rgba: Vec<u8> = (0..width * height)
            .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 0, 255])
            .collect();
        let colors = sample_image_colors(&rgba, width, height).unwrap();
        assert_eq!(colors.len(), MAX_SAMPLED_COLORS);
        assert_eq!(colors[0], [0, 0, 0]);
        assert_eq!(colors[255], [255, 0, 0]);
    }

    #[test]
    fn test_sample_all_transparent_is_error() {
        let rgba = [0u8; 16];
        assert_eq!(
            sample_image_colors(&rgba, 2, 2).unwrap_err(),
            PaletteError::NoOpaqueColors
        );
    }

    #[test]
    fn test_sample_size_mismatch() {
        let err = sample_image_colors(&[0u8; 12], 2, 2).unwrap_err();
        assert!(matches!(err, PaletteError::RasterSize { expected: 16, actual: 12, .. }));
    }

    #[test]
    fn test_sample_strides_large_images() {
        // 400x500 = 200_000 pixels -> stride 2; odd pixels are white and never sampled
        let width = 400u32;
        let height = 500u32;
        let rgba: Vec<u8> = (0..width * height)
            .flat_map(|i| if i % 2 == 0 { [0, 0, 0, 255] } else { [255, 255, 255, 255] })
            .collect();
        let colors = sample_image_colors(&rgba, width, height).unwrap();
        assert_eq!(colors, vec![[0, 0, 0]]);
    }
}
