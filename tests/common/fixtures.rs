//! Test fixtures and constants.

use crush_dither::RasterBuffer;
use pixelcrush::services::encode_png;

/// Hex list with comments, blanks and junk lines
pub const HEX_LIST: &str = "\
; sunset palette
// exported by hand
#FF5E5B

d8d8d8
not-a-color
#FFFFEA
#12345
";

/// Colors of [`HEX_LIST`] as the API reports them
pub const HEX_LIST_COLORS: [&str; 3] = ["#FF5E5B", "#D8D8D8", "#FFFFEA"];

/// PNG of a single opaque color
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    encode_png(&RasterBuffer::filled(width, height, rgb)).unwrap()
}

/// PNG from raw RGBA data
pub fn rgba_png(width: u32, height: u32, data: Vec<u8>) -> Vec<u8> {
    encode_png(&RasterBuffer::new(width, height, data).unwrap()).unwrap()
}

/// PNG with a horizontal gray ramp and a vertical alpha ramp
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let data = (0..height)
        .flat_map(|y| {
            (0..width).flat_map(move |x| {
                let v = (x * 255 / width.max(2).saturating_sub(1)) as u8;
                let a = 255 - (y * 200 / height.max(1)) as u8;
                [v, v, v, a]
            })
        })
        .collect();
    rgba_png(width, height, data)
}

/// Headers selecting a session
pub fn session(key: &str) -> [(&'static str, &str); 1] {
    [("X-Session", key)]
}
