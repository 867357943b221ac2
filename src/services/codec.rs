//! PNG decoding and encoding for RGBA8 rasters.

use crush_dither::RasterBuffer;
use std::io::Cursor;

use crate::error::CodecError;

/// Decode a PNG of any color type and bit depth into RGBA8.
///
/// Images with more than `max_pixels` pixels are rejected before their
/// pixel data is decoded.
pub fn decode_png(bytes: &[u8], max_pixels: u64) -> Result<RasterBuffer, CodecError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let pixels = u64::from(width) * u64::from(height);
    if pixels > max_pixels {
        return Err(CodecError::TooLarge {
            pixels,
            max: max_pixels,
        });
    }

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    let samples = &buf[..frame.buffer_size()];

    let rgba: Vec<u8> = match frame.color_type {
        png::ColorType::Rgba => samples.to_vec(),
        png::ColorType::Rgb => samples
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => samples
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        png::ColorType::Grayscale => samples.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(CodecError::Decode(
                "indexed image was not expanded".to_string(),
            ))
        }
    };

    RasterBuffer::new(width, height, rgba).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode an RGBA8 raster as PNG.
pub fn encode_png(raster: &RasterBuffer) -> Result<Vec<u8>, CodecError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, raster.width(), raster.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        writer
            .write_image_data(raster.data())
            .map_err(|e| CodecError::Encode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
