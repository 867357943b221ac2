//! Pixel buffers.
//!
//! [`RasterBuffer`] is the RGBA8 image that enters and leaves a run.
//! [`WorkingImage`] is the real-valued RGB copy the pipeline mutates while
//! error is being diffused.

use super::error::QuantizeError;
use crate::color::Rgb;

/// A row-major RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`QuantizeError::DimensionMismatch`] when `data` is not exactly
    /// `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, QuantizeError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(QuantizeError::DimensionMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with one opaque color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = std::iter::repeat([rgb[0], rgb[1], rgb[2], 255])
            .take(width as usize * height as usize)
            .flatten()
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// RGBA of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite the RGB channels at `(x, y)`, leaving alpha untouched.
    #[inline]
    pub fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

/// Real-valued RGB working copy of a [`RasterBuffer`].
///
/// Values are not clamped: diffused error may push channels outside
/// 0..=255 until the pixel is quantized.
#[derive(Debug, Clone)]
pub struct WorkingImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl WorkingImage {
    pub fn from_raster(raster: &RasterBuffer) -> Self {
        let pixels = raster
            .data()
            .chunks_exact(4)
            .map(|px| Rgb::from_u8(px[0], px[1], px[2]))
            .collect();
        Self {
            width: raster.width() as usize,
            height: raster.height() as usize,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        self.pixels[y * self.width + x] = color;
    }

    /// Add `delta` to the pixel at signed coordinates.
    ///
    /// Targets outside the image are dropped; there is no wraparound.
    #[inline]
    pub fn add_clipped(&mut self, x: i64, y: i64, delta: Rgb) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[y * self.width + x] += delta;
    }

    /// Mutable access to every pixel in row-major order.
    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }
}
