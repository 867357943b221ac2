//! Working RGB color type.

use std::ops::{Add, AddAssign, Mul, Sub};

use super::quantize::round_half_up;

/// Red coefficient of the Rec. 601 luma weighting.
pub const LUMA_R: f32 = 0.299;
/// Green coefficient of the Rec. 601 luma weighting.
pub const LUMA_G: f32 = 0.587;
/// Blue coefficient of the Rec. 601 luma weighting.
pub const LUMA_B: f32 = 0.114;

/// A color with real-valued channels on the 0..=255 scale.
///
/// Channels are not clamped. During error diffusion a pixel may carry
/// values below 0 or above 255; call [`clamped`](Self::clamped) or
/// [`to_bytes`](Self::to_bytes) at the output boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Rgb {
    /// Black, also the zero error.
    pub const ZERO: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// The same value on all three channels.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { r: v, g: v, b: v }
    }

    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32, g as f32, b as f32)
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from_u8(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to `[R, G, B]` bytes, rounding half up and clamping to 0..=255.
    ///
    /// # Example
    /// ```
    /// use crush_dither::Rgb;
    /// assert_eq!(Rgb::new(300.0, 127.5, -4.0).to_bytes(), [255, 128, 0]);
    /// ```
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        let c = self.clamped();
        [
            round_half_up(c.r) as u8,
            round_half_up(c.g) as u8,
            round_half_up(c.b) as u8,
        ]
    }

    /// Clamp every channel to 0..=255.
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 255.0),
            g: self.g.clamp(0.0, 255.0),
            b: self.b.clamp(0.0, 255.0),
        }
    }

    /// Rec. 601 luma of this color.
    #[inline]
    pub fn luma(self) -> f32 {
        LUMA_R * self.r + LUMA_G * self.g + LUMA_B * self.b
    }

    /// Arithmetic mean of the three channels.
    #[inline]
    pub fn mean(self) -> f32 {
        (self.r + self.g + self.b) / 3.0
    }
}

impl Add for Rgb {
    type Output = Rgb;

    #[inline]
    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Rgb {
    #[inline]
    fn add_assign(&mut self, rhs: Rgb) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
    }
}

impl Sub for Rgb {
    type Output = Rgb;

    #[inline]
    fn sub(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul<f32> for Rgb {
    type Output = Rgb;

    #[inline]
    fn mul(self, rhs: f32) -> Rgb {
        Rgb::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bytes_clamps_out_of_range() {
        let c = Rgb::new(-20.0, 255.4, 1000.0);
        assert_eq!(c.to_bytes(), [0, 255, 255]);
    }

    #[test]
    fn test_to_bytes_rounds_half_up() {
        assert_eq!(Rgb::new(0.5, 1.49, 2.5).to_bytes(), [1, 1, 3]);
    }

    #[test]
    fn test_luma_weights_sum_to_one() {
        let white = Rgb::splat(255.0);
        assert!(
            (white.luma() - 255.0).abs() < 1e-3,
            "luma of white should be 255, got {}",
            white.luma()
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Rgb::new(10.0, 20.0, 30.0);
        let b = Rgb::new(1.0, 2.0, 3.0);
        assert_eq!(a + b, Rgb::new(11.0, 22.0, 33.0));
        assert_eq!(a - b, Rgb::new(9.0, 18.0, 27.0));
        assert_eq!(b * 2.0, Rgb::new(2.0, 4.0, 6.0));

        let mut c = a;
        c += b;
        assert_eq!(c, a + b);
    }
}
