//! Uniform-step channel quantization.

/// Round to the nearest integer, with halves going toward +infinity.
///
/// `f32::round` rounds halves away from zero, which would move `-0.5` to
/// `-1`. Nearest-color cache keys and output bytes use this variant instead.
#[inline]
pub fn round_half_up(v: f32) -> f32 {
    (v + 0.5).floor()
}

/// Snap a 0..=255 channel value onto `steps` evenly spaced levels.
///
/// The step size is `255 / (steps - 1)`. The value is rounded to the nearest
/// multiple of the step, then floored to an integer. `steps` below 2 is
/// treated as 2, and fractional step counts are accepted. A fractional step
/// count can round past the top level, so the result is capped at 255.
///
/// # Example
/// ```
/// use crush_dither::quantize_val;
/// assert_eq!(quantize_val(100.0, 2.0), 0.0);
/// assert_eq!(quantize_val(200.0, 2.0), 255.0);
/// assert_eq!(quantize_val(100.0, 3.0), 127.0);
/// ```
pub fn quantize_val(v: f32, steps: f32) -> f32 {
    let steps = f64::from(steps.max(2.0));
    let step_size = 255.0 / (steps - 1.0);
    let snapped = (f64::from(v) / step_size + 0.5).floor() * step_size;
    snapped.floor().min(255.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_steps_is_binary() {
        for v in 0..=255 {
            let q = quantize_val(v as f32, 2.0);
            assert!(
                q == 0.0 || q == 255.0,
                "quantize_val({v}, 2) should be 0 or 255, got {q}"
            );
        }
    }

    #[test]
    fn test_steps_below_two_clamp() {
        assert_eq!(quantize_val(200.0, 0.0), quantize_val(200.0, 2.0));
        assert_eq!(quantize_val(60.0, -5.0), quantize_val(60.0, 2.0));
    }

    #[test]
    fn test_endpoints_preserved() {
        for steps in [2.0, 3.0, 4.0, 8.0, 16.0, 256.0] {
            assert_eq!(quantize_val(0.0, steps), 0.0, "0 with {steps} steps");
            assert_eq!(quantize_val(255.0, steps), 255.0, "255 with {steps} steps");
        }
    }

    #[test]
    fn test_256_steps_is_identity() {
        for v in 0..=255 {
            assert_eq!(quantize_val(v as f32, 256.0), v as f32);
        }
    }

    #[test]
    fn test_fractional_steps() {
        // 2.5 steps: step size 170
        assert_eq!(quantize_val(90.0, 2.5), 170.0);
        assert_eq!(quantize_val(80.0, 2.5), 0.0);
        assert_eq!(quantize_val(255.0, 2.5), 255.0, "capped at the top level");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(0.5), 1.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(2.49), 2.0);
    }
}
