//! The engine: run entry point and owner of the cross-run caches.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use super::config::ProcessConfig;
use super::error::DitherError;
use crate::dither::{BlueNoise, HilbertPath, Strategy, DEFAULT_BLUE_NOISE_SEED};
use crate::palette::{resolve_palette, Palette};
use crate::pipeline::{Pipeline, Quantizer, RasterBuffer};

/// Quantization engine.
///
/// The blue-noise texture is synthesized on first use and kept for the
/// lifetime of the engine. The Hilbert path of the most recent curve run is
/// cached, so repeated runs on same-sized images skip rebuilding it.
///
/// `Engine` is `Send + Sync`; share it as `Arc<Engine>`. Runs themselves are
/// independent and may execute concurrently.
///
/// # Example
///
/// ```
/// use crush_dither::{DitherKind, Engine, ProcessConfig, RasterBuffer};
///
/// let engine = Engine::new();
/// let config = ProcessConfig::default()
///     .palette("bw")
///     .primary(DitherKind::Floyd)
///     .secondary(DitherKind::None)
///     .mix(0.0);
///
/// let image = RasterBuffer::filled(4, 4, [30, 30, 30]);
/// let out = engine.process(image, &config, None).unwrap();
/// assert_eq!(out.width(), 4);
/// ```
#[derive(Debug)]
pub struct Engine {
    blue_noise_seed: u64,
    blue_noise: OnceLock<BlueNoise>,
    hilbert: Mutex<Option<Arc<HilbertPath>>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_blue_noise_seed(DEFAULT_BLUE_NOISE_SEED)
    }

    /// Use a different seed for the blue-noise texture.
    pub fn with_blue_noise_seed(seed: u64) -> Self {
        Self {
            blue_noise_seed: seed,
            blue_noise: OnceLock::new(),
            hilbert: Mutex::new(None),
        }
    }

    pub fn blue_noise_seed(&self) -> u64 {
        self.blue_noise_seed
    }

    /// The blue-noise texture, synthesized on first call.
    pub fn blue_noise(&self) -> &BlueNoise {
        self.blue_noise.get_or_init(|| {
            tracing::debug!(seed = self.blue_noise_seed, "Synthesizing blue noise");
            BlueNoise::generate(self.blue_noise_seed)
        })
    }

    /// The Hilbert path for `width x height`, reusing the cached one if it
    /// has the same dimensions.
    ///
    /// The lock is only held to read or replace the cache entry; building a
    /// new path does not block other runs.
    pub fn hilbert_path(&self, width: u32, height: u32) -> Arc<HilbertPath> {
        if let Some(path) = self
            .lock_hilbert()
            .as_ref()
            .filter(|p| p.fits(width, height))
        {
            return Arc::clone(path);
        }

        let path = Arc::new(HilbertPath::new(width, height));
        *self.lock_hilbert() = Some(Arc::clone(&path));
        path
    }

    fn lock_hilbert(&self) -> MutexGuard<'_, Option<Arc<HilbertPath>>> {
        self.hilbert.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Quantize `buffer` with `config`.
    ///
    /// `custom` is a caller-resolved palette (e.g. an imported one); it takes
    /// precedence over the configured palette id unless that id selects a
    /// procedural mode.
    pub fn process(
        &self,
        buffer: RasterBuffer,
        config: &ProcessConfig,
        custom: Option<&Palette>,
    ) -> Result<RasterBuffer, DitherError> {
        self.process_with_progress(buffer, config, custom, |_| ControlFlow::Continue(()))
    }

    /// Like [`process`](Self::process), reporting progress to `progress`.
    ///
    /// Fractions are non-decreasing and end with `1.0`. Returning
    /// [`ControlFlow::Break`] cancels the run.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::Quantize`] with
    /// [`QuantizeError::Cancelled`](crate::QuantizeError::Cancelled) when the
    /// run is cancelled.
    pub fn process_with_progress<F>(
        &self,
        mut buffer: RasterBuffer,
        config: &ProcessConfig,
        custom: Option<&Palette>,
        progress: F,
    ) -> Result<RasterBuffer, DitherError>
    where
        F: FnMut(f32) -> ControlFlow<()>,
    {
        let resolved = resolve_palette(&config.palette, custom);
        tracing::debug!(
            width = buffer.width(),
            height = buffer.height(),
            palette = resolved.id(),
            primary = config.primary.id(),
            secondary = config.secondary.id(),
            mix = config.mix,
            amount = config.amount,
            "Starting run"
        );

        let quantizer = Quantizer::new(resolved, config.distance, config.mode_axes());
        let primary = Strategy::for_kind(config.primary, || self.blue_noise());
        let secondary = Strategy::for_kind(config.secondary, || self.blue_noise());

        let mut pipeline = Pipeline::new(
            config.tone_adjust(),
            quantizer,
            primary,
            secondary,
            config.mix,
            config.amount,
        );
        if pipeline.needs_curve() {
            pipeline = pipeline.with_path(self.hilbert_path(buffer.width(), buffer.height()));
        }

        pipeline.run(&mut buffer, progress)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::DitherKind;

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_hilbert_path_is_cached_per_size() {
        let engine = Engine::new();
        let a = engine.hilbert_path(10, 6);
        let b = engine.hilbert_path(10, 6);
        assert!(Arc::ptr_eq(&a, &b), "same size should reuse the path");

        let c = engine.hilbert_path(6, 10);
        assert!(!Arc::ptr_eq(&a, &c));
        assert!(c.fits(6, 10));
    }

    #[test]
    fn test_wide_curve_run_completes() {
        let engine = Engine::new();
        let config = ProcessConfig::default()
            .palette("bw")
            .primary(DitherKind::Riemersma)
            .secondary(DitherKind::None)
            .mix(0.0);

        let mut reports = 0;
        let out = engine
            .process_with_progress(
                RasterBuffer::filled(65536, 1, [128, 128, 128]),
                &config,
                None,
                |_| {
                    reports += 1;
                    ControlFlow::Continue(())
                },
            )
            .unwrap();

        assert_eq!((out.width(), out.height()), (65536, 1));
        assert_eq!(reports, 21);
        assert!(engine.hilbert_path(65536, 1).fits(65536, 1));
    }

    #[test]
    fn test_blue_noise_built_once() {
        let engine = Engine::with_blue_noise_seed(7);
        let a = engine.blue_noise() as *const BlueNoise;
        let b = engine.blue_noise() as *const BlueNoise;
        assert_eq!(a, b);
        assert_eq!(engine.blue_noise_seed(), 7);
    }

    #[test]
    fn test_blue_noise_not_built_without_bluenoise_strategy() {
        let engine = Engine::new();
        let config = ProcessConfig::default()
            .primary(DitherKind::Bayer4)
            .secondary(DitherKind::Floyd);
        engine
            .process(RasterBuffer::filled(3, 3, [90, 90, 90]), &config, None)
            .unwrap();
        assert!(engine.blue_noise.get().is_none());

        let config = config.secondary(DitherKind::BlueNoise);
        engine
            .process(RasterBuffer::filled(3, 3, [90, 90, 90]), &config, None)
            .unwrap();
        assert!(engine.blue_noise.get().is_some());
    }

    #[test]
    fn test_custom_palette_takes_precedence() {
        let engine = Engine::new();
        let custom = Palette::new("custom_1", vec![[0, 0, 255]]).unwrap();
        let config = ProcessConfig::default().palette("gameboy");
        let out = engine
            .process(RasterBuffer::filled(2, 2, [255, 255, 0]), &config, Some(&custom))
            .unwrap();
        assert!(out.data().chunks(4).all(|px| px == [0, 0, 255, 255]));
    }

    #[test]
    fn test_cancelled_run_reports_error() {
        let engine = Engine::new();
        let err = engine
            .process_with_progress(
                RasterBuffer::filled(8, 8, [1, 2, 3]),
                &ProcessConfig::default(),
                None,
                |_| ControlFlow::Break(()),
            )
            .unwrap_err();
        assert!(err.is_cancelled(), "{err}");
    }
}
