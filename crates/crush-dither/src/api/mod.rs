//! Public entry point for the crush-dither crate.
//!
//! [`Engine`] owns the caches shared between runs, [`ProcessConfig`] is the
//! per-run configuration, and [`DitherError`] unifies the crate's errors.

mod config;
mod engine;
mod error;

pub use config::ProcessConfig;
pub use engine::Engine;
pub use error::DitherError;
