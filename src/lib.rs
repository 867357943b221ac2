//! Pixelcrush - color quantization and dithering service
//!
//! HTTP and CLI front end for the `crush-dither` engine.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
