//! Per-run memo of nearest-color results.

use std::collections::HashMap;

use crate::color::{round_half_up, Rgb};

/// Memo from a rounded working color to a palette index.
///
/// A cache is created empty for every run and dropped with it. It must not
/// outlive the palette and metric it was filled with.
#[derive(Debug, Default)]
pub struct NearestColorCache {
    entries: HashMap<(i32, i32, i32), usize>,
}

impl NearestColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for a working color: each channel rounded half up.
    #[inline]
    pub fn key(color: Rgb) -> (i32, i32, i32) {
        (
            round_half_up(color.r) as i32,
            round_half_up(color.g) as i32,
            round_half_up(color.b) as i32,
        )
    }

    #[inline]
    pub fn get(&self, key: (i32, i32, i32)) -> Option<usize> {
        self.entries.get(&key).copied()
    }

    #[inline]
    pub fn insert(&mut self, key: (i32, i32, i32), index: usize) {
        self.entries.insert(key, index);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
