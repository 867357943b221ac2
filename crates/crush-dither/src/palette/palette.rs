//! Palette type and nearest-color search.

use std::fmt::Write as _;

use super::cache::NearestColorCache;
use super::error::PaletteError;
use crate::color::{DistanceMetric, Rgb};

/// Result of a nearest-color search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestMatch {
    /// Index of the chosen palette entry
    pub index: usize,
    /// Distance under the metric used for the search
    pub distance: f64,
    /// Number of palette entries examined before the search stopped
    pub scanned: usize,
}

/// An ordered, non-empty list of palette colors.
///
/// Duplicate entries are allowed: some synthetic palettes are built by
/// concatenating smaller ones. Nearest-color ties always resolve to the
/// first occurrence.
///
/// # Example
///
/// ```
/// use crush_dither::{DistanceMetric, Palette, Rgb};
///
/// let palette = Palette::new("bw", vec![[0, 0, 0], [255, 255, 255]]).unwrap();
/// let hit = palette.find_nearest(Rgb::new(200.0, 180.0, 190.0), DistanceMetric::Euclidean);
/// assert_eq!(hit.index, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    id: String,
    colors: Vec<[u8; 3]>,
}

impl Palette {
    /// Create a palette from a list of colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::EmptyPalette`] when `colors` is empty.
    pub fn new(id: impl Into<String>, colors: Vec<[u8; 3]>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self {
            id: id.into(),
            colors,
        })
    }

    /// Wrap a color list that is non-empty by construction.
    pub(crate) fn from_known(id: impl Into<String>, colors: Vec<[u8; 3]>) -> Self {
        debug_assert!(!colors.is_empty(), "built-in palettes are never empty");
        Self {
            id: id.into(),
            colors,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Number of entries, duplicates included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Color at `index` as a working color.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn color(&self, index: usize) -> Rgb {
        Rgb::from_bytes(self.colors[index])
    }

    /// Return a copy under a different id.
    pub fn renamed(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            colors: self.colors.clone(),
        }
    }

    /// Find the palette entry closest to `color`.
    ///
    /// Scans the whole palette, keeping the first entry whose distance is
    /// strictly smaller than the best so far. Stops early on an exact match.
    pub fn find_nearest(&self, color: Rgb, metric: DistanceMetric) -> NearestMatch {
        let mut best = NearestMatch {
            index: 0,
            distance: f64::INFINITY,
            scanned: 0,
        };

        for (i, &entry) in self.colors.iter().enumerate() {
            best.scanned = i + 1;
            let d = metric.distance(color, Rgb::from_bytes(entry));
            if d < best.distance {
                best.index = i;
                best.distance = d;
                if d == 0.0 {
                    break;
                }
            }
        }

        best
    }

    /// [`find_nearest`](Self::find_nearest) memoized through `cache`.
    ///
    /// The cache key is the working color rounded per channel, so colors
    /// that round to the same integer triple share a result.
    pub fn find_nearest_cached(
        &self,
        color: Rgb,
        metric: DistanceMetric,
        cache: &mut NearestColorCache,
    ) -> usize {
        let key = NearestColorCache::key(color);
        if let Some(index) = cache.get(key) {
            return index;
        }
        let index = self.find_nearest(color, metric).index;
        cache.insert(key, index);
        index
    }

    /// Colors as `#RRGGBB` strings.
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.colors
            .iter()
            .map(|[r, g, b]| {
                let mut s = String::with_capacity(7);
                let _ = write!(s, "#{r:02X}{g:02X}{b:02X}");
                s
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw() -> Palette {
        Palette::new("bw", vec![[0, 0, 0], [255, 255, 255]]).unwrap()
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert_eq!(
            Palette::new("empty", vec![]).unwrap_err(),
            PaletteError::EmptyPalette
        );
    }

    #[test]
    fn test_red_maps_to_black_with_euclidean() {
        let hit = bw().find_nearest(Rgb::new(255.0, 0.0, 0.0), DistanceMetric::Euclidean);
        assert_eq!(hit.index, 0, "red is closer to black than to white");
        assert_eq!(hit.distance, 65025.0);
    }

    #[test]
    fn test_exact_match_exits_early() {
        let palette = Palette::new(
            "p",
            vec![[10, 10, 10], [50, 50, 50], [90, 90, 90], [130, 130, 130]],
        )
        .unwrap();
        let hit = palette.find_nearest(Rgb::splat(50.0), DistanceMetric::Redmean);
        assert_eq!(hit.index, 1);
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.scanned, 2, "search should stop at the exact match");
    }

    #[test]
    fn test_ties_go_to_first_occurrence() {
        let palette = Palette::new("dup", vec![[0, 0, 0], [100, 100, 100], [0, 0, 0]]).unwrap();
        let hit = palette.find_nearest(Rgb::splat(10.0), DistanceMetric::Euclidean);
        assert_eq!(hit.index, 0);

        let equidistant = Palette::new("eq", vec![[0, 0, 0], [20, 20, 20]]).unwrap();
        let hit = equidistant.find_nearest(Rgb::splat(10.0), DistanceMetric::Euclidean);
        assert_eq!(hit.index, 0, "equal distances keep the first entry");
    }

    #[test]
    fn test_cached_search_matches_uncached() {
        let palette = bw();
        let mut cache = NearestColorCache::new();
        let c = Rgb::new(140.2, 130.0, 120.0);
        let first = palette.find_nearest_cached(c, DistanceMetric::Euclidean, &mut cache);
        let second = palette.find_nearest_cached(c, DistanceMetric::Euclidean, &mut cache);
        assert_eq!(first, second);
        assert_eq!(first, palette.find_nearest(c, DistanceMetric::Euclidean).index);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_to_hex_strings() {
        let palette = Palette::new("p", vec![[0, 0, 0], [255, 85, 10]]).unwrap();
        assert_eq!(palette.to_hex_strings(), vec!["#000000", "#FF550A"]);
    }
}
