//! Nearest-color distance metrics.
//!
//! Only the relative ordering of distances matters, so neither metric takes
//! a square root.

use serde::{Deserialize, Serialize};

use super::rgb::Rgb;

/// Distance metric used by palette matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Sum of squared channel differences.
    Euclidean,
    /// Red-mean weighted distance.
    ///
    /// Weights red and blue differences by the mean red level of the two
    /// colors, which tracks perceived difference more closely than plain
    /// Euclidean distance at negligible cost.
    #[default]
    Redmean,
}

impl DistanceMetric {
    /// Distance between a working color and a palette color.
    ///
    /// # Example
    /// ```
    /// use crush_dither::{DistanceMetric, Rgb};
    /// let red = Rgb::new(255.0, 0.0, 0.0);
    /// assert_eq!(DistanceMetric::Euclidean.distance(red, Rgb::ZERO), 65025.0);
    /// ```
    #[inline]
    pub fn distance(self, a: Rgb, b: Rgb) -> f64 {
        match self {
            DistanceMetric::Euclidean => euclidean(a, b),
            DistanceMetric::Redmean => redmean(a, b),
        }
    }

    /// Parse a metric name, accepting the two lowercase identifiers.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "euclidean" => Some(DistanceMetric::Euclidean),
            "redmean" => Some(DistanceMetric::Redmean),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Redmean => "redmean",
        }
    }
}

fn euclidean(a: Rgb, b: Rgb) -> f64 {
    let dr = f64::from(a.r - b.r);
    let dg = f64::from(a.g - b.g);
    let db = f64::from(a.b - b.b);
    dr * dr + dg * dg + db * db
}

// Red and blue terms are truncated to integers and shifted right by 8,
// matching the classic integer formulation of the metric.
fn redmean(a: Rgb, b: Rgb) -> f64 {
    let r_mean = f64::from(a.r + b.r) / 2.0;
    let dr = f64::from(a.r - b.r);
    let dg = f64::from(a.g - b.g);
    let db = f64::from(a.b - b.b);

    let red = (((512.0 + r_mean) * dr * dr) as i64) >> 8;
    let blue = (((767.0 - r_mean) * db * db) as i64) >> 8;
    red as f64 + 4.0 * dg * dg + blue as f64
}
