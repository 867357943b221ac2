use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use crush_dither::{DistanceMetric, DitherKind, ProcessConfig};
use serde::Deserialize;
use utoipa::IntoParams;

use super::headers::HeaderMapExt;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::{decode_png, encode_png, RunOutcome};

/// Per-request overrides of the configured processing defaults
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProcessQuery {
    /// Palette id: built-in, `auto{N}`, `math_*`, or an imported/configured palette
    pub palette: Option<String>,
    /// Primary dither strategy id
    pub primary: Option<String>,
    /// Secondary dither strategy id
    pub secondary: Option<String>,
    /// Weight of the secondary strategy (0..1)
    pub mix: Option<f32>,
    /// Dither strength (0..1)
    pub amount: Option<f32>,
    /// Contrast (-255..255)
    pub contrast: Option<f32>,
    /// Brightness offset
    pub brightness: Option<f32>,
    /// Saturation percent (100 = unchanged)
    pub saturation: Option<f32>,
    /// First procedural mode parameter
    pub axis1: Option<f32>,
    /// Second procedural mode parameter
    pub axis2: Option<f32>,
    /// Third procedural mode parameter
    pub axis3: Option<f32>,
    /// Distance metric: `euclidean` or `redmean`
    pub distance: Option<String>,
}

impl ProcessQuery {
    /// Apply the overrides on top of `defaults`.
    ///
    /// Unknown strategy ids become `none`; an unknown distance metric keeps
    /// the default.
    pub fn apply(self, defaults: &ProcessConfig) -> ProcessConfig {
        let mut config = defaults.clone();
        if let Some(palette) = self.palette {
            config.palette = palette;
        }
        if let Some(id) = self.primary {
            config.primary = DitherKind::from_id(&id);
        }
        if let Some(id) = self.secondary {
            config.secondary = DitherKind::from_id(&id);
        }
        if let Some(metric) = self.distance.as_deref().and_then(DistanceMetric::from_id) {
            config.distance = metric;
        }

        let numbers = [
            (self.mix, &mut config.mix),
            (self.amount, &mut config.amount),
            (self.contrast, &mut config.contrast),
            (self.brightness, &mut config.brightness),
            (self.saturation, &mut config.saturation),
            (self.axis1, &mut config.axis1),
            (self.axis2, &mut config.axis2),
            (self.axis3, &mut config.axis3),
        ];
        for (value, field) in numbers {
            if let Some(v) = value.filter(|v| v.is_finite()) {
                *field = v;
            }
        }
        config
    }
}

/// Quantize and dither a PNG image
///
/// The request body is a PNG; the response is the processed PNG with the
/// same dimensions and alpha channel. A newer request on the same session
/// supersedes this one, which then fails with 409.
#[utoipa::path(
    post,
    path = "/api/process",
    request_body(content = [u8], content_type = "image/png", description = "PNG image"),
    responses(
        (status = 200, description = "Processed image", content_type = "image/png"),
        (status = 400, description = "Body is not a decodable PNG"),
        (status = 409, description = "Superseded by a newer request on the same session"),
        (status = 413, description = "Image exceeds the configured pixel limit"),
    ),
    params(
        ProcessQuery,
        ("X-Session" = Option<String>, Header, description = "Session key (default: 'default')"),
    ),
    tag = "Processing"
)]
pub async fn handle_process(
    State(state): State<AppState>,
    Query(query): Query<ProcessQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let session = headers.session_key();
    let image = decode_png(&body, state.config.max_pixels)?;
    let config = query.apply(&state.config.defaults);
    let custom = state
        .palettes
        .find(&config.palette)
        .await
        .map(|stored| stored.palette);

    tracing::info!(
        session = %session,
        width = image.width(),
        height = image.height(),
        palette = %config.palette,
        primary = config.primary.id(),
        secondary = config.secondary.id(),
        "Process request received"
    );

    let supervisor = state.sessions.get_or_create(&session).await;
    match supervisor.submit(image, config, custom).await? {
        RunOutcome::Completed(buffer) => {
            let png = encode_png(&buffer)?;
            Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
        }
        RunOutcome::Superseded => Err(ApiError::Superseded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_keeps_defaults() {
        let defaults = ProcessConfig::default().palette("c64");
        assert_eq!(ProcessQuery::default().apply(&defaults), defaults);
    }

    #[test]
    fn test_query_overrides() {
        let query = ProcessQuery {
            palette: Some("math_bitcrush".into()),
            primary: Some("riemersma".into()),
            secondary: Some("sparkle".into()),
            mix: Some(0.9),
            axis2: Some(12.0),
            distance: Some("euclidean".into()),
            ..Default::default()
        };
        let config = query.apply(&ProcessConfig::default());

        assert_eq!(config.palette, "math_bitcrush");
        assert_eq!(config.primary, DitherKind::Riemersma);
        assert_eq!(config.secondary, DitherKind::None);
        assert_eq!(config.mix, 0.9);
        assert_eq!(config.axis2, 12.0);
        assert_eq!(config.axis1, 8.0);
        assert_eq!(config.distance, DistanceMetric::Euclidean);
    }

    #[test]
    fn test_unknown_distance_keeps_default() {
        let query = ProcessQuery {
            distance: Some("manhattan".into()),
            amount: Some(f32::NAN),
            ..Default::default()
        };
        let config = query.apply(&ProcessConfig::default());
        assert_eq!(config.distance, DistanceMetric::Redmean);
        assert_eq!(config.amount, 0.5);
    }
}
