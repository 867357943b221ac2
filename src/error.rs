use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crush_dither::{DitherError, PaletteError, QuantizeError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid image: {0}")]
    Codec(#[from] CodecError),

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Superseded by a newer request")]
    Superseded,

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DitherError> for ApiError {
    fn from(e: DitherError) -> Self {
        match e {
            DitherError::Palette(e) => ApiError::Palette(e),
            DitherError::Quantize(QuantizeError::Cancelled) => ApiError::Superseded,
            DitherError::Quantize(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("PNG decode error: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Image too large: {pixels} pixels (max {max})")]
    TooLarge { pixels: u64, max: u64 },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Codec(CodecError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Codec(CodecError::Decode(_)) => StatusCode::BAD_REQUEST,
            ApiError::Codec(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Palette(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Superseded => StatusCode::CONFLICT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_superseded() {
        let error = ApiError::Superseded;
        assert_eq!(error.to_string(), "Superseded by a newer request");
    }

    #[test]
    fn test_api_error_not_found() {
        assert_eq!(ApiError::NotFound.to_string(), "Not found");
    }

    #[test]
    fn test_codec_error_too_large() {
        let error = CodecError::TooLarge {
            pixels: 20_000_000,
            max: 16_777_216,
        };
        assert_eq!(
            error.to_string(),
            "Image too large: 20000000 pixels (max 16777216)"
        );
    }

    #[test]
    fn test_api_error_from_palette_error() {
        let api_error: ApiError = PaletteError::NoValidColors.into();
        match api_error {
            ApiError::Palette(PaletteError::NoValidColors) => {}
            other => panic!("Expected Palette variant, got {other:?}"),
        }
    }

    #[test]
    fn test_cancelled_run_maps_to_superseded() {
        let api_error: ApiError = DitherError::Quantize(QuantizeError::Cancelled).into();
        assert!(matches!(api_error, ApiError::Superseded));
    }

    #[test]
    fn test_api_error_into_response_status_codes() {
        let response = ApiError::Codec(CodecError::Decode("bad".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Codec(CodecError::Encode("bad".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError::Codec(CodecError::TooLarge { pixels: 2, max: 1 }).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let response = ApiError::Palette(PaletteError::NoOpaqueColors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = ApiError::Superseded.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
