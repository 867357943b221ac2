use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use crush_dither::{
    builtin, parse_hex_list, resolve_palette, sample_image_colors, ResolvedPalette, BUILTIN_IDS,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::server::AppState;
use crate::services::{decode_png, PaletteSource, StoredPalette};

/// Synthetic palettes advertised in listings.
const AUTO_IDS: [&str; 3] = ["auto8", "auto16", "auto32"];

/// Summary of one palette
#[derive(Debug, Serialize, ToSchema)]
pub struct PaletteInfo {
    /// Id to pass as `palette`
    pub id: String,
    /// Number of colors
    pub size: usize,
    /// `builtin`, `auto`, `config`, `hex_list` or `image`
    pub kind: String,
    /// Display name given at import
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Response from GET /api/palettes
#[derive(Debug, Serialize, ToSchema)]
pub struct PaletteListResponse {
    pub palettes: Vec<PaletteInfo>,
}

/// A palette with its colors
#[derive(Debug, Serialize, ToSchema)]
pub struct PaletteResponse {
    pub id: String,
    /// Colors as `#RRGGBB`
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PaletteSource>,
}

impl From<StoredPalette> for PaletteResponse {
    fn from(stored: StoredPalette) -> Self {
        Self {
            id: stored.id().to_string(),
            colors: stored.palette.to_hex_strings(),
            name: stored.name,
            source: Some(stored.source),
        }
    }
}

/// Query parameters for palette import
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImportQuery {
    /// Optional display name
    pub name: Option<String>,
}

/// List available palettes
///
/// Built-in, synthetic `auto{N}`, configured and imported palettes.
/// Procedural modes are listed by `/api/strategies`.
#[utoipa::path(
    get,
    path = "/api/palettes",
    responses(
        (status = 200, description = "Available palettes", body = PaletteListResponse),
    ),
    tag = "Palettes"
)]
pub async fn handle_list_palettes(State(state): State<AppState>) -> Json<PaletteListResponse> {
    let mut palettes: Vec<PaletteInfo> = BUILTIN_IDS
        .iter()
        .filter_map(|id| builtin(id))
        .map(|p| PaletteInfo {
            id: p.id().to_string(),
            size: p.len(),
            kind: "builtin".to_string(),
            name: None,
        })
        .collect();

    for id in AUTO_IDS {
        if let ResolvedPalette::Palette(p) = resolve_palette(id, None) {
            palettes.push(PaletteInfo {
                id: id.to_string(),
                size: p.len(),
                kind: "auto".to_string(),
                name: None,
            });
        }
    }

    for stored in state.palettes.list().await {
        palettes.push(PaletteInfo {
            id: stored.id().to_string(),
            size: stored.palette.len(),
            kind: stored.source.as_str().to_string(),
            name: stored.name,
        });
    }

    Json(PaletteListResponse { palettes })
}

/// Get the colors of one palette
#[utoipa::path(
    get,
    path = "/api/palettes/{id}",
    responses(
        (status = 200, description = "Palette colors", body = PaletteResponse),
        (status = 404, description = "No such palette"),
    ),
    params(("id" = String, Path, description = "Palette id")),
    tag = "Palettes"
)]
pub async fn handle_get_palette(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaletteResponse>, ApiError> {
    if let Some(stored) = state.palettes.find(&id).await {
        return Ok(Json(stored.into()));
    }

    let palette = if id.starts_with("auto") {
        match resolve_palette(&id, None) {
            ResolvedPalette::Palette(p) => Some(p),
            ResolvedPalette::Procedural(_) => None,
        }
    } else {
        builtin(&id)
    };

    palette
        .map(|p| {
            Json(PaletteResponse {
                id: p.id().to_string(),
                colors: p.to_hex_strings(),
                name: None,
                source: None,
            })
        })
        .ok_or(ApiError::NotFound)
}

/// Import a palette from a hex color list
///
/// One color per line as `#RRGGBB` or `RRGGBB`. Empty lines, lines starting
/// with `;` or `//`, and anything else that does not parse are skipped.
#[utoipa::path(
    post,
    path = "/api/palettes/hex",
    request_body(content = String, content_type = "text/plain", description = "Hex color list"),
    responses(
        (status = 201, description = "Palette imported", body = PaletteResponse),
        (status = 422, description = "No valid colors found"),
    ),
    params(ImportQuery),
    tag = "Palettes"
)]
pub async fn handle_import_hex(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let colors = parse_hex_list(&body)?;
    let stored = state
        .palettes
        .import(query.name, colors, PaletteSource::HexList)
        .await?;
    Ok((StatusCode::CREATED, Json(PaletteResponse::from(stored))))
}

/// Import a palette by sampling the colors of an image
///
/// Samples at most about 100,000 pixels, ignores pixels with alpha below
/// 128, and keeps up to 256 distinct colors in first-seen order.
#[utoipa::path(
    post,
    path = "/api/palettes/image",
    request_body(content = [u8], content_type = "image/png", description = "PNG image"),
    responses(
        (status = 201, description = "Palette imported", body = PaletteResponse),
        (status = 400, description = "Body is not a decodable PNG"),
        (status = 422, description = "Image has no opaque pixels"),
    ),
    params(ImportQuery),
    tag = "Palettes"
)]
pub async fn handle_import_image(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let image = decode_png(&body, state.config.max_pixels)?;
    let colors = sample_image_colors(image.data(), image.width(), image.height())?;
    let stored = state
        .palettes
        .import(query.name, colors, PaletteSource::Image)
        .await?;
    Ok((StatusCode::CREATED, Json(PaletteResponse::from(stored))))
}
