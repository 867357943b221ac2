use axum::response::Json;
use crush_dither::{DistanceMetric, DitherKind, ProceduralMode};
use serde::Serialize;
use utoipa::ToSchema;

/// A dither strategy id and its family
#[derive(Debug, Serialize, ToSchema)]
pub struct StrategyInfo {
    pub id: String,
    /// `none`, `error_diffusion`, `ordered` or `curve`
    pub family: String,
}

/// Response from GET /api/strategies
#[derive(Debug, Serialize, ToSchema)]
pub struct StrategiesResponse {
    /// Ids accepted by `primary` and `secondary`
    pub strategies: Vec<StrategyInfo>,
    /// Palette ids that select a procedural mode
    pub procedural: Vec<String>,
    /// Ids accepted by `distance`
    pub distance: Vec<String>,
}

/// List dither strategies, procedural modes and distance metrics
#[utoipa::path(
    get,
    path = "/api/strategies",
    responses(
        (status = 200, description = "Available strategies", body = StrategiesResponse),
    ),
    tag = "Processing"
)]
pub async fn handle_strategies() -> Json<StrategiesResponse> {
    Json(StrategiesResponse {
        strategies: DitherKind::ALL
            .iter()
            .map(|kind| StrategyInfo {
                id: kind.id().to_string(),
                family: kind.family().to_string(),
            })
            .collect(),
        procedural: ProceduralMode::ALL
            .iter()
            .map(|mode| mode.id().to_string())
            .collect(),
        distance: [DistanceMetric::Euclidean, DistanceMetric::Redmean]
            .iter()
            .map(|m| m.id().to_string())
            .collect(),
    })
}
