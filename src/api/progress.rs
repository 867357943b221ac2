use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures_util::stream::Stream;
use serde::Serialize;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::server::AppState;

/// Response from cancelling a session's run
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelResponse {
    pub session: String,
    /// Generation that is now current; no run holds it
    pub generation: u64,
}

/// Stream progress events of a session
///
/// Server-sent events named `progress`, `completed` and `superseded`, each
/// carrying a JSON [`ProgressEvent`](crate::services::ProgressEvent).
#[utoipa::path(
    get,
    path = "/api/sessions/{session}/progress",
    responses(
        (status = 200, description = "Event stream", content_type = "text/event-stream"),
        (status = 404, description = "Unknown session"),
    ),
    params(("session" = String, Path, description = "Session key")),
    tag = "Processing"
)]
pub async fn handle_progress(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let rx = state
        .sessions
        .get(&session)
        .await
        .ok_or(ApiError::NotFound)?
        .subscribe();

    let stream = BroadcastStream::new(rx).map(|result| match result {
        Ok(event) => Ok(Event::default()
            .event(event.name())
            .data(serde_json::to_string(&event).unwrap_or_default())),
        // Lagged - tell the client it missed events
        Err(_) => Ok(Event::default().event("lagged").data("lagged")),
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Cancel the running request of a session
///
/// The in-flight request, if any, fails with 409.
#[utoipa::path(
    delete,
    path = "/api/sessions/{session}/run",
    responses(
        (status = 200, description = "Run cancelled", body = CancelResponse),
        (status = 404, description = "Unknown session"),
    ),
    params(("session" = String, Path, description = "Session key")),
    tag = "Processing"
)]
pub async fn handle_cancel(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<Json<CancelResponse>, ApiError> {
    let supervisor = state
        .sessions
        .get(&session)
        .await
        .ok_or(ApiError::NotFound)?;
    let generation = supervisor.supersede();
    tracing::info!(session = %session, generation, "Run cancelled");
    Ok(Json(CancelResponse {
        session,
        generation,
    }))
}
