//! Playback locator resolution routes.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{WatchQuery, WatchResponse};
use crate::api::server::AppState;

/// Create the watch router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(watch))
}

/// Resolve a media identifier to a pair of playback locators.
///
/// Locators are upstream-issued and time-limited; every call re-invokes the
/// extractor, nothing is cached.
async fn watch(
    State(state): State<AppState>,
    Query(query): Query<WatchQuery>,
) -> ApiResult<Json<WatchResponse>> {
    let id = query
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing media id"))?;

    let extractor = state
        .extractor
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Extractor not available"))?;

    tracing::info!(id, "resolving playback locators");
    let tracks = extractor.resolve(id).await.map_err(ApiError::from)?;

    Ok(Json(WatchResponse {
        video_url: tracks.video_url,
        audio_url: tracks.audio_url,
        title: "video".to_string(),
    }))
}
