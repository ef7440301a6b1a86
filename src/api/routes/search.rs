//! Free-text search routes.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::SearchQuery;
use crate::api::server::AppState;
use crate::domain::MediaItem;

/// Create the search router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search))
}

/// Search for media by free-text query.
///
/// Short-form results are already filtered out by the extractor.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<MediaItem>>> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing search query"))?;

    let extractor = state
        .extractor
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Extractor not available"))?;

    let items = extractor.search(q).await.map_err(ApiError::from)?;
    Ok(Json(items))
}
