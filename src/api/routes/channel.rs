//! Channel listing routes.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::ChannelQuery;
use crate::api::server::AppState;
use crate::domain::MediaItem;

/// Create the channel router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(channel_listing))
}

/// List a channel's latest uploads via the extractor's flat-listing mode.
async fn channel_listing(
    State(state): State<AppState>,
    Query(query): Query<ChannelQuery>,
) -> ApiResult<Json<Vec<MediaItem>>> {
    let url = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing channel url"))?;

    let extractor = state
        .extractor
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Extractor not available"))?;

    let items = extractor.channel_listing(url).await.map_err(ApiError::from)?;
    Ok(Json(items))
}
