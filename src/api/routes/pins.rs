//! Pinned channel routes.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{PinToggleRequest, PinToggleResponse, PinnedChannelDto};
use crate::api::server::AppState;
use crate::database::models::PinnedChannelDbModel;

/// Create the pins router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pins))
        .route("/toggle", post(toggle_pin))
}

/// List pinned channels, newest pin first.
async fn list_pins(State(state): State<AppState>) -> ApiResult<Json<Vec<PinnedChannelDto>>> {
    let repo = state
        .pinned_repository
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Pinned channel repository not available"))?;

    let pins = repo.get_all().await.map_err(ApiError::from)?;
    Ok(Json(pins.into_iter().map(PinnedChannelDto::from).collect()))
}

/// Pin the channel if absent, unpin it if present.
async fn toggle_pin(
    State(state): State<AppState>,
    Json(request): Json<PinToggleRequest>,
) -> ApiResult<Json<PinToggleResponse>> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(ApiError::bad_request("Missing channel url"));
    }

    let repo = state
        .pinned_repository
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Pinned channel repository not available"))?;

    let pinned = if repo.get(url).await.map_err(ApiError::from)?.is_some() {
        repo.delete(url).await.map_err(ApiError::from)?;
        false
    } else {
        let pin = PinnedChannelDbModel::new(url, request.name);
        repo.put(&pin).await.map_err(ApiError::from)?;
        true
    };

    Ok(Json(PinToggleResponse { pinned }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode, header};
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::database::repositories::SqlxPinnedChannelRepository;

    async fn test_state() -> AppState {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        crate::database::run_migrations(&pool).await.unwrap();

        AppState::new().with_pinned_repository(Arc::new(SqlxPinnedChannelRepository::new(pool)))
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .nest("/api/pins", super::router())
            .with_state(state)
    }

    async fn toggle(state: &AppState, name: &str, url: &str) -> serde_json::Value {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/pins/toggle")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({"name": name, "url": url}).to_string(),
            ))
            .unwrap();
        let response = app(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn list(state: &AppState) -> serde_json::Value {
        let request = HttpRequest::builder()
            .uri("/api/pins")
            .body(Body::empty())
            .unwrap();
        let response = app(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn pin_unpin_pin_leaves_exactly_one_entry() {
        let state = test_state().await;
        let url = "https://youtube.com/@somechannel";

        let first = toggle(&state, "Some Channel", url).await;
        assert_eq!(first["pinned"], true);

        let second = toggle(&state, "Some Channel", url).await;
        assert_eq!(second["pinned"], false);
        assert_eq!(list(&state).await.as_array().unwrap().len(), 0);

        let third = toggle(&state, "Some Channel", url).await;
        assert_eq!(third["pinned"], true);

        let pins = list(&state).await;
        let pins = pins.as_array().unwrap();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0]["url"], url);
        assert_eq!(pins[0]["name"], "Some Channel");
    }

    #[tokio::test]
    async fn toggle_without_url_is_rejected() {
        let state = test_state().await;

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/pins/toggle")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({"name": "x", "url": "  "}).to_string(),
            ))
            .unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
