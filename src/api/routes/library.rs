//! Offline library routes.
//!
//! Saving fetches the locator server-side and buffers the entire payload in
//! memory before committing a single row; listing never ships payloads.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{LibraryEntrySummary, SaveToLibraryRequest};
use crate::api::server::AppState;
use crate::database::models::LibraryEntryDbModel;
use crate::domain::MediaFormat;

/// Create the library router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_library).post(save_to_library))
        .route("/{id}", delete(delete_entry))
        .route("/{id}/content", get(get_entry_content))
}

/// List saved entries, newest save first. Payloads stay in the store.
async fn list_library(State(state): State<AppState>) -> ApiResult<Json<Vec<LibraryEntrySummary>>> {
    let repo = state
        .library_repository
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Library repository not available"))?;

    let rows = repo.get_all().await.map_err(ApiError::from)?;
    Ok(Json(rows.into_iter().map(LibraryEntrySummary::from).collect()))
}

/// Save a media item for offline playback.
///
/// Overwrites any existing entry with the same media identifier.
async fn save_to_library(
    State(state): State<AppState>,
    Json(request): Json<SaveToLibraryRequest>,
) -> ApiResult<(StatusCode, Json<LibraryEntrySummary>)> {
    if request.item.video_id.trim().is_empty() {
        return Err(ApiError::bad_request("Missing media id"));
    }

    let repo = state
        .library_repository
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Library repository not available"))?;
    let client = state
        .http_client
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("HTTP client not available"))?;

    tracing::info!(id = %request.item.video_id, format = %request.format, "saving to library");

    // Whole payload buffered in memory before the row is committed.
    let payload: bytes::Bytes = client
        .get(&request.url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            tracing::error!(error = %e, "library payload fetch failed");
            ApiError::internal("Failed to fetch media payload")
        })?
        .bytes()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "library payload read failed");
            ApiError::internal("Failed to read media payload")
        })?;

    let entry = LibraryEntryDbModel::new(request.item.clone(), request.format, payload.to_vec());
    repo.put(&entry).await.map_err(ApiError::from)?;

    let summary = LibraryEntrySummary {
        item: request.item,
        format: entry.format,
        payload_size: entry.payload.len() as i64,
        saved_at: entry.saved_at,
    };
    Ok((StatusCode::CREATED, Json(summary)))
}

/// Serve a stored payload for offline playback.
async fn get_entry_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let repo = state
        .library_repository
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Library repository not available"))?;

    let entry = repo.get(&id).await.map_err(ApiError::from)?;
    let content_type = MediaFormat::parse(&entry.format)
        .map_or("application/octet-stream", |f| f.content_type());

    Ok(([(header::CONTENT_TYPE, content_type)], entry.payload).into_response())
}

/// Delete a saved entry. Deleting an absent key is a no-op.
async fn delete_entry(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let repo = state
        .library_repository
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Library repository not available"))?;

    repo.delete(&id).await.map_err(ApiError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
