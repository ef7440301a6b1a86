//! Stream relay routes.
//!
//! Browser-side fetch of a time-limited, auth-embedded upstream locator can be
//! blocked by cross-origin or header policy. Routing through this relay
//! normalizes headers for the client and lets one locator be read twice (once
//! for inline playback, once for saving the payload to the library).

use axum::Router;
use axum::body::Body;
use axum::extract::{Query, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use futures::TryStreamExt;

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::ProxyQuery;
use crate::api::server::AppState;

/// Hop-by-hop headers that must not be relayed.
const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Create the proxy router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(proxy_get))
}

/// Relay an upstream byte stream: status and headers are passed through and
/// the body is streamed without buffering the whole payload.
async fn proxy_get(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
    req: Request,
) -> ApiResult<Response> {
    let raw_url = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing url"))?;

    let target = url::Url::parse(raw_url)
        .map_err(|e| ApiError::bad_request(format!("Invalid url: {e}")))?;
    match target.scheme() {
        "http" | "https" => {}
        _ => return Err(ApiError::bad_request("Only http/https URLs are allowed")),
    }

    let client = state
        .http_client
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("HTTP client not available"))?;

    // Forward the client's Range header so media elements can seek and the
    // same locator can be read more than once.
    let mut upstream_headers = reqwest::header::HeaderMap::new();
    if let Some(range) = req.headers().get(axum::http::header::RANGE) {
        upstream_headers.insert(reqwest::header::RANGE, range.clone());
    }

    let upstream = client
        .get(target)
        .headers(upstream_headers)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "proxy upstream request failed");
            ApiError::internal("Proxy request failed")
        })?;

    let status = upstream.status();

    // Pass the upstream header set through, minus hop-by-hop headers, then
    // add CORS so the player can consume the response from any origin.
    let mut out_headers = HeaderMap::new();
    for (name, value) in upstream.headers() {
        if !is_hop_by_hop(name) {
            out_headers.append(name.clone(), value.clone());
        }
    }
    out_headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    out_headers.insert(
        axum::http::header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Content-Length, Content-Range, Accept-Ranges"),
    );

    // Stream upstream body to the client as it arrives.
    let stream = upstream.bytes_stream().map_err(std::io::Error::other);
    let body = Body::from_stream(stream);

    let mut response = (status, body).into_response();
    *response.headers_mut() = out_headers;
    Ok(response)
}
