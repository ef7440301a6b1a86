//! API route modules.
//!
//! Organizes routes by resource type.

pub mod channel;
pub mod health;
pub mod library;
pub mod pins;
pub mod proxy;
pub mod search;
pub mod watch;

use axum::Router;

use crate::api::server::AppState;

/// Create the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/search", search::router())
        .nest("/api/channel", channel::router())
        .nest("/api/watch", watch::router())
        .nest("/api/proxy", proxy::router())
        .nest("/api/library", library::router())
        .nest("/api/pins", pins::router())
        .nest("/health", health::router())
        .with_state(state)
}
