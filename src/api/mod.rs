//! HTTP API layer.

pub mod error;
pub mod models;
pub mod routes;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerConfig, AppState};
