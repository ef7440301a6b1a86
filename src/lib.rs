//! shimatube library crate.
//!
//! A small self-hosted media server: search and channel listings delegated to
//! an external `yt-dlp` process, playback-locator resolution, a streaming
//! relay, and a SQLite-backed offline library with pinned channels.

pub mod api;
pub mod database;
pub mod domain;
pub mod error;
pub mod extractor;

pub use error::{Error, Result};
