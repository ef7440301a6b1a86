//! Repository traits and sqlx implementations.

pub mod library;
pub mod pinned;

pub use library::{LibraryRepository, SqlxLibraryRepository};
pub use pinned::{PinnedChannelRepository, SqlxPinnedChannelRepository};
