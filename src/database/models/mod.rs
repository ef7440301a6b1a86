//! Database models.

pub mod library;
pub mod pinned;

pub use library::{LibraryEntryDbModel, LibraryEntrySummaryRow};
pub use pinned::PinnedChannelDbModel;
