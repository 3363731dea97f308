//! Data models for the drive.
//!
//! Contains domain types for:
//! - [`Folder`], [`File`] - Server records (immutable snapshots)
//! - [`User`] - The signed-in account returned by the session check
//! - [`NavigationState`], [`ViewMode`], [`FileListing`] - Screen state
//! - [`Notice`] - User-visible notifications
//! - [`FileCategoryStats`] - Per-category summary of a file listing

mod entry;
mod navigation;
mod notice;
mod stats;
mod user;

pub use entry::{File, FileId, Folder, FolderId};
pub use navigation::{FileListing, NavigationState, ViewMode};
pub use notice::{Notice, NoticeVariant};
pub use stats::{CategoryTally, FileCategory, FileCategoryStats};
pub use user::User;
