//! Client-side synchronization layer for the AnimalDrive web app.
//!
//! This crate keeps server-held folder and file state in step with the UI:
//!
//! - [`store`] - [`RemoteFileStore`] contract and the HTTP implementation
//! - [`cache`] - [`QueryCache`] with prefix invalidation and subscriptions
//! - [`mutation`] - [`MutationCoordinator`] for create/upload/delete
//! - [`session`] - [`SessionGuard`] redirecting to login on expired sessions
//! - [`models`] - [`Folder`], [`File`], [`User`], [`NavigationState`]
//! - [`drive`] - [`Drive`], the screen controller wiring it all together
//!
//! Nothing here touches the DOM directly; browser side effects go through
//! the [`Host`] trait so the whole layer runs in native tests.

pub mod cache;
pub mod config;
pub mod drive;
pub mod error;
pub mod format;
pub mod host;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod models;
pub mod mutation;
pub mod session;
pub mod store;

pub use cache::{CacheEntry, QueryCache, QueryClient, QueryKey, Subscription};
pub use drive::{Drive, ViewSnapshot, ViewSubscription};
pub use error::DriveError;
pub use host::Host;
pub use models::{
    File, FileCategory, FileCategoryStats, FileId, FileListing, Folder, FolderId,
    NavigationState, Notice, NoticeVariant, User, ViewMode,
};
pub use mutation::{MutationCoordinator, MutationOutcome, UploadProgress};
pub use session::{SessionGuard, SessionState};
pub use store::{HttpFileStore, RemoteFileStore, StoreFuture, StoreOp, UploadBlob};
