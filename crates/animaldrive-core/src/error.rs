//! Error types for the synchronization layer.
//!
//! [`DriveError`] is the single error type surfaced by the remote store and
//! carried through the cache and mutation layers. It is `Clone` because one
//! failed read is fanned out to every subscriber of the key.

use thiserror::Error;

/// Errors surfaced by [`RemoteFileStore`](crate::store::RemoteFileStore) calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriveError {
    /// The request never reached the server or no response arrived.
    #[error("network error: {0}")]
    Network(String),
    /// Session missing or expired (HTTP 401/403).
    #[error("not authenticated (HTTP {status})")]
    Auth { status: u16 },
    /// The backend rejected a folder creation.
    #[error("validation failed (HTTP {status}): {message}")]
    Validation { status: u16, message: String },
    /// The backend rejected an upload.
    #[error("upload failed (HTTP {status}): {message}")]
    Upload { status: u16, message: String },
    /// The target no longer exists (HTTP 404 on delete).
    #[error("not found")]
    NotFound,
    /// Any other non-success response.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl DriveError {
    /// Whether the error means the session is gone.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Whether the error means the target is already gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
