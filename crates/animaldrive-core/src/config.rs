//! Core configuration.
//!
//! Centralizes the backend endpoints and timing constants used by the
//! synchronization layer.

// =============================================================================
// Backend Endpoints
// =============================================================================

/// Backend API paths (relative to the store's base URL).
pub mod api {
    /// Folder listing and creation.
    pub const FOLDERS: &str = "/api/folders";
    /// File listing; also the invalidation prefix for every file read.
    pub const FILES: &str = "/api/files";
    /// Full-text file search.
    pub const SEARCH: &str = "/api/files/search";
    /// Multipart upload target.
    pub const UPLOAD: &str = "/api/files/upload";
    /// Session user lookup.
    pub const AUTH_USER: &str = "/api/auth/user";
    /// Login page (hard navigation).
    pub const LOGIN: &str = "/api/login";
    /// Logout endpoint (hard navigation).
    pub const LOGOUT: &str = "/api/logout";
}

/// Query parameter names.
pub mod params {
    pub const PARENT_ID: &str = "parentId";
    pub const FOLDER_ID: &str = "folderId";
    pub const QUERY: &str = "q";
}

/// Multipart form field carrying each uploaded file.
pub const UPLOAD_FIELD: &str = "files";

// =============================================================================
// Network Configuration
// =============================================================================

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: u32 = 10_000;

// =============================================================================
// Session Configuration
// =============================================================================

/// Delay between the "logged out" notice and the login redirect.
pub const LOGIN_REDIRECT_DELAY_MS: u32 = 500;

// =============================================================================
// Cache Configuration
// =============================================================================

/// Interval between cache sweeps.
///
/// An unsubscribed entry survives one full interval before it is evicted.
pub const CACHE_SWEEP_INTERVAL_MS: u32 = 5 * 60 * 1000;
