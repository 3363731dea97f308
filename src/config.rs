//! Application configuration.
//!
//! Centralizes the constants of the web shell. Backend endpoints and sync
//! timing live in `animaldrive_core::config`.

use log::LevelFilter;

// =============================================================================
// Application Metadata
// =============================================================================

/// Product name shown in the header.
pub const APP_NAME: &str = "AnimalDrive";

/// Id of the element the app mounts into.
pub const MOUNT_ELEMENT_ID: &str = "app";

// =============================================================================
// Logging
// =============================================================================

/// Most verbose level forwarded to the browser console.
pub const LOG_LEVEL: LevelFilter = if cfg!(debug_assertions) {
    LevelFilter::Debug
} else {
    LevelFilter::Info
};

// =============================================================================
// UI Configuration
// =============================================================================

/// How long a notice stays on screen.
pub const TOAST_LIFETIME_MS: u32 = 4_000;

/// Question asked when creating a folder.
pub const NEW_FOLDER_PROMPT: &str = "Enter folder name:";

/// Placeholder of the search box.
pub const SEARCH_PLACEHOLDER: &str = "Search your files...";

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
/// Change this value to switch icon styles globally.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;
