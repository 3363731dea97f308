//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use animaldrive_core::UploadBlob;
use web_sys::{FileList, Window};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Native confirmation dialog. A missing window or a blocked dialog counts
/// as "no".
pub fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Native text prompt. `None` when cancelled.
pub fn prompt(message: &str) -> Option<String> {
    window()?.prompt_with_message(message).ok()?
}

/// Full-page navigation.
pub fn navigate(url: &str) {
    let Some(window) = window() else {
        return;
    };
    if let Err(e) = window.location().set_href(url) {
        log::error!("navigation to {} failed: {:?}", url, e);
    }
}

/// Files picked in an input or dropped on the page, ready for upload.
pub fn upload_blobs(list: Option<FileList>) -> Vec<UploadBlob> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(UploadBlob::from_file)
        .collect()
}
