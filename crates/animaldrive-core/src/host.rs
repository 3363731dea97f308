//! Browser-facing side effects.
//!
//! The sync layer never touches the DOM itself. Notices, confirmation
//! dialogs, hard navigations, delayed tasks and the upload indicator all go
//! through [`Host`], implemented by the web app and by a recording fake in
//! tests.

use crate::models::Notice;
use crate::mutation::UploadProgress;

/// Side-effect sink for the sync layer.
pub trait Host {
    /// Show a short notification.
    fn notify(&self, notice: Notice);

    /// Ask the user to confirm a destructive action.
    fn confirm(&self, message: &str) -> bool;

    /// Full-page navigation (leaves the app).
    fn navigate(&self, url: &str);

    /// Run `task` once after `delay_ms` milliseconds.
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);

    /// Upload indicator changed.
    fn upload_progress(&self, _progress: UploadProgress) {}
}
