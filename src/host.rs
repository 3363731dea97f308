//! Browser implementation of the sync layer's [`Host`].
//!
//! Notices become toasts in the app context, confirmations use the native
//! dialog, and delayed tasks run on `gloo-timers` timeouts.

use std::cell::Cell;

use animaldrive_core::{Host, Notice, UploadProgress};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::components::toasts::Toast;
use crate::config::TOAST_LIFETIME_MS;
use crate::utils::dom;

pub struct WebHost {
    toasts: RwSignal<Vec<Toast>>,
    upload: RwSignal<UploadProgress>,
    next_toast: Cell<u64>,
}

impl WebHost {
    pub fn new(toasts: RwSignal<Vec<Toast>>, upload: RwSignal<UploadProgress>) -> Self {
        Self {
            toasts,
            upload,
            next_toast: Cell::new(0),
        }
    }
}

impl Host for WebHost {
    fn notify(&self, notice: Notice) {
        let id = self.next_toast.get();
        self.next_toast.set(id + 1);
        self.toasts.update(|t| t.push(Toast { id, notice }));

        let toasts = self.toasts;
        Timeout::new(TOAST_LIFETIME_MS, move || {
            toasts.try_update(|t| t.retain(|toast| toast.id != id));
        })
        .forget();
    }

    fn confirm(&self, message: &str) -> bool {
        dom::confirm(message)
    }

    fn navigate(&self, url: &str) {
        dom::navigate(url);
    }

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        Timeout::new(delay_ms, task).forget();
    }

    fn upload_progress(&self, progress: UploadProgress) {
        self.upload.set(progress);
    }
}
