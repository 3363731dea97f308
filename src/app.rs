//! Root application module.
//!
//! Contains the main App component, the AppContext definition and the
//! wiring between the reactive UI and the sync layer.

use std::rc::Rc;

use animaldrive_core::config::CACHE_SWEEP_INTERVAL_MS;
use animaldrive_core::{
    CacheEntry, Drive, File, Folder, HttpFileStore, NavigationState, UploadBlob, UploadProgress,
    User, ViewSubscription,
};
use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use crate::components::Explorer;
use crate::components::toasts::{Toast, ToastStack};
use crate::host::WebHost;

// ============================================================================
// Session phase
// ============================================================================

/// Where the page is in its session lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionPhase {
    /// Waiting for the session check
    Checking,
    /// Signed in
    Ready(User),
    /// No session; the login redirect is pending
    SignedOut,
    /// The check could not reach the server
    Unavailable,
}

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree and read by every component
/// through `use_context::<AppContext>()`. All fields are signals or stored
/// values, so the context is `Copy`.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Sync layer (store, caches, mutations)
    pub drive: StoredValue<Rc<Drive>, LocalStorage>,
    pub session: RwSignal<SessionPhase>,
    pub nav: RwSignal<NavigationState>,
    /// Folder listing of the current folder
    pub folders: RwSignal<CacheEntry<Folder>>,
    /// Listing or search results, whichever is active
    pub files: RwSignal<CacheEntry<File>>,
    pub toasts: RwSignal<Vec<Toast>>,
    pub upload: RwSignal<UploadProgress>,
}

impl AppContext {
    pub fn new() -> Self {
        let toasts = RwSignal::new(Vec::new());
        let upload = RwSignal::new(UploadProgress::Idle);

        let host = Rc::new(WebHost::new(toasts, upload));
        let store = Rc::new(HttpFileStore::default());
        let drive = Rc::new(Drive::new(store, host));

        Self {
            drive: StoredValue::new_local(drive),
            session: RwSignal::new(SessionPhase::Checking),
            nav: RwSignal::new(NavigationState::new()),
            folders: RwSignal::new(CacheEntry::default()),
            files: RwSignal::new(CacheEntry::default()),
            toasts,
            upload,
        }
    }

    pub fn user(&self) -> Option<User> {
        match self.session.get() {
            SessionPhase::Ready(user) => Some(user),
            _ => None,
        }
    }

    /// Current view is waiting on the server.
    pub fn is_loading(&self) -> bool {
        let folders = self.folders.with(|e| e.is_loading && !e.is_fetched);
        let files = self.files.with(|e| e.is_loading && !e.is_fetched);
        folders || files
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    pub fn create_folder(&self, name: String) {
        let drive = self.drive.get_value();
        let nav = self.nav.get_untracked();
        spawn_local(async move {
            drive.create_folder(&nav, &name).await;
        });
    }

    /// Upload into the current folder; `on_complete` runs after success.
    pub fn upload_files(&self, files: Vec<UploadBlob>, on_complete: impl FnOnce() + 'static) {
        let drive = self.drive.get_value();
        let nav = self.nav.get_untracked();
        spawn_local(async move {
            drive.upload_files(&nav, files, on_complete).await;
        });
    }

    pub fn delete_file(&self, file: File) {
        let drive = self.drive.get_value();
        spawn_local(async move {
            drive.delete_file(&file).await;
        });
    }

    /// Close the preview and delete its file.
    pub fn delete_from_preview(&self) {
        let mut target = None;
        self.nav.update(|n| target = n.delete_from_preview());
        if let Some(file) = target {
            self.delete_file(file);
        }
    }

    pub fn logout(&self) {
        self.session.set(SessionPhase::SignedOut);
        self.drive.get_value().logout();
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// Run the session check. Started once at startup and again from the
/// retry button.
fn check_session(ctx: AppContext) {
    let drive = ctx.drive.get_value();
    ctx.session.set(SessionPhase::Checking);
    spawn_local(async move {
        let phase = match drive.check_session().await {
            Ok(user) => SessionPhase::Ready(user),
            Err(err) if err.is_auth() => SessionPhase::SignedOut,
            Err(_) => SessionPhase::Unavailable,
        };
        ctx.session.set(phase);
    });
}

/// Keep `folders`/`files` in step with the reads behind the navigation
/// state. Each folder or query change swaps the cache subscription and
/// loads the new view.
fn sync_view(ctx: AppContext) {
    let watch: StoredValue<Option<ViewSubscription>, LocalStorage> = StoredValue::new_local(None);

    let view_params = Memo::new(move |_| {
        ctx.nav
            .with(|n| (n.current_folder_id, n.search_query.clone()))
    });
    let signed_in = Memo::new(move |_| matches!(ctx.session.get(), SessionPhase::Ready(_)));

    Effect::new(move |_| {
        let _ = view_params.get();
        if !signed_in.get() {
            return;
        }

        let nav = ctx.nav.get_untracked();
        let drive = ctx.drive.get_value();
        let (folders, files) = (ctx.folders, ctx.files);
        let subscription = drive.watch_view(
            &nav,
            move |entry| folders.set(entry.clone()),
            move |entry| files.set(entry.clone()),
        );
        // Replacing the old subscription drops it
        watch.set_value(Some(subscription));

        spawn_local(async move {
            let view = drive.load_view(&nav).await;
            debug!(
                "view: {} folder(s), {} file(s)",
                view.folders.len(),
                view.files.len()
            );
        });
    });
}

/// Sweep idle cache entries for the lifetime of the page.
fn start_cache_sweeps(ctx: AppContext) {
    let drive = ctx.drive.get_value();
    Interval::new(CACHE_SWEEP_INTERVAL_MS, move || {
        let evicted = drive.sweep();
        if evicted > 0 {
            debug!("cache sweep evicted {} entries", evicted);
        }
    })
    .forget();
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Starts the session check, view sync and cache sweeps
/// - Renders the explorer once the session is known
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    check_session(ctx);
    sync_view(ctx);
    start_cache_sweeps(ctx);

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div class="app-error">
                    <h1>"Something went wrong"</h1>
                    <p>"An unexpected error occurred. Please try reloading the page."</p>
                    <ul>
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                    <button on:click=move |_| {
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().reload();
                        }
                    }>
                        "Reload Page"
                    </button>
                </div>
            }
        >
            {move || match ctx.session.get() {
                SessionPhase::Ready(_) => view! { <Explorer /> }.into_any(),
                SessionPhase::Unavailable => view! {
                    <div class="app-loading">
                        <span class="app-loading-badge">"🦊"</span>
                        <p>"Could not reach the server."</p>
                        <button class="app-retry" on:click=move |_| check_session(ctx)>
                            "Try again"
                        </button>
                    </div>
                }
                .into_any(),
                _ => view! {
                    <div class="app-loading">
                        <span class="app-loading-badge">"🦊"</span>
                        <p>"Loading..."</p>
                    </div>
                }
                .into_any(),
            }}
            <ToastStack />
        </ErrorBoundary>
    }
}
