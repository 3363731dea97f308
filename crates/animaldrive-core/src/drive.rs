//! Screen controller for the drive.
//!
//! [`Drive`] owns the store, the caches, the session guard and the mutation
//! coordinator, and exposes them in the terms the screen thinks in: a
//! [`NavigationState`] goes in, folders and files come out.

use std::rc::Rc;

use futures::join;
use log::{info, warn};

use crate::cache::{CacheEntry, Loader, QueryCache, QueryClient, QueryKey, Subscription};
use crate::error::DriveError;
use crate::host::Host;
use crate::models::{File, FileListing, Folder, FolderId, NavigationState, Notice, User};
use crate::mutation::{MutationCoordinator, MutationOutcome};
use crate::session::SessionGuard;
use crate::store::{RemoteFileStore, StoreFuture, UploadBlob};

/// What the screen shows for one navigation state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewSnapshot {
    pub folders: Vec<Folder>,
    /// Search results when searching, else the folder listing
    pub files: Vec<File>,
    pub is_loading: bool,
}

/// Keeps the listeners of [`Drive::watch_view`] registered until dropped.
pub struct ViewSubscription {
    _folders: Subscription<Folder>,
    _files: Subscription<File>,
}

/// Notice shown when the session check cannot reach the server.
pub const SESSION_CHECK_FAILED: &str = "Could not reach the server. Please try again.";

pub struct Drive {
    store: Rc<dyn RemoteFileStore>,
    host: Rc<dyn Host>,
    queries: QueryClient,
    session: Rc<SessionGuard>,
    mutations: MutationCoordinator,
}

impl Drive {
    pub fn new(store: Rc<dyn RemoteFileStore>, host: Rc<dyn Host>) -> Self {
        let session = SessionGuard::new(host.clone());
        Self::with_session(store, host, session)
    }

    /// Drive using a preconfigured session guard.
    pub fn with_session(
        store: Rc<dyn RemoteFileStore>,
        host: Rc<dyn Host>,
        session: SessionGuard,
    ) -> Self {
        let queries = QueryClient::new();
        let session = Rc::new(session);
        let mutations =
            MutationCoordinator::new(store.clone(), queries.clone(), session.clone(), host.clone());
        Self {
            store,
            host,
            queries,
            session,
            mutations,
        }
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    pub fn mutations(&self) -> &MutationCoordinator {
        &self.mutations
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Look up the signed-in user.
    ///
    /// An auth failure starts the login redirect. Any other failure leaves
    /// the session untouched and shows an error notice; the caller may
    /// check again.
    pub async fn check_session(&self) -> Result<User, DriveError> {
        match self.store.current_user().await {
            Ok(user) => {
                info!("drive: signed in as {}", user.display_name());
                Ok(user)
            }
            Err(err) => {
                if !self.session.intercept(&err) {
                    warn!("drive: session check failed: {}", err);
                    self.host.notify(Notice::error(SESSION_CHECK_FAILED));
                }
                Err(err)
            }
        }
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    // =========================================================================
    // Reads
    // =========================================================================

    fn folder_loader(&self, parent_id: Option<FolderId>) -> Loader<Folder> {
        let store = self.store.clone();
        Rc::new(move || -> StoreFuture<'static, Result<Vec<Folder>, DriveError>> {
            let store = store.clone();
            Box::pin(async move { store.list_folders(parent_id).await })
        })
    }

    fn files_loader(&self, listing: FileListing) -> Loader<File> {
        let store = self.store.clone();
        Rc::new(move || -> StoreFuture<'static, Result<Vec<File>, DriveError>> {
            let store = store.clone();
            let listing = listing.clone();
            Box::pin(async move {
                match listing {
                    FileListing::Folder(folder_id) => store.list_files(folder_id).await,
                    FileListing::Search(query) => store.search_files(&query).await,
                }
            })
        })
    }

    /// Load the folders and files for `nav`, reusing fresh cache entries.
    ///
    /// A failed read keeps whatever the cache last held for that key.
    pub async fn load_view(&self, nav: &NavigationState) -> ViewSnapshot {
        let folder_key = nav.folder_key();
        let listing = nav.listing();
        let file_key = listing.key();

        let (folders, files) = join!(
            self.queries
                .folders()
                .fetch(&folder_key, self.folder_loader(nav.current_folder_id)),
            self.queries
                .files()
                .fetch(&file_key, self.files_loader(listing)),
        );

        let folders = self.settle_read(self.queries.folders(), &folder_key, folders);
        let files = self.settle_read(self.queries.files(), &file_key, files);
        ViewSnapshot {
            is_loading: folders.is_loading || files.is_loading,
            folders: folders.data,
            files: files.data,
        }
    }

    fn settle_read<T: Clone + 'static>(
        &self,
        cache: &QueryCache<T>,
        key: &QueryKey,
        result: Result<CacheEntry<T>, DriveError>,
    ) -> CacheEntry<T> {
        match result {
            Ok(entry) => entry,
            Err(err) => {
                if !self.session.intercept(&err) {
                    warn!("drive: reading {} failed: {}", key, err);
                }
                cache.get(key).unwrap_or_default()
            }
        }
    }

    /// Push every change of the reads behind `nav` to the listeners.
    ///
    /// Listeners get the current entries right away when they are loaded.
    pub fn watch_view(
        &self,
        nav: &NavigationState,
        on_folders: impl Fn(&CacheEntry<Folder>) + 'static,
        on_files: impl Fn(&CacheEntry<File>) + 'static,
    ) -> ViewSubscription {
        ViewSubscription {
            _folders: self
                .queries
                .folders()
                .subscribe(&nav.folder_key(), Rc::new(on_folders)),
            _files: self
                .queries
                .files()
                .subscribe(&nav.file_key(), Rc::new(on_files)),
        }
    }

    /// Evict cache entries nobody has looked at for a sweep interval.
    pub fn sweep(&self) -> usize {
        self.queries.sweep()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create a folder inside the folder being browsed.
    pub async fn create_folder(
        &self,
        nav: &NavigationState,
        name: &str,
    ) -> MutationOutcome<Folder> {
        self.mutations
            .create_folder(name, nav.current_folder_id)
            .await
    }

    /// Upload into the folder being browsed.
    pub async fn upload_files(
        &self,
        nav: &NavigationState,
        files: Vec<UploadBlob>,
        on_complete: impl FnOnce(),
    ) -> MutationOutcome<Vec<File>> {
        self.mutations
            .upload_files(files, nav.current_folder_id, on_complete)
            .await
    }

    pub async fn delete_file(&self, file: &File) -> MutationOutcome<()> {
        self.mutations.delete_file(file).await
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::mock::{MockFileStore, RecordingHost};
    use crate::store::StoreOp;

    fn drive() -> (Drive, Rc<MockFileStore>, Rc<RecordingHost>) {
        let store = Rc::new(MockFileStore::new());
        let host = Rc::new(RecordingHost::new());
        (Drive::new(store.clone(), host.clone()), store, host)
    }

    #[tokio::test]
    async fn test_check_session_returns_user() {
        let (drive, _, host) = drive();
        let user = drive.check_session().await.unwrap();
        assert_eq!(user.display_name(), "Demo User");
        assert!(host.notices().is_empty());
    }

    #[tokio::test]
    async fn test_check_session_unauthenticated_redirects() {
        let (drive, store, host) = drive();
        store.set_user(None);

        assert_eq!(
            drive.check_session().await,
            Err(DriveError::Auth { status: 401 })
        );
        assert!(!drive.session().is_authenticated());
        assert_eq!(host.notices(), vec![Notice::session_expired()]);
        host.run_scheduled();
        assert_eq!(host.navigations(), vec!["/api/login".to_string()]);
    }

    #[tokio::test]
    async fn test_check_session_network_error_can_be_retried() {
        let (drive, store, host) = drive();
        store.fail_next(StoreOp::CurrentUser, DriveError::Network("offline".into()));

        assert_eq!(
            drive.check_session().await,
            Err(DriveError::Network("offline".into()))
        );
        assert!(drive.session().is_authenticated());
        assert_eq!(host.notices(), vec![Notice::error(SESSION_CHECK_FAILED)]);
        assert_eq!(host.scheduled_count(), 0);

        let user = drive.check_session().await.unwrap();
        assert_eq!(user.display_name(), "Demo User");
        assert_eq!(store.call_count(StoreOp::CurrentUser), 2);
        assert!(host.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_search_does_not_reissue_listing() {
        let (drive, store, _) = drive();
        store.seed_file("alpha.txt", Some(5));
        store.seed_file("beta.txt", Some(5));
        store.seed_file("gamma.txt", None);

        let mut nav = NavigationState::new();
        nav.enter_folder(5);
        let view = drive.load_view(&nav).await;
        assert_eq!(view.files, store.files_in(Some(5)));
        assert!(!view.is_loading);

        nav.set_search_query("a");
        let view = drive.load_view(&nav).await;
        assert_eq!(view.files.len(), 3);

        assert_eq!(store.call_count(StoreOp::ListFiles), 1);
        assert_eq!(store.call_count(StoreOp::SearchFiles), 1);
        assert!(store.calls().contains(&"search_files(a)".to_string()));

        // Clearing the query goes back to the cached listing
        nav.set_search_query("");
        let view = drive.load_view(&nav).await;
        assert_eq!(view.files, store.files_in(Some(5)));
        assert_eq!(store.call_count(StoreOp::ListFiles), 1);
    }

    #[tokio::test]
    async fn test_search_keeps_folder_listing() {
        let (drive, store, _) = drive();
        let docs = store.seed_folder("Docs", None);
        store.seed_file("notes.txt", Some(docs.id));

        let mut nav = NavigationState::new();
        nav.set_search_query("notes");
        let view = drive.load_view(&nav).await;

        assert_eq!(view.folders, vec![docs]);
        assert_eq!(view.files.len(), 1);
        assert_eq!(store.call_count(StoreOp::ListFolders), 1);
        assert_eq!(store.call_count(StoreOp::ListFiles), 0);
    }

    #[tokio::test]
    async fn test_read_error_keeps_stale_data() {
        let (drive, store, host) = drive();
        store.seed_folder("Docs", None);
        let nav = NavigationState::new();
        let first = drive.load_view(&nav).await;
        assert_eq!(first.folders.len(), 1);

        drive.queries().invalidate("/api/folders");
        store.fail_next(StoreOp::ListFolders, DriveError::Network("offline".into()));
        let second = drive.load_view(&nav).await;
        assert_eq!(second.folders, first.folders);
        assert!(host.notices().is_empty());
    }

    #[tokio::test]
    async fn test_read_auth_error_redirects() {
        let (drive, store, host) = drive();
        store.fail_next(StoreOp::ListFiles, DriveError::Auth { status: 401 });

        let view = drive.load_view(&NavigationState::new()).await;
        assert!(view.files.is_empty());
        assert_eq!(host.notices(), vec![Notice::session_expired()]);
    }

    #[tokio::test]
    async fn test_watch_view_follows_mutations() {
        let (drive, store, _) = drive();
        let nav = NavigationState::new();
        drive.load_view(&nav).await;

        let folders = Rc::new(RefCell::new(Vec::new()));
        let files = Rc::new(RefCell::new(Vec::new()));
        let (f_sink, d_sink) = (folders.clone(), files.clone());
        let sub = drive.watch_view(
            &nav,
            move |entry| *f_sink.borrow_mut() = entry.data.clone(),
            move |entry| *d_sink.borrow_mut() = entry.data.clone(),
        );

        drive.create_folder(&nav, "Music").await;
        assert_eq!(*folders.borrow(), store.folders_in(None));
        assert_eq!(folders.borrow().len(), 1);

        let blob = UploadBlob::from_bytes("song.mp3", vec![0; 4]);
        drive.upload_files(&nav, vec![blob], || {}).await;
        assert_eq!(*files.borrow(), store.files_in(None));
        assert_eq!(files.borrow()[0].size, Some(4));

        drop(sub);
        assert_eq!(drive.queries().files().subscriber_count(&nav.file_key()), 0);
    }

    #[tokio::test]
    async fn test_sweep_keeps_watched_view() {
        let (drive, _, _) = drive();
        let mut nav = NavigationState::new();
        drive.load_view(&nav).await;
        let _sub = drive.watch_view(&nav, |_| {}, |_| {});

        nav.enter_folder(3);
        drive.load_view(&nav).await;

        assert_eq!(drive.sweep(), 0);
        assert_eq!(drive.sweep(), 2);
        assert!(drive.queries().files().get(&QueryKey::files(None)).is_some());
        assert!(drive.queries().files().get(&QueryKey::files(Some(3))).is_none());
    }
}
