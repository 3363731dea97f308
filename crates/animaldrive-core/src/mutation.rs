//! Write orchestration: create folder, upload, delete.
//!
//! Every mutation follows the same shape: call the store, and on success
//! invalidate the affected endpoint prefix, tell the user, then reload the
//! invalidated reads somebody is watching. Failures never escape as errors;
//! they end up as a notice (or a session redirect) and a [`MutationOutcome`].

use std::cell::Cell;
use std::rc::Rc;

use log::{info, warn};

use crate::cache::{ActiveKeys, QueryClient};
use crate::config::api;
use crate::error::DriveError;
use crate::host::Host;
use crate::models::{File, Folder, FolderId, Notice};
use crate::session::SessionGuard;
use crate::store::{RemoteFileStore, UploadBlob};

/// Upload indicator.
///
/// There is no byte-level progress from the backend, so the indicator only
/// tells whether uploads are in flight and how many.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadProgress {
    #[default]
    Idle,
    Pending { uploads: usize },
}

impl UploadProgress {
    fn from_count(uploads: usize) -> Self {
        match uploads {
            0 => Self::Idle,
            uploads => Self::Pending { uploads },
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// How a mutation ended.
#[derive(Clone, Debug, PartialEq)]
pub enum MutationOutcome<T> {
    /// The server applied the change.
    Completed(T),
    /// Nothing was sent (empty input or declined confirmation).
    Skipped,
    /// The server or the network refused; a notice was shown.
    Failed(DriveError),
    /// The session is gone; the login redirect is under way.
    SessionExpired,
}

impl<T> MutationOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Runs writes against the store and keeps the caches in step.
pub struct MutationCoordinator {
    store: Rc<dyn RemoteFileStore>,
    queries: QueryClient,
    session: Rc<SessionGuard>,
    host: Rc<dyn Host>,
    uploads: Cell<usize>,
}

impl MutationCoordinator {
    pub fn new(
        store: Rc<dyn RemoteFileStore>,
        queries: QueryClient,
        session: Rc<SessionGuard>,
        host: Rc<dyn Host>,
    ) -> Self {
        Self {
            store,
            queries,
            session,
            host,
            uploads: Cell::new(0),
        }
    }

    /// Current upload indicator.
    pub fn upload_progress(&self) -> UploadProgress {
        UploadProgress::from_count(self.uploads.get())
    }

    /// Create a folder named `name` (trimmed) under `parent_id`.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> MutationOutcome<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return MutationOutcome::Skipped;
        }

        match self.store.create_folder(name, parent_id).await {
            Ok(folder) => {
                info!("mutation: created folder {} ({})", folder.name, folder.id);
                let active = self.queries.invalidate(api::FOLDERS);
                self.host.notify(Notice::success("Folder created successfully!"));
                self.refresh(active).await;
                MutationOutcome::Completed(folder)
            }
            Err(err) => self.fail(err, "Failed to create folder"),
        }
    }

    /// Upload `files` into `folder_id`.
    ///
    /// `on_complete` runs after a successful upload, before the invalidated
    /// reads are reloaded.
    pub async fn upload_files(
        &self,
        files: Vec<UploadBlob>,
        folder_id: Option<FolderId>,
        on_complete: impl FnOnce(),
    ) -> MutationOutcome<Vec<File>> {
        if files.is_empty() {
            return MutationOutcome::Skipped;
        }

        self.begin_upload();
        match self.store.upload_files(&files, folder_id).await {
            Ok(uploaded) => {
                info!("mutation: uploaded {} file(s)", uploaded.len());
                let active = self.queries.invalidate(api::FILES);
                self.host.notify(Notice::success("Files uploaded successfully!"));
                on_complete();
                self.end_upload();
                self.refresh(active).await;
                MutationOutcome::Completed(uploaded)
            }
            Err(err) => {
                self.end_upload();
                self.fail(err, "Failed to upload files")
            }
        }
    }

    /// Delete `file` after the user confirms.
    ///
    /// A file the server no longer has counts as deleted, without a notice.
    pub async fn delete_file(&self, file: &File) -> MutationOutcome<()> {
        let question = format!(
            "Are you sure you want to delete \"{}\"?",
            file.original_name
        );
        if !self.host.confirm(&question) {
            return MutationOutcome::Skipped;
        }

        match self.store.delete_file(file.id).await {
            Ok(()) => {
                info!("mutation: deleted file {}", file.id);
                let active = self.queries.invalidate(api::FILES);
                self.host.notify(Notice::success("File deleted successfully!"));
                self.refresh(active).await;
                MutationOutcome::Completed(())
            }
            Err(DriveError::NotFound) => {
                info!("mutation: file {} was already gone", file.id);
                let active = self.queries.invalidate(api::FILES);
                self.refresh(active).await;
                MutationOutcome::Completed(())
            }
            Err(err) => self.fail(err, "Failed to delete file"),
        }
    }

    fn begin_upload(&self) {
        self.uploads.set(self.uploads.get() + 1);
        self.host.upload_progress(self.upload_progress());
    }

    fn end_upload(&self) {
        self.uploads.set(self.uploads.get().saturating_sub(1));
        self.host.upload_progress(self.upload_progress());
    }

    fn fail<T>(&self, err: DriveError, description: &str) -> MutationOutcome<T> {
        if self.session.intercept(&err) {
            return MutationOutcome::SessionExpired;
        }
        warn!("mutation: {}: {}", description, err);
        self.host.notify(Notice::error(description));
        MutationOutcome::Failed(err)
    }

    /// Reload invalidated reads that are on screen.
    ///
    /// Read errors stay on their cache entries; only a lost session needs
    /// action here.
    async fn refresh(&self, active: ActiveKeys) {
        if active.is_empty() {
            return;
        }
        for err in self.queries.refetch(&active).await {
            if !self.session.intercept(&err) {
                warn!("mutation: refetch failed: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::cache::{CacheEntry, Loader, QueryKey};
    use crate::mock::{MockFileStore, RecordingHost};
    use crate::store::{StoreFuture, StoreOp};

    struct Fixture {
        store: Rc<MockFileStore>,
        host: Rc<RecordingHost>,
        queries: QueryClient,
        coordinator: MutationCoordinator,
    }

    fn fixture() -> Fixture {
        let store = Rc::new(MockFileStore::new());
        let host = Rc::new(RecordingHost::new());
        let queries = QueryClient::new();
        let session = Rc::new(SessionGuard::new(host.clone()));
        let coordinator =
            MutationCoordinator::new(store.clone(), queries.clone(), session, host.clone());
        Fixture {
            store,
            host,
            queries,
            coordinator,
        }
    }

    fn files_loader(store: &Rc<MockFileStore>, folder_id: Option<FolderId>) -> Loader<File> {
        let store = store.clone();
        Rc::new(move || -> StoreFuture<'static, Result<Vec<File>, DriveError>> {
            let store = store.clone();
            Box::pin(async move { store.list_files(folder_id).await })
        })
    }

    fn blob(name: &str) -> UploadBlob {
        UploadBlob::from_bytes(name, name.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_blank_folder_name_is_skipped() {
        let f = fixture();
        for name in ["", "   ", "\t\n"] {
            assert_eq!(
                f.coordinator.create_folder(name, None).await,
                MutationOutcome::Skipped
            );
        }
        assert_eq!(f.store.call_count(StoreOp::CreateFolder), 0);
        assert!(f.host.notices().is_empty());
    }

    #[tokio::test]
    async fn test_create_folder_trims_and_notifies() {
        let f = fixture();
        let outcome = f.coordinator.create_folder("  Photos ", Some(2)).await;

        let MutationOutcome::Completed(folder) = outcome else {
            panic!("expected completion, got {:?}", outcome);
        };
        assert_eq!(folder.name, "Photos");
        assert_eq!(folder.parent_id, Some(2));
        assert_eq!(
            f.host.notices(),
            vec![Notice::success("Folder created successfully!")]
        );
    }

    #[tokio::test]
    async fn test_create_folder_validation_error() {
        let f = fixture();
        f.store.fail_next(
            StoreOp::CreateFolder,
            DriveError::Validation {
                status: 400,
                message: "duplicate".into(),
            },
        );

        let outcome = f.coordinator.create_folder("Docs", None).await;
        assert!(matches!(outcome, MutationOutcome::Failed(DriveError::Validation { .. })));
        assert_eq!(f.host.notices(), vec![Notice::error("Failed to create folder")]);
    }

    #[tokio::test]
    async fn test_empty_upload_is_skipped() {
        let f = fixture();
        let called = Cell::new(false);
        let outcome = f
            .coordinator
            .upload_files(Vec::new(), None, || called.set(true))
            .await;

        assert_eq!(outcome, MutationOutcome::Skipped);
        assert!(!called.get());
        assert_eq!(f.store.call_count(StoreOp::UploadFiles), 0);
        assert!(f.host.progress().is_empty());
    }

    #[tokio::test]
    async fn test_upload_success_refreshes_watched_listing() {
        let f = fixture();
        let key = QueryKey::files(Some(5));
        let loader = files_loader(&f.store, Some(5));
        f.queries.files().fetch(&key, loader).await.unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = f.queries.files().subscribe(
            &key,
            Rc::new(move |entry: &CacheEntry<File>| sink.borrow_mut().push(entry.data.len())),
        );

        let completed = Cell::new(false);
        let outcome = f
            .coordinator
            .upload_files(vec![blob("a.txt"), blob("b.txt")], Some(5), || {
                completed.set(true)
            })
            .await;

        assert!(outcome.is_completed());
        assert!(completed.get());
        assert_eq!(
            f.host.progress(),
            vec![UploadProgress::Pending { uploads: 1 }, UploadProgress::Idle]
        );
        assert_eq!(
            f.host.notices(),
            vec![Notice::success("Files uploaded successfully!")]
        );

        let entry = f.queries.files().get(&key).unwrap();
        assert_eq!(entry.data, f.store.files_in(Some(5)));
        assert_eq!(entry.data.len(), 2);
        assert!(!entry.is_stale);
        assert_eq!(seen.borrow().last(), Some(&2));
    }

    #[tokio::test]
    async fn test_upload_failure_leaves_cache_fresh() {
        let f = fixture();
        let key = QueryKey::files(None);
        f.queries
            .files()
            .fetch(&key, files_loader(&f.store, None))
            .await
            .unwrap();

        f.store.fail_next(
            StoreOp::UploadFiles,
            DriveError::Upload {
                status: 500,
                message: "disk full".into(),
            },
        );
        let called = Cell::new(false);
        let outcome = f
            .coordinator
            .upload_files(vec![blob("big.iso")], None, || called.set(true))
            .await;

        assert_eq!(
            outcome,
            MutationOutcome::Failed(DriveError::Upload {
                status: 500,
                message: "disk full".into()
            })
        );
        assert!(!called.get());
        assert_eq!(f.coordinator.upload_progress(), UploadProgress::Idle);
        assert_eq!(f.host.notices(), vec![Notice::error("Failed to upload files")]);
        assert!(!f.queries.files().get(&key).unwrap().is_stale);
    }

    #[tokio::test]
    async fn test_auth_failure_goes_to_session_guard() {
        let f = fixture();
        f.store
            .fail_next(StoreOp::UploadFiles, DriveError::Auth { status: 401 });

        let outcome = f.coordinator.upload_files(vec![blob("a")], None, || {}).await;
        assert_eq!(outcome, MutationOutcome::SessionExpired);
        assert_eq!(f.host.notices(), vec![Notice::session_expired()]);
        assert_eq!(f.coordinator.upload_progress(), UploadProgress::Idle);
    }

    #[tokio::test]
    async fn test_delete_declined_is_skipped() {
        let f = fixture();
        let file = f.store.seed_file("notes.txt", None);
        f.host.set_confirm(false);

        assert_eq!(f.coordinator.delete_file(&file).await, MutationOutcome::Skipped);
        assert_eq!(
            f.host.confirmations(),
            vec!["Are you sure you want to delete \"notes.txt\"?".to_string()]
        );
        assert_eq!(f.store.call_count(StoreOp::DeleteFile), 0);
        assert_eq!(f.store.files_in(None), vec![file]);
    }

    #[tokio::test]
    async fn test_delete_twice_is_silent_the_second_time() {
        let f = fixture();
        let file = f.store.seed_file("notes.txt", None);

        assert!(f.coordinator.delete_file(&file).await.is_completed());
        assert!(f.coordinator.delete_file(&file).await.is_completed());

        assert_eq!(f.store.call_count(StoreOp::DeleteFile), 2);
        assert_eq!(
            f.host.notices(),
            vec![Notice::success("File deleted successfully!")]
        );
    }

    #[tokio::test]
    async fn test_delete_server_error() {
        let f = fixture();
        let file = f.store.seed_file("notes.txt", None);
        f.store.fail_next(
            StoreOp::DeleteFile,
            DriveError::Http {
                status: 500,
                message: "boom".into(),
            },
        );

        let outcome = f.coordinator.delete_file(&file).await;
        assert!(matches!(outcome, MutationOutcome::Failed(_)));
        assert_eq!(f.host.notices(), vec![Notice::error("Failed to delete file")]);
    }
}
