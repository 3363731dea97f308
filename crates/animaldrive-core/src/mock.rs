//! In-memory test doubles.
//!
//! [`MockFileStore`] plays the backend: a folder and file table, scriptable
//! failures, and gates that hold a call until the test releases it.
//! [`RecordingHost`] records every browser side effect instead of performing
//! it.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use futures::channel::oneshot;

use crate::error::DriveError;
use crate::host::Host;
use crate::models::{File, FileId, Folder, FolderId, Notice, User};
use crate::mutation::UploadProgress;
use crate::store::{BlobSource, RemoteFileStore, StoreFuture, StoreOp, UploadBlob};

// =============================================================================
// MockFileStore
// =============================================================================

#[derive(Default)]
struct ServerState {
    folders: Vec<Folder>,
    files: Vec<File>,
    next_id: i64,
}

impl ServerState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Scriptable in-memory backend.
///
/// Reads are answered from the state at the moment of the call, so a held
/// read returns what the server had when it was asked. Writes are applied
/// when they are answered.
pub struct MockFileStore {
    state: RefCell<ServerState>,
    user: RefCell<Option<User>>,
    calls: RefCell<Vec<(StoreOp, String)>>,
    failures: RefCell<HashMap<StoreOp, VecDeque<DriveError>>>,
    gates: RefCell<HashMap<StoreOp, VecDeque<oneshot::Receiver<()>>>>,
}

impl Default for MockFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileStore {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(ServerState::default()),
            user: RefCell::new(Some(User {
                id: "user-1".to_string(),
                email: Some("demo@animaldrive.test".to_string()),
                first_name: Some("Demo".to_string()),
                last_name: Some("User".to_string()),
                profile_image_url: None,
            })),
            calls: RefCell::new(Vec::new()),
            failures: RefCell::new(HashMap::new()),
            gates: RefCell::new(HashMap::new()),
        }
    }

    /// Session user; `None` makes the session check answer 401.
    pub fn set_user(&self, user: Option<User>) {
        *self.user.borrow_mut() = user;
    }

    pub fn seed_folder(&self, name: &str, parent_id: Option<FolderId>) -> Folder {
        let mut state = self.state.borrow_mut();
        let folder = Folder::new(state.allocate_id(), name, parent_id);
        state.folders.push(folder.clone());
        folder
    }

    pub fn seed_file(&self, name: &str, folder_id: Option<FolderId>) -> File {
        let mut state = self.state.borrow_mut();
        let file = File::new(state.allocate_id(), name, folder_id);
        state.files.push(file.clone());
        file
    }

    /// Server's current listing of `folder_id`.
    pub fn files_in(&self, folder_id: Option<FolderId>) -> Vec<File> {
        self.state
            .borrow()
            .files
            .iter()
            .filter(|f| f.folder_id == folder_id)
            .cloned()
            .collect()
    }

    pub fn folders_in(&self, parent_id: Option<FolderId>) -> Vec<Folder> {
        self.state
            .borrow()
            .folders
            .iter()
            .filter(|f| f.parent_id == parent_id)
            .cloned()
            .collect()
    }

    /// Make the next call of `op` fail with `err`.
    pub fn fail_next(&self, op: StoreOp, err: DriveError) {
        self.failures.borrow_mut().entry(op).or_default().push_back(err);
    }

    /// Hold the next call of `op` until the returned sender fires (or is
    /// dropped).
    pub fn hold_next(&self, op: StoreOp) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().entry(op).or_default().push_back(rx);
        tx
    }

    /// Every call so far, formatted as `op(argument)`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(op, arg)| format!("{}({})", op, arg))
            .collect()
    }

    pub fn call_count(&self, op: StoreOp) -> usize {
        self.calls.borrow().iter().filter(|(o, _)| *o == op).count()
    }

    /// Record a call and pick up its scripted failure and gate.
    fn begin(
        &self,
        op: StoreOp,
        arg: String,
    ) -> (Option<DriveError>, Option<oneshot::Receiver<()>>) {
        self.calls.borrow_mut().push((op, arg));
        let failure = self
            .failures
            .borrow_mut()
            .get_mut(&op)
            .and_then(VecDeque::pop_front);
        let gate = self
            .gates
            .borrow_mut()
            .get_mut(&op)
            .and_then(VecDeque::pop_front);
        (failure, gate)
    }
}

fn scope(id: Option<i64>) -> String {
    id.map_or_else(|| "root".to_string(), |id| id.to_string())
}

/// Wait for the gate, then apply the scripted failure.
async fn answer(
    failure: Option<DriveError>,
    gate: Option<oneshot::Receiver<()>>,
) -> Result<(), DriveError> {
    if let Some(gate) = gate {
        let _ = gate.await;
    }
    failure.map_or(Ok(()), Err)
}

impl RemoteFileStore for MockFileStore {
    fn current_user<'a>(&'a self) -> StoreFuture<'a, Result<User, DriveError>> {
        let (failure, gate) = self.begin(StoreOp::CurrentUser, String::new());
        let user = self.user.borrow().clone();
        Box::pin(async move {
            answer(failure, gate).await?;
            user.ok_or(DriveError::Auth { status: 401 })
        })
    }

    fn list_folders<'a>(
        &'a self,
        parent_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Vec<Folder>, DriveError>> {
        let (failure, gate) = self.begin(StoreOp::ListFolders, scope(parent_id));
        let folders = self.folders_in(parent_id);
        Box::pin(async move {
            answer(failure, gate).await?;
            Ok(folders)
        })
    }

    fn list_files<'a>(
        &'a self,
        folder_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Vec<File>, DriveError>> {
        let (failure, gate) = self.begin(StoreOp::ListFiles, scope(folder_id));
        let files = self.files_in(folder_id);
        Box::pin(async move {
            answer(failure, gate).await?;
            Ok(files)
        })
    }

    fn search_files<'a>(
        &'a self,
        query: &'a str,
    ) -> StoreFuture<'a, Result<Vec<File>, DriveError>> {
        if query.is_empty() {
            return Box::pin(async { Ok(Vec::new()) });
        }
        let (failure, gate) = self.begin(StoreOp::SearchFiles, query.to_string());
        let needle = query.to_lowercase();
        let files: Vec<File> = self
            .state
            .borrow()
            .files
            .iter()
            .filter(|f| f.original_name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Box::pin(async move {
            answer(failure, gate).await?;
            Ok(files)
        })
    }

    fn create_folder<'a>(
        &'a self,
        name: &'a str,
        parent_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Folder, DriveError>> {
        let (failure, gate) = self.begin(StoreOp::CreateFolder, name.to_string());
        Box::pin(async move {
            answer(failure, gate).await?;
            Ok(self.seed_folder(name, parent_id))
        })
    }

    fn upload_files<'a>(
        &'a self,
        files: &'a [UploadBlob],
        folder_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Vec<File>, DriveError>> {
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        let (failure, gate) = self.begin(StoreOp::UploadFiles, names.join(","));
        Box::pin(async move {
            answer(failure, gate).await?;
            let mut state = self.state.borrow_mut();
            let uploaded: Vec<File> = files
                .iter()
                .map(|blob| {
                    let file = File::new(state.allocate_id(), blob.name.clone(), folder_id);
                    match &blob.source {
                        BlobSource::Bytes(bytes) => file.with_size(bytes.len() as u64),
                        BlobSource::Browser(_) => file,
                    }
                })
                .collect();
            state.files.extend(uploaded.iter().cloned());
            Ok(uploaded)
        })
    }

    fn delete_file<'a>(&'a self, file_id: FileId) -> StoreFuture<'a, Result<(), DriveError>> {
        let (failure, gate) = self.begin(StoreOp::DeleteFile, file_id.to_string());
        Box::pin(async move {
            answer(failure, gate).await?;
            let mut state = self.state.borrow_mut();
            let before = state.files.len();
            state.files.retain(|f| f.id != file_id);
            if state.files.len() == before {
                return Err(DriveError::NotFound);
            }
            Ok(())
        })
    }
}

// =============================================================================
// RecordingHost
// =============================================================================

/// [`Host`] that records side effects for assertions.
///
/// Confirmations are answered with a fixed value (yes by default) and
/// scheduled tasks wait for [`RecordingHost::run_scheduled`].
pub struct RecordingHost {
    notices: RefCell<Vec<Notice>>,
    confirm_answer: Cell<bool>,
    confirmations: RefCell<Vec<String>>,
    navigations: RefCell<Vec<String>>,
    scheduled: RefCell<Vec<Box<dyn FnOnce()>>>,
    delays: RefCell<Vec<u32>>,
    progress: RefCell<Vec<UploadProgress>>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            notices: RefCell::new(Vec::new()),
            confirm_answer: Cell::new(true),
            confirmations: RefCell::new(Vec::new()),
            navigations: RefCell::new(Vec::new()),
            scheduled: RefCell::new(Vec::new()),
            delays: RefCell::new(Vec::new()),
            progress: RefCell::new(Vec::new()),
        }
    }

    pub fn set_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.borrow().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    pub fn progress(&self) -> Vec<UploadProgress> {
        self.progress.borrow().clone()
    }

    /// Tasks waiting to run.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled.borrow().len()
    }

    /// Delay of every task ever scheduled.
    pub fn scheduled_delays(&self) -> Vec<u32> {
        self.delays.borrow().clone()
    }

    /// Run every pending task, as if their timers had fired.
    pub fn run_scheduled(&self) {
        let tasks: Vec<_> = self.scheduled.borrow_mut().drain(..).collect();
        for task in tasks {
            task();
        }
    }
}

impl Host for RecordingHost {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirmations.borrow_mut().push(message.to_string());
        self.confirm_answer.get()
    }

    fn navigate(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_string());
    }

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        self.delays.borrow_mut().push(delay_ms);
        self.scheduled.borrow_mut().push(task);
    }

    fn upload_progress(&self, progress: UploadProgress) {
        self.progress.borrow_mut().push(progress);
    }
}
