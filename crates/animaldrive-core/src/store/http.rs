//! [`RemoteFileStore`] over the browser Fetch API.
//!
//! Every request is sent with `credentials: include` so the session cookie
//! travels with it, and races a timeout the same way the content fetcher
//! does: whichever settles first wins.

use futures::future::{Either, select};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use web_sys::{FormData, RequestCredentials};

use super::{RemoteFileStore, StoreFuture, StoreOp, UploadBlob, js_error};
use crate::config::{FETCH_TIMEOUT_MS, UPLOAD_FIELD, api, params};
use crate::error::DriveError;
use crate::models::{File, FileId, Folder, FolderId, User};

/// JSON body of a folder creation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateFolderBody<'a> {
    name: &'a str,
    parent_id: Option<FolderId>,
}

/// Map a non-success status to the error the callers expect.
///
/// 401/403 is an auth failure on every endpoint. The remaining statuses are
/// classified per operation.
pub fn classify_status(op: StoreOp, status: u16, message: String) -> DriveError {
    match (op, status) {
        (_, 401 | 403) => DriveError::Auth { status },
        (StoreOp::CreateFolder, _) => DriveError::Validation { status, message },
        (StoreOp::UploadFiles, _) => DriveError::Upload { status, message },
        (StoreOp::DeleteFile, 404) => DriveError::NotFound,
        _ => DriveError::Http { status, message },
    }
}

/// HTTP-backed store.
#[derive(Clone, Debug)]
pub struct HttpFileStore {
    base_url: String,
    timeout_ms: u32,
}

impl Default for HttpFileStore {
    fn default() -> Self {
        Self::new("")
    }
}

impl HttpFileStore {
    /// Store rooted at `base_url` (empty = same origin).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_ms: FETCH_TIMEOUT_MS,
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `request`, racing the configured timeout.
    async fn send(&self, op: StoreOp, request: Request) -> Result<Response, DriveError> {
        debug!("store: {}", op);

        let sending = Box::pin(request.send());
        let timeout = Box::pin(TimeoutFuture::new(self.timeout_ms));

        let response = match select(sending, timeout).await {
            Either::Left((Ok(response), _)) => response,
            Either::Left((Err(e), _)) => return Err(DriveError::Network(e.to_string())),
            Either::Right(_) => {
                warn!("store: {} timed out after {}ms", op, self.timeout_ms);
                return Err(DriveError::Network("request timed out".to_string()));
            }
        };

        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        let err = classify_status(op, status, message);
        warn!("store: {} failed: {}", op, err);
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        op: StoreOp,
        request: Request,
    ) -> Result<T, DriveError> {
        let response = self.send(op, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| DriveError::Decode(e.to_string()))
    }

    fn get(&self, path: &str, query: Option<(&str, String)>) -> Result<Request, DriveError> {
        let mut builder = Request::get(&self.url(path)).credentials(RequestCredentials::Include);
        if let Some(pair) = query {
            builder = builder.query([pair]);
        }
        builder.build().map_err(|e| DriveError::Network(e.to_string()))
    }
}

fn upload_form(files: &[UploadBlob], folder_id: Option<FolderId>) -> Result<FormData, DriveError> {
    let form = FormData::new().map_err(js_error)?;
    for file in files {
        let blob = file.to_js_blob()?;
        form.append_with_blob_and_filename(UPLOAD_FIELD, &blob, &file.name)
            .map_err(js_error)?;
    }
    if let Some(id) = folder_id {
        form.append_with_str(params::FOLDER_ID, &id.to_string())
            .map_err(js_error)?;
    }
    Ok(form)
}

impl RemoteFileStore for HttpFileStore {
    fn current_user<'a>(&'a self) -> StoreFuture<'a, Result<User, DriveError>> {
        Box::pin(async move {
            let request = self.get(api::AUTH_USER, None)?;
            self.send_json(StoreOp::CurrentUser, request).await
        })
    }

    fn list_folders<'a>(
        &'a self,
        parent_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Vec<Folder>, DriveError>> {
        Box::pin(async move {
            let query = parent_id.map(|id| (params::PARENT_ID, id.to_string()));
            let request = self.get(api::FOLDERS, query)?;
            self.send_json(StoreOp::ListFolders, request).await
        })
    }

    fn list_files<'a>(
        &'a self,
        folder_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Vec<File>, DriveError>> {
        Box::pin(async move {
            let query = folder_id.map(|id| (params::FOLDER_ID, id.to_string()));
            let request = self.get(api::FILES, query)?;
            self.send_json(StoreOp::ListFiles, request).await
        })
    }

    fn search_files<'a>(
        &'a self,
        query: &'a str,
    ) -> StoreFuture<'a, Result<Vec<File>, DriveError>> {
        Box::pin(async move {
            if query.is_empty() {
                return Ok(Vec::new());
            }
            let request = self.get(api::SEARCH, Some((params::QUERY, query.to_string())))?;
            self.send_json(StoreOp::SearchFiles, request).await
        })
    }

    fn create_folder<'a>(
        &'a self,
        name: &'a str,
        parent_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Folder, DriveError>> {
        Box::pin(async move {
            let request = Request::post(&self.url(api::FOLDERS))
                .credentials(RequestCredentials::Include)
                .json(&CreateFolderBody { name, parent_id })
                .map_err(|e| DriveError::Network(e.to_string()))?;
            self.send_json(StoreOp::CreateFolder, request).await
        })
    }

    fn upload_files<'a>(
        &'a self,
        files: &'a [UploadBlob],
        folder_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Vec<File>, DriveError>> {
        Box::pin(async move {
            let form = upload_form(files, folder_id)?;
            let request = Request::post(&self.url(api::UPLOAD))
                .credentials(RequestCredentials::Include)
                .body(form)
                .map_err(|e| DriveError::Network(e.to_string()))?;
            self.send_json(StoreOp::UploadFiles, request).await
        })
    }

    fn delete_file<'a>(&'a self, file_id: FileId) -> StoreFuture<'a, Result<(), DriveError>> {
        Box::pin(async move {
            let path = format!("{}/{}", api::FILES, file_id);
            let request = Request::delete(&self.url(&path))
                .credentials(RequestCredentials::Include)
                .build()
                .map_err(|e| DriveError::Network(e.to_string()))?;
            self.send(StoreOp::DeleteFile, request).await.map(|_| ())
        })
    }
}
