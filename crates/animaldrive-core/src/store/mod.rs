//! Typed access to the backend's folder, file, search and session endpoints.
//!
//! [`RemoteFileStore`] is object-safe and returns boxed local futures, so a
//! single `Rc<dyn RemoteFileStore>` can back every cache loader and
//! mutation. [`HttpFileStore`] talks to the real backend; tests use the
//! in-memory store from [`crate::mock`].

mod http;

use std::fmt;

use futures::future::LocalBoxFuture;
use wasm_bindgen::JsValue;

pub use http::{HttpFileStore, classify_status};

use crate::error::DriveError;
use crate::models::{File, FileId, Folder, FolderId, User};

/// Object-safe boxed future returned by [`RemoteFileStore`] methods.
pub type StoreFuture<'a, T> = LocalBoxFuture<'a, T>;

/// Store operations, used for error classification and call logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreOp {
    CurrentUser,
    ListFolders,
    ListFiles,
    SearchFiles,
    CreateFolder,
    UploadFiles,
    DeleteFile,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CurrentUser => "current_user",
            Self::ListFolders => "list_folders",
            Self::ListFiles => "list_files",
            Self::SearchFiles => "search_files",
            Self::CreateFolder => "create_folder",
            Self::UploadFiles => "upload_files",
            Self::DeleteFile => "delete_file",
        };
        write!(f, "{}", name)
    }
}

/// Backend operations needed by the sync layer.
///
/// Every call carries the session cookie implicitly. A 401/403 response is
/// always [`DriveError::Auth`], whatever the endpoint.
pub trait RemoteFileStore {
    /// Account behind the current session.
    fn current_user<'a>(&'a self) -> StoreFuture<'a, Result<User, DriveError>>;

    /// Folders under `parent_id` (`None` = root folders).
    fn list_folders<'a>(
        &'a self,
        parent_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Vec<Folder>, DriveError>>;

    /// Files in `folder_id` (`None` = root).
    fn list_files<'a>(
        &'a self,
        folder_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Vec<File>, DriveError>>;

    /// Files matching `query`. An empty query yields an empty list without
    /// a request.
    fn search_files<'a>(&'a self, query: &'a str)
    -> StoreFuture<'a, Result<Vec<File>, DriveError>>;

    /// Create a folder. The name is forwarded as given; rejection by the
    /// backend surfaces as [`DriveError::Validation`].
    fn create_folder<'a>(
        &'a self,
        name: &'a str,
        parent_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Folder, DriveError>>;

    /// Upload `files` into `folder_id` in one multipart request.
    fn upload_files<'a>(
        &'a self,
        files: &'a [UploadBlob],
        folder_id: Option<FolderId>,
    ) -> StoreFuture<'a, Result<Vec<File>, DriveError>>;

    /// Delete a file. A second delete of the same id fails with
    /// [`DriveError::NotFound`].
    fn delete_file<'a>(&'a self, file_id: FileId) -> StoreFuture<'a, Result<(), DriveError>>;
}

// =============================================================================
// Upload payloads
// =============================================================================

/// Contents of one file to upload.
#[derive(Clone, Debug)]
pub enum BlobSource {
    /// In-memory bytes
    Bytes(Vec<u8>),
    /// Browser blob (e.g. from a file input or a drop)
    Browser(web_sys::Blob),
}

/// One file to upload, with the name it is sent under.
#[derive(Clone, Debug)]
pub struct UploadBlob {
    pub name: String,
    pub source: BlobSource,
}

impl UploadBlob {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: BlobSource::Bytes(bytes),
        }
    }

    /// Wrap a browser `File` picked by the user.
    pub fn from_file(file: web_sys::File) -> Self {
        Self {
            name: file.name(),
            source: BlobSource::Browser(file.into()),
        }
    }

    /// Browser blob for this file, creating one for in-memory bytes.
    pub fn to_js_blob(&self) -> Result<web_sys::Blob, DriveError> {
        match &self.source {
            BlobSource::Browser(blob) => Ok(blob.clone()),
            BlobSource::Bytes(bytes) => {
                let array = js_sys::Uint8Array::from(bytes.as_slice());
                let parts = js_sys::Array::of1(&array);
                web_sys::Blob::new_with_u8_array_sequence(&parts).map_err(js_error)
            }
        }
    }
}

/// Convert a JavaScript exception into a transport error.
pub(crate) fn js_error(err: JsValue) -> DriveError {
    DriveError::Network(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}
