use std::rc::Rc;

use futures::join;

use super::key::QueryKey;
use super::query_cache::QueryCache;
use crate::error::DriveError;
use crate::models::{File, Folder};

/// Keys left stale by an invalidation that still have subscribers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveKeys {
    pub folders: Vec<QueryKey>,
    pub files: Vec<QueryKey>,
}

impl ActiveKeys {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }
}

/// The drive's folder and file caches behind one handle.
///
/// Cloning is cheap and every clone shares the same caches.
#[derive(Clone, Default)]
pub struct QueryClient {
    folders: Rc<QueryCache<Folder>>,
    files: Rc<QueryCache<File>>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folders(&self) -> &Rc<QueryCache<Folder>> {
        &self.folders
    }

    pub fn files(&self) -> &Rc<QueryCache<File>> {
        &self.files
    }

    /// Invalidate `prefix` in both caches.
    pub fn invalidate(&self, prefix: &str) -> ActiveKeys {
        ActiveKeys {
            folders: self.folders.invalidate(prefix),
            files: self.files.invalidate(prefix),
        }
    }

    /// Reload the given keys; returns the errors of the reloads that failed.
    pub async fn refetch(&self, keys: &ActiveKeys) -> Vec<DriveError> {
        let (folders, files) = join!(
            self.folders.refetch(&keys.folders),
            self.files.refetch(&keys.files)
        );

        folders
            .into_iter()
            .filter_map(Result::err)
            .chain(files.into_iter().filter_map(Result::err))
            .collect()
    }

    /// Sweep both caches; returns the number of evicted entries.
    pub fn sweep(&self) -> usize {
        self.folders.sweep() + self.files.sweep()
    }
}
