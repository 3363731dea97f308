//! Screen navigation and selection state.
//!
//! All transitions are pure: nothing here performs I/O or touches the cache.
//! The cache keys for the current view are derived from this state, so
//! moving between folders or toggling search simply selects different keys.

use crate::cache::QueryKey;

use super::entry::{File, FolderId};

/// Layout of the file area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Grid view (default)
    #[default]
    Grid,
    /// List view
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }
}

/// Which read feeds the file area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileListing {
    /// Files in a folder (`None` = root)
    Folder(Option<FolderId>),
    /// Search results for a non-empty query
    Search(String),
}

impl FileListing {
    pub fn key(&self) -> QueryKey {
        match self {
            Self::Folder(folder_id) => QueryKey::files(*folder_id),
            Self::Search(query) => QueryKey::search(query),
        }
    }
}

/// Navigation state for the drive screen.
///
/// Only one of the three selection slots is normally active, but each is
/// cleared independently by its own close action.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationState {
    /// Folder being browsed (`None` = root)
    pub current_folder_id: Option<FolderId>,
    /// Search box contents
    pub search_query: String,
    pub view_mode: ViewMode,
    /// File open in the preview
    pub selected_file: Option<File>,
    /// File open in the share dialog
    pub share_file: Option<File>,
    /// File open in the editor
    pub edit_file: Option<File>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Folder navigation
    // =========================================================================

    pub fn enter_folder(&mut self, id: FolderId) {
        self.current_folder_id = Some(id);
    }

    pub fn go_to_root(&mut self) {
        self.current_folder_id = None;
    }

    pub fn is_at_root(&self) -> bool {
        self.current_folder_id.is_none()
    }

    // =========================================================================
    // Search and layout
    // =========================================================================

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn is_searching(&self) -> bool {
        !self.search_query.is_empty()
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggled();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Open the preview. Other selections are left as they are.
    pub fn open_preview(&mut self, file: File) {
        self.selected_file = Some(file);
    }

    pub fn open_share(&mut self, file: File) {
        self.share_file = Some(file);
    }

    pub fn open_edit(&mut self, file: File) {
        self.edit_file = Some(file);
    }

    /// Move the previewed file into the share dialog.
    pub fn share_from_preview(&mut self) {
        if let Some(file) = self.selected_file.take() {
            self.share_file = Some(file);
        }
    }

    /// Move the previewed file into the editor.
    pub fn edit_from_preview(&mut self) {
        if let Some(file) = self.selected_file.take() {
            self.edit_file = Some(file);
        }
    }

    /// Close the preview and hand back its file for deletion.
    ///
    /// The preview closes whether or not the deletion is later confirmed.
    pub fn delete_from_preview(&mut self) -> Option<File> {
        self.selected_file.take()
    }

    pub fn close_preview(&mut self) {
        self.selected_file = None;
    }

    pub fn close_share(&mut self) {
        self.share_file = None;
    }

    pub fn close_edit(&mut self) {
        self.edit_file = None;
    }

    // =========================================================================
    // Derived read keys
    // =========================================================================

    /// Read feeding the file area: search when the query is non-empty.
    pub fn listing(&self) -> FileListing {
        if self.is_searching() {
            FileListing::Search(self.search_query.clone())
        } else {
            FileListing::Folder(self.current_folder_id)
        }
    }

    /// Cache key of the folder listing under the current folder.
    pub fn folder_key(&self) -> QueryKey {
        QueryKey::folders(self.current_folder_id)
    }

    /// Cache key of the active file read.
    pub fn file_key(&self) -> QueryKey {
        self.listing().key()
    }
}
