//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use animaldrive_core::{File, FileCategory};
use icondata::Icon;

use crate::config::IconTheme;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuChevronLeft as ChevronLeft, LuFile as File, LuFileText as FileText,
        LuFolder as Folder, LuHardDrive as Drive, LuImage as FileImage,
        LuLayoutGrid as Grid, LuList as List, LuLogOut as Logout, LuMusic as FileAudio,
        LuPencil as Edit, LuPlus as Plus, LuSearch as Search, LuShare2 as Share,
        LuTrash2 as Trash, LuUpload as Upload, LuVideo as FileVideo, LuX as Close,
    };
}

mod bootstrap {
    pub use icondata::{
        BsBoxArrowRight as Logout, BsChevronLeft as ChevronLeft, BsFileEarmark as File,
        BsFileEarmarkImage as FileImage, BsFileEarmarkMusic as FileAudio,
        BsFileEarmarkPlay as FileVideo, BsFileEarmarkText as FileText,
        BsFolderFill as Folder, BsGrid as Grid, BsHddStack as Drive, BsListUl as List,
        BsPencil as Edit, BsPlusLg as Plus, BsSearch as Search, BsShare as Share,
        BsTrash as Trash, BsUpload as Upload, BsXLg as Close,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(CHEVRON_LEFT, ChevronLeft);
themed_icon!(DRIVE, Drive);
themed_icon!(FOLDER, Folder);
themed_icon!(FILE, File);
themed_icon!(FILE_TEXT, FileText);
themed_icon!(FILE_IMAGE, FileImage);
themed_icon!(FILE_VIDEO, FileVideo);
themed_icon!(FILE_AUDIO, FileAudio);
themed_icon!(SEARCH, Search);
themed_icon!(LIST, List);
themed_icon!(GRID, Grid);
themed_icon!(PLUS, Plus);
themed_icon!(UPLOAD, Upload);
themed_icon!(CLOSE, Close);
themed_icon!(SHARE, Share);
themed_icon!(EDIT, Edit);
themed_icon!(TRASH, Trash);
themed_icon!(LOGOUT, Logout);

/// Icon for a file category.
pub fn category_icon(category: FileCategory) -> Icon {
    match category {
        FileCategory::Images => FILE_IMAGE,
        FileCategory::Videos => FILE_VIDEO,
        FileCategory::Audio => FILE_AUDIO,
        FileCategory::Documents => FILE_TEXT,
        FileCategory::Other => FILE,
    }
}

/// Icon for a file, by its MIME type.
pub fn file_icon(file: &File) -> Icon {
    category_icon(FileCategory::of(file))
}
