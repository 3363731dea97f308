//! Drive screen components.
//!
//! - [`Explorer`] - Screen layout
//! - [`Header`] - Brand, search box and account menu
//! - [`Toolbar`] - Title, back, new folder and view toggle
//! - [`UploadZone`] - Drop zone, file picker and upload indicator
//! - [`FileGrid`] - Folders and files in grid or list layout
//! - [`CategoryStats`] - Per-category summary of the shown files
//! - [`modals`] - Preview, share and edit dialogs

mod explorer;
mod file_grid;
mod header;
mod modals;
mod stats;
mod toolbar;
mod upload;

pub use explorer::Explorer;
pub use file_grid::FileGrid;
pub use header::Header;
pub use stats::CategoryStats;
pub use toolbar::Toolbar;
pub use upload::UploadZone;
