//! UI components built with Leptos.
//!
//! - [`explorer`] - The drive screen (header, toolbar, upload, file grid,
//!   modals)
//! - [`icons`] - Centralized icon definitions (change theme here)
//! - [`toasts`] - Notice stack

pub mod explorer;
pub mod icons;
pub mod toasts;

pub use explorer::Explorer;
