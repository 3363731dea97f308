//! Main explorer component.
//!
//! The drive screen: header on top, then the category summary, the
//! toolbar, the upload zone and the file grid. Dialogs float above.

use leptos::prelude::*;

use super::modals::Modals;
use super::{CategoryStats, FileGrid, Header, Toolbar, UploadZone};

stylance::import_crate_style!(css, "src/components/explorer/explorer.module.css");

/// Drive screen component.
#[component]
pub fn Explorer() -> impl IntoView {
    view! {
        <div class=css::explorer>
            <Header />

            <main class=css::body>
                <CategoryStats />
                <Toolbar />
                <UploadZone />
                <FileGrid />
            </main>

            <Modals />
        </div>
    }
}
