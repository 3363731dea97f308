//! Per-category summary of the files on screen.

use animaldrive_core::FileCategoryStats;
use animaldrive_core::format::format_size;
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/explorer/explorer.module.css");

#[component]
pub fn CategoryStats() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let stats = Memo::new(move |_| ctx.files.with(|e| FileCategoryStats::from_files(&e.data)));

    let cards = move || {
        stats
            .get()
            .iter()
            .map(|(category, tally)| {
                view! {
                    <div class=css::statCard>
                        <span class=css::statIcon><Icon icon=ic::category_icon(category) /></span>
                        <span class=css::statLabel>{category.label()}</span>
                        <span class=css::statCount>{format!("{} files", tally.count)}</span>
                        <span class=css::statSize>{format_size(Some(tally.bytes))}</span>
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <section class=css::stats aria-label="Storage by category">
            {cards}
        </section>
    }
}
