//! Toolbar above the file area: title, back, new folder, view toggle.

use animaldrive_core::ViewMode;
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::NEW_FOLDER_PROMPT;
use crate::utils::dom;

stylance::import_crate_style!(css, "src/components/explorer/explorer.module.css");

#[component]
pub fn Toolbar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let at_root = Signal::derive(move || ctx.nav.with(|n| n.is_at_root()));
    let searching = Signal::derive(move || ctx.nav.with(|n| n.is_searching()));
    let view_mode = Signal::derive(move || ctx.nav.with(|n| n.view_mode));

    let title = move || {
        if searching.get() {
            ctx.nav.with(|n| format!("Results for \"{}\"", n.search_query))
        } else {
            "My Files".to_string()
        }
    };

    let on_back = move |_: leptos::ev::MouseEvent| {
        ctx.nav.update(|n| n.go_to_root());
    };

    let on_new_folder = move |_: leptos::ev::MouseEvent| {
        // Blank names are dropped by the coordinator
        if let Some(name) = dom::prompt(NEW_FOLDER_PROMPT) {
            ctx.create_folder(name);
        }
    };

    let set_mode = move |mode: ViewMode| ctx.nav.update(|n| n.set_view_mode(mode));
    let mode_class = move |mode: ViewMode| {
        if view_mode.get() == mode {
            format!("{} {}", css::modeButton, css::modeButtonActive)
        } else {
            css::modeButton.to_string()
        }
    };

    view! {
        <div class=css::toolbar>
            <div class=css::toolbarTitle>
                <Show when=move || !at_root.get()>
                    <button class=css::navButton on:click=on_back title="Back to My Files">
                        <Icon icon=ic::CHEVRON_LEFT />
                    </button>
                </Show>
                <h2 class=css::titleLabel>{title}</h2>
            </div>

            <div class=css::actionButtons>
                <button class=css::primaryButton on:click=on_new_folder>
                    <Icon icon=ic::PLUS />
                    "New Folder"
                </button>

                <div class=css::modeSwitch>
                    <button
                        class=move || mode_class(ViewMode::Grid)
                        on:click=move |_| set_mode(ViewMode::Grid)
                        title="Grid view"
                    >
                        <Icon icon=ic::GRID />
                    </button>
                    <button
                        class=move || mode_class(ViewMode::List)
                        on:click=move |_| set_mode(ViewMode::List)
                        title="List view"
                    >
                        <Icon icon=ic::LIST />
                    </button>
                </div>
            </div>
        </div>
    }
}
