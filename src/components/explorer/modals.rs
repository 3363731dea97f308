//! Preview, share and edit dialogs.
//!
//! Each dialog is driven by its own selection slot in the navigation state
//! and closes by clearing that slot.

use animaldrive_core::format::format_size;
use animaldrive_core::{File, FileCategory};
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/explorer/modals.module.css");

/// All dialogs, each shown while its slot is set.
#[component]
pub fn Modals() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let selected = Memo::new(move |_| ctx.nav.with(|n| n.selected_file.clone()));
    let shared = Memo::new(move |_| ctx.nav.with(|n| n.share_file.clone()));
    let edited = Memo::new(move |_| ctx.nav.with(|n| n.edit_file.clone()));

    view! {
        {move || selected.get().map(|file| view! { <PreviewModal file=file /> })}
        {move || shared.get().map(|file| view! { <ShareModal file=file /> })}
        {move || edited.get().map(|file| view! { <EditModal file=file /> })}
    }
}

/// Dialog frame with a title bar and a close button.
#[component]
fn ModalFrame(
    title: String,
    on_close: impl Fn() + Copy + Send + Sync + 'static,
    children: Children,
) -> impl IntoView {
    view! {
        <div class=css::backdrop on:click=move |_| on_close()>
            <div
                class=css::modal
                role="dialog"
                aria-modal="true"
                on:click=|ev: leptos::ev::MouseEvent| ev.stop_propagation()
            >
                <div class=css::titleBar>
                    <h3 class=css::title>{title}</h3>
                    <button class=css::close on:click=move |_| on_close() title="Close">
                        <Icon icon=ic::CLOSE />
                    </button>
                </div>
                <div class=css::content>{children()}</div>
            </div>
        </div>
    }
}

/// Metadata rows shared by the dialogs.
#[component]
fn FileDetails(file: File) -> impl IntoView {
    let category = FileCategory::of(&file);
    let mime = file.mime_type.clone().unwrap_or_else(|| "unknown".to_string());
    let created = file.created_at.clone().unwrap_or_else(|| "-".to_string());

    view! {
        <dl class=css::details>
            <dt>"Type"</dt>
            <dd>{format!("{} ({})", category.label(), mime)}</dd>
            <dt>"Size"</dt>
            <dd>{format_size(file.size)}</dd>
            <dt>"Uploaded"</dt>
            <dd>{created}</dd>
        </dl>
    }
}

#[component]
fn PreviewModal(file: File) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let icon = ic::file_icon(&file);

    let close = move || ctx.nav.update(|n| n.close_preview());
    let on_share = move |_: leptos::ev::MouseEvent| ctx.nav.update(|n| n.share_from_preview());
    let on_edit = move |_: leptos::ev::MouseEvent| ctx.nav.update(|n| n.edit_from_preview());
    let on_delete = move |_: leptos::ev::MouseEvent| ctx.delete_from_preview();

    view! {
        <ModalFrame title=file.display_name().to_string() on_close=close>
            <div class=css::previewIcon><Icon icon=icon /></div>
            <FileDetails file=file.clone() />
            <div class=css::buttons>
                <button class=css::button on:click=on_share>
                    <Icon icon=ic::SHARE />
                    "Share"
                </button>
                <button class=css::button on:click=on_edit>
                    <Icon icon=ic::EDIT />
                    "Edit"
                </button>
                <button class=format!("{} {}", css::button, css::buttonDanger) on:click=on_delete>
                    <Icon icon=ic::TRASH />
                    "Delete"
                </button>
            </div>
        </ModalFrame>
    }
}

#[component]
fn ShareModal(file: File) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let close = move || ctx.nav.update(|n| n.close_share());

    view! {
        <ModalFrame title=format!("Share \"{}\"", file.display_name()) on_close=close>
            <FileDetails file=file.clone() />
            <p class=css::hint>"Sharing is managed by the storage service."</p>
            <div class=css::buttons>
                <button class=css::button on:click=move |_| close()>"Done"</button>
            </div>
        </ModalFrame>
    }
}

#[component]
fn EditModal(file: File) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let close = move || ctx.nav.update(|n| n.close_edit());

    view! {
        <ModalFrame title=format!("Edit \"{}\"", file.display_name()) on_close=close>
            <FileDetails file=file.clone() />
            <p class=css::hint>"Editing happens in the storage service's editor."</p>
            <div class=css::buttons>
                <button class=css::button on:click=move |_| close()>"Close"</button>
            </div>
        </ModalFrame>
    }
}
