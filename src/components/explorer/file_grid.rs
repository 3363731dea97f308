//! Folders and files of the current view, as a grid or a list.
//!
//! Folders of the current folder come first, searching or not, then the
//! files of the active read. Items are rendered from server order without re-sorting.

use animaldrive_core::format::format_size;
use animaldrive_core::{File, Folder, ViewMode};
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/explorer/file_grid.module.css");

#[component]
pub fn FileGrid() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let view_mode = Signal::derive(move || ctx.nav.with(|n| n.view_mode));
    let folders = Signal::derive(move || ctx.folders.with(|e| e.data.clone()));
    let files = Signal::derive(move || ctx.files.with(|e| e.data.clone()));
    let is_empty = Signal::derive(move || folders.with(Vec::is_empty) && files.with(Vec::is_empty));

    let container_class = move || match view_mode.get() {
        ViewMode::Grid => css::grid,
        ViewMode::List => css::list,
    };

    view! {
        <Show
            when=move || !ctx.is_loading()
            fallback=|| view! { <div class=css::placeholder>"Loading files..."</div> }
        >
            <Show
                when=move || !is_empty.get()
                fallback=|| view! { <div class=css::placeholder>"No files here yet"</div> }
            >
                <div class=container_class role="grid" aria-label="Files">
                    <For
                        each=move || folders.get()
                        key=|folder| folder.id
                        children=move |folder| view! { <FolderItem folder=folder /> }
                    />
                    <For
                        each=move || files.get()
                        key=|file| file.id
                        children=move |file| view! { <FileItem file=file /> }
                    />
                </div>
            </Show>
        </Show>
    }
}

#[component]
fn FolderItem(folder: Folder) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let id = folder.id;

    let open = move |_: leptos::ev::MouseEvent| {
        ctx.nav.update(|n| n.enter_folder(id));
    };

    view! {
        <div
            class=format!("{} {}", css::item, css::folder)
            on:click=open
            role="row"
            tabindex="0"
            aria-label=format!("Folder: {}", folder.name)
        >
            <span class=css::icon aria-hidden="true"><Icon icon=ic::FOLDER /></span>
            <span class=css::name>{folder.name.clone()}</span>
            <span class=css::meta>"Folder"</span>
        </div>
    }
}

#[component]
fn FileItem(file: File) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let icon = ic::file_icon(&file);
    let size = format_size(file.size);
    let name = file.display_name().to_string();

    let (preview, share, edit, delete) = (file.clone(), file.clone(), file.clone(), file);

    let open = move |_: leptos::ev::MouseEvent| {
        let file = preview.clone();
        ctx.nav.update(|n| n.open_preview(file));
    };
    let on_share = move |ev: leptos::ev::MouseEvent| {
        ev.stop_propagation();
        let file = share.clone();
        ctx.nav.update(|n| n.open_share(file));
    };
    let on_edit = move |ev: leptos::ev::MouseEvent| {
        ev.stop_propagation();
        let file = edit.clone();
        ctx.nav.update(|n| n.open_edit(file));
    };
    let on_delete = move |ev: leptos::ev::MouseEvent| {
        ev.stop_propagation();
        ctx.delete_file(delete.clone());
    };

    view! {
        <div
            class=format!("{} {}", css::item, css::file)
            on:click=open
            role="row"
            tabindex="0"
            aria-label=format!("File: {}", name)
        >
            <span class=css::icon aria-hidden="true"><Icon icon=icon /></span>
            <span class=css::name title=name.clone()>{name.clone()}</span>
            <span class=css::meta>{size}</span>
            <span class=css::actions>
                <button class=css::action on:click=on_share title="Share">
                    <Icon icon=ic::SHARE />
                </button>
                <button class=css::action on:click=on_edit title="Edit">
                    <Icon icon=ic::EDIT />
                </button>
                <button class=format!("{} {}", css::action, css::actionDanger) on:click=on_delete title="Delete">
                    <Icon icon=ic::TRASH />
                </button>
            </span>
        </div>
    }
}
