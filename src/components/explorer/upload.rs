//! Upload drop zone with file picker and in-flight indicator.

use animaldrive_core::UploadProgress;
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::utils::dom;

stylance::import_crate_style!(css, "src/components/explorer/upload.module.css");

#[component]
pub fn UploadZone() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let input_ref = NodeRef::<leptos::html::Input>::new();
    let (drag_active, set_drag_active) = signal(false);

    let uploading = Signal::derive(move || ctx.upload.get().is_pending());

    // Clear the picker so picking the same file again fires `change`
    let reset_input = move || {
        if let Some(input) = input_ref.get_untracked() {
            input.set_value("");
        }
    };

    let on_pick = move |_: leptos::ev::Event| {
        let files = input_ref
            .get_untracked()
            .map(|input| dom::upload_blobs(input.files()))
            .unwrap_or_default();
        ctx.upload_files(files, reset_input);
    };

    let on_browse = move |_: leptos::ev::MouseEvent| {
        if let Some(input) = input_ref.get_untracked() {
            input.click();
        }
    };

    let on_drag_over = move |ev: leptos::ev::DragEvent| {
        ev.prevent_default();
        set_drag_active.set(true);
    };

    let on_drag_leave = move |_: leptos::ev::DragEvent| set_drag_active.set(false);

    let on_drop = move |ev: leptos::ev::DragEvent| {
        ev.prevent_default();
        set_drag_active.set(false);
        let files = dom::upload_blobs(ev.data_transfer().and_then(|dt| dt.files()));
        ctx.upload_files(files, || {});
    };

    let zone_class = move || {
        if drag_active.get() {
            format!("{} {}", css::zone, css::zoneActive)
        } else {
            css::zone.to_string()
        }
    };

    let progress_label = move || match ctx.upload.get() {
        UploadProgress::Pending { uploads: 1 } | UploadProgress::Idle => {
            "Uploading files...".to_string()
        }
        UploadProgress::Pending { uploads } => format!("Uploading files ({} batches)...", uploads),
    };

    view! {
        <section class=css::upload>
            <div
                class=zone_class
                on:dragover=on_drag_over
                on:dragleave=on_drag_leave
                on:drop=on_drop
            >
                <input
                    node_ref=input_ref
                    class=css::hiddenInput
                    type="file"
                    multiple=true
                    on:change=on_pick
                />
                <span class=css::zoneIcon><Icon icon=ic::UPLOAD /></span>
                <h3 class=css::zoneTitle>
                    {move || if drag_active.get() { "Drop files here!" } else { "Drop files here to upload" }}
                </h3>
                <p class=css::zoneHint>"or click to browse from your device"</p>
                <button class=css::browseButton on:click=on_browse disabled=move || uploading.get()>
                    "Choose Files"
                </button>
            </div>

            <Show when=move || uploading.get()>
                <div class=css::progress>
                    <span class=css::progressLabel>{progress_label}</span>
                    <div class=css::progressTrack>
                        <div class=css::progressIndeterminate></div>
                    </div>
                </div>
            </Show>
        </section>
    }
}
