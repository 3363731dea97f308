//! Notice stack (bottom-right toasts).

use animaldrive_core::Notice;
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/toasts.module.css");

/// A notice on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

#[component]
pub fn ToastStack() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    view! {
        <div class=css::stack role="status" aria-live="polite">
            <For
                each=move || ctx.toasts.get()
                key=|toast| toast.id
                children=move |toast| view! { <ToastItem toast=toast /> }
            />
        </div>
    }
}

#[component]
fn ToastItem(toast: Toast) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let id = toast.id;

    let class = if toast.notice.is_destructive() {
        format!("{} {}", css::toast, css::destructive)
    } else {
        css::toast.to_string()
    };

    let dismiss = move |_: leptos::ev::MouseEvent| {
        ctx.toasts.update(|t| t.retain(|toast| toast.id != id));
    };

    view! {
        <div class=class>
            <div class=css::body>
                <strong class=css::title>{toast.notice.title}</strong>
                <p class=css::description>{toast.notice.description}</p>
            </div>
            <button class=css::close on:click=dismiss title="Dismiss">
                <Icon icon=ic::CLOSE />
            </button>
        </div>
    }
}
