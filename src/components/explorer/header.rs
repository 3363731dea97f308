//! Explorer header component.
//!
//! Contains the brand, the search box and the account menu.

use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::{APP_NAME, SEARCH_PLACEHOLDER};

stylance::import_crate_style!(css, "src/components/explorer/explorer.module.css");

/// Header with search and account actions.
#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let query = Signal::derive(move || ctx.nav.with(|n| n.search_query.clone()));
    let on_input = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        ctx.nav.update(|n| n.set_search_query(value));
    };

    view! {
        <header class=css::header>
            <div class=css::brand>
                <span class=css::brandIcon><Icon icon=ic::DRIVE /></span>
                <h1 class=css::brandName>{APP_NAME}</h1>
            </div>

            <div class=format!("{} {}", css::search, css::desktopOnly)>
                <span class=css::searchIcon><Icon icon=ic::SEARCH /></span>
                <input
                    class=css::searchInput
                    type="text"
                    placeholder=SEARCH_PLACEHOLDER
                    prop:value=move || query.get()
                    on:input=on_input
                />
            </div>

            <AccountMenu />
        </header>
    }
}

/// Avatar with a dropdown showing the account and a logout action.
#[component]
fn AccountMenu() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let (menu_open, set_menu_open) = signal(false);

    let user = Memo::new(move |_| ctx.user());
    let display_name = move || user.get().map(|u| u.display_name()).unwrap_or_default();
    let email = move || user.get().and_then(|u| u.email).unwrap_or_default();

    let avatar = move || {
        let user = user.get()?;
        Some(match user.profile_image_url.clone().filter(|url| !url.is_empty()) {
            Some(url) => view! {
                <img class=css::avatarImage src=url alt=user.display_name() />
            }
            .into_any(),
            None => view! { <span class=css::avatarInitial>{user.initial().to_string()}</span> }
                .into_any(),
        })
    };

    let on_logout = move |_: leptos::ev::MouseEvent| {
        set_menu_open.set(false);
        ctx.logout();
    };

    // Close menu when focus leaves the dropdown wrapper
    let on_focusout = move |event: web_sys::FocusEvent| {
        if let Some(related) = event.related_target() {
            if let Some(current) = event.current_target() {
                use wasm_bindgen::JsCast;
                if let (Some(wrapper), Some(target)) = (
                    current.dyn_ref::<web_sys::Node>(),
                    related.dyn_ref::<web_sys::Node>(),
                )
                    && !wrapper.contains(Some(target))
                {
                    set_menu_open.set(false);
                }
            }
        } else {
            set_menu_open.set(false);
        }
    };

    view! {
        <div class=css::dropdownWrapper on:focusout=on_focusout>
            <button
                class=css::avatar
                on:click=move |_| set_menu_open.update(|v| *v = !*v)
                title="Account"
            >
                {avatar}
            </button>
            <Show when=move || menu_open.get()>
                <div class=css::dropdownMenu>
                    <div class=css::dropdownAccount>
                        <p class=css::accountName>{display_name}</p>
                        <p class=css::accountEmail>{email}</p>
                    </div>
                    <div class=css::dropdownDivider></div>
                    <button
                        class=format!("{} {}", css::dropdownItem, css::dropdownItemDanger)
                        on:click=on_logout
                    >
                        <span class=css::dropdownIcon><Icon icon=ic::LOGOUT /></span>
                        "Log out"
                    </button>
                </div>
            </Show>
        </div>
    }
}
