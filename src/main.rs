mod app;
mod components;
mod config;
mod host;
mod logger;
mod utils;

use app::App;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();
    logger::init();

    let Some(root) = document().get_element_by_id(config::MOUNT_ELEMENT_ID) else {
        log::error!("#{} element not found", config::MOUNT_ELEMENT_ID);
        return;
    };

    mount_to(root.unchecked_into::<web_sys::HtmlElement>(), App).forget();
}
