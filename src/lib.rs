pub mod api;
pub mod app;
pub mod chat;
pub mod components;
#[cfg(feature = "ssr")]
pub mod config;
pub mod error;
pub mod handlers;
pub mod platform;
pub mod state;
pub mod storage;
pub mod types;
pub mod voice;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
