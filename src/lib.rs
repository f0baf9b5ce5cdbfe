pub mod api;
pub mod app;
pub mod components;
pub mod config;
#[cfg(feature = "ssr")]
pub mod handlers;
pub mod i18n;
#[cfg(feature = "ssr")]
pub mod middleware;
pub mod models;
pub mod pages;
pub mod refresh;
pub mod state;
pub mod stream;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
