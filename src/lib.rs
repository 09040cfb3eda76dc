//! # classchat
//!
//! Leptos + WASM chat layer for the class portal: per-class real-time
//! messaging over STOMP with unread tracking, floating chat windows, and
//! desktop notifications.
//!
//! This crate contains the root app shell, the chat dock and window
//! components, application state, network types, and the STOMP connection
//! manager. Frame encoding lives in the sibling `stomp` crate.

pub mod app;
pub mod components;
pub mod net;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::App;

    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(App);
}
