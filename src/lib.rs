//! Partner login
//!
//! Email/password login page for partner users, built with Leptos and
//! WebAssembly. The submission workflow lives in [`core::login`] behind
//! injected collaborator traits; [`ui`] wires it to Firebase, the backend
//! API, localStorage and the router.

pub mod app;
pub mod core;
pub mod ui;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
