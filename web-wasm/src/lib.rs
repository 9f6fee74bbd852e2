//! OCR Review Web Viewer (Leptos + WASM)

mod app;
pub mod components;
pub mod api;
pub mod canvas;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(app::App);
}
