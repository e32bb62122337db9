#![recursion_limit = "256"]

pub mod app;
pub mod components;
pub mod pages;
pub mod services;
pub mod state;

#[cfg(target_arch = "wasm32")]
pub fn mount() {
    use app::App;
    console_error_panic_hook::set_once();
    // Client-side only rendering (no SSR).
    leptos::mount::mount_to_body(App);
}
