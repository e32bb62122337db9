fn main() {
    #[cfg(target_arch = "wasm32")]
    guarita_web::mount();
}
