use client::app::App;
use leptos::*;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("wasm logging enabled");

    mount_to_body(|| view! { <App /> })
}
