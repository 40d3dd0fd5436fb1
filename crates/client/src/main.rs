//! Govern Console - Main entry point
//!
//! Shows the wallet connection view on web (WASM) and desktop.

#![allow(non_snake_case)]

use dioxus::prelude::*;
use govern_client::{views::Home, WalletProvider};
use govern_shared::NetworkEnvironment;

fn main() {
    // Initialize tracing for desktop
    #[cfg(not(target_arch = "wasm32"))]
    {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    EnvFilter::new("govern_client=debug,govern_shared=debug")
                }),
            )
            .init();
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let environment = use_hook(NetworkEnvironment::from_env);

    #[cfg(target_arch = "wasm32")]
    use_context_provider(govern_client::telemetry::window_telemetry);

    rsx! {
        script { src: "https://cdn.tailwindcss.com" }

        match environment {
            Ok(environment) => rsx! {
                WalletProvider { environment,
                    Home {}
                }
            },
            Err(err) => rsx! {
                div { class: "p-8 text-red-400", "Invalid network configuration: {err}" }
            },
        }
    }
}
