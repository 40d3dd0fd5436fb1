//! Govern Client - wallet connection context for Dioxus apps
//!
//! Wraps the framework-free engine from `govern-shared` in a provider
//! component, publishes the connection view as context and supplies the
//! browser-side transport and telemetry glue.

pub mod logging;

pub mod components;
pub mod telemetry;
pub mod views;
pub mod wallet;

#[cfg(target_arch = "wasm32")]
pub mod eip1193;

#[cfg(target_arch = "wasm32")]
pub use eip1193::{connect_injected, disconnect_injected, JsTransport};
pub use telemetry::ConsoleTelemetry;
pub use wallet::{
    try_use_wallet, use_connector, use_wallet, use_wallet_with, ConnectorContext,
    ConnectorProvider, WalletContext, WalletProvider,
};
