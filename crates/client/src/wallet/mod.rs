//! Wallet connection context for Dioxus components.
//!
//! ```text
//! WalletProvider
//! └── ConnectorProvider      raw connector state (Signal<RawWalletState>)
//!     └── WalletAugmented    WalletAugmenter → Memo<ConnectionState>
//!         └── children       use_wallet() / try_use_wallet()
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! rsx! {
//!     WalletProvider { environment: NetworkEnvironment::from_env()?,
//!         Router::<Route> {}
//!     }
//! }
//!
//! // In a descendant component
//! let wallet = use_wallet();
//! rsx! {
//!     if let Some(address) = wallet.address() {
//!         span { "{address}" }
//!     }
//! }
//! ```

mod connector;
pub mod events;
mod hooks;
mod provider;


pub use connector::{ConnectorContext, ConnectorProvider};
pub use hooks::{try_use_wallet, use_connector, use_wallet, use_wallet_with};
pub use provider::{WalletContext, WalletProvider};
