//! Framework-free core of the govern wallet connection view.
//!
//! Derives a single connection view from the connector's raw state and the
//! RPC provider that is currently available, and tells telemetry about
//! account and network changes. The Dioxus bindings live in `govern-client`.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod networks;
pub mod provider;
pub mod rpc;
pub mod selector;
pub mod telemetry;
pub mod view;

pub use config::NetworkEnvironment;
pub use engine::{RevertPolicy, WalletAugmenter};
pub use error::*;
pub use models::*;
pub use provider::{FallbackProvider, InjectedProvider, ProviderState, RpcProvider, SignerHandle};
pub use rpc::{HttpTransport, Transport, TransportHandle, TransportId};
pub use selector::ProviderSelector;
pub use telemetry::{ApmContext, NoopTelemetry, Telemetry, TelemetrySink};
pub use view::{derive_connection_state, resolve_view, AccessPolicy, Account, ConnectionState};
