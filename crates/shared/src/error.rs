//! Shared error types for the wallet connection view.

use thiserror::Error;

/// Errors raised while building or publishing the connection view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// The RPC client rejected the wallet transport handle.
    ///
    /// Not recovered locally. The provider that was active before the attempt
    /// stays active.
    #[error("provider construction failed: {reason}")]
    ProviderConstructionFailed { reason: String },

    /// The fallback endpoint has no known URL for this chain.
    #[error("unsupported network: chain id {chain_id}")]
    UnsupportedNetwork { chain_id: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The connection view was read outside of the provider subtree.
    #[error("connection view read outside of a WalletProvider")]
    ContextUnavailable,

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl WalletError {
    pub fn construction(reason: impl Into<String>) -> Self {
        WalletError::ProviderConstructionFailed {
            reason: reason.into(),
        }
    }
}

/// JSON-RPC failures surfaced by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// JSON-RPC error object returned by the node or wallet.
    #[error("rpc error {code}: {message}")]
    Response { code: i64, message: String },
    #[error("decode error: {0}")]
    Decode(String),
}

/// Failure reported by a telemetry or APM collaborator.
///
/// Always recovered by the caller: logged, then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("telemetry sink failure: {0}")]
pub struct TelemetryError(pub String);

impl TelemetryError {
    pub fn new(msg: impl Into<String>) -> Self {
        TelemetryError(msg.into())
    }
}
