//! Accessors for the wallet context.

use dioxus::prelude::*;
use govern_shared::{resolve_view, AccessPolicy, ConnectionState, WalletError};

use super::connector::ConnectorContext;
use super::provider::WalletContext;

/// The wallet context, or [`WalletError::ContextUnavailable`] outside of a
/// `WalletProvider`.
pub fn try_use_wallet() -> Result<WalletContext, WalletError> {
    try_use_context::<WalletContext>().ok_or(WalletError::ContextUnavailable)
}

/// Current connection view, resolved according to `policy`.
///
/// With [`AccessPolicy::Lenient`] a missing provider yields `Ok(None)`.
pub fn use_wallet_with(policy: AccessPolicy) -> Result<Option<ConnectionState>, WalletError> {
    let view = try_use_context::<WalletContext>().map(|ctx| ctx.view.cloned());
    resolve_view(view, policy)
}

/// Current connection view.
///
/// # Panics
///
/// When called outside of a `WalletProvider`.
pub fn use_wallet() -> ConnectionState {
    match use_wallet_with(AccessPolicy::FailFast) {
        Ok(Some(view)) => view,
        Ok(None) | Err(_) => panic!("{}", WalletError::ContextUnavailable),
    }
}

/// Raw connector state, for connector implementations.
pub fn use_connector() -> ConnectorContext {
    use_context::<ConnectorContext>()
}
