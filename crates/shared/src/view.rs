//! The published connection view and the reducer that derives it.

use std::rc::Rc;

use crate::error::WalletError;
use crate::models::{ConnectionStatus, RawWalletState};
use crate::provider::{InjectedProvider, ProviderState, SignerHandle};
use crate::rpc::TransportHandle;

/// Connected account with a signer from the injected provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub address: String,
    pub signer: SignerHandle,
}

/// What descendants of the wallet provider see.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    pub is_connected: bool,
    /// Only set when an injected provider exists and the connector reports
    /// a non-empty account.
    pub account: Option<Account>,
    pub provider: ProviderState,
    pub connector: Option<String>,
    pub network_name: Option<String>,
    pub chain_id: Option<u64>,
    pub balance: Option<String>,
    pub error: Option<String>,
    /// Wallet transport as reported by the connector
    pub ethereum: Option<TransportHandle>,
}

impl ConnectionState {
    pub fn address(&self) -> Option<&str> {
        self.account.as_ref().map(|a| a.address.as_str())
    }

    pub fn signer(&self) -> Option<&SignerHandle> {
        self.account.as_ref().map(|a| &a.signer)
    }
}

/// Derive the view from the connector snapshot.
///
/// `active` is the provider published to consumers; `injected` is the
/// provider built for the snapshot's current transport. The account signer
/// always comes from `injected`, never from `active`.
pub fn derive_connection_state(
    raw: &RawWalletState,
    active: &ProviderState,
    injected: Option<&Rc<InjectedProvider>>,
) -> ConnectionState {
    let account = match (injected, raw.account()) {
        (Some(provider), Some(address)) => Some(Account {
            address: address.to_string(),
            signer: provider.signer(address),
        }),
        _ => None,
    };

    ConnectionState {
        status: raw.status,
        is_connected: raw.status == ConnectionStatus::Connected,
        account,
        provider: active.clone(),
        connector: raw.connector.clone(),
        network_name: raw.network_name.clone(),
        chain_id: raw.chain_id,
        balance: raw.balance.clone(),
        error: raw.error.clone(),
        ethereum: raw.ethereum.clone(),
    }
}

/// What to do when the view is read outside of a provider subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Report [`WalletError::ContextUnavailable`].
    #[default]
    FailFast,
    /// Return `None` and let the caller render without a wallet.
    Lenient,
}

/// Apply `policy` to a possibly missing view.
pub fn resolve_view(
    view: Option<ConnectionState>,
    policy: AccessPolicy,
) -> Result<Option<ConnectionState>, WalletError> {
    match (view, policy) {
        (Some(view), _) => Ok(Some(view)),
        (None, AccessPolicy::Lenient) => Ok(None),
        (None, AccessPolicy::FailFast) => Err(WalletError::ContextUnavailable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FallbackProvider;
    use crate::rpc::mock::MockTransport;

    fn fallback() -> ProviderState {
        ProviderState::Fallback(Rc::new(FallbackProvider::with_transport(
            1,
            TransportHandle::new(MockTransport::new()),
        )))
    }

    fn injected() -> Rc<InjectedProvider> {
        Rc::new(InjectedProvider::new(&TransportHandle::new(MockTransport::new())).unwrap())
    }

    fn raw(status: ConnectionStatus, account: Option<&str>) -> RawWalletState {
        RawWalletState {
            status,
            account: account.map(str::to_string),
            connector: Some("injected".to_string()),
            network_name: Some("mainnet".to_string()),
            chain_id: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn only_connected_status_is_connected() {
        let active = fallback();
        for status in [
            ConnectionStatus::Disconnected,
            ConnectionStatus::Connecting,
            ConnectionStatus::Error,
        ] {
            let view = derive_connection_state(&raw(status, Some("0xABC")), &active, None);
            assert!(!view.is_connected, "{status} must not be connected");
        }
        let view = derive_connection_state(&raw(ConnectionStatus::Connected, None), &active, None);
        assert!(view.is_connected);
    }

    #[test]
    fn account_needs_an_injected_provider() {
        let view = derive_connection_state(
            &raw(ConnectionStatus::Connected, Some("0xABC")),
            &fallback(),
            None,
        );
        assert_eq!(view.account, None);
    }

    #[test]
    fn account_signer_comes_from_injected_provider() {
        let provider = injected();
        let active = ProviderState::Injected(provider.clone());
        let view = derive_connection_state(
            &raw(ConnectionStatus::Connected, Some("0xABC")),
            &active,
            Some(&provider),
        );

        let account = view.account.expect("account");
        assert_eq!(account.address, "0xABC");
        assert_eq!(account.signer.address(), "0xABC");
        assert!(Rc::ptr_eq(account.signer.provider(), &provider));
        assert_eq!(view.provider, active);
    }

    #[test]
    fn empty_account_string_yields_no_account() {
        let provider = injected();
        let view = derive_connection_state(
            &raw(ConnectionStatus::Connected, Some("")),
            &ProviderState::Injected(provider.clone()),
            Some(&provider),
        );
        assert_eq!(view.account, None);
    }

    #[test]
    fn raw_fields_pass_through() {
        let mut snapshot = raw(ConnectionStatus::Error, None);
        snapshot.balance = Some("42".to_string());
        snapshot.error = Some("rejected".to_string());
        let transport = TransportHandle::new(MockTransport::new());
        snapshot.ethereum = Some(transport.clone());

        let view = derive_connection_state(&snapshot, &fallback(), None);
        assert_eq!(view.ethereum.as_ref(), Some(&transport));
        assert_eq!(view.status, ConnectionStatus::Error);
        assert_eq!(view.connector.as_deref(), Some("injected"));
        assert_eq!(view.network_name.as_deref(), Some("mainnet"));
        assert_eq!(view.chain_id, Some(1));
        assert_eq!(view.balance.as_deref(), Some("42"));
        assert_eq!(view.error.as_deref(), Some("rejected"));
    }

    #[test]
    fn access_policy() {
        assert_eq!(
            resolve_view(None, AccessPolicy::FailFast),
            Err(WalletError::ContextUnavailable)
        );
        assert_eq!(resolve_view(None, AccessPolicy::Lenient), Ok(None));

        let view = derive_connection_state(&RawWalletState::default(), &fallback(), None);
        assert_eq!(
            resolve_view(Some(view.clone()), AccessPolicy::FailFast),
            Ok(Some(view))
        );
    }
}
