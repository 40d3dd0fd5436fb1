//! Raw connector state, the inbound side of the wallet context.
//!
//! Connector implementations (extension, WalletConnect, ...) live elsewhere
//! and report through [`ConnectorContext::dispatch`].

use dioxus::prelude::*;
use govern_shared::{ConnectionStatus, ConnectorEvent, RawWalletState};

/// Subscribable connector state shared with the wallet provider.
#[derive(Clone, Copy)]
pub struct ConnectorContext {
    pub state: Signal<RawWalletState>,
    /// Chain the app is configured for; other chains are reported as errors
    pub chain_id: u64,
}

impl ConnectorContext {
    /// Fold a connector event into the shared state.
    pub fn dispatch(&mut self, event: ConnectorEvent) {
        crate::log_debug!("connector event: {:?}", event);
        let expected = self.chain_id;
        let mut state = self.state.write();
        state.apply(event);
        state.enforce_chain(expected);
    }

    pub fn disconnect(&mut self) {
        self.dispatch(ConnectorEvent::Disconnected);
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state.read().status
    }
}

/// Provides a [`ConnectorContext`] to its children.
#[component]
pub fn ConnectorProvider(chain_id: u64, children: Element) -> Element {
    let state = use_signal(RawWalletState::default);

    use_context_provider(|| ConnectorContext { state, chain_id });

    children
}
