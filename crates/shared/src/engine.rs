//! Connection view engine: selector, active provider and telemetry in one place.
//!
//! Framework-free. The Dioxus provider calls [`WalletAugmenter::apply`] from a
//! memo and [`WalletAugmenter::notify`] from an effect; tests call
//! [`WalletAugmenter::update`], which does both.

use std::rc::Rc;

use crate::error::WalletError;
use crate::models::RawWalletState;
use crate::provider::{FallbackProvider, ProviderState};
use crate::selector::ProviderSelector;
use crate::telemetry::{Telemetry, TelemetryGate};
use crate::view::{derive_connection_state, ConnectionState};

/// What happens to the active provider once the wallet transport disappears.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RevertPolicy {
    /// Keep publishing the last injected provider until another transport
    /// replaces it.
    #[default]
    KeepInjected,
    /// Publish the fallback provider again.
    RevertToFallback,
}

pub struct WalletAugmenter {
    selector: ProviderSelector,
    active: ProviderState,
    revert: RevertPolicy,
    telemetry: Telemetry,
    gate: TelemetryGate,
    current: Option<ConnectionState>,
    last_error: Option<WalletError>,
}

impl WalletAugmenter {
    pub fn new(fallback: FallbackProvider, telemetry: Telemetry) -> Self {
        let selector = ProviderSelector::new(fallback);
        let active = ProviderState::Fallback(Rc::clone(selector.fallback()));
        Self {
            selector,
            active,
            revert: RevertPolicy::default(),
            telemetry,
            gate: TelemetryGate::default(),
            current: None,
            last_error: None,
        }
    }

    pub fn with_revert_policy(mut self, revert: RevertPolicy) -> Self {
        self.revert = revert;
        self
    }

    /// Provider currently published to consumers.
    pub fn active_provider(&self) -> &ProviderState {
        &self.active
    }

    /// Last published view.
    pub fn current(&self) -> Option<&ConnectionState> {
        self.current.as_ref()
    }

    /// Error from the most recent `apply`, cleared by the next success.
    pub fn last_error(&self) -> Option<&WalletError> {
        self.last_error.as_ref()
    }

    /// Recompute the view for `raw`.
    ///
    /// A transport that cannot be wrapped fails the call and leaves the
    /// active provider as it was.
    pub fn apply(&mut self, raw: &RawWalletState) -> Result<ConnectionState, WalletError> {
        let injected = match self.selector.injected(raw.ethereum.as_ref()) {
            Ok(injected) => injected,
            Err(err) => {
                self.last_error = Some(err.clone());
                return Err(err);
            }
        };

        match &injected {
            Some(provider) => {
                let next = ProviderState::Injected(Rc::clone(provider));
                if next != self.active {
                    tracing::info!(transport = %provider.transport_id(), "switching to injected provider");
                    self.active = next;
                }
            }
            None if self.revert == RevertPolicy::RevertToFallback && self.active.is_injected() => {
                tracing::info!("wallet transport gone, reverting to fallback provider");
                self.active = ProviderState::Fallback(Rc::clone(self.selector.fallback()));
            }
            None => {}
        }

        let state = derive_connection_state(raw, &self.active, injected.as_ref());
        self.last_error = None;
        self.current = Some(state.clone());
        Ok(state)
    }

    /// View for `raw` without touching the selector: the active provider is
    /// kept and no account is derived.
    pub fn degraded(&mut self, raw: &RawWalletState) -> ConnectionState {
        let state = derive_connection_state(raw, &self.active, None);
        self.current = Some(state.clone());
        state
    }

    /// Fire identify and APM updates that are due for `raw`.
    ///
    /// Collaborator failures are logged and dropped.
    pub fn notify(&mut self, raw: &RawWalletState) {
        if let Some(identify) = self.gate.identify(raw) {
            if let Err(err) = self.telemetry.sink.identify(
                &identify.user_id,
                &identify.network_name,
                &identify.connector_id,
            ) {
                tracing::warn!(error = %err, "identify failed");
            }
        }

        if let Some(network) = self.gate.apm_network(raw.network_name.as_deref()) {
            if let Err(err) = self.telemetry.apm.update(network.as_deref()) {
                tracing::warn!(error = %err, "APM context update failed");
            }
        }
    }

    /// `apply` (or `degraded` when it fails) followed by `notify`.
    pub fn update(&mut self, raw: &RawWalletState) -> ConnectionState {
        let state = match self.apply(raw) {
            Ok(state) => state,
            Err(err) => {
                tracing::error!(error = %err, "keeping previous provider");
                self.degraded(raw)
            }
        };
        self.notify(raw);
        state
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::TelemetryError;
    use crate::models::ConnectionStatus;
    use crate::rpc::mock::MockTransport;
    use crate::rpc::TransportHandle;
    use crate::telemetry::{ApmContext, TelemetrySink};

    #[derive(Default)]
    struct Recorder {
        identified: RefCell<Vec<(String, String, String)>>,
        networks: RefCell<Vec<Option<String>>>,
        fail: bool,
    }

    impl TelemetrySink for Recorder {
        fn identify(&self, user: &str, network: &str, connector: &str) -> Result<(), TelemetryError> {
            self.identified
                .borrow_mut()
                .push((user.to_string(), network.to_string(), connector.to_string()));
            if self.fail {
                return Err(TelemetryError::new("analytics offline"));
            }
            Ok(())
        }
    }

    impl ApmContext for Recorder {
        fn update(&self, network_name: Option<&str>) -> Result<(), TelemetryError> {
            self.networks.borrow_mut().push(network_name.map(str::to_string));
            if self.fail {
                return Err(TelemetryError::new("apm offline"));
            }
            Ok(())
        }
    }

    fn augmenter(recorder: &Rc<Recorder>) -> WalletAugmenter {
        let fallback =
            FallbackProvider::with_transport(1, TransportHandle::new(MockTransport::new()));
        WalletAugmenter::new(fallback, Telemetry::new(recorder.clone(), recorder.clone()))
    }

    fn connected(transport: &TransportHandle) -> RawWalletState {
        RawWalletState {
            status: ConnectionStatus::Connected,
            account: Some("0xABC".to_string()),
            connector: Some("metamask".to_string()),
            network_name: Some("mainnet".to_string()),
            chain_id: Some(1),
            ethereum: Some(transport.clone()),
            ..Default::default()
        }
    }

    #[test]
    fn disconnected_publishes_fallback() {
        let recorder = Rc::new(Recorder::default());
        let mut engine = augmenter(&recorder);

        let view = engine.update(&RawWalletState::default());
        assert!(!view.is_connected);
        assert_eq!(view.account, None);
        assert!(!view.provider.is_injected());
        assert!(recorder.identified.borrow().is_empty());
        assert_eq!(*recorder.networks.borrow(), vec![None]);
    }

    #[test]
    fn connecting_wallet_publishes_injected_and_identifies_once() {
        let recorder = Rc::new(Recorder::default());
        let mut engine = augmenter(&recorder);
        let transport = TransportHandle::new(MockTransport::new());
        engine.update(&RawWalletState::default());

        let raw = connected(&transport);
        let view = engine.update(&raw);
        assert!(view.is_connected);
        assert!(view.provider.is_injected());
        let account = view.account.clone().expect("account");
        assert_eq!(account.address, "0xABC");
        let active = view.provider.as_injected().expect("injected provider");
        assert!(Rc::ptr_eq(account.signer.provider(), active));

        // re-renders with the same inputs
        engine.update(&raw);
        engine.update(&raw.clone());

        assert_eq!(
            *recorder.identified.borrow(),
            vec![("0xABC".to_string(), "mainnet".to_string(), "metamask".to_string())]
        );
        assert_eq!(
            *recorder.networks.borrow(),
            vec![None, Some("mainnet".to_string())]
        );
    }

    #[test]
    fn injected_provider_is_stable_across_updates() {
        let recorder = Rc::new(Recorder::default());
        let mut engine = augmenter(&recorder);
        let transport = TransportHandle::new(MockTransport::new());

        let first = engine.update(&connected(&transport));
        let mut raw = connected(&transport);
        raw.balance = Some("7".to_string());
        let second = engine.update(&raw);
        assert_eq!(first.provider, second.provider);
    }

    #[test]
    fn transport_before_connected_status() {
        let recorder = Rc::new(Recorder::default());
        let mut engine = augmenter(&recorder);
        let transport = TransportHandle::new(MockTransport::new());

        let raw = RawWalletState {
            status: ConnectionStatus::Connecting,
            connector: Some("metamask".to_string()),
            ethereum: Some(transport),
            ..Default::default()
        };
        let view = engine.update(&raw);
        assert!(view.provider.is_injected());
        assert!(!view.is_connected);
        assert_eq!(view.account, None);
    }

    #[test]
    fn connected_status_before_transport() {
        let recorder = Rc::new(Recorder::default());
        let mut engine = augmenter(&recorder);
        let mut raw = connected(&TransportHandle::new(MockTransport::new()));
        raw.ethereum = None;

        let view = engine.update(&raw);
        assert!(view.is_connected);
        assert!(!view.provider.is_injected());
        assert_eq!(view.account, None);
    }

    #[test]
    fn losing_transport_keeps_injected_provider_by_default() {
        let recorder = Rc::new(Recorder::default());
        let mut engine = augmenter(&recorder);
        let transport = TransportHandle::new(MockTransport::new());

        let connected_view = engine.update(&connected(&transport));
        let view = engine.update(&RawWalletState::default());

        assert_eq!(view.provider, connected_view.provider);
        assert!(view.provider.is_injected());
        assert_eq!(view.account, None);
        assert!(!view.is_connected);
    }

    #[test]
    fn revert_policy_restores_fallback() {
        let recorder = Rc::new(Recorder::default());
        let mut engine = augmenter(&recorder).with_revert_policy(RevertPolicy::RevertToFallback);
        let transport = TransportHandle::new(MockTransport::new());

        engine.update(&connected(&transport));
        let view = engine.update(&RawWalletState::default());
        assert!(!view.provider.is_injected());
        assert_eq!(
            view.provider,
            ProviderState::Fallback(Rc::clone(engine.selector.fallback()))
        );
    }

    #[test]
    fn broken_transport_keeps_previous_provider() {
        let recorder = Rc::new(Recorder::default());
        let mut engine = augmenter(&recorder);
        let good = TransportHandle::new(MockTransport::new());
        let first = engine.update(&connected(&good));

        let bad = TransportHandle::new(MockTransport::broken("missing request()"));
        let raw = connected(&bad);
        assert!(matches!(
            engine.apply(&raw),
            Err(WalletError::ProviderConstructionFailed { .. })
        ));
        assert!(engine.last_error().is_some());
        assert_eq!(engine.active_provider(), &first.provider);

        let view = engine.update(&raw);
        assert_eq!(view.provider, first.provider);
        assert_eq!(view.account, None);
        assert!(view.is_connected);

        engine.apply(&connected(&good)).unwrap();
        assert!(engine.last_error().is_none());
    }

    #[test]
    fn telemetry_failures_are_swallowed() {
        let recorder = Rc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let mut engine = augmenter(&recorder);
        let transport = TransportHandle::new(MockTransport::new());

        let view = engine.update(&connected(&transport));
        assert!(view.is_connected);
        assert_eq!(engine.current(), Some(&view));
        assert_eq!(recorder.identified.borrow().len(), 1);
    }
}
