//! The wallet provider component and the context it publishes.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use govern_shared::{
    ConnectionState, ConnectorEvent, FallbackProvider, NetworkEnvironment, ProviderState,
    RevertPolicy, Telemetry, WalletAugmenter, WalletError,
};

use super::connector::{ConnectorContext, ConnectorProvider};
use crate::telemetry::ConsoleTelemetry;

/// Connection view published to descendants of [`WalletProvider`].
#[derive(Clone, Copy)]
pub struct WalletContext {
    pub view: Memo<ConnectionState>,
    pub connector: ConnectorContext,
    /// Set while the latest wallet transport could not be wrapped
    pub provider_error: Signal<Option<WalletError>>,
}

impl WalletContext {
    /// Current connection view
    pub fn state(&self) -> ConnectionState {
        self.view.cloned()
    }

    pub fn is_connected(&self) -> bool {
        self.view.read().is_connected
    }

    pub fn address(&self) -> Option<String> {
        self.view.read().address().map(str::to_string)
    }

    pub fn provider(&self) -> ProviderState {
        self.view.read().provider.clone()
    }

    /// Forward a connector event (connect, account or chain switch, ...)
    pub fn dispatch(&mut self, event: ConnectorEvent) {
        self.connector.dispatch(event);
    }

    pub fn disconnect(&mut self) {
        self.connector.disconnect();
    }
}

/// Wallet context root: connector state plus the derived connection view.
///
/// Telemetry collaborators are taken from a [`Telemetry`] context above this
/// component when present, otherwise they only log.
#[component]
pub fn WalletProvider(
    environment: NetworkEnvironment,
    #[props(default)] revert: RevertPolicy,
    children: Element,
) -> Element {
    rsx! {
        ConnectorProvider { chain_id: environment.chain_id,
            WalletAugmented { environment: environment.clone(), revert, {children} }
        }
    }
}

#[component]
fn WalletAugmented(
    environment: NetworkEnvironment,
    revert: RevertPolicy,
    children: Element,
) -> Element {
    let connector = use_context::<ConnectorContext>();
    // The fallback is built once per mount; a bad environment never recovers.
    let engine = use_hook(|| {
        let telemetry = try_use_context::<Telemetry>().unwrap_or_else(ConsoleTelemetry::pair);
        FallbackProvider::new(&environment).map(|fallback| {
            Rc::new(RefCell::new(
                WalletAugmenter::new(fallback, telemetry).with_revert_policy(revert),
            ))
        })
    });
    let engine = match engine {
        Ok(engine) => engine,
        Err(err) => {
            crate::log_error!("wallet provider unavailable: {}", err);
            return rsx! {
                div { class: "wallet-error", "Wallet unavailable: {err}" }
            };
        }
    };

    let raw = connector.state;

    let view = use_memo({
        let engine = engine.clone();
        move || {
            let raw = raw.read();
            let mut engine = engine.borrow_mut();
            match engine.apply(&raw) {
                Ok(state) => state,
                Err(err) => {
                    crate::log_error!("keeping previous provider: {}", err);
                    engine.degraded(&raw)
                }
            }
        }
    });

    let mut provider_error = use_signal(|| None::<WalletError>);

    // Telemetry side effects run after the view for the same snapshot exists.
    use_effect(move || {
        let _ = view.read();
        let raw = raw.read();
        let mut engine = engine.borrow_mut();
        engine.notify(&raw);

        let error = engine.last_error().cloned();
        if *provider_error.peek() != error {
            provider_error.set(error);
        }
    });

    use_context_provider(|| WalletContext {
        view,
        connector,
        provider_error,
    });

    children
}
