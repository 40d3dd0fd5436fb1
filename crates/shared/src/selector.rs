//! Choosing between the fallback and the wallet-injected provider.

use std::rc::Rc;

use crate::error::WalletError;
use crate::provider::{FallbackProvider, InjectedProvider, ProviderState};
use crate::rpc::{TransportHandle, TransportId};

/// Owns the single fallback provider and the injected provider cache.
///
/// The cache holds at most one entry keyed on the transport's identity
/// token. Asking again with the same token returns the same `Rc`, so signers
/// handed out earlier stay bound to the live provider.
#[derive(Debug)]
pub struct ProviderSelector {
    fallback: Rc<FallbackProvider>,
    cached: Option<(TransportId, Rc<InjectedProvider>)>,
}

impl ProviderSelector {
    pub fn new(fallback: FallbackProvider) -> Self {
        Self {
            fallback: Rc::new(fallback),
            cached: None,
        }
    }

    pub fn fallback(&self) -> &Rc<FallbackProvider> {
        &self.fallback
    }

    /// Injected provider for `transport`, building it on first sight of a token.
    ///
    /// `None` drops the cache entry. A failed construction leaves the
    /// previous entry untouched.
    pub fn injected(
        &mut self,
        transport: Option<&TransportHandle>,
    ) -> Result<Option<Rc<InjectedProvider>>, WalletError> {
        let Some(transport) = transport else {
            if let Some((id, _)) = self.cached.take() {
                tracing::debug!(%id, "wallet transport released");
            }
            return Ok(None);
        };

        if let Some((id, provider)) = &self.cached {
            if *id == transport.id() {
                return Ok(Some(Rc::clone(provider)));
            }
        }

        let provider = Rc::new(InjectedProvider::new(transport)?);
        tracing::debug!(id = %transport.id(), "injected provider constructed");
        self.cached = Some((transport.id(), Rc::clone(&provider)));
        Ok(Some(provider))
    }

    /// Injected provider when a transport is present, the fallback otherwise.
    pub fn select(
        &mut self,
        transport: Option<&TransportHandle>,
    ) -> Result<ProviderState, WalletError> {
        Ok(match self.injected(transport)? {
            Some(provider) => ProviderState::Injected(provider),
            None => ProviderState::Fallback(Rc::clone(&self.fallback)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockTransport;

    fn selector() -> ProviderSelector {
        ProviderSelector::new(FallbackProvider::with_transport(
            1,
            TransportHandle::new(MockTransport::new()),
        ))
    }

    #[test]
    fn no_transport_selects_the_same_fallback() {
        let mut selector = selector();
        let first = selector.select(None).unwrap();
        let second = selector.select(None).unwrap();

        assert!(!first.is_injected());
        assert_eq!(first, second);
        assert_eq!(first, ProviderState::Fallback(Rc::clone(selector.fallback())));
    }

    #[test]
    fn same_transport_yields_same_instance() {
        let mut selector = selector();
        let transport = TransportHandle::new(MockTransport::new());

        let a = selector.injected(Some(&transport)).unwrap().unwrap();
        let b = selector.injected(Some(&transport.clone())).unwrap().unwrap();
        assert!(Rc::ptr_eq(&a, &b));

        let other = TransportHandle::new(MockTransport::new());
        let c = selector.injected(Some(&other)).unwrap().unwrap();
        assert!(!Rc::ptr_eq(&a, &c));
    }

    #[test]
    fn releasing_transport_invalidates_cache() {
        let mut selector = selector();
        let transport = TransportHandle::new(MockTransport::new());

        let a = selector.injected(Some(&transport)).unwrap().unwrap();
        assert!(selector.injected(None).unwrap().is_none());
        let b = selector.injected(Some(&transport)).unwrap().unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn failed_construction_keeps_previous_entry() {
        let mut selector = selector();
        let good = TransportHandle::new(MockTransport::new());
        let bad = TransportHandle::new(MockTransport::broken("not an EIP-1193 provider"));

        let a = selector.injected(Some(&good)).unwrap().unwrap();
        let err = selector.select(Some(&bad)).unwrap_err();
        assert!(matches!(err, WalletError::ProviderConstructionFailed { .. }));

        let again = selector.injected(Some(&good)).unwrap().unwrap();
        assert!(Rc::ptr_eq(&a, &again));
    }
}
