//! Best-effort analytics and APM collaborators.

use std::rc::Rc;

use crate::error::TelemetryError;
use crate::models::{ConnectionStatus, RawWalletState};

/// Analytics backend receiving user identification.
pub trait TelemetrySink {
    fn identify(
        &self,
        user_id: &str,
        network_name: &str,
        connector_id: &str,
    ) -> Result<(), TelemetryError>;
}

/// APM agent whose context carries the current network.
pub trait ApmContext {
    fn update(&self, network_name: Option<&str>) -> Result<(), TelemetryError>;
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn identify(&self, _: &str, _: &str, _: &str) -> Result<(), TelemetryError> {
        Ok(())
    }
}

impl ApmContext for NoopTelemetry {
    fn update(&self, _: Option<&str>) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// The pair of collaborators handed to the wallet provider.
#[derive(Clone)]
pub struct Telemetry {
    pub sink: Rc<dyn TelemetrySink>,
    pub apm: Rc<dyn ApmContext>,
}

impl Telemetry {
    pub fn new(sink: Rc<dyn TelemetrySink>, apm: Rc<dyn ApmContext>) -> Self {
        Self { sink, apm }
    }

    pub fn noop() -> Self {
        Self::new(Rc::new(NoopTelemetry), Rc::new(NoopTelemetry))
    }
}

/// Values identify reacts to. A change in any of them re-evaluates it.
type IdentifyKey = (ConnectionStatus, Option<String>, Option<String>, Option<String>);

/// Decides when identify and APM updates are due.
#[derive(Debug, Default)]
pub struct TelemetryGate {
    identify_key: Option<IdentifyKey>,
    apm_network: Option<Option<String>>,
}

/// An identify call that is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identify {
    pub user_id: String,
    pub network_name: String,
    pub connector_id: String,
}

impl TelemetryGate {
    /// Identify payload if the status/account/connector/network group changed
    /// since the last call and the wallet is fully connected.
    pub fn identify(&mut self, raw: &RawWalletState) -> Option<Identify> {
        let key = (
            raw.status,
            raw.account.clone(),
            raw.connector.clone(),
            raw.network_name.clone(),
        );
        if self.identify_key.as_ref() == Some(&key) {
            return None;
        }
        self.identify_key = Some(key);

        if raw.status != ConnectionStatus::Connected {
            return None;
        }
        let user_id = raw.account()?;
        let network_name = raw.network_name.as_deref().filter(|n| !n.is_empty())?;
        let connector_id = raw.connector.as_deref().filter(|c| !c.is_empty())?;
        Some(Identify {
            user_id: user_id.to_string(),
            network_name: network_name.to_string(),
            connector_id: connector_id.to_string(),
        })
    }

    /// `Some(network)` when the published network name changed, including the
    /// first evaluation.
    pub fn apm_network(&mut self, network_name: Option<&str>) -> Option<Option<String>> {
        let network = network_name.map(str::to_string);
        if self.apm_network.as_ref() == Some(&network) {
            return None;
        }
        self.apm_network = Some(network.clone());
        Some(network)
    }
}
