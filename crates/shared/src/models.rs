//! Raw wallet connection state as reported by the connector layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::networks;
use crate::rpc::TransportHandle;

/// Connector status, mirrored into the published view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disconnected" => Ok(ConnectionStatus::Disconnected),
            "connecting" => Ok(ConnectionStatus::Connecting),
            "connected" => Ok(ConnectionStatus::Connected),
            "error" => Ok(ConnectionStatus::Error),
            other => Err(format!("unknown connection status: {other}")),
        }
    }
}

/// Snapshot of the connector layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWalletState {
    pub status: ConnectionStatus,
    pub account: Option<String>,
    /// Which wallet backend is active (e.g. "injected", "walletconnect")
    pub connector: Option<String>,
    pub network_name: Option<String>,
    pub chain_id: Option<u64>,
    /// Balance in wei as a decimal string, when the connector tracks it
    pub balance: Option<String>,
    pub error: Option<String>,
    /// Transport injected by the wallet, if any
    pub ethereum: Option<TransportHandle>,
}

/// Connector lifecycle events (connect, disconnect, account and network switch).
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorEvent {
    Connecting {
        connector: String,
    },
    Connected {
        connector: String,
        account: String,
        chain_id: u64,
        transport: TransportHandle,
    },
    AccountChanged(Option<String>),
    ChainChanged(u64),
    BalanceChanged(Option<String>),
    Failed(String),
    Disconnected,
}

impl RawWalletState {
    /// Non-empty account, if any.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref().filter(|a| !a.is_empty())
    }

    /// Fold a connector event into the snapshot.
    pub fn apply(&mut self, event: ConnectorEvent) {
        match event {
            ConnectorEvent::Connecting { connector } => {
                self.status = ConnectionStatus::Connecting;
                self.connector = Some(connector);
                self.error = None;
            }
            ConnectorEvent::Connected {
                connector,
                account,
                chain_id,
                transport,
            } => {
                self.status = ConnectionStatus::Connected;
                self.connector = Some(connector);
                self.account = Some(account);
                self.set_chain(chain_id);
                self.ethereum = Some(transport);
                self.error = None;
            }
            // A wallet reporting no accounts has been locked or disconnected.
            ConnectorEvent::AccountChanged(None) | ConnectorEvent::Disconnected => {
                *self = RawWalletState::default();
            }
            ConnectorEvent::AccountChanged(Some(account)) => {
                self.account = Some(account);
                self.balance = None;
            }
            ConnectorEvent::ChainChanged(chain_id) => {
                self.set_chain(chain_id);
                self.balance = None;
                // a switch may clear an earlier unsupported-chain error
                if self.ethereum.is_some() && self.account().is_some() {
                    self.status = ConnectionStatus::Connected;
                    self.error = None;
                }
            }
            ConnectorEvent::BalanceChanged(balance) => {
                self.balance = balance;
            }
            ConnectorEvent::Failed(message) => {
                self.status = ConnectionStatus::Error;
                self.error = Some(message);
            }
        }
    }

    /// Turn a connection to a chain other than `expected` into an error.
    pub fn enforce_chain(&mut self, expected: u64) {
        if self.status != ConnectionStatus::Connected {
            return;
        }
        if let Some(actual) = self.chain_id.filter(|actual| *actual != expected) {
            self.status = ConnectionStatus::Error;
            self.error = Some(format!("unsupported chain {actual}, expected {expected}"));
        }
    }

    fn set_chain(&mut self, chain_id: u64) {
        self.chain_id = Some(chain_id);
        self.network_name = networks::network_name(chain_id).map(str::to_string);
    }
}
