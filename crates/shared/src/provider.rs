//! RPC providers: the read-only fallback and the wallet-injected provider.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::NetworkEnvironment;
use crate::error::{RpcError, WalletError};
use crate::rpc::{parse_quantity, HttpTransport, TransportHandle, TransportId};

/// Typed `eth_*` calls over any transport.
#[derive(Debug, Clone)]
pub struct RpcProvider {
    transport: TransportHandle,
}

impl RpcProvider {
    pub fn new(transport: TransportHandle) -> Self {
        Self { transport }
    }

    pub fn transport_id(&self) -> TransportId {
        self.transport.id()
    }

    /// Send a raw request and decode its result.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let value = self.transport.request(method, params).await?;
        serde_json::from_value(value).map_err(|e| RpcError::Decode(format!("{method}: {e}")))
    }

    pub async fn get_chain_id(&self) -> Result<u64, RpcError> {
        let raw: String = self.request("eth_chainId", json!([])).await?;
        quantity_u64(&raw)
    }

    pub async fn get_block_number(&self) -> Result<u64, RpcError> {
        let raw: String = self.request("eth_blockNumber", json!([])).await?;
        quantity_u64(&raw)
    }

    /// Balance in wei at the latest block.
    pub async fn get_balance(&self, address: &str) -> Result<u128, RpcError> {
        let raw: String = self
            .request("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_quantity(&raw)
    }

    pub async fn list_accounts(&self) -> Result<Vec<String>, RpcError> {
        self.request("eth_accounts", json!([])).await
    }
}

fn quantity_u64(raw: &str) -> Result<u64, RpcError> {
    let value = parse_quantity(raw)?;
    u64::try_from(value).map_err(|_| RpcError::Decode(format!("quantity overflows u64: {raw}")))
}

/// Read-only provider on a public endpoint. Built once at startup.
#[derive(Debug)]
pub struct FallbackProvider {
    rpc: RpcProvider,
    chain_id: u64,
}

impl FallbackProvider {
    /// Build the fallback on the configured Infura (or explicit) endpoint.
    pub fn new(environment: &NetworkEnvironment) -> Result<Self, WalletError> {
        let transport = HttpTransport::new(environment.fallback_rpc_url()?);
        tracing::debug!(
            chain_id = environment.chain_id,
            host = ?transport.url().host_str(),
            "fallback provider ready"
        );
        Ok(Self::with_transport(
            environment.chain_id,
            TransportHandle::new(transport),
        ))
    }

    pub fn with_transport(chain_id: u64, transport: TransportHandle) -> Self {
        Self {
            rpc: RpcProvider::new(transport),
            chain_id,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

impl Deref for FallbackProvider {
    type Target = RpcProvider;

    fn deref(&self) -> &RpcProvider {
        &self.rpc
    }
}

/// Provider wrapping a wallet transport. The only kind that hands out signers.
#[derive(Debug)]
pub struct InjectedProvider {
    rpc: RpcProvider,
}

impl InjectedProvider {
    /// Wrap a wallet transport, validating it first.
    pub fn new(transport: &TransportHandle) -> Result<Self, WalletError> {
        transport.validate().map_err(WalletError::construction)?;
        Ok(Self {
            rpc: RpcProvider::new(transport.clone()),
        })
    }

    /// Signer for `address`, bound to this provider.
    pub fn signer(self: &Rc<Self>, address: impl Into<String>) -> SignerHandle {
        SignerHandle {
            address: address.into(),
            provider: Rc::clone(self),
        }
    }
}

impl Deref for InjectedProvider {
    type Target = RpcProvider;

    fn deref(&self) -> &RpcProvider {
        &self.rpc
    }
}

/// Capability to act for one account through an injected provider.
#[derive(Clone)]
pub struct SignerHandle {
    address: String,
    provider: Rc<InjectedProvider>,
}

impl SignerHandle {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn provider(&self) -> &Rc<InjectedProvider> {
        &self.provider
    }

    /// Whether the wallet still exposes this account.
    pub async fn is_authorized(&self) -> Result<bool, RpcError> {
        let accounts = self.provider.list_accounts().await?;
        Ok(accounts
            .iter()
            .any(|a| a.eq_ignore_ascii_case(&self.address)))
    }
}

impl PartialEq for SignerHandle {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && Rc::ptr_eq(&self.provider, &other.provider)
    }
}

impl fmt::Debug for SignerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerHandle")
            .field("address", &self.address)
            .field("transport", &self.provider.transport_id())
            .finish()
    }
}

/// The provider currently backing the connection view.
#[derive(Clone)]
pub enum ProviderState {
    Fallback(Rc<FallbackProvider>),
    Injected(Rc<InjectedProvider>),
}

impl ProviderState {
    pub fn rpc(&self) -> &RpcProvider {
        match self {
            ProviderState::Fallback(p) => &p.rpc,
            ProviderState::Injected(p) => &p.rpc,
        }
    }

    pub fn is_injected(&self) -> bool {
        matches!(self, ProviderState::Injected(_))
    }

    pub fn as_injected(&self) -> Option<&Rc<InjectedProvider>> {
        match self {
            ProviderState::Injected(p) => Some(p),
            ProviderState::Fallback(_) => None,
        }
    }
}

impl PartialEq for ProviderState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ProviderState::Fallback(a), ProviderState::Fallback(b)) => Rc::ptr_eq(a, b),
            (ProviderState::Injected(a), ProviderState::Injected(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ProviderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderState::Fallback(p) => write!(f, "Fallback(chain {})", p.chain_id()),
            ProviderState::Injected(p) => write!(f, "Injected({})", p.transport_id()),
        }
    }
}
