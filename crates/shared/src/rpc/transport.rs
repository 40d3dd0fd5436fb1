use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RpcError;

static NEXT_TRANSPORT_ID: AtomicU64 = AtomicU64::new(1);

/// Something that can carry a JSON-RPC request: an HTTP endpoint or an
/// EIP-1193 object injected by a browser wallet.
#[async_trait(?Send)]
pub trait Transport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError>;

    /// Reject handles that cannot work before a provider is built on them.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Stable identity token of a wrapped transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransportId(u64);

impl fmt::Display for TransportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport#{}", self.0)
    }
}

/// A transport plus the identity token minted when it was wrapped.
///
/// Clones share the token. Wrapping the same underlying object twice yields
/// two different tokens.
#[derive(Clone)]
pub struct TransportHandle {
    id: TransportId,
    inner: Rc<dyn Transport>,
}

impl TransportHandle {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::from_rc(Rc::new(transport))
    }

    pub fn from_rc(inner: Rc<dyn Transport>) -> Self {
        let id = TransportId(NEXT_TRANSPORT_ID.fetch_add(1, Ordering::Relaxed));
        Self { id, inner }
    }

    pub fn id(&self) -> TransportId {
        self.id
    }

    pub fn validate(&self) -> Result<(), String> {
        self.inner.validate()
    }

    pub async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.inner.request(method, params).await
    }
}

impl PartialEq for TransportHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TransportHandle {}

impl fmt::Debug for TransportHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TransportHandle").field(&self.id).finish()
    }
}
