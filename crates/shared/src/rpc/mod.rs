//! JSON-RPC plumbing shared by the fallback and injected providers.
//!
//! A [`Transport`] moves one JSON-RPC call; a [`TransportHandle`] pins a
//! transport to a stable identity token so providers built on it can be
//! cached by that token instead of by object address.

mod http;
mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpTransport;
pub use transport::{Transport, TransportHandle, TransportId};

use serde::Deserialize;
use serde_json::Value;

use crate::error::RpcError;

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ErrorObject>,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

/// Decode a JSON-RPC 2.0 response body into its `result` value.
pub(crate) fn decode_response(body: &str) -> Result<Value, RpcError> {
    let envelope: ResponseEnvelope =
        serde_json::from_str(body).map_err(|e| RpcError::Decode(e.to_string()))?;
    if let Some(err) = envelope.error {
        return Err(RpcError::Response {
            code: err.code,
            message: err.message,
        });
    }
    Ok(envelope.result.unwrap_or(Value::Null))
}

/// Parse a hex quantity (`"0x1a"`) as returned by `eth_*` methods.
pub fn parse_quantity(raw: &str) -> Result<u128, RpcError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| RpcError::Decode(format!("quantity without 0x prefix: {raw}")))?;
    if digits.is_empty() {
        return Err(RpcError::Decode("empty quantity".to_string()));
    }
    u128::from_str_radix(digits, 16).map_err(|e| RpcError::Decode(format!("{raw}: {e}")))
}
