//! Wallet-originated events (`accountsChanged`, `chainChanged`) and the loop
//! that feeds them into the connector state.

use futures_channel::mpsc::UnboundedReceiver;
use futures_util::StreamExt;
use govern_shared::{rpc::parse_quantity, ConnectorEvent, RpcError};
use serde_json::Value;

use super::connector::ConnectorContext;

/// Why [`forward_events`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The wallet reported no accounts (locked or disconnected by the user).
    Locked,
    /// The sending side went away.
    Closed,
}

/// `accountsChanged` payload. An empty list means the wallet is locked.
pub fn accounts_changed(accounts: Vec<String>) -> ConnectorEvent {
    ConnectorEvent::AccountChanged(accounts.into_iter().find(|a| !a.is_empty()))
}

/// `chainChanged` payload: a hex quantity, or a plain number from older wallets.
pub fn chain_changed(chain_id: &Value) -> Result<ConnectorEvent, RpcError> {
    let chain_id = match chain_id {
        Value::String(raw) => {
            let value = parse_quantity(raw)?;
            u64::try_from(value)
                .map_err(|_| RpcError::Decode(format!("chain id {raw} out of range")))?
        }
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .ok_or_else(|| RpcError::Decode(format!("invalid chain id: {n}")))?,
        other => return Err(RpcError::Decode(format!("invalid chain id: {other}"))),
    };
    Ok(ConnectorEvent::ChainChanged(chain_id))
}

/// Dispatch every received event until the wallet locks or the channel closes.
pub async fn forward_events(
    mut connector: ConnectorContext,
    mut events: UnboundedReceiver<ConnectorEvent>,
) -> StreamEnd {
    while let Some(event) = events.next().await {
        let locked = matches!(event, ConnectorEvent::AccountChanged(None));
        connector.dispatch(event);
        if locked {
            return StreamEnd::Locked;
        }
    }
    StreamEnd::Closed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_non_empty_account_wins() {
        assert_eq!(
            accounts_changed(vec!["".to_string(), "0xDEF".to_string()]),
            ConnectorEvent::AccountChanged(Some("0xDEF".to_string()))
        );
        assert_eq!(accounts_changed(vec![]), ConnectorEvent::AccountChanged(None));
    }

    #[test]
    fn chain_ids_in_hex_or_numbers() {
        assert_eq!(chain_changed(&json!("0x5")).unwrap(), ConnectorEvent::ChainChanged(5));
        assert_eq!(chain_changed(&json!(137)).unwrap(), ConnectorEvent::ChainChanged(137));
        assert_eq!(chain_changed(&json!(4.0)).unwrap(), ConnectorEvent::ChainChanged(4));
        assert!(chain_changed(&json!("mainnet")).is_err());
        assert!(chain_changed(&json!(null)).is_err());
        assert!(chain_changed(&json!(-1)).is_err());
    }
}
