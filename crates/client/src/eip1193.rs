//! EIP-1193 transport over the object a browser wallet injects.

use std::cell::RefCell;

use async_trait::async_trait;
use futures_channel::mpsc::{unbounded, UnboundedSender};
use govern_shared::{ConnectorEvent, RpcError, Transport, TransportHandle};
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{self, Reflect};

use crate::wallet::events::{self, StreamEnd};
use crate::wallet::ConnectorContext;

const CONNECTOR_ID: &str = "injected";

/// Wallet-injected provider object such as `window.ethereum`.
pub struct JsTransport {
    object: JsValue,
}

impl JsTransport {
    pub fn new(object: JsValue) -> Self {
        Self { object }
    }

    /// `window.ethereum`, if a wallet injected one.
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let object = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if object.is_undefined() || object.is_null() {
            return None;
        }
        Some(Self::new(object))
    }

    pub fn into_handle(self) -> TransportHandle {
        TransportHandle::new(self)
    }

    fn request_fn(&self) -> Result<js_sys::Function, String> {
        let request = Reflect::get(&self.object, &JsValue::from_str("request"))
            .map_err(|e| format!("cannot read request(): {e:?}"))?;
        request
            .dyn_into::<js_sys::Function>()
            .map_err(|_| "wallet object has no request() method".to_string())
    }
}

#[async_trait(?Send)]
impl Transport for JsTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let request = self.request_fn().map_err(RpcError::Transport)?;

        let args = js_sys::Object::new();
        let params = js_sys::JSON::parse(&params.to_string())
            .map_err(|e| RpcError::Transport(format!("invalid params: {e:?}")))?;
        Reflect::set(&args, &"method".into(), &JsValue::from_str(method))
            .and_then(|_| Reflect::set(&args, &"params".into(), &params))
            .map_err(|e| RpcError::Transport(format!("{e:?}")))?;

        let pending = request
            .call1(&self.object, &args)
            .map_err(rejection)?
            .dyn_into::<js_sys::Promise>()
            .map_err(|_| RpcError::Transport("request() did not return a promise".to_string()))?;
        let result = JsFuture::from(pending).await.map_err(rejection)?;

        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        let text: String = js_sys::JSON::stringify(&result)
            .map_err(|e| RpcError::Decode(format!("{e:?}")))?
            .into();
        serde_json::from_str(&text).map_err(|e| RpcError::Decode(e.to_string()))
    }

    fn validate(&self) -> Result<(), String> {
        if !self.object.is_object() {
            return Err("wallet transport is not an object".to_string());
        }
        self.request_fn().map(|_| ())
    }
}

/// Map a rejected wallet call (`{ code, message }`) to an RPC error.
fn rejection(err: JsValue) -> RpcError {
    let code = Reflect::get(&err, &"code".into())
        .ok()
        .and_then(|c| c.as_f64());
    let message = Reflect::get(&err, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    match code {
        Some(code) => RpcError::Response {
            code: code as i64,
            message,
        },
        None => RpcError::Transport(message),
    }
}

thread_local! {
    static LISTENERS: RefCell<Option<WalletListeners>> = const { RefCell::new(None) };
}

/// `accountsChanged` / `chainChanged` handlers registered on the wallet
/// object. Dropping them unregisters them.
struct WalletListeners {
    object: JsValue,
    handlers: Vec<(&'static str, Closure<dyn FnMut(JsValue)>)>,
}

impl WalletListeners {
    fn attach(object: &JsValue, events: UnboundedSender<ConnectorEvent>) -> Result<Self, RpcError> {
        let on = method(object, "on")?;

        let accounts_tx = events.clone();
        let on_accounts = Closure::wrap(Box::new(move |value: JsValue| {
            let accounts = js_sys::Array::from(&value)
                .iter()
                .filter_map(|a| a.as_string())
                .collect();
            let _ = accounts_tx.unbounded_send(events::accounts_changed(accounts));
        }) as Box<dyn FnMut(JsValue)>);

        let on_chain = Closure::wrap(Box::new(move |value: JsValue| {
            let chain_id = if let Some(raw) = value.as_string() {
                Value::String(raw)
            } else {
                value
                    .as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            };
            match events::chain_changed(&chain_id) {
                Ok(event) => {
                    let _ = events.unbounded_send(event);
                }
                Err(err) => crate::log_warn!("ignoring chainChanged: {}", err),
            }
        }) as Box<dyn FnMut(JsValue)>);

        let handlers = vec![("accountsChanged", on_accounts), ("chainChanged", on_chain)];
        for (name, handler) in &handlers {
            on.call2(object, &JsValue::from_str(name), handler.as_ref().unchecked_ref())
                .map_err(rejection)?;
        }

        Ok(Self {
            object: object.clone(),
            handlers,
        })
    }
}

impl Drop for WalletListeners {
    fn drop(&mut self) {
        let Ok(remove) = method(&self.object, "removeListener") else {
            return;
        };
        for (name, handler) in &self.handlers {
            let _ = remove.call2(
                &self.object,
                &JsValue::from_str(name),
                handler.as_ref().unchecked_ref(),
            );
        }
    }
}

fn method(object: &JsValue, name: &str) -> Result<js_sys::Function, RpcError> {
    Reflect::get(object, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
        .ok_or_else(|| RpcError::Transport(format!("wallet object has no {name}() method")))
}

fn detach_listeners() {
    LISTENERS.with(|listeners| listeners.borrow_mut().take());
}

/// Ask the injected wallet for accounts and report the result to `connector`.
///
/// Once connected, keeps forwarding the wallet's account and chain switches
/// until the wallet locks or [`disconnect_injected`] is called.
pub async fn connect_injected(mut connector: ConnectorContext) -> Result<(), RpcError> {
    connector.dispatch(ConnectorEvent::Connecting {
        connector: CONNECTOR_ID.to_string(),
    });

    let (account, chain_id, wallet) = match request_connection().await {
        Ok(connection) => connection,
        Err(err) => {
            crate::log_warn!("wallet connection failed: {}", err);
            connector.dispatch(ConnectorEvent::Failed(err.to_string()));
            return Err(err);
        }
    };

    crate::log_info!("wallet connected: {} on chain {}", account, chain_id);
    let (tx, rx) = unbounded();
    match WalletListeners::attach(&wallet.object, tx) {
        // replacing an earlier registration drops (and unregisters) it
        Ok(listeners) => LISTENERS.with(|l| *l.borrow_mut() = Some(listeners)),
        Err(err) => crate::log_warn!("wallet events unavailable: {}", err),
    }

    connector.dispatch(ConnectorEvent::Connected {
        connector: CONNECTOR_ID.to_string(),
        account,
        chain_id,
        transport: wallet.into_handle(),
    });

    if events::forward_events(connector, rx).await == StreamEnd::Locked {
        crate::log_info!("wallet locked");
        detach_listeners();
    }
    Ok(())
}

/// Stop listening to the wallet and reset the connector state.
pub fn disconnect_injected(mut connector: ConnectorContext) {
    detach_listeners();
    connector.disconnect();
}

async fn request_connection() -> Result<(String, u64, JsTransport), RpcError> {
    let wallet = JsTransport::from_window()
        .ok_or_else(|| RpcError::Transport("no injected wallet found".to_string()))?;
    wallet.validate().map_err(RpcError::Transport)?;

    let accounts: Vec<String> = serde_json::from_value(
        wallet
            .request("eth_requestAccounts", Value::Array(vec![]))
            .await?,
    )
    .map_err(|e| RpcError::Decode(e.to_string()))?;
    let ConnectorEvent::AccountChanged(Some(account)) = events::accounts_changed(accounts) else {
        return Err(RpcError::Transport("wallet returned no accounts".to_string()));
    };

    let ConnectorEvent::ChainChanged(chain_id) =
        events::chain_changed(&wallet.request("eth_chainId", Value::Array(vec![])).await?)?
    else {
        return Err(RpcError::Decode("unexpected chain id".to_string()));
    };

    Ok((account, chain_id, wallet))
}
