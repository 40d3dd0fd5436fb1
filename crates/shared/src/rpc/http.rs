use std::cell::Cell;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{decode_response, Transport};
use crate::error::RpcError;

/// JSON-RPC 2.0 over HTTP POST.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    url: url::Url,
    next_id: Cell<u64>,
}

impl HttpTransport {
    pub fn new(url: url::Url) -> Self {
        Self {
            client: Client::new(),
            url,
            next_id: Cell::new(1),
        }
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let resp = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| RpcError::Transport(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(RpcError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        decode_response(&text)
    }
}
