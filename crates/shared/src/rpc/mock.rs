use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use super::Transport;
use crate::error::RpcError;

/// In-memory transport answering from a method table.
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: HashMap<String, Value>,
    broken: Option<String>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, method: &str, result: Value) -> Self {
        self.responses.insert(method.to_string(), result);
        self
    }

    /// A handle that fails validation, like an object without `request`.
    pub(crate) fn broken(reason: &str) -> Self {
        Self {
            broken: Some(reason.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn request(&self, method: &str, _params: Value) -> Result<Value, RpcError> {
        self.responses
            .get(method)
            .cloned()
            .ok_or_else(|| RpcError::Response {
                code: -32601,
                message: format!("method not found: {method}"),
            })
    }

    fn validate(&self) -> Result<(), String> {
        match &self.broken {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}
