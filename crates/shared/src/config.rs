//! Network environment read once at startup.

use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::networks;

const DEFAULT_CHAIN_ID: u64 = 1;

/// Process-wide network configuration used to build the fallback provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkEnvironment {
    pub chain_id: u64,
    /// Infura project id for the read-only fallback endpoint
    pub rpc_api_key: String,
    /// Explicit fallback endpoint, overrides the Infura URL when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
}

impl Default for NetworkEnvironment {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            rpc_api_key: String::new(),
            rpc_url: None,
        }
    }
}

impl NetworkEnvironment {
    pub fn new(chain_id: u64, rpc_api_key: impl Into<String>) -> Self {
        Self {
            chain_id,
            rpc_api_key: rpc_api_key.into(),
            rpc_url: None,
        }
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = Some(rpc_url.into());
        self
    }

    /// Parse the environment from environment variables.
    ///
    /// Environment variables (runtime first, then the value baked in at build
    /// time, which is what wasm builds see):
    /// - `GOVERN_NETWORK`: named preset, e.g. "mainnet" | "rinkeby" | "local"
    /// - `GOVERN_CHAIN_ID`: numeric chain id, wins over `GOVERN_NETWORK`
    /// - `GOVERN_RPC_API_KEY`: Infura project id
    /// - `GOVERN_RPC_URL`: explicit fallback endpoint
    pub fn from_env() -> Result<Self, WalletError> {
        let network = lookup("GOVERN_NETWORK", option_env!("GOVERN_NETWORK"));
        let chain_id = lookup("GOVERN_CHAIN_ID", option_env!("GOVERN_CHAIN_ID"));
        let rpc_api_key = lookup("GOVERN_RPC_API_KEY", option_env!("GOVERN_RPC_API_KEY"));
        let rpc_url = lookup("GOVERN_RPC_URL", option_env!("GOVERN_RPC_URL"));

        let chain_id = match (chain_id, network) {
            (Some(raw), _) => raw.trim().parse::<u64>().map_err(|_| {
                WalletError::InvalidConfig(format!("GOVERN_CHAIN_ID is not a number: {raw}"))
            })?,
            (None, Some(name)) => networks::by_name(&name)
                .map(|n| n.chain_id)
                .ok_or_else(|| WalletError::InvalidConfig(format!("unknown network: {name}")))?,
            (None, None) => DEFAULT_CHAIN_ID,
        };

        Ok(Self {
            chain_id,
            rpc_api_key: rpc_api_key.unwrap_or_default(),
            rpc_url,
        })
    }

    /// Network name for the configured chain, if known.
    pub fn network_name(&self) -> Option<&'static str> {
        networks::network_name(self.chain_id)
    }

    /// Resolve the URL of the read-only fallback endpoint.
    pub fn fallback_rpc_url(&self) -> Result<url::Url, WalletError> {
        let raw = match &self.rpc_url {
            Some(explicit) => explicit.clone(),
            None => {
                if self.rpc_api_key.trim().is_empty() {
                    return Err(WalletError::InvalidConfig(
                        "GOVERN_RPC_API_KEY is required when GOVERN_RPC_URL is unset".to_string(),
                    ));
                }
                networks::infura_url(self.chain_id, self.rpc_api_key.trim()).ok_or(
                    WalletError::UnsupportedNetwork {
                        chain_id: self.chain_id,
                    },
                )?
            }
        };
        url::Url::parse(&raw)
            .map_err(|e| WalletError::InvalidConfig(format!("invalid rpc url {raw}: {e}")))
    }
}

fn lookup(key: &str, baked: Option<&'static str>) -> Option<String> {
    std::env::var(key)
        .ok()
        .or_else(|| baked.map(str::to_string))
        .filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infura_url_from_chain_and_key() {
        let env = NetworkEnvironment::new(4, "project");
        assert_eq!(
            env.fallback_rpc_url().unwrap().as_str(),
            "https://rinkeby.infura.io/v3/project"
        );
        assert_eq!(env.network_name(), Some("rinkeby"));
    }

    #[test]
    fn explicit_url_wins() {
        let env = NetworkEnvironment::new(1337, "").with_rpc_url("http://127.0.0.1:8545");
        assert_eq!(env.fallback_rpc_url().unwrap().as_str(), "http://127.0.0.1:8545/");
    }

    #[test]
    fn rejects_missing_key_and_unknown_chain() {
        assert!(matches!(
            NetworkEnvironment::new(1, " ").fallback_rpc_url(),
            Err(WalletError::InvalidConfig(_))
        ));
        assert_eq!(
            NetworkEnvironment::new(100, "key").fallback_rpc_url(),
            Err(WalletError::UnsupportedNetwork { chain_id: 100 })
        );
    }

    #[test]
    fn deserializes_camel_case() {
        let env: NetworkEnvironment =
            serde_json::from_str(r#"{"chainId":5,"rpcApiKey":"k"}"#).unwrap();
        assert_eq!(env, NetworkEnvironment::new(5, "k"));
    }
}
