//! Known EVM networks: chain ids, display names and Infura endpoints.

/// A network the console knows how to name and reach through Infura.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    pub chain_id: u64,
    /// Name reported to consumers and telemetry (e.g. "mainnet")
    pub name: &'static str,
    /// Infura subdomain, if Infura serves this chain
    pub infura: Option<&'static str>,
}

const NETWORKS: &[Network] = &[
    Network { chain_id: 1, name: "mainnet", infura: Some("mainnet") },
    Network { chain_id: 3, name: "ropsten", infura: Some("ropsten") },
    Network { chain_id: 4, name: "rinkeby", infura: Some("rinkeby") },
    Network { chain_id: 5, name: "goerli", infura: Some("goerli") },
    Network { chain_id: 42, name: "kovan", infura: Some("kovan") },
    Network { chain_id: 100, name: "xdai", infura: None },
    Network { chain_id: 137, name: "polygon", infura: Some("polygon-mainnet") },
    Network { chain_id: 1337, name: "local", infura: None },
    Network { chain_id: 11155111, name: "sepolia", infura: Some("sepolia") },
];

/// Look up a network by chain id.
pub fn by_chain_id(chain_id: u64) -> Option<&'static Network> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

/// Look up a network by its name (case-insensitive).
pub fn by_name(name: &str) -> Option<&'static Network> {
    let name = name.trim();
    NETWORKS.iter().find(|n| n.name.eq_ignore_ascii_case(name))
}

/// Name for a chain id, if known.
pub fn network_name(chain_id: u64) -> Option<&'static str> {
    by_chain_id(chain_id).map(|n| n.name)
}

/// Infura HTTPS endpoint for a chain, or `None` if Infura does not serve it.
pub fn infura_url(chain_id: u64, project_id: &str) -> Option<String> {
    let subdomain = by_chain_id(chain_id)?.infura?;
    Some(format!("https://{subdomain}.infura.io/v3/{project_id}"))
}
