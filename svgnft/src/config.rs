use serde::Serialize;

use crate::error::DeployError;

pub const DEFAULT_NETWORK: &str = "hardhat";
pub const HARDHAT_CHAIN_ID: u64 = 31337;

const MNEMONIC_ENV_VAR: &str = "MNEMONIC";
const LOCAL_RPC_URL_ENV_VAR: &str = "RPC_URL";

const DEFAULT_LOCAL_RPC_URL: &str = "http://localhost:8545";
// the account set every hardhat/anvil node is seeded with
const DEFAULT_DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// One row of the network table. Holds the *names* of the environment variables
/// that carry secrets, never their values.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url_env_var: Option<String>,
    pub explorer_api_key_env_var: Option<String>,
    /// network alias the block explorer plugin knows this chain by
    pub explorer_network: Option<String>,
    pub local: bool,
    pub allow_unlimited_contract_size: bool,
}

impl NetworkConfig {
    fn local(name: &str, chain_id: u64) -> Self {
        Self {
            name: name.to_owned(),
            chain_id,
            rpc_url_env_var: None,
            explorer_api_key_env_var: None,
            explorer_network: None,
            local: true,
            allow_unlimited_contract_size: true,
        }
    }

    fn remote(
        name: &str,
        chain_id: u64,
        rpc_url_env_var: &str,
        explorer_api_key_env_var: &str,
        explorer_network: &str,
    ) -> Self {
        Self {
            name: name.to_owned(),
            chain_id,
            rpc_url_env_var: Some(rpc_url_env_var.to_owned()),
            explorer_api_key_env_var: Some(explorer_api_key_env_var.to_owned()),
            explorer_network: Some(explorer_network.to_owned()),
            local: false,
            allow_unlimited_contract_size: false,
        }
    }

    /// Resolve the env-backed attributes of this network using the process environment.
    pub fn resolve(&self) -> Result<ResolvedNetwork, DeployError> {
        dotenv::dotenv().ok();
        self.resolve_with(|key| std::env::var(key).ok())
    }

    pub fn resolve_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<ResolvedNetwork, DeployError> {
        let rpc_url = match &self.rpc_url_env_var {
            Some(var) => lookup(var)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| DeployError::MissingEnvVar(var.clone()))?,
            None => lookup(LOCAL_RPC_URL_ENV_VAR)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_LOCAL_RPC_URL.to_owned()),
        };

        let explorer_api_key = self
            .explorer_api_key_env_var
            .as_deref()
            .and_then(&lookup)
            .filter(|v| !v.is_empty());

        let mnemonic = match lookup(MNEMONIC_ENV_VAR).filter(|v| !v.is_empty()) {
            Some(m) => m,
            None if self.local => DEFAULT_DEV_MNEMONIC.to_owned(),
            None => {
                return Err(DeployError::Account {
                    network: self.name.clone(),
                    reason: format!("{MNEMONIC_ENV_VAR} is not set"),
                })
            }
        };

        Ok(ResolvedNetwork {
            name: self.name.clone(),
            chain_id: self.chain_id,
            rpc_url,
            explorer_api_key,
            explorer_network: self.explorer_network.clone(),
            mnemonic,
            local: self.local,
        })
    }
}

/// A network with its environment-provided values filled in.
#[derive(Clone, PartialEq)]
pub struct ResolvedNetwork {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub explorer_api_key: Option<String>,
    pub explorer_network: Option<String>,
    pub mnemonic: String,
    pub local: bool,
}

// keep the mnemonic and api key out of logs
impl std::fmt::Debug for ResolvedNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedNetwork")
            .field("name", &self.name)
            .field("chain_id", &self.chain_id)
            .field("rpc_url", &self.rpc_url)
            .field("explorer_api_key", &self.explorer_api_key.as_ref().map(|_| "<redacted>"))
            .field("explorer_network", &self.explorer_network)
            .field("local", &self.local)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkTable {
    networks: Vec<NetworkConfig>,
}

impl NetworkTable {
    pub fn new(networks: Vec<NetworkConfig>) -> Self {
        Self { networks }
    }

    pub fn by_chain_id(&self, chain_id: u64) -> Result<&NetworkConfig, DeployError> {
        self.networks
            .iter()
            .find(|n| n.chain_id == chain_id)
            .ok_or(DeployError::MissingNetworkConfig(chain_id))
    }

    pub fn by_name(&self, name: &str) -> Result<&NetworkConfig, DeployError> {
        self.networks
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| DeployError::UnknownNetwork(name.to_owned()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.networks.iter()
    }
}

impl Default for NetworkTable {
    fn default() -> Self {
        Self::new(vec![
            NetworkConfig::local(DEFAULT_NETWORK, HARDHAT_CHAIN_ID),
            NetworkConfig::remote(
                "rinkeby",
                4,
                "RINKEBY_RPC_URL",
                "ETHERSCAN_API_KEY",
                "rinkeby",
            ),
            NetworkConfig::remote(
                "mumbai",
                80001,
                "MUMBAI_RPC_URL",
                "POLYGON_API_KEY",
                "polygonMumbai",
            ),
        ])
    }
}

/// HD wallet indexes of the accounts the scripts refer to by role.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedAccounts {
    pub deployer: u32,
}

impl Default for NamedAccounts {
    fn default() -> Self {
        Self { deployer: 0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompilerVersion {
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptimizerSettings {
    pub enabled: bool,
    pub runs: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompilerSettings {
    pub optimizer: OptimizerSettings,
}

/// Solidity build settings. Passed through to the external build tool as-is.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolidityConfig {
    pub compilers: Vec<CompilerVersion>,
    pub settings: CompilerSettings,
}

impl Default for SolidityConfig {
    fn default() -> Self {
        let compilers = ["0.8.2", "0.7.0", "0.6.6", "0.4.24"]
            .into_iter()
            .map(|version| CompilerVersion {
                version: version.to_owned(),
            })
            .collect();

        Self {
            compilers,
            settings: CompilerSettings {
                optimizer: OptimizerSettings {
                    enabled: true,
                    runs: 200,
                },
            },
        }
    }
}

impl SolidityConfig {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptConfig {
    pub default_network: String,
    pub networks: NetworkTable,
    pub named_accounts: NamedAccounts,
    pub solidity: SolidityConfig,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            default_network: DEFAULT_NETWORK.to_owned(),
            networks: NetworkTable::default(),
            named_accounts: NamedAccounts::default(),
            solidity: SolidityConfig::default(),
        }
    }
}

impl ScriptConfig {
    /// load the static table, picking up a `.env` file if there is one
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::default()
    }

    /// `None` selects the default network.
    pub fn network(&self, name: Option<&str>) -> Result<&NetworkConfig, DeployError> {
        self.networks
            .by_name(name.unwrap_or(&self.default_network))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_lookup_by_chain_id() {
        let table = NetworkTable::default();

        assert_eq!(table.by_chain_id(4).unwrap().name, "rinkeby");
        assert_eq!(table.by_chain_id(80001).unwrap().name, "mumbai");
        assert_eq!(table.by_chain_id(HARDHAT_CHAIN_ID).unwrap().name, "hardhat");
    }

    #[test]
    fn test_unknown_chain_id_is_missing_network_config() {
        let table = NetworkTable::default();

        let err = table.by_chain_id(1).unwrap_err();
        assert!(matches!(err, DeployError::MissingNetworkConfig(1)));
    }

    #[test]
    fn test_default_network_is_hardhat() {
        let config = ScriptConfig::default();

        let network = config.network(None).unwrap();
        assert_eq!(network.chain_id, HARDHAT_CHAIN_ID);
        assert!(network.allow_unlimited_contract_size);
        assert!(matches!(
            config.network(Some("mainnet")),
            Err(DeployError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn test_resolve_remote_network() {
        let config = ScriptConfig::default();
        let mumbai = config.network(Some("mumbai")).unwrap();

        let resolved = mumbai
            .resolve_with(env(&[
                ("MUMBAI_RPC_URL", "https://rpc.mumbai.example"),
                ("MNEMONIC", "some words"),
                ("POLYGON_API_KEY", "key123"),
            ]))
            .unwrap();

        assert_eq!(resolved.rpc_url, "https://rpc.mumbai.example");
        assert_eq!(resolved.explorer_api_key.as_deref(), Some("key123"));
        assert_eq!(resolved.explorer_network.as_deref(), Some("polygonMumbai"));
        assert_eq!(resolved.mnemonic, "some words");
        assert!(!format!("{resolved:?}").contains("key123"));
    }

    #[test]
    fn test_resolve_remote_network_requires_rpc_url_and_mnemonic() {
        let config = ScriptConfig::default();
        let rinkeby = config.network(Some("rinkeby")).unwrap();

        let err = rinkeby.resolve_with(env(&[])).unwrap_err();
        assert!(matches!(err, DeployError::MissingEnvVar(var) if var == "RINKEBY_RPC_URL"));

        let err = rinkeby
            .resolve_with(env(&[("RINKEBY_RPC_URL", "https://rpc.rinkeby.example")]))
            .unwrap_err();
        assert!(matches!(err, DeployError::Account { .. }));
    }

    #[test]
    fn test_resolve_local_network_defaults() {
        let config = ScriptConfig::default();
        let hardhat = config.network(None).unwrap();

        let resolved = hardhat.resolve_with(env(&[])).unwrap();
        assert_eq!(resolved.rpc_url, DEFAULT_LOCAL_RPC_URL);
        assert_eq!(resolved.mnemonic, DEFAULT_DEV_MNEMONIC);
        assert_eq!(resolved.explorer_api_key, None);

        let resolved = hardhat
            .resolve_with(env(&[("RPC_URL", "http://127.0.0.1:9545")]))
            .unwrap();
        assert_eq!(resolved.rpc_url, "http://127.0.0.1:9545");
    }

    #[test]
    fn test_compiler_settings_json() {
        let json: serde_json::Value =
            serde_json::from_str(&SolidityConfig::default().to_json().unwrap()).unwrap();

        assert_eq!(json["compilers"][0]["version"], "0.8.2");
        assert_eq!(json["compilers"][3]["version"], "0.4.24");
        assert_eq!(json["settings"]["optimizer"]["enabled"], true);
        assert_eq!(json["settings"]["optimizer"]["runs"], 200);
    }
}
