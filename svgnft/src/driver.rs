use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use ethers::types::{Address, U256};
use log::{debug, info, warn};

use crate::{
    artifact::{default_artifact_path, ContractArtifact, SVG_NFT_CONTRACT_NAME},
    client::{ChainClient, DeploymentRecord, MintReceipt},
    config::{NetworkConfig, ResolvedNetwork, ScriptConfig},
    error::DeployError,
    utils::{parse_token_uri, verify_command},
};

pub const DEFAULT_SVG_PATH: &str = "./img/triangle.svg";
pub const DEFAULT_CONFIRMATIONS: usize = 1;
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug, PartialEq)]
pub struct DeployOptions {
    pub contract_name: String,
    pub artifact_path: PathBuf,
    pub svg_path: PathBuf,
    pub confirmations: usize,
    /// `None` waits for as long as the network takes
    pub confirmation_timeout: Option<Duration>,
    /// key for the network's block explorer, only checked for presence
    pub explorer_api_key: Option<String>,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            contract_name: SVG_NFT_CONTRACT_NAME.to_owned(),
            artifact_path: default_artifact_path(SVG_NFT_CONTRACT_NAME),
            svg_path: PathBuf::from(DEFAULT_SVG_PATH),
            confirmations: DEFAULT_CONFIRMATIONS,
            confirmation_timeout: Some(DEFAULT_CONFIRMATION_TIMEOUT),
            explorer_api_key: None,
        }
    }
}

impl DeployOptions {
    pub fn for_network(network: &ResolvedNetwork) -> Self {
        Self {
            explorer_api_key: network.explorer_api_key.clone(),
            ..Default::default()
        }
    }
}

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentOutcome {
    pub network: String,
    pub deployer: Address,
    pub deployment: DeploymentRecord,
    pub mint: MintReceipt,
    pub token_uri: String,
    pub verify_command: String,
    /// whether the verify command can succeed (remote network with an explorer key)
    pub verifiable: bool,
}

/// Deploys SVGNFT and mints a single token from an SVG file.
pub struct SvgNftDeployer<'a, C> {
    config: &'a ScriptConfig,
    client: C,
    options: DeployOptions,
}

impl<'a, C> SvgNftDeployer<'a, C>
where
    C: ChainClient,
{
    pub fn new(config: &'a ScriptConfig, client: C, options: DeployOptions) -> Self {
        Self {
            config,
            client,
            options,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run the whole script. Nothing is rolled back on failure: a contract deployed
    /// before a failing mint stays on chain.
    pub async fn run(&self) -> Result<DeploymentOutcome, DeployError> {
        info!("========================================");

        let network = self.resolve_network()?;
        let deployer = self.client.deployer();
        info!("Deploying to {} (chain {}) from {deployer:?}", network.name, network.chain_id);

        // local inputs are read up front so a missing file fails before anything is spent
        let svg = load_svg(&self.options.svg_path).await?;
        let artifact = ContractArtifact::load(&self.options.artifact_path).await?;
        if artifact.contract_name != self.options.contract_name {
            return Err(DeployError::ArtifactFormat {
                path: self.options.artifact_path.clone(),
                reason: format!(
                    "artifact is for {}, expected {}",
                    artifact.contract_name, self.options.contract_name
                ),
            });
        }

        let deployment = self.client.deploy_contract(&artifact).await?;
        info!(
            "{}: {:?} (tx: {:?})",
            self.options.contract_name, deployment.address, deployment.tx_hash
        );

        let verify_command = verify_command(&network.name, &deployment.address);
        let verifiable = self.log_verify_hint(network, &verify_command);

        let contract = self.client.bind(&deployment);

        let pending = self.client.send_create(&contract, &svg).await?;
        info!("Transaction hash: {:?}", pending.tx_hash);

        let confirmation = self
            .client
            .await_confirmation(&pending, self.options.confirmations);
        let mint = match self.options.confirmation_timeout {
            Some(timeout) => tokio::time::timeout(timeout, confirmation)
                .await
                .map_err(|_| DeployError::ConfirmationTimeout {
                    tx_hash: pending.tx_hash,
                    timeout,
                })??,
            None => confirmation.await?,
        };
        debug!(
            "Mint confirmed in block {:?}, token id {}",
            mint.block_number, mint.token_id
        );

        let token_uri = self.client.token_uri(&contract, mint.token_id).await?;
        info!("TokenURI: {token_uri}");
        if parse_token_uri(&token_uri).is_none() {
            warn!("token {} has a URI that is neither a data: nor an http(s) URI", mint.token_id);
        }

        Ok(DeploymentOutcome {
            network: network.name.clone(),
            deployer,
            deployment,
            mint,
            token_uri,
            verify_command,
            verifiable,
        })
    }

    /// The client's chain must be in the network table. Checked before any network call.
    fn resolve_network(&self) -> Result<&'a NetworkConfig, DeployError> {
        self.config.networks.by_chain_id(self.client.chain_id())
    }

    fn log_verify_hint(&self, network: &NetworkConfig, command: &str) -> bool {
        info!("Verify with:\n {command}");
        if network.local {
            return false;
        }

        let has_key = self
            .options
            .explorer_api_key
            .as_deref()
            .is_some_and(|key| !key.is_empty());
        if !has_key {
            warn!(
                "no explorer api key set for {}, verification will fail",
                network.name
            );
        }
        has_key
    }
}

pub async fn load_svg(path: &Path) -> Result<String, DeployError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DeployError::SvgAsset {
            path: path.to_owned(),
            source,
        })
}

/// Read a token URI a couple of times and make sure the contract returns the same thing.
pub async fn check_token_uri_stable<C: ChainClient>(
    client: &C,
    contract: &C::Contract,
    token_id: U256,
    reads: usize,
) -> Result<bool, DeployError> {
    let first = client.token_uri(contract, token_id).await?;
    for _ in 1..reads {
        if client.token_uri(contract, token_id).await? != first {
            return Ok(false);
        }
    }
    Ok(true)
}
