use std::{sync::Arc, time::Duration};

use chrono::Utc;
use ethers::{
    contract::ContractFactory,
    core::k256::ecdsa::SigningKey,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, PendingTransaction, Provider},
    signers::{coins_bip39::English, MnemonicBuilder, Signer, Wallet},
    types::{Address, U256, U64},
};

use crate::{
    artifact::ContractArtifact,
    client::{ChainClient, DeploymentRecord, MintReceipt, PendingMint},
    config::ResolvedNetwork,
    contracts::{minted_token_id, SvgNft},
    error::DeployError,
    utils::validate_rpc_url,
};

pub type EtherSigner = SignerMiddleware<Provider<Http>, Wallet<SigningKey>>;

// local nodes mine instantly, no point polling every 7s
const LOCAL_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn get_wallet(network: &ResolvedNetwork, index: u32) -> Result<Wallet<SigningKey>, DeployError> {
    let account_err = |e: ethers::signers::WalletError| DeployError::Account {
        network: network.name.clone(),
        reason: e.to_string(),
    };

    let wallet = MnemonicBuilder::<English>::default()
        .phrase(network.mnemonic.as_str())
        .index(index)
        .map_err(account_err)?
        .build()
        .map_err(account_err)?
        .with_chain_id(network.chain_id);

    Ok(wallet)
}

/// Addresses of the first `count` accounts of the network's mnemonic.
pub fn derive_accounts(network: &ResolvedNetwork, count: u32) -> Result<Vec<Address>, DeployError> {
    (0..count)
        .map(|index| get_wallet(network, index).map(|wallet| wallet.address()))
        .collect()
}

pub fn get_writer_ethers_client(
    network: &ResolvedNetwork,
    index: u32,
) -> Result<Arc<EtherSigner>, DeployError> {
    let wallet = get_wallet(network, index)?;

    let rpc_url = validate_rpc_url(&network.rpc_url)?;
    let mut provider = Provider::new(Http::new(rpc_url));
    if network.local {
        provider = provider.interval(LOCAL_POLL_INTERVAL);
    }

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

/// [`ChainClient`] backed by an ethers middleware stack.
pub struct EthersChainClient<M> {
    client: Arc<M>,
    chain_id: u64,
    deployer: Address,
}

impl<M: Middleware> EthersChainClient<M> {
    pub fn new(client: Arc<M>, chain_id: u64, deployer: Address) -> Self {
        Self {
            client,
            chain_id,
            deployer,
        }
    }
}

impl EthersChainClient<EtherSigner> {
    /// Build a signing client for `network` and check the node is actually serving that chain.
    pub async fn connect(network: &ResolvedNetwork, account_index: u32) -> Result<Self, DeployError> {
        let client = get_writer_ethers_client(network, account_index)?;

        let actual = client.provider().get_chainid().await?.as_u64();
        if actual != network.chain_id {
            return Err(DeployError::ChainIdMismatch {
                expected: network.chain_id,
                actual,
            });
        }

        let deployer = client.address();
        Ok(Self::new(client, network.chain_id, deployer))
    }
}

fn contract_err(e: impl std::fmt::Display) -> DeployError {
    DeployError::Contract(e.to_string())
}

impl<M: Middleware + 'static> ChainClient for EthersChainClient<M> {
    type Contract = SvgNft<M>;

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn deploy_contract(
        &self,
        artifact: &ContractArtifact,
    ) -> Result<DeploymentRecord, DeployError> {
        let factory = ContractFactory::new(
            artifact.abi.clone(),
            artifact.bytecode.clone(),
            self.client.clone(),
        );

        let (contract, receipt) = factory
            .deploy(())
            .map_err(contract_err)?
            .send_with_receipt()
            .await
            .map_err(contract_err)?;

        Ok(DeploymentRecord {
            contract_name: artifact.contract_name.clone(),
            address: contract.address(),
            tx_hash: receipt.transaction_hash,
            deployed_at: Utc::now(),
        })
    }

    fn bind(&self, deployment: &DeploymentRecord) -> Self::Contract {
        SvgNft::new(deployment.address, self.client.clone())
    }

    async fn send_create(
        &self,
        contract: &Self::Contract,
        svg: &str,
    ) -> Result<PendingMint, DeployError> {
        let call = contract.create(svg.to_owned());
        let pending = call.send().await.map_err(contract_err)?;

        Ok(PendingMint {
            contract: contract.address(),
            tx_hash: pending.tx_hash(),
        })
    }

    async fn await_confirmation(
        &self,
        pending: &PendingMint,
        confirmations: usize,
    ) -> Result<MintReceipt, DeployError> {
        let tx_hash = pending.tx_hash;

        let receipt = PendingTransaction::new(tx_hash, self.client.provider())
            .confirmations(confirmations)
            .await?
            .ok_or(DeployError::Dropped(tx_hash))?;

        if receipt.status == Some(U64::zero()) {
            return Err(DeployError::Reverted(tx_hash));
        }

        let token_id = minted_token_id(&receipt.logs, pending.contract)
            .ok_or(DeployError::MissingMintEvent(tx_hash))?;

        Ok(MintReceipt {
            tx_hash,
            block_number: receipt.block_number,
            confirmations,
            token_id,
        })
    }

    async fn token_uri(
        &self,
        contract: &Self::Contract,
        token_id: U256,
    ) -> Result<String, DeployError> {
        contract
            .token_uri(token_id)
            .call()
            .await
            .map_err(contract_err)
    }
}
