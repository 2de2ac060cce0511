use chrono::{DateTime, Utc};
use ethers::types::{Address, TxHash, U256, U64};

use crate::{artifact::ContractArtifact, error::DeployError};

/// Result of deploying a contract.
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub address: Address,
    pub tx_hash: TxHash,
    pub deployed_at: DateTime<Utc>,
}

/// A submitted transaction that has not been confirmed yet.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingMint {
    pub contract: Address,
    pub tx_hash: TxHash,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MintReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<U64>,
    pub confirmations: usize,
    pub token_id: U256,
}

/// The operations the deploy script needs from a chain.
///
/// Only `bind` is free of network access; everything else talks to a node.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// typed handle to a deployed SVGNFT contract
    type Contract;

    fn chain_id(&self) -> u64;

    fn deployer(&self) -> Address;

    async fn deploy_contract(
        &self,
        artifact: &ContractArtifact,
    ) -> Result<DeploymentRecord, DeployError>;

    fn bind(&self, deployment: &DeploymentRecord) -> Self::Contract;

    /// Submit `create(svg)`, returning as soon as the node accepted the transaction.
    async fn send_create(
        &self,
        contract: &Self::Contract,
        svg: &str,
    ) -> Result<PendingMint, DeployError>;

    async fn await_confirmation(
        &self,
        pending: &PendingMint,
        confirmations: usize,
    ) -> Result<MintReceipt, DeployError>;

    async fn token_uri(
        &self,
        contract: &Self::Contract,
        token_id: U256,
    ) -> Result<String, DeployError>;
}
