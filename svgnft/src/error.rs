use std::{path::PathBuf, time::Duration};

use ethers::{providers::ProviderError, types::TxHash};

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("missing network configuration for chain id {0}")]
    MissingNetworkConfig(u64),
    #[error("unknown network: {0}")]
    UnknownNetwork(String),
    #[error("missing environment variable {0}")]
    MissingEnvVar(String),
    #[error("no account configured for network {network}: {reason}")]
    Account { network: String, reason: String },
    #[error("chain id mismatch: network is configured as {expected} but the node reports {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },
    #[error("invalid rpc url {url}: {reason}")]
    InvalidRpcUrl { url: String, reason: String },

    #[error("failed to read svg asset {}: {source}", .path.display())]
    SvgAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read artifact {}: {source}", .path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed artifact {}: {reason}", .path.display())]
    ArtifactFormat { path: PathBuf, reason: String },

    #[error("rpc error: {0}")]
    Provider(#[from] ProviderError),
    #[error("contract call failed: {0}")]
    Contract(String),
    #[error("transaction reverted {0:?}")]
    Reverted(TxHash),
    #[error("transaction dropped {0:?}")]
    Dropped(TxHash),
    #[error("timed out after {timeout:?} waiting for confirmation of {tx_hash:?}")]
    ConfirmationTimeout { tx_hash: TxHash, timeout: Duration },
    #[error("no mint event found in receipt of {0:?}")]
    MissingMintEvent(TxHash),
}
