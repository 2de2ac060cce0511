pub mod artifact;
pub mod client;
pub mod config;
pub mod contracts;
pub mod driver;
pub mod error;
pub mod ethers_client;
pub mod utils;

pub use client::ChainClient;
pub use config::ScriptConfig;
pub use driver::{DeployOptions, DeploymentOutcome, SvgNftDeployer};
pub use error::DeployError;
pub use ethers_client::EthersChainClient;
