use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::Subcommand;
use log::info;
use svgnft::{
    artifact::{default_artifact_path, SVG_NFT_CONTRACT_NAME},
    config::ResolvedNetwork,
    driver::{DEFAULT_CONFIRMATIONS, DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_SVG_PATH},
    ethers_client::derive_accounts,
    DeployOptions, EthersChainClient, ScriptConfig, SvgNftDeployer,
};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Deploy SVGNFT, mint one token from the SVG file and print its token URI.
    Deploy {
        /// SVG file to mint.
        #[arg(long, default_value = DEFAULT_SVG_PATH)]
        svg: PathBuf,

        /// Compiled contract artifact (defaults to the hardhat artifacts dir).
        #[arg(long)]
        artifact: Option<PathBuf>,

        /// Confirmations to wait for on the mint transaction.
        #[arg(long, default_value_t = DEFAULT_CONFIRMATIONS)]
        confirmations: usize,

        /// Give up waiting for the mint after this many seconds. 0 waits forever.
        #[arg(long, default_value_t = DEFAULT_CONFIRMATION_TIMEOUT.as_secs())]
        confirmation_timeout_secs: u64,
    },
    /// Print the addresses of the configured accounts.
    Accounts {
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Print the solidity compiler settings for the external build tool.
    CompilerSettings,
}

pub async fn exec(network: &str, command: Command) -> anyhow::Result<()> {
    let config = ScriptConfig::load();

    match command {
        Command::Deploy {
            svg,
            artifact,
            confirmations,
            confirmation_timeout_secs,
        } => {
            let network = config.network(Some(network))?.resolve()?;
            let options = DeployOptions {
                artifact_path: artifact
                    .unwrap_or_else(|| default_artifact_path(SVG_NFT_CONTRACT_NAME)),
                svg_path: svg,
                confirmations,
                confirmation_timeout: (confirmation_timeout_secs > 0)
                    .then(|| Duration::from_secs(confirmation_timeout_secs)),
                ..DeployOptions::for_network(&network)
            };
            deploy(&config, &network, options).await
        }
        Command::Accounts { count } => accounts(&config, network, count),
        Command::CompilerSettings => {
            println!("{}", config.solidity.to_json()?);
            Ok(())
        }
    }
}

async fn deploy(
    config: &ScriptConfig,
    network: &ResolvedNetwork,
    options: DeployOptions,
) -> anyhow::Result<()> {
    info!("Connecting to {} at {}...", network.name, network.rpc_url);
    let client = EthersChainClient::connect(network, config.named_accounts.deployer)
        .await
        .with_context(|| format!("failed to connect to network {}", network.name))?;

    let outcome = SvgNftDeployer::new(config, client, options)
        .run()
        .await
        .context("deployment failed")?;

    info!(
        "Done: token {} minted on {:?} in tx {:?}",
        outcome.mint.token_id, outcome.deployment.address, outcome.mint.tx_hash
    );
    Ok(())
}

fn accounts(config: &ScriptConfig, network: &str, count: u32) -> anyhow::Result<()> {
    let network = config.network(Some(network))?.resolve()?;

    for address in derive_accounts(&network, count)? {
        println!("{address:?}");
    }
    Ok(())
}
