//! CLI for deploying SVGNFT and minting a token from an SVG file.

use std::process::ExitCode;

use clap::Parser;
use svgnft::config::DEFAULT_NETWORK;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "svgnft-deploy")]
#[command(about = "Deploy the SVGNFT contract and mint a token from an SVG", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: commands::Command,

    /// Network to run against, as named in the network table.
    #[arg(long, global = true, default_value = DEFAULT_NETWORK)]
    network: String,

    /// Whether to print debug info.
    #[arg(long, global = true)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(log_level).expect("setting up logger");

    match commands::exec(&args.network, args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use svgnft::driver::DEFAULT_CONFIRMATION_TIMEOUT;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_deploy_timeout_defaults_to_driver_default() {
        let args = Args::try_parse_from(["svgnft-deploy", "deploy"]).unwrap();

        assert_eq!(args.network, DEFAULT_NETWORK);
        match args.command {
            commands::Command::Deploy {
                confirmation_timeout_secs,
                ..
            } => assert_eq!(confirmation_timeout_secs, DEFAULT_CONFIRMATION_TIMEOUT.as_secs()),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
