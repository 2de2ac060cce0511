use ethers::{
    abi::RawLog,
    contract::EthEvent,
    types::{Address, Log, U256},
};

// Include generated contract types from build script
include!(concat!(env!("OUT_DIR"), "/svg_nft_contract.rs"));

/// Find the id of the token minted by `contract` in a receipt's logs.
///
/// Prefers the ERC-721 `Transfer` from the zero address, and falls back to
/// the contract's own `CreatedSVGNFT` event.
pub fn minted_token_id(logs: &[Log], contract: Address) -> Option<U256> {
    let raw_logs: Vec<RawLog> = logs
        .iter()
        .filter(|log| log.address == contract)
        .map(|log| RawLog::from(log.clone()))
        .collect();

    let from_transfer = raw_logs.iter().find_map(|raw| {
        let event = TransferFilter::decode_log(raw).ok()?;
        event.from.is_zero().then_some(event.token_id)
    });

    from_transfer.or_else(|| {
        raw_logs
            .iter()
            .find_map(|raw| CreatedSVGNFTFilter::decode_log(raw).ok())
            .map(|event| event.token_id)
    })
}
