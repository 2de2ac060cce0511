use url::Url;

use crate::error::DeployError;

/// Decode a `0x`-prefixed hex string. Unlinked library placeholders (`__$..$__`)
/// are reported separately since they are the usual reason a hardhat bytecode
/// string is not valid hex.
pub fn hex_to_bytes(hex_str: &str) -> Result<Vec<u8>, String> {
    let hex_str = hex_str.trim_start_matches("0x");
    if hex_str.contains("__$") {
        return Err("bytecode contains unlinked library placeholders".to_owned());
    }
    hex::decode(hex_str).map_err(|e| e.to_string())
}

/// A token URI is usable when it is a `data:` URI or an http(s) link.
pub fn parse_token_uri(uri: &str) -> Option<Url> {
    let url = Url::parse(uri).ok()?;
    match url.scheme() {
        "data" | "http" | "https" => Some(url),
        _ => None,
    }
}

pub fn verify_command(network_name: &str, address: &ethers::types::Address) -> String {
    // debug fmt of an address is the full '0x..' hex encoding,
    // where as .to_string() (fmt) truncates it
    format!("npx hardhat verify --network {network_name} {address:?}")
}

pub fn validate_rpc_url(url: &str) -> Result<Url, DeployError> {
    let parsed = Url::parse(url).map_err(|e| DeployError::InvalidRpcUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(DeployError::InvalidRpcUrl {
            url: url.to_owned(),
            reason: format!("unsupported scheme '{scheme}'"),
        }),
    }
}
