use ethers::prelude::Abigen;
use std::{env, path::Path};

fn main() {
    let out_dir = env::var_os("OUT_DIR").unwrap();

    // gen types for the SVGNFT contract

    let abi_source = "abi/SVGNFT.json";
    println!("cargo:rerun-if-changed={abi_source}");

    let out_file = Path::new(&out_dir).join("svg_nft_contract.rs");
    if out_file.exists() {
        std::fs::remove_file(&out_file).unwrap();
    }

    Abigen::new("SvgNft", abi_source)
        .unwrap()
        .generate()
        .unwrap()
        .write_to_file(out_file)
        .unwrap();
}
