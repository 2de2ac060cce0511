pub mod svg_nft;

pub use svg_nft::{minted_token_id, CreatedSVGNFTFilter, SvgNft, TransferFilter};
