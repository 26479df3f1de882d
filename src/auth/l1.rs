//! Level-1 headers: an EIP-712 `ClobAuth` signature proving control of the
//! signing key. Used only to derive API credentials.

use std::borrow::Cow;

use alloy::dyn_abi::Eip712Domain;
use alloy::signers::Signer as _;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::sol_types::SolStruct as _;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::types::{ChainId, U256};
use crate::{Result, Timestamp};

pub(crate) const POLY_ADDRESS: &str = "POLY_ADDRESS";
pub(crate) const POLY_SIGNATURE: &str = "POLY_SIGNATURE";
pub(crate) const POLY_TIMESTAMP: &str = "POLY_TIMESTAMP";
pub(crate) const POLY_NONCE: &str = "POLY_NONCE";

const DOMAIN_NAME: Option<Cow<'static, str>> = Some(Cow::Borrowed("ClobAuthDomain"));
const VERSION: Option<Cow<'static, str>> = Some(Cow::Borrowed("1"));
const MESSAGE: &str = "This message attests that I control the given wallet";

sol! {
    struct ClobAuth {
        address address;
        string timestamp;
        uint256 nonce;
        string message;
    }
}

pub(crate) async fn create_headers(
    signer: &PrivateKeySigner,
    chain_id: ChainId,
    timestamp: Timestamp,
    nonce: Option<u32>,
) -> Result<HeaderMap> {
    let nonce = nonce.unwrap_or(0);

    let auth = ClobAuth {
        address: signer.address(),
        timestamp: timestamp.to_string(),
        nonce: U256::from(nonce),
        message: MESSAGE.to_owned(),
    };
    let domain = Eip712Domain {
        name: DOMAIN_NAME,
        version: VERSION,
        chain_id: Some(U256::from(chain_id)),
        ..Eip712Domain::default()
    };

    let signature = signer.sign_hash(&auth.eip712_signing_hash(&domain)).await?;

    let mut map = HeaderMap::new();
    map.insert(
        POLY_ADDRESS,
        HeaderValue::from_str(&signer.address().to_checksum(None))?,
    );
    map.insert(POLY_NONCE, HeaderValue::from(nonce));
    map.insert(POLY_SIGNATURE, HeaderValue::from_str(&signature.to_string())?);
    map.insert(POLY_TIMESTAMP, HeaderValue::from(timestamp));

    Ok(map)
}
