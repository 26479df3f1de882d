//! HTTP gateway that submits limit and market orders to the Polymarket CLOB
//! on behalf of a caller.
//!
//! Requests are signed either with the server's default identity or with a
//! per-request `signingKey` + `funderAddress` pair. Each pair gets exactly one
//! authenticated venue session for the life of the process.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`auth`] | Signing identities, derived API credentials, L1/L2 headers |
//! | [`clob`] | Venue wire types (sides, order types, tick sizes, signed orders) |
//! | [`config`] | Process and venue configuration |
//! | [`error`] | Crate error type |
//! | [`market`] | Tick-size resolution for a token |
//! | [`order`] | Request normalization and dispatch |
//! | [`registry`] | Credential-scoped session cache |
//! | [`server`] | axum routes and response envelope |
//! | [`venue`] | Venue connector traits and the CLOB implementation |

pub mod auth;
pub mod clob;
pub mod config;
pub mod error;
pub mod market;
pub mod order;
pub mod registry;
pub mod server;
pub mod types;
pub mod venue;

use phf::phf_map;
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Request};
use serde::de::DeserializeOwned;

pub use crate::error::Error;
use crate::error::Kind;
use crate::types::{Address, ChainId, address};

pub type Result<T> = std::result::Result<T, Error>;

/// Unix timestamp in seconds.
pub type Timestamp = i64;

pub const POLYGON: ChainId = 137;
pub const AMOY: ChainId = 80002;

/// Exchange contracts an order's EIP-712 domain is bound to.
#[non_exhaustive]
#[derive(Clone, Copy, Debug)]
pub struct ContractConfig {
    pub exchange: Address,
}

static CONFIG: phf::Map<u64, ContractConfig> = phf_map! {
    137_u64 => ContractConfig {
        exchange: address!("0x4bFb41d5B3570DeFd03C39a9A4D8dE6Bd8B8982E"),
    },
    80002_u64 => ContractConfig {
        exchange: address!("0xdFE02Eb6733538f8Ea35D585af8DE5958AD99E40"),
    },
};

static NEG_RISK_CONFIG: phf::Map<u64, ContractConfig> = phf_map! {
    137_u64 => ContractConfig {
        exchange: address!("0xC5d563A36AE78145C45a50134d48A1215220f80a"),
    },
    80002_u64 => ContractConfig {
        exchange: address!("0xC5d563A36AE78145C45a50134d48A1215220f80a"),
    },
};

/// Returns the exchange contracts for `chain_id`, or `None` for unsupported chains.
#[must_use]
pub fn contract_config(chain_id: ChainId, is_neg_risk: bool) -> Option<&'static ContractConfig> {
    if is_neg_risk {
        NEG_RISK_CONFIG.get(&chain_id)
    } else {
        CONFIG.get(&chain_id)
    }
}

/// Executes `request` against the venue and decodes the JSON body.
///
/// Non-2xx responses become [`Kind::Status`] errors carrying the upstream body.
/// An empty body decodes as JSON `null`, so callers may ask for `Option<T>`.
pub(crate) async fn request<Response: DeserializeOwned>(
    client: &ReqwestClient,
    mut request: Request,
    headers: Option<HeaderMap>,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    if let Some(headers) = headers {
        request.headers_mut().extend(headers);
    }

    let response = client.execute(request).await?;
    let status_code = response.status();

    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        tracing::warn!(%status_code, %method, %path, %message, "venue request failed");

        return Err(Error::status(status_code, method, path, message));
    }

    let body = response.bytes().await?;
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &body
    };

    serde_json::from_slice(body).map_err(|e| Error::with_source(Kind::Internal, e))
}
