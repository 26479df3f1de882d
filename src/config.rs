use std::env;
use std::str::FromStr as _;

use bon::Builder;
use secrecy::SecretString;
use url::Url;

use crate::auth::CredentialPair;
use crate::clob::types::SignatureType;
use crate::error::Error;
use crate::types::ChainId;
use crate::{POLYGON, Result, contract_config};

pub const DEFAULT_HOST: &str = "https://clob.polymarket.com";
pub const DEFAULT_PORT: u16 = 3000;

const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
const FUNDER_ADDRESS_VAR: &str = "FUNDER_ADDRESS";
const CLOB_HOST_VAR: &str = "CLOB_HOST";
const CHAIN_ID_VAR: &str = "CHAIN_ID";
const SIGNATURE_TYPE_VAR: &str = "SIGNATURE_TYPE";
const PORT_VAR: &str = "PORT";

/// Raw values as they appear in the process environment.
#[derive(Clone, Debug, Default, Builder)]
pub struct RawGatewayConfig {
    pub private_key: Option<SecretString>,
    pub funder_address: Option<String>,
    pub host: Option<String>,
    pub chain_id: Option<String>,
    pub signature_type: Option<String>,
    pub port: Option<String>,
}

impl RawGatewayConfig {
    /// Reads the gateway variables, loading a `.env` file first if one exists.
    #[must_use]
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let var = |name: &str| env::var(name).ok().filter(|value| !value.trim().is_empty());

        Self {
            private_key: var(PRIVATE_KEY_VAR).map(SecretString::from),
            funder_address: var(FUNDER_ADDRESS_VAR),
            host: var(CLOB_HOST_VAR),
            chain_id: var(CHAIN_ID_VAR),
            signature_type: var(SIGNATURE_TYPE_VAR),
            port: var(PORT_VAR),
        }
    }
}

/// Where and how orders are signed and sent. Fixed for the process lifetime.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct VenueConfig {
    pub host: Url,
    pub chain_id: ChainId,
    pub signature_type: SignatureType,
}

impl VenueConfig {
    pub fn new(host: Url, chain_id: ChainId, signature_type: SignatureType) -> Result<Self> {
        if contract_config(chain_id, false).is_none() {
            return Err(Error::validation(format!(
                "unsupported chain_id={chain_id}; expected Polygon (137) or Amoy (80002)"
            )));
        }

        Ok(Self {
            host,
            chain_id,
            signature_type,
        })
    }
}

/// Validated process configuration.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub venue: VenueConfig,
    pub default_pair: CredentialPair,
    pub port: u16,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_raw(RawGatewayConfig::from_env())
    }

    pub fn from_raw(raw: RawGatewayConfig) -> Result<Self> {
        let private_key = raw
            .private_key
            .ok_or_else(|| Error::validation(format!("{PRIVATE_KEY_VAR} is not set")))?;
        let funder = raw
            .funder_address
            .ok_or_else(|| Error::validation(format!("{FUNDER_ADDRESS_VAR} is not set")))?;
        let default_pair = CredentialPair::parse(&private_key, &funder)?;

        let host = Url::parse(raw.host.as_deref().unwrap_or(DEFAULT_HOST))
            .map_err(|e| Error::validation(format!("invalid {CLOB_HOST_VAR}: {e}")))?;
        let chain_id = raw
            .chain_id
            .as_deref()
            .map(|value| {
                ChainId::from_str(value.trim())
                    .map_err(|e| Error::validation(format!("invalid {CHAIN_ID_VAR}: {e}")))
            })
            .transpose()?
            .unwrap_or(POLYGON);
        let signature_type = raw
            .signature_type
            .as_deref()
            .map(SignatureType::parse)
            .transpose()?
            .unwrap_or_default();
        let port = raw
            .port
            .as_deref()
            .map(|value| {
                u16::from_str(value.trim())
                    .map_err(|e| Error::validation(format!("invalid {PORT_VAR}: {e}")))
            })
            .transpose()?
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            venue: VenueConfig::new(host, chain_id, signature_type)?,
            default_pair,
            port,
        })
    }
}
