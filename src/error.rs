use std::error::Error as StdError;
use std::fmt;

use reqwest::{Method, StatusCode};

use crate::types::{ChainId, U256};

/// Broad classification of an [`Error`].
///
/// The HTTP layer maps [`Kind::Validation`] to `400` and everything else to `500`.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Missing or malformed request field, bad credential pairing, or an
    /// order-type/class mismatch. Never produced after a network call fails.
    Validation,
    /// The venue has no market for the requested token.
    MarketNotFound,
    /// Deriving API credentials for a signing identity failed.
    CredentialDerivation,
    /// The venue answered with a non-2xx status.
    Status,
    /// Transport, encoding, or signing failure.
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let inner = self.source.as_deref()?;
        inner.downcast_ref::<E>()
    }

    pub fn validation<S: Into<String>>(reason: S) -> Self {
        Validation {
            reason: reason.into(),
        }
        .into()
    }

    #[must_use]
    pub fn market_not_found(token_id: U256) -> Self {
        MarketNotFound { token_id }.into()
    }

    pub fn credential_derivation<S: Into<String>>(message: S) -> Self {
        CredentialDerivation {
            message: message.into(),
        }
        .into()
    }

    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        Status {
            status_code,
            method,
            path,
            message: message.into(),
        }
        .into()
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::with_source(
            Kind::Internal,
            Internal {
                message: message.into(),
            },
        )
    }

    #[must_use]
    pub fn missing_contract_config(chain_id: ChainId, neg_risk: bool) -> Self {
        Self::internal(format!(
            "no exchange contract configured for chain_id={chain_id} neg_risk={neg_risk}"
        ))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{source}"),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// A non-2xx response from the venue.
#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, self.message
        )
    }
}

impl StdError for Status {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl StdError for Validation {}

#[non_exhaustive]
#[derive(Debug)]
pub struct MarketNotFound {
    pub token_id: U256,
}

impl fmt::Display for MarketNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Market not found for tokenID: {}", self.token_id)
    }
}

impl StdError for MarketNotFound {}

#[non_exhaustive]
#[derive(Debug)]
pub struct CredentialDerivation {
    pub message: String,
}

impl fmt::Display for CredentialDerivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to derive API credentials: {}", self.message)
    }
}

impl StdError for CredentialDerivation {}

#[derive(Debug)]
struct Internal {
    message: String,
}

impl fmt::Display for Internal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Internal {}

impl From<Validation> for Error {
    fn from(value: Validation) -> Self {
        Self::with_source(Kind::Validation, value)
    }
}

impl From<MarketNotFound> for Error {
    fn from(value: MarketNotFound) -> Self {
        Self::with_source(Kind::MarketNotFound, value)
    }
}

impl From<CredentialDerivation> for Error {
    fn from(value: CredentialDerivation) -> Self {
        Self::with_source(Kind::CredentialDerivation, value)
    }
}

impl From<Status> for Error {
    fn from(value: Status) -> Self {
        Self::with_source(Kind::Status, value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::with_source(Kind::Internal, e)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        Self::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::with_source(Kind::Internal, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::with_source(Kind::Internal, e)
    }
}

impl From<alloy::signers::Error> for Error {
    fn from(e: alloy::signers::Error) -> Self {
        Self::with_source(Kind::Internal, e)
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Self::with_source(Kind::Internal, e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::with_source(Kind::Internal, e)
    }
}
