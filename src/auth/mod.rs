//! Signing identities and derived venue credentials.
//!
//! A request is signed by a [`CredentialPair`]: a private key plus the funder
//! address whose balance backs the order. The venue derives one set of
//! [`Credentials`] per pair, which then authenticate order submission.

mod identity;
pub(crate) mod l1;
pub(crate) mod l2;

use secrecy::SecretString;
use serde::Deserialize;
use uuid::Uuid;

pub use identity::{CredentialPair, PairKey, SigningIdentity};

pub type ApiKey = Uuid;

/// API credentials derived by the venue for one signing identity.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    #[serde(alias = "apiKey")]
    pub(crate) key: ApiKey,
    pub(crate) secret: SecretString,
    pub(crate) passphrase: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(key: ApiKey, secret: SecretString, passphrase: SecretString) -> Self {
        Self {
            key,
            secret,
            passphrase,
        }
    }

    #[must_use]
    pub fn key(&self) -> ApiKey {
        self.key
    }
}
