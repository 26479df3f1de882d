use std::str::FromStr as _;

use alloy::signers::local::PrivateKeySigner;
use secrecy::{ExposeSecret as _, SecretString};

use crate::Result;
use crate::error::Error;
use crate::types::Address;

/// Which identity signs a request, decided once at the request boundary.
#[derive(Clone, Debug)]
pub enum SigningIdentity {
    /// The server-wide default pair.
    Default,
    /// A pair supplied with the request.
    Explicit {
        signing_key: SecretString,
        funder_address: String,
    },
}

impl SigningIdentity {
    /// Applies the both-or-neither rule to the request's optional fields.
    ///
    /// Empty strings count as absent.
    pub fn resolve(
        signing_key: Option<SecretString>,
        funder_address: Option<String>,
    ) -> Result<Self> {
        let signing_key = signing_key.filter(|key| !key.expose_secret().trim().is_empty());
        let funder_address = funder_address.filter(|funder| !funder.trim().is_empty());

        match (signing_key, funder_address) {
            (Some(signing_key), Some(funder_address)) => Ok(SigningIdentity::Explicit {
                signing_key,
                funder_address,
            }),
            (None, None) => Ok(SigningIdentity::Default),
            _ => Err(Error::validation(
                "signingKey and funderAddress must be provided together (both or neither)",
            )),
        }
    }

    /// Turns this identity into a concrete pair, falling back to `default`.
    pub fn into_pair(self, default: &CredentialPair) -> Result<CredentialPair> {
        match self {
            SigningIdentity::Default => Ok(default.clone()),
            SigningIdentity::Explicit {
                signing_key,
                funder_address,
            } => CredentialPair::parse(&signing_key, &funder_address),
        }
    }
}

/// Cache identity of a [`CredentialPair`].
///
/// The signer address stands in for the private key, so two spellings of the
/// same key (with or without `0x`) map to one principal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PairKey {
    pub signer: Address,
    pub funder: Address,
}

/// A parsed signing key plus the funder address that backs its orders.
#[derive(Clone, Debug)]
pub struct CredentialPair {
    signer: PrivateKeySigner,
    funder: Address,
}

impl CredentialPair {
    pub fn new(signer: PrivateKeySigner, funder: Address) -> Result<Self> {
        if funder == Address::ZERO {
            return Err(Error::validation(
                "funderAddress must be a non-zero address",
            ));
        }

        Ok(Self { signer, funder })
    }

    pub fn parse(signing_key: &SecretString, funder_address: &str) -> Result<Self> {
        let signer = PrivateKeySigner::from_str(signing_key.expose_secret().trim())
            .map_err(|e| Error::validation(format!("invalid signingKey: {e}")))?;
        let funder = Address::from_str(funder_address.trim())
            .map_err(|e| Error::validation(format!("invalid funderAddress: {e}")))?;

        Self::new(signer, funder)
    }

    #[must_use]
    pub fn key(&self) -> PairKey {
        PairKey {
            signer: self.signer.address(),
            funder: self.funder,
        }
    }

    #[must_use]
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    #[must_use]
    pub fn funder(&self) -> Address {
        self.funder
    }
}
