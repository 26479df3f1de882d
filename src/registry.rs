//! Credential-scoped session cache.
//!
//! Each [`PairKey`] maps to at most one derived [`Credentials`] value and at
//! most one venue session for the life of the registry. Creation is
//! single-flight: concurrent first requests for the same pair wait on one
//! derivation instead of racing.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use crate::Result;
use crate::auth::{CredentialPair, Credentials, PairKey};
use crate::config::VenueConfig;
use crate::error::{Error, Kind};
use crate::venue::Connector;

type SessionSlot<S> = Arc<OnceCell<Arc<S>>>;

pub struct SessionRegistry<C: Connector> {
    connector: C,
    venue: VenueConfig,
    sessions: DashMap<PairKey, SessionSlot<C::Session>>,
    credentials: DashMap<PairKey, Credentials>,
}

impl<C: Connector> SessionRegistry<C> {
    #[must_use]
    pub fn new(connector: C, venue: VenueConfig) -> Self {
        Self {
            connector,
            venue,
            sessions: DashMap::new(),
            credentials: DashMap::new(),
        }
    }

    /// Number of sessions that finished construction.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|slot| slot.value().initialized())
            .count()
    }

    /// Returns the session for `pair`, creating it on first use.
    ///
    /// An existing session is returned unconditionally. A failed creation
    /// leaves the slot empty, so the next request for the pair tries again.
    pub async fn get_or_create(&self, pair: &CredentialPair) -> Result<Arc<C::Session>> {
        let key = pair.key();
        let slot = Arc::clone(&self.sessions.entry(key).or_default());

        if let Some(session) = slot.get() {
            tracing::debug!(signer = %key.signer, funder = %key.funder, "session cache hit");
            return Ok(Arc::clone(session));
        }

        let session = slot.get_or_try_init(|| self.create(pair, key)).await?;
        Ok(Arc::clone(session))
    }

    async fn create(&self, pair: &CredentialPair, key: PairKey) -> Result<Arc<C::Session>> {
        let credentials = match self.cached_credentials(key) {
            Some(credentials) => credentials,
            None => self.derive(pair, key).await?,
        };

        let session = self.connector.connect(pair, &self.venue, credentials)?;
        tracing::info!(signer = %key.signer, funder = %key.funder, "venue session created");

        Ok(Arc::new(session))
    }

    fn cached_credentials(&self, key: PairKey) -> Option<Credentials> {
        self.credentials.get(&key).map(|entry| entry.value().clone())
    }

    async fn derive(&self, pair: &CredentialPair, key: PairKey) -> Result<Credentials> {
        tracing::info!(signer = %key.signer, funder = %key.funder, "deriving API credentials");

        let credentials = self
            .connector
            .derive_api_key(pair, &self.venue)
            .await
            .map_err(|e| match e.kind() {
                Kind::CredentialDerivation => e,
                _ => Error::credential_derivation(e.to_string()),
            })?
            .ok_or_else(|| Error::credential_derivation("the venue returned no credentials"))?;

        self.credentials.insert(key, credentials.clone());
        Ok(credentials)
    }
}

impl<C: Connector> std::fmt::Debug for SessionRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("venue", &self.venue)
            .field("sessions", &self.session_count())
            .finish_non_exhaustive()
    }
}
