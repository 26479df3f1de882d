//! Connection to the order-book venue.
//!
//! [`Connector`] performs the per-identity credential derivation and builds
//! [`Session`]s; a session submits orders for exactly one
//! [`CredentialPair`]. [`ClobConnector`] speaks the Polymarket CLOB protocol.

mod clob;
mod pricing;

use async_trait::async_trait;

use crate::Result;
use crate::auth::{CredentialPair, Credentials};
use crate::clob::types::TickSize;
use crate::clob::types::response::PostOrderResponse;
use crate::config::VenueConfig;
use crate::order::{LimitOrder, MarketOrder};
use crate::types::U256;

pub use clob::{ClobConnector, ClobSession};
pub use pricing::market_price;

/// Market parameters resolved before an order is signed.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OrderOptions {
    pub tick_size: TickSize,
    pub neg_risk: bool,
}

impl OrderOptions {
    #[must_use]
    pub fn new(tick_size: TickSize, neg_risk: bool) -> Self {
        Self {
            tick_size,
            neg_risk,
        }
    }
}

/// An authenticated client bound to one credential pair.
#[async_trait]
pub trait Session: Send + Sync {
    /// Minimum tick size of the market trading `token_id`.
    async fn tick_size(&self, token_id: U256) -> Result<TickSize>;

    async fn post_limit_order(
        &self,
        order: &LimitOrder,
        options: OrderOptions,
    ) -> Result<PostOrderResponse>;

    async fn post_market_order(
        &self,
        order: &MarketOrder,
        options: OrderOptions,
    ) -> Result<PostOrderResponse>;
}

#[async_trait]
pub trait Connector: Send + Sync {
    type Session: Session + 'static;

    /// Asks the venue for the API credentials of `pair`.
    ///
    /// `Ok(None)` means the venue answered successfully but returned nothing.
    async fn derive_api_key(
        &self,
        pair: &CredentialPair,
        venue: &VenueConfig,
    ) -> Result<Option<Credentials>>;

    fn connect(
        &self,
        pair: &CredentialPair,
        venue: &VenueConfig,
        credentials: Credentials,
    ) -> Result<Self::Session>;
}
