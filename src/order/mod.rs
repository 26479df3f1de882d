//! Order normalization and dispatch.
//!
//! A raw [`OrderBody`] is validated into an [`OrderRequest`] and a
//! [`SigningIdentity`](crate::auth::SigningIdentity) without touching the
//! network. The [`Dispatcher`] then resolves the session and tick size and
//! submits the order.

mod body;
mod dispatch;
mod normalize;

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::SigningIdentity;
use crate::clob::types::{OrderType, Side, TickSize};
use crate::types::{Decimal, U256};

pub use body::OrderBody;
pub use dispatch::Dispatcher;

/// Time-in-force accepted on the limit-order path.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum LimitTimeInForce {
    #[default]
    Gtc,
    Gtd,
}

/// Time-in-force accepted on the market-order path.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum MarketTimeInForce {
    Fok,
    Fak,
}

impl From<LimitTimeInForce> for OrderType {
    fn from(value: LimitTimeInForce) -> Self {
        match value {
            LimitTimeInForce::Gtc => OrderType::GTC,
            LimitTimeInForce::Gtd => OrderType::GTD,
        }
    }
}

impl From<MarketTimeInForce> for OrderType {
    fn from(value: MarketTimeInForce) -> Self {
        match value {
            MarketTimeInForce::Fok => OrderType::FOK,
            MarketTimeInForce::Fak => OrderType::FAK,
        }
    }
}

/// A validated resting order.
#[non_exhaustive]
#[derive(Clone, Debug, Builder, PartialEq)]
pub struct LimitOrder {
    pub token_id: U256,
    pub price: Decimal,
    pub side: Side,
    pub size: Decimal,
    pub tick_size: Option<TickSize>,
    pub neg_risk: Option<bool>,
    #[builder(default)]
    pub time_in_force: LimitTimeInForce,
    pub expiration: Option<DateTime<Utc>>,
}

/// A validated immediate order. `amount` is USDC to spend when buying and
/// shares to sell when selling.
#[non_exhaustive]
#[derive(Clone, Debug, Builder, PartialEq)]
pub struct MarketOrder {
    pub token_id: U256,
    pub amount: Decimal,
    pub side: Side,
    pub time_in_force: MarketTimeInForce,
    pub tick_size: Option<TickSize>,
    pub neg_risk: Option<bool>,
}

/// Limit and market orders never share fields that belong to the other class.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum OrderRequest {
    Limit(LimitOrder),
    Market(MarketOrder),
}

impl OrderRequest {
    #[must_use]
    pub fn token_id(&self) -> U256 {
        match self {
            OrderRequest::Limit(order) => order.token_id,
            OrderRequest::Market(order) => order.token_id,
        }
    }

    #[must_use]
    pub fn tick_size(&self) -> Option<TickSize> {
        match self {
            OrderRequest::Limit(order) => order.tick_size,
            OrderRequest::Market(order) => order.tick_size,
        }
    }

    #[must_use]
    pub fn neg_risk(&self) -> Option<bool> {
        match self {
            OrderRequest::Limit(order) => order.neg_risk,
            OrderRequest::Market(order) => order.neg_risk,
        }
    }
}

/// A normalized request ready for dispatch.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct Submission {
    pub identity: SigningIdentity,
    pub order: OrderRequest,
}

impl Submission {
    #[must_use]
    pub fn new(identity: SigningIdentity, order: OrderRequest) -> Self {
        Self { identity, order }
    }
}
