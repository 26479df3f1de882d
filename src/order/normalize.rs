use std::str::FromStr as _;

use chrono::{DateTime, Utc};

use crate::Result;
use crate::auth::SigningIdentity;
use crate::clob::types::{Side, TickSize};
use crate::error::Error;
use crate::order::{
    LimitOrder, LimitTimeInForce, MarketOrder, MarketTimeInForce, OrderBody, OrderRequest,
    Submission,
};
use crate::types::{Decimal, U256};

impl OrderBody {
    /// Validates the body as a limit order. Never touches the network.
    pub fn into_limit(self) -> Result<Submission> {
        let token_id = token_id(self.token_id.as_deref())?;
        let price = self
            .price
            .ok_or_else(|| Error::validation("price is required"))?;
        let side = side(self.side.as_deref())?;
        let size = self.size.ok_or_else(|| Error::validation("size is required"))?;
        let tick_size = tick_size(self.tick_size)?;
        let time_in_force = limit_time_in_force(self.time_in_force.as_deref())?;
        let expiration = expiration(time_in_force, self.expiration)?;

        let order = LimitOrder {
            token_id,
            price,
            side,
            size,
            tick_size,
            neg_risk: self.neg_risk,
            time_in_force,
            expiration,
        };
        let identity = SigningIdentity::resolve(self.signing_key, self.funder_address)?;

        Ok(Submission::new(identity, OrderRequest::Limit(order)))
    }

    /// Validates the body as a market order. Never touches the network.
    pub fn into_market(self) -> Result<Submission> {
        let token_id = token_id(self.token_id.as_deref())?;
        let amount = self
            .amount_usd
            .filter(|amount| amount.is_sign_positive() && !amount.is_zero())
            .ok_or_else(|| Error::validation("amount is required and must be greater than 0"))?;
        let side = side(self.side.as_deref())?;
        let time_in_force = market_time_in_force(self.time_in_force.as_deref())?;
        let tick_size = tick_size(self.tick_size)?;

        let order = MarketOrder {
            token_id,
            amount,
            side,
            time_in_force,
            tick_size,
            neg_risk: self.neg_risk,
        };
        let identity = SigningIdentity::resolve(self.signing_key, self.funder_address)?;

        Ok(Submission::new(identity, OrderRequest::Market(order)))
    }
}

fn token_id(value: Option<&str>) -> Result<U256> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::validation("tokenId is required"))?;

    U256::from_str(value).map_err(|e| Error::validation(format!("invalid tokenId `{value}`: {e}")))
}

fn side(value: Option<&str>) -> Result<Side> {
    value
        .and_then(|value| Side::from_str(value).ok())
        .ok_or_else(|| Error::validation("side is required and must be BUY or SELL"))
}

fn tick_size(value: Option<Decimal>) -> Result<Option<TickSize>> {
    value.map(TickSize::try_from).transpose()
}

fn limit_time_in_force(value: Option<&str>) -> Result<LimitTimeInForce> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(LimitTimeInForce::Gtc);
    };

    match value.to_ascii_uppercase().as_str() {
        "GTC" => Ok(LimitTimeInForce::Gtc),
        "GTD" => Ok(LimitTimeInForce::Gtd),
        "FOK" | "FAK" => Err(Error::validation(format!(
            "timeInForce {value} is only valid for market orders; FOK/FAK require the market-order path (POST /api/orders/market)"
        ))),
        _ => Err(Error::validation(format!(
            "invalid timeInForce `{value}` for a limit order; expected GTC or GTD"
        ))),
    }
}

fn market_time_in_force(value: Option<&str>) -> Result<MarketTimeInForce> {
    match value.map(|value| value.trim().to_ascii_uppercase()).as_deref() {
        Some("FOK") => Ok(MarketTimeInForce::Fok),
        Some("FAK") => Ok(MarketTimeInForce::Fak),
        _ => Err(Error::validation(
            "timeInForce is required for market orders and must be FOK or FAK",
        )),
    }
}

fn expiration(
    time_in_force: LimitTimeInForce,
    value: Option<i64>,
) -> Result<Option<DateTime<Utc>>> {
    match (time_in_force, value.filter(|seconds| *seconds != 0)) {
        (LimitTimeInForce::Gtd, None) => {
            Err(Error::validation("expiration is required for GTD orders"))
        }
        (LimitTimeInForce::Gtd, Some(seconds)) => DateTime::from_timestamp(seconds, 0)
            .filter(|expiration| *expiration > DateTime::<Utc>::UNIX_EPOCH)
            .map(Some)
            .ok_or_else(|| Error::validation(format!("invalid expiration {seconds}"))),
        (LimitTimeInForce::Gtc, Some(_)) => Err(Error::validation(
            "expiration is only supported for GTD orders",
        )),
        (LimitTimeInForce::Gtc, None) => Ok(None),
    }
}
