use std::fmt;
use std::str::FromStr;

use alloy::primitives::Signature;
use alloy::sol;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_repr::{Deserialize_repr, Serialize_repr};
use strum_macros::Display;

use crate::Result;
use crate::auth::ApiKey;
use crate::error::Error;
use crate::types::{Address, Decimal, dec};

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u8)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(Error::validation(format!(
                "invalid side `{other}`; expected BUY or SELL"
            ))),
        }
    }
}

/// Venue order-type codes.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    GTC,
    FOK,
    GTD,
    FAK,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum SignatureType {
    Eoa = 0,
    Proxy = 1,
    #[default]
    GnosisSafe = 2,
}

impl SignatureType {
    /// Parses config-style input: `0|1|2` or `eoa|proxy|gnosis`.
    pub fn parse(value: &str) -> Result<SignatureType> {
        match value.trim().to_ascii_lowercase().as_str() {
            "0" | "eoa" => Ok(SignatureType::Eoa),
            "1" | "proxy" => Ok(SignatureType::Proxy),
            "2" | "gnosis" | "gnosis_safe" | "gnosissafe" | "safe" => {
                Ok(SignatureType::GnosisSafe)
            }
            other => Err(Error::validation(format!(
                "invalid signature_type `{other}`; expected one of: eoa|proxy|gnosis"
            ))),
        }
    }
}

impl FromStr for SignatureType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SignatureType::parse(s)
    }
}

/// Minimum price increment accepted by a market.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(into = "Decimal")]
pub enum TickSize {
    Tenth,
    Hundredth,
    Thousandth,
    TenThousandth,
}

impl TickSize {
    #[must_use]
    pub fn as_decimal(self) -> Decimal {
        match self {
            TickSize::Tenth => dec!(0.1),
            TickSize::Hundredth => dec!(0.01),
            TickSize::Thousandth => dec!(0.001),
            TickSize::TenThousandth => dec!(0.0001),
        }
    }
}

impl TryFrom<Decimal> for TickSize {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self> {
        let normalized = value.normalize();
        [
            TickSize::Tenth,
            TickSize::Hundredth,
            TickSize::Thousandth,
            TickSize::TenThousandth,
        ]
        .into_iter()
        .find(|tick| tick.as_decimal() == normalized)
        .ok_or_else(|| {
            Error::validation(format!(
                "invalid tickSize {value}; expected one of 0.1, 0.01, 0.001, 0.0001"
            ))
        })
    }
}

impl From<TickSize> for Decimal {
    fn from(value: TickSize) -> Self {
        value.as_decimal()
    }
}

impl fmt::Display for TickSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

sol! {
    /// CTF exchange order, signed as EIP-712 typed data.
    #[derive(Debug, PartialEq, Eq)]
    struct Order {
        uint256 salt;
        address maker;
        address signer;
        address taker;
        uint256 tokenId;
        uint256 makerAmount;
        uint256 takerAmount;
        uint256 expiration;
        uint256 nonce;
        uint256 feeRateBps;
        uint8 side;
        uint8 signatureType;
    }
}

#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct SignedOrder {
    pub order: Order,
    pub signature: Signature,
    pub order_type: OrderType,
    pub owner: ApiKey,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderPayload {
    salt: u64,
    maker: Address,
    signer: Address,
    taker: Address,
    token_id: String,
    maker_amount: String,
    taker_amount: String,
    expiration: String,
    nonce: String,
    fee_rate_bps: String,
    side: Side,
    signature_type: u8,
    signature: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignedOrderPayload {
    order: OrderPayload,
    owner: ApiKey,
    order_type: OrderType,
}

impl Serialize for SignedOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let order = &self.order;
        let side = match order.side {
            0 => Side::Buy,
            1 => Side::Sell,
            other => return Err(S::Error::custom(format!("invalid side code {other}"))),
        };

        SignedOrderPayload {
            order: OrderPayload {
                salt: u64::try_from(order.salt).map_err(S::Error::custom)?,
                maker: order.maker,
                signer: order.signer,
                taker: order.taker,
                token_id: order.tokenId.to_string(),
                maker_amount: order.makerAmount.to_string(),
                taker_amount: order.takerAmount.to_string(),
                expiration: order.expiration.to_string(),
                nonce: order.nonce.to_string(),
                fee_rate_bps: order.feeRateBps.to_string(),
                side,
                signature_type: order.signatureType,
                signature: self.signature.to_string(),
            },
            owner: self.owner,
            order_type: self.order_type,
        }
        .serialize(serializer)
    }
}

pub mod response {
    use serde::{Deserialize, Serialize};

    use crate::types::Decimal;

    /// Venue acknowledgement for `POST /order`, passed back to the caller as-is.
    #[non_exhaustive]
    #[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct PostOrderResponse {
        #[serde(default)]
        pub success: bool,
        #[serde(default)]
        pub error_msg: String,
        #[serde(default, rename = "orderID")]
        pub order_id: String,
        #[serde(default)]
        pub status: String,
        #[serde(default)]
        pub making_amount: String,
        #[serde(default)]
        pub taking_amount: String,
        #[serde(default, alias = "transactionHashes")]
        pub transactions_hashes: Vec<String>,
    }

    #[non_exhaustive]
    #[derive(Clone, Copy, Debug, Deserialize)]
    pub struct TickSizeResponse {
        pub minimum_tick_size: Decimal,
    }

    #[non_exhaustive]
    #[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
    pub struct OrderSummary {
        pub price: Decimal,
        pub size: Decimal,
    }

    /// Resting liquidity for a token. Bids ascend and asks descend in price,
    /// so the best level on either side is the last element.
    #[non_exhaustive]
    #[derive(Clone, Debug, Default, Deserialize)]
    pub struct OrderBookSummary {
        #[serde(default)]
        pub bids: Vec<OrderSummary>,
        #[serde(default)]
        pub asks: Vec<OrderSummary>,
    }

    impl OrderBookSummary {
        #[must_use]
        pub fn new(bids: Vec<OrderSummary>, asks: Vec<OrderSummary>) -> Self {
            Self { bids, asks }
        }
    }

    impl OrderSummary {
        #[must_use]
        pub fn new(price: Decimal, size: Decimal) -> Self {
            Self { price, size }
        }
    }
}
