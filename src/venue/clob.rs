use std::borrow::Cow;

use alloy::dyn_abi::Eip712Domain;
use alloy::primitives::U256;
use alloy::signers::Signer as _;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolStruct as _;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng as _;
use reqwest::Client as ReqwestClient;
use reqwest::Method;
use rust_decimal::prelude::ToPrimitive as _;
use url::Url;

use crate::auth::{CredentialPair, Credentials, l1, l2};
use crate::clob::types::response::{OrderBookSummary, PostOrderResponse, TickSizeResponse};
use crate::clob::types::{Order, OrderType, Side, SignatureType, SignedOrder, TickSize};
use crate::config::VenueConfig;
use crate::contract_config;
use crate::error::{Error, Kind as ErrorKind};
use crate::order::{LimitOrder, MarketOrder};
use crate::types::{Address, ChainId, Decimal};
use crate::venue::{Connector, OrderOptions, Session, market_price};
use crate::{Result, Timestamp};

const ORDER_NAME: Option<Cow<'static, str>> = Some(Cow::Borrowed("Polymarket CTF Exchange"));
const VERSION: Option<Cow<'static, str>> = Some(Cow::Borrowed("1"));

const USDC_DECIMALS: u32 = 6;
const LOT_SIZE_SCALE: u32 = 2;

/// Builds [`ClobSession`]s against a Polymarket CLOB host.
#[derive(Clone, Debug, Default)]
pub struct ClobConnector {
    client: ReqwestClient,
}

impl ClobConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn l1_request(
        &self,
        method: Method,
        path: &str,
        pair: &CredentialPair,
        venue: &VenueConfig,
    ) -> Result<Option<Credentials>> {
        let request = self
            .client
            .request(method, venue.host.join(path)?)
            .build()?;
        let headers =
            l1::create_headers(pair.signer(), venue.chain_id, Utc::now().timestamp(), None)
                .await?;

        crate::request::<Option<Credentials>>(&self.client, request, Some(headers)).await
    }
}

#[async_trait]
impl Connector for ClobConnector {
    type Session = ClobSession;

    /// Creates an API key for `pair`, falling back to deriving the existing
    /// one when the venue refuses creation.
    async fn derive_api_key(
        &self,
        pair: &CredentialPair,
        venue: &VenueConfig,
    ) -> Result<Option<Credentials>> {
        match self.l1_request(Method::POST, "auth/api-key", pair, venue).await {
            Ok(Some(credentials)) => Ok(Some(credentials)),
            Ok(None) => {
                tracing::debug!(signer = %pair.address(), "api key creation returned nothing");
                self.l1_request(Method::GET, "auth/derive-api-key", pair, venue)
                    .await
            }
            Err(err) if err.kind() == ErrorKind::Status => {
                tracing::debug!(signer = %pair.address(), error = %err, "api key creation refused");
                self.l1_request(Method::GET, "auth/derive-api-key", pair, venue)
                    .await
            }
            Err(err) => Err(err),
        }
    }

    fn connect(
        &self,
        pair: &CredentialPair,
        venue: &VenueConfig,
        credentials: Credentials,
    ) -> Result<ClobSession> {
        ClobSession::new(self.client.clone(), pair, venue, credentials)
    }
}

/// Authenticated CLOB client for one signing key and funder.
#[derive(Clone, Debug)]
pub struct ClobSession {
    host: Url,
    chain_id: ChainId,
    signer: PrivateKeySigner,
    signature_type: SignatureType,
    funder: Address,
    credentials: Credentials,
    client: ReqwestClient,
}

impl ClobSession {
    pub fn new(
        client: ReqwestClient,
        pair: &CredentialPair,
        venue: &VenueConfig,
        credentials: Credentials,
    ) -> Result<Self> {
        if contract_config(venue.chain_id, false).is_none() {
            return Err(Error::missing_contract_config(venue.chain_id, false));
        }

        Ok(Self {
            host: venue.host.clone(),
            chain_id: venue.chain_id,
            signer: pair.signer().clone().with_chain_id(Some(venue.chain_id)),
            signature_type: venue.signature_type,
            funder: pair.funder(),
            credentials,
            client,
        })
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub async fn order_book(&self, token_id: U256) -> Result<OrderBookSummary> {
        let request = self
            .client
            .request(Method::GET, self.endpoint("book")?)
            .query(&[("token_id", token_id.to_string())])
            .build()?;

        crate::request::<OrderBookSummary>(&self.client, request, None).await
    }

    /// Builds and signs a limit order.
    pub async fn sign_limit_order(
        &self,
        order: &LimitOrder,
        options: OrderOptions,
    ) -> Result<SignedOrder> {
        let order_type = OrderType::from(order.time_in_force);
        let expiration = order.expiration.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        if !matches!(order_type, OrderType::GTD) && expiration > DateTime::<Utc>::UNIX_EPOCH {
            return Err(Error::validation(
                "Only GTD orders may have a non-zero expiration",
            ));
        }

        let price = order.price;
        let size = order.size;

        if size.is_zero() || size.is_sign_negative() {
            return Err(Error::validation(format!(
                "Unable to build Order due to non-positive size {size}"
            )));
        }
        if size.normalize().scale() > LOT_SIZE_SCALE {
            return Err(Error::validation(format!(
                "Unable to build Order: Size {size} has {} decimal places. Maximum lot size is {LOT_SIZE_SCALE}",
                size.normalize().scale()
            )));
        }

        let decimals = check_price(price, options.tick_size)?;

        let notional = size
            .checked_mul(price)
            .ok_or_else(|| amount_too_large(size))?
            .trunc_with_scale(decimals + LOT_SIZE_SCALE);
        let (taker_amount, maker_amount) = match order.side {
            Side::Buy => (size, notional),
            Side::Sell => (notional, size),
        };

        self.sign(
            order.token_id,
            order.side,
            maker_amount,
            taker_amount,
            expiration,
            order_type,
            options.neg_risk,
        )
        .await
    }

    /// Prices a market order against the live book, then builds and signs it.
    pub async fn sign_market_order(
        &self,
        order: &MarketOrder,
        options: OrderOptions,
    ) -> Result<SignedOrder> {
        let order_type = OrderType::from(order.time_in_force);
        let amount = order.amount.trunc_with_scale(LOT_SIZE_SCALE);

        if amount.is_zero() || amount.is_sign_negative() {
            return Err(Error::validation(format!(
                "Unable to build Order due to non-positive amount {}",
                order.amount
            )));
        }

        let book = self.order_book(order.token_id).await?;
        let price = market_price(&book, order.side, amount, order_type)?
            .round_dp(options.tick_size.as_decimal().scale());
        let decimals = check_price(price, options.tick_size)?;

        let maker_amount = amount;
        let taker_amount = match order.side {
            Side::Buy => amount.checked_div(price),
            Side::Sell => amount.checked_mul(price),
        }
        .ok_or_else(|| amount_too_large(amount))?
        .trunc_with_scale(decimals + LOT_SIZE_SCALE);

        self.sign(
            order.token_id,
            order.side,
            maker_amount,
            taker_amount,
            DateTime::<Utc>::UNIX_EPOCH,
            order_type,
            options.neg_risk,
        )
        .await
    }

    #[expect(
        clippy::too_many_arguments,
        reason = "mirrors the fields of the signed order struct"
    )]
    async fn sign(
        &self,
        token_id: U256,
        side: Side,
        maker_amount: Decimal,
        taker_amount: Decimal,
        expiration: DateTime<Utc>,
        order_type: OrderType,
        neg_risk: bool,
    ) -> Result<SignedOrder> {
        let expiration = expiration.timestamp().to_u64().ok_or_else(|| {
            Error::validation(format!(
                "Unable to represent expiration {expiration} as a u64"
            ))
        })?;

        let order = Order {
            salt: U256::from(to_ieee_754_int(generate_seed())),
            maker: self.funder,
            signer: self.address(),
            taker: Address::ZERO,
            tokenId: token_id,
            makerAmount: U256::from(to_fixed_u128(maker_amount)?),
            takerAmount: U256::from(to_fixed_u128(taker_amount)?),
            expiration: U256::from(expiration),
            nonce: U256::ZERO,
            feeRateBps: U256::ZERO,
            side: side as u8,
            signatureType: self.signature_type as u8,
        };

        let exchange_contract = contract_config(self.chain_id, neg_risk)
            .ok_or_else(|| Error::missing_contract_config(self.chain_id, neg_risk))?
            .exchange;
        let domain = Eip712Domain {
            name: ORDER_NAME,
            version: VERSION,
            chain_id: Some(U256::from(self.chain_id)),
            verifying_contract: Some(exchange_contract),
            ..Eip712Domain::default()
        };
        let signature = self
            .signer
            .sign_hash(&order.eip712_signing_hash(&domain))
            .await?;

        Ok(SignedOrder {
            order,
            signature,
            order_type,
            owner: self.credentials.key(),
        })
    }

    /// Posts an already-signed order to `/order`.
    pub async fn post_signed_order(&self, signed_order: &SignedOrder) -> Result<PostOrderResponse> {
        let request = self
            .client
            .request(Method::POST, self.endpoint("order")?)
            .json(signed_order)
            .build()?;
        let headers = self.create_l2_headers(&request, Utc::now().timestamp())?;

        let response =
            crate::request::<PostOrderResponse>(&self.client, request, Some(headers)).await?;

        tracing::info!(
            order_id = %response.order_id,
            status = %response.status,
            success = response.success,
            "order submitted"
        );

        Ok(response)
    }

    fn create_l2_headers(
        &self,
        request: &reqwest::Request,
        timestamp: Timestamp,
    ) -> Result<reqwest::header::HeaderMap> {
        l2::create_headers(self.address(), &self.credentials, request, timestamp)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.host.join(path)?)
    }
}

#[async_trait]
impl Session for ClobSession {
    async fn tick_size(&self, token_id: U256) -> Result<TickSize> {
        let request = self
            .client
            .request(Method::GET, self.endpoint("tick-size")?)
            .query(&[("token_id", token_id.to_string())])
            .build()?;

        let response = crate::request::<TickSizeResponse>(&self.client, request, None).await?;
        TickSize::try_from(response.minimum_tick_size)
    }

    async fn post_limit_order(
        &self,
        order: &LimitOrder,
        options: OrderOptions,
    ) -> Result<PostOrderResponse> {
        let signed = self.sign_limit_order(order, options).await?;
        self.post_signed_order(&signed).await
    }

    async fn post_market_order(
        &self,
        order: &MarketOrder,
        options: OrderOptions,
    ) -> Result<PostOrderResponse> {
        let signed = self.sign_market_order(order, options).await?;
        self.post_signed_order(&signed).await
    }
}

/// Checks `price` against the tick grid and returns the tick's decimal places.
fn check_price(price: Decimal, tick_size: TickSize) -> Result<u32> {
    let minimum_tick_size = tick_size.as_decimal();

    if price.is_sign_negative() {
        return Err(Error::validation(format!(
            "Unable to build Order due to negative price {price}"
        )));
    }
    if price.normalize().scale() > minimum_tick_size.scale() {
        return Err(Error::validation(format!(
            "Unable to build Order: Price {price} has {} decimal places. Minimum tick size \
            {minimum_tick_size} has {} decimal places. Price decimal places <= minimum tick size decimal places",
            price.normalize().scale(),
            minimum_tick_size.scale()
        )));
    }
    if price < minimum_tick_size || price > Decimal::ONE - minimum_tick_size {
        return Err(Error::validation(format!(
            "Price {price} is too small or too large for the minimum tick size {minimum_tick_size}"
        )));
    }

    Ok(minimum_tick_size.scale())
}

/// Removes trailing zeros, truncates to 6 decimals, and quantizes as integer.
fn to_fixed_u128(d: Decimal) -> Result<u128> {
    if d.is_sign_negative() {
        return Err(Error::validation(format!("amount cannot be negative: {d}")));
    }

    let fixed = d.normalize().trunc_with_scale(USDC_DECIMALS);
    // Rescaling stops short of 6 decimals when the mantissa would overflow.
    if fixed.scale() != USDC_DECIMALS {
        return Err(amount_too_large(d));
    }

    fixed
        .mantissa()
        .to_u128()
        .ok_or_else(|| Error::validation(format!("unable to represent amount as u128: {d}")))
}

fn amount_too_large(amount: Decimal) -> Error {
    Error::validation(format!("amount is too large: {amount}"))
}

/// Mask salt to <= 2^53 - 1 because backend parses as IEEE 754.
fn to_ieee_754_int(salt: u64) -> u64 {
    salt & ((1 << 53) - 1)
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "the salt only needs to be unique, not exact"
)]
fn generate_seed() -> u64 {
    let seconds = Utc::now().timestamp_millis() as f64 / 1000.0;
    let random = rand::rng().random::<f64>();
    (seconds * random).round() as u64
}
