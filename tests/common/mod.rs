#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::HashMap;
use std::str::FromStr as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use clob_order_gateway::auth::{CredentialPair, Credentials, PairKey};
use clob_order_gateway::clob::types::response::PostOrderResponse;
use clob_order_gateway::clob::types::{SignatureType, TickSize};
use clob_order_gateway::config::VenueConfig;
use clob_order_gateway::error::Error;
use clob_order_gateway::order::{Dispatcher, LimitOrder, MarketOrder, OrderRequest};
use clob_order_gateway::registry::SessionRegistry;
use clob_order_gateway::types::{Address, U256};
use clob_order_gateway::venue::{Connector, OrderOptions, Session};
use clob_order_gateway::{POLYGON, Result};
use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use uuid::Uuid;

pub const DEFAULT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEFAULT_SIGNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const OTHER_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
pub const OTHER_SIGNER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const FUNDER: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

pub const KNOWN_TOKEN: u64 = 1001;

pub fn pair(key: &str, funder: &str) -> CredentialPair {
    CredentialPair::parse(&SecretString::from(key.to_owned()), funder).expect("valid pair")
}

pub fn default_pair() -> CredentialPair {
    pair(DEFAULT_KEY, FUNDER)
}

pub fn venue_config(host: &str) -> VenueConfig {
    VenueConfig::new(
        Url::parse(host).expect("host"),
        POLYGON,
        SignatureType::GnosisSafe,
    )
    .expect("venue")
}

pub fn credentials() -> Credentials {
    Credentials::new(
        Uuid::nil(),
        SecretString::from("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=".to_owned()),
        SecretString::from("passphrase".to_owned()),
    )
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Derive {
    Succeed,
    ReturnNothing,
    Fail,
}

/// One order the fake venue accepted.
#[derive(Clone, Debug)]
pub struct Submitted {
    pub signer: Address,
    pub order: OrderRequest,
    pub options: OrderOptions,
}

/// In-memory venue that records every call.
#[derive(Debug)]
pub struct FakeVenue {
    pub derivations: AtomicUsize,
    pub connects: AtomicUsize,
    pub tick_size_lookups: AtomicUsize,
    derive: Mutex<Derive>,
    fail_connect: Mutex<bool>,
    markets: Mutex<HashMap<U256, TickSize>>,
    submitted: Mutex<Vec<Submitted>>,
}

impl Default for FakeVenue {
    fn default() -> Self {
        let markets = HashMap::from([(U256::from(KNOWN_TOKEN), TickSize::Hundredth)]);

        Self {
            derivations: AtomicUsize::new(0),
            connects: AtomicUsize::new(0),
            tick_size_lookups: AtomicUsize::new(0),
            derive: Mutex::new(Derive::Succeed),
            fail_connect: Mutex::new(false),
            markets: Mutex::new(markets),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

impl FakeVenue {
    pub fn set_derive(&self, behaviour: Derive) {
        *self.derive.lock().expect("lock") = behaviour;
    }

    pub fn add_market(&self, token_id: U256, tick_size: TickSize) {
        self.markets.lock().expect("lock").insert(token_id, tick_size);
    }

    pub fn set_fail_connect(&self, fail: bool) {
        *self.fail_connect.lock().expect("lock") = fail;
    }

    pub fn submitted(&self) -> Vec<Submitted> {
        self.submitted.lock().expect("lock").clone()
    }

    pub fn derivations(&self) -> usize {
        self.derivations.load(Ordering::SeqCst)
    }

    pub fn tick_size_lookups(&self) -> usize {
        self.tick_size_lookups.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FakeConnector {
    pub venue: Arc<FakeVenue>,
}

#[derive(Debug)]
pub struct FakeSession {
    pub key: PairKey,
    venue: Arc<FakeVenue>,
}

#[async_trait]
impl Connector for FakeConnector {
    type Session = FakeSession;

    async fn derive_api_key(
        &self,
        _pair: &CredentialPair,
        _venue: &VenueConfig,
    ) -> Result<Option<Credentials>> {
        self.venue.derivations.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;

        let behaviour = *self.venue.derive.lock().expect("lock");
        match behaviour {
            Derive::Succeed => Ok(Some(credentials())),
            Derive::ReturnNothing => Ok(None),
            Derive::Fail => Err(Error::status(
                StatusCode::UNAUTHORIZED,
                Method::GET,
                "/auth/derive-api-key".to_owned(),
                r#"{"error":"Invalid L1 Request headers"}"#,
            )),
        }
    }

    fn connect(
        &self,
        pair: &CredentialPair,
        _venue: &VenueConfig,
        _credentials: Credentials,
    ) -> Result<FakeSession> {
        self.venue.connects.fetch_add(1, Ordering::SeqCst);
        if *self.venue.fail_connect.lock().expect("lock") {
            return Err(Error::internal("connect failed"));
        }

        Ok(FakeSession {
            key: pair.key(),
            venue: Arc::clone(&self.venue),
        })
    }
}

impl FakeSession {
    fn accept(&self, order: OrderRequest, options: OrderOptions) -> PostOrderResponse {
        self.venue.submitted.lock().expect("lock").push(Submitted {
            signer: self.key.signer,
            order,
            options,
        });

        serde_json::from_value(json!({
            "success": true,
            "errorMsg": "",
            "orderID": "0xfeed",
            "status": "live",
            "transactionsHashes": [],
        }))
        .expect("response")
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn tick_size(&self, token_id: U256) -> Result<TickSize> {
        self.venue.tick_size_lookups.fetch_add(1, Ordering::SeqCst);

        let known = self.venue.markets.lock().expect("lock").get(&token_id).copied();
        known.ok_or_else(|| {
            Error::status(
                StatusCode::NOT_FOUND,
                Method::GET,
                "/tick-size".to_owned(),
                r#"{"error":"market not found"}"#,
            )
        })
    }

    async fn post_limit_order(
        &self,
        order: &LimitOrder,
        options: OrderOptions,
    ) -> Result<PostOrderResponse> {
        Ok(self.accept(OrderRequest::Limit(order.clone()), options))
    }

    async fn post_market_order(
        &self,
        order: &MarketOrder,
        options: OrderOptions,
    ) -> Result<PostOrderResponse> {
        Ok(self.accept(OrderRequest::Market(order.clone()), options))
    }
}

pub fn registry(connector: FakeConnector) -> Arc<SessionRegistry<FakeConnector>> {
    Arc::new(SessionRegistry::new(
        connector,
        venue_config("https://clob.polymarket.com"),
    ))
}

pub fn dispatcher() -> (Arc<FakeVenue>, Arc<Dispatcher<FakeConnector>>) {
    let connector = FakeConnector::default();
    let venue = Arc::clone(&connector.venue);
    let dispatcher = Arc::new(Dispatcher::new(registry(connector), default_pair()));

    (venue, dispatcher)
}

pub fn address(value: &str) -> Address {
    Address::from_str(value).expect("address")
}
