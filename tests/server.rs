mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::DateTime;
use clob_order_gateway::clob::types::{Side, TickSize};
use clob_order_gateway::order::{LimitTimeInForce, MarketTimeInForce, OrderRequest};
use clob_order_gateway::server::router;
use clob_order_gateway::types::{U256, dec};
use http_body_util::BodyExt as _;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::common::{
    DEFAULT_SIGNER, Derive, FUNDER, KNOWN_TOKEN, OTHER_KEY, OTHER_SIGNER, address, dispatcher,
};

async fn send(app: Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body.map_or_else(Body::empty, |body| Body::from(body.to_string()));
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(body)
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();

    (status, serde_json::from_slice(&bytes).expect("json body"))
}

async fn post(app: Router, path: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", path, Some(body)).await
}

fn assert_failure(status: StatusCode, body: &Value, expected: StatusCode, message: &str) {
    assert_eq!(status, expected, "status for {body}");
    assert_eq!(body["success"], false, "failure flag");
    assert!(
        body["error"].as_str().expect("error message").contains(message),
        "expected `{message}` in {body}"
    );
    assert!(body["timestamp"].is_string(), "timestamp");
}

#[tokio::test]
async fn limit_order_end_to_end() {
    let (venue, dispatcher) = dispatcher();

    let (status, body) = post(
        router(dispatcher),
        "/api/orders/limit",
        json!({"tokenId": KNOWN_TOKEN.to_string(), "price": 0.5, "side": "BUY", "size": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true, "success flag");
    assert_eq!(body["data"]["orderID"], "0xfeed", "venue response passed through");
    assert!(body.get("error").is_none(), "no error field");
    DateTime::parse_from_rfc3339(body["timestamp"].as_str().expect("timestamp"))
        .expect("ISO-8601 timestamp");

    let submitted = venue.submitted();
    assert_eq!(submitted.len(), 1, "one order");
    let order = &submitted[0];
    assert_eq!(order.signer, address(DEFAULT_SIGNER), "default identity");
    assert_eq!(order.options.tick_size, TickSize::Hundredth, "fetched tick size");
    assert!(!order.options.neg_risk, "neg risk defaults to false");
    match &order.order {
        OrderRequest::Limit(limit) => {
            assert_eq!(limit.token_id, U256::from(KNOWN_TOKEN), "token");
            assert_eq!(limit.price, dec!(0.5), "price");
            assert_eq!(limit.size, dec!(10), "size");
            assert_eq!(limit.side, Side::Buy, "side");
            assert_eq!(limit.time_in_force, LimitTimeInForce::Gtc, "tif");
        }
        other => panic!("expected a limit order, got {other:?}"),
    }
    assert_eq!(venue.tick_size_lookups(), 1, "tick size was resolved");
}

#[tokio::test]
async fn hex_token_id_end_to_end() {
    let (venue, dispatcher) = dispatcher();
    venue.add_market(U256::from(0xabc_u64), TickSize::Thousandth);

    let (status, body) = post(
        router(dispatcher),
        "/api/orders/limit",
        json!({"tokenId": "0xabc", "price": 0.5, "side": "BUY", "size": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true, "success flag");
    assert!(body["data"].is_object(), "venue response");
    assert_eq!(
        venue.submitted()[0].options.tick_size,
        TickSize::Thousandth,
        "tick size of the hex token"
    );
}

#[tokio::test]
async fn supplied_tick_size_skips_market_lookup() {
    let (venue, dispatcher) = dispatcher();

    let (status, body) = post(
        router(dispatcher),
        "/api/orders/limit",
        json!({
            "tokenId": "555",
            "price": "0.123",
            "side": "SELL",
            "size": 3,
            "tickSize": "0.001",
            "negRisk": true,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(venue.tick_size_lookups(), 0, "no lookup");
    let submitted = venue.submitted();
    assert_eq!(submitted[0].options.tick_size, TickSize::Thousandth, "caller tick size");
    assert!(submitted[0].options.neg_risk, "caller neg risk");
}

#[tokio::test]
async fn legacy_route_is_the_limit_route() {
    let (venue, dispatcher) = dispatcher();

    let (status, body) = post(
        router(dispatcher),
        "/api/orders",
        json!({"tokenId": KNOWN_TOKEN.to_string(), "price": 0.5, "side": "BUY", "size": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(
        matches!(venue.submitted()[0].order, OrderRequest::Limit(_)),
        "limit path"
    );
}

#[tokio::test]
async fn missing_price_is_a_bad_request() {
    let (venue, dispatcher) = dispatcher();

    let (status, body) = post(
        router(dispatcher),
        "/api/orders/limit",
        json!({"tokenId": "1", "side": "BUY", "size": 10}),
    )
    .await;

    assert_failure(status, &body, StatusCode::BAD_REQUEST, "price is required");
    assert_eq!(venue.derivations(), 0, "no network before validation");
}

#[tokio::test]
async fn zero_amount_market_order_is_a_bad_request() {
    let (_, dispatcher) = dispatcher();

    let (status, body) = post(
        router(dispatcher),
        "/api/orders/market",
        json!({"tokenId": "1", "amountUsd": 0, "side": "BUY", "timeInForce": "FOK"}),
    )
    .await;

    assert_failure(
        status,
        &body,
        StatusCode::BAD_REQUEST,
        "amount is required and must be greater than 0",
    );
}

#[tokio::test]
async fn half_a_credential_pair_is_a_bad_request() {
    let (venue, dispatcher) = dispatcher();

    let (status, body) = post(
        router(dispatcher),
        "/api/orders/limit",
        json!({"tokenId": "1", "price": 0.5, "side": "BUY", "size": 10, "signingKey": OTHER_KEY}),
    )
    .await;

    assert_failure(
        status,
        &body,
        StatusCode::BAD_REQUEST,
        "must be provided together",
    );
    assert_eq!(venue.derivations(), 0, "no network before pairing check");
}

#[tokio::test]
async fn market_time_in_force_on_the_limit_route_is_rejected() {
    let (venue, dispatcher) = dispatcher();

    let (status, body) = post(
        router(dispatcher),
        "/api/orders/limit",
        json!({"tokenId": "1", "price": 0.5, "side": "BUY", "size": 10, "timeInForce": "FOK"}),
    )
    .await;

    assert_failure(
        status,
        &body,
        StatusCode::BAD_REQUEST,
        "FOK/FAK require the market-order path",
    );
    assert!(venue.submitted().is_empty(), "nothing submitted");
}

#[tokio::test]
async fn unknown_market_is_reported() {
    let (venue, dispatcher) = dispatcher();

    let (status, body) = post(
        router(dispatcher),
        "/api/orders/limit",
        json!({"tokenId": "999", "price": 0.5, "side": "BUY", "size": 10}),
    )
    .await;

    assert_failure(
        status,
        &body,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Market not found for tokenID: 999",
    );
    assert!(venue.submitted().is_empty(), "nothing submitted");
}

#[tokio::test]
async fn market_order_end_to_end() {
    let (venue, dispatcher) = dispatcher();

    let (status, body) = post(
        router(dispatcher),
        "/api/orders/market",
        json!({
            "tokenId": KNOWN_TOKEN.to_string(),
            "amount": "25",
            "side": "BUY",
            "orderType": "FAK",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let submitted = venue.submitted();
    match &submitted[0].order {
        OrderRequest::Market(market) => {
            assert_eq!(market.amount, dec!(25), "amount");
            assert_eq!(market.time_in_force, MarketTimeInForce::Fak, "tif");
        }
        other => panic!("expected a market order, got {other:?}"),
    }
    assert_eq!(submitted[0].options.tick_size, TickSize::Hundredth, "resolved tick");
}

#[tokio::test]
async fn explicit_pair_signs_the_order() {
    let (venue, dispatcher) = dispatcher();
    let app = router(dispatcher);
    let body = json!({
        "tokenId": KNOWN_TOKEN.to_string(),
        "price": 0.5,
        "side": "BUY",
        "size": 10,
        "signingKey": OTHER_KEY,
        "funderAddress": FUNDER,
    });

    let (status, _) = post(app.clone(), "/api/orders/limit", body.clone()).await;
    assert_eq!(status, StatusCode::OK, "first order");
    let (status, _) = post(app, "/api/orders/limit", body).await;
    assert_eq!(status, StatusCode::OK, "second order");

    let submitted = venue.submitted();
    assert!(
        submitted.iter().all(|s| s.signer == address(OTHER_SIGNER)),
        "explicit signer"
    );
    assert_eq!(venue.derivations(), 1, "session reused across requests");
}

#[tokio::test]
async fn derivation_failure_is_a_server_error() {
    let (venue, dispatcher) = dispatcher();
    venue.set_derive(Derive::Fail);

    let (status, body) = post(
        router(dispatcher),
        "/api/orders/limit",
        json!({"tokenId": KNOWN_TOKEN.to_string(), "price": 0.5, "side": "BUY", "size": 10}),
    )
    .await;

    assert_failure(
        status,
        &body,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to derive API credentials",
    );
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (_, dispatcher) = dispatcher();
    let request = Request::builder()
        .method("POST")
        .uri("/api/orders/limit")
        .header("content-type", "application/json")
        .body(Body::from("{\"tokenId\":"))
        .expect("request");

    let response = router(dispatcher).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST, "malformed body");
}

#[tokio::test]
async fn health_and_status_endpoints() {
    let (_, dispatcher) = dispatcher();
    let app = router(dispatcher);

    let (status, body) = send(app.clone(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK, "health");
    assert_eq!(body["status"], "ok", "health body");
    assert!(body["timestamp"].is_string(), "health timestamp");

    let (status, body) = send(app, "GET", "/api/orders/status", None).await;
    assert_eq!(status, StatusCode::OK, "status");
    assert!(body["message"].is_string(), "placeholder message");
}
