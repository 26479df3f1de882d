use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};

use crate::clob::types::response::PostOrderResponse;
use crate::order::{Dispatcher, OrderBody};
use crate::server::envelope::{ApiError, Envelope};
use crate::venue::Connector;

type OrderResult = Result<Envelope<PostOrderResponse>, ApiError>;

/// `POST /api/orders/limit` and its legacy alias `POST /api/orders`.
pub async fn post_limit_order<C: Connector + 'static>(
    State(dispatcher): State<Arc<Dispatcher<C>>>,
    body: Bytes,
) -> OrderResult {
    let submission = OrderBody::from_slice(&body)?.into_limit()?;
    let response = dispatcher.submit(submission).await?;

    Ok(Envelope::ok(response))
}

/// `POST /api/orders/market`
pub async fn post_market_order<C: Connector + 'static>(
    State(dispatcher): State<Arc<Dispatcher<C>>>,
    body: Bytes,
) -> OrderResult {
    let submission = OrderBody::from_slice(&body)?.into_market()?;
    let response = dispatcher.submit(submission).await?;

    Ok(Envelope::ok(response))
}

/// `GET /api/orders/status`. Order tracking is not provided.
pub async fn order_status() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Order status tracking is not available; query the venue directly",
        "timestamp": Utc::now(),
    }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}
