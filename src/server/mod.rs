//! HTTP surface.
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/api/orders/limit` | Submit a limit order |
//! | POST | `/api/orders/market` | Submit a market order |
//! | POST | `/api/orders` | Legacy alias of `/api/orders/limit` |
//! | GET | `/api/orders/status` | Static placeholder |
//! | GET | `/health` | Liveness |

mod envelope;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::config::GatewayConfig;
use crate::order::Dispatcher;
use crate::registry::SessionRegistry;
use crate::venue::{ClobConnector, Connector};

pub use envelope::{ApiError, Envelope};

/// Builds the router around a shared dispatcher.
pub fn router<C: Connector + 'static>(dispatcher: Arc<Dispatcher<C>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/orders", post(handlers::post_limit_order::<C>))
        .route("/api/orders/limit", post(handlers::post_limit_order::<C>))
        .route("/api/orders/market", post(handlers::post_market_order::<C>))
        .route("/api/orders/status", get(handlers::order_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(dispatcher)
}

/// Wires the CLOB connector to the router and serves until Ctrl-C.
pub async fn serve(config: GatewayConfig) -> Result<()> {
    let registry = Arc::new(SessionRegistry::new(ClobConnector::new(), config.venue));
    let dispatcher = Arc::new(Dispatcher::new(registry, config.default_pair));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "order gateway listening");

    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
