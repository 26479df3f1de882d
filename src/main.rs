use clob_order_gateway::config::GatewayConfig;
use clob_order_gateway::server;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> clob_order_gateway::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        host = %config.venue.host,
        chain_id = config.venue.chain_id,
        signature_type = ?config.venue.signature_type,
        default_signer = %config.default_pair.address(),
        "configuration loaded"
    );

    server::serve(config).await
}
