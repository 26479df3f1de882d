use std::sync::Arc;

use crate::Result;
use crate::auth::CredentialPair;
use crate::clob::types::response::PostOrderResponse;
use crate::market::resolve_market;
use crate::order::{OrderRequest, Submission};
use crate::registry::SessionRegistry;
use crate::venue::{Connector, OrderOptions, Session as _};

/// Turns a validated [`Submission`] into a venue order.
///
/// Steps, each strictly after the previous one: resolve the signing pair,
/// fetch or create its session, resolve the tick size when the caller did not
/// supply one, then submit.
pub struct Dispatcher<C: Connector> {
    registry: Arc<SessionRegistry<C>>,
    default_pair: CredentialPair,
}

impl<C: Connector> Dispatcher<C> {
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry<C>>, default_pair: CredentialPair) -> Self {
        Self {
            registry,
            default_pair,
        }
    }

    pub async fn submit(&self, submission: Submission) -> Result<PostOrderResponse> {
        let Submission { identity, order } = submission;

        let pair = identity.into_pair(&self.default_pair)?;
        let session = self.registry.get_or_create(&pair).await?;

        let tick_size = match order.tick_size() {
            Some(tick_size) => tick_size,
            None => {
                resolve_market(session.as_ref(), order.token_id())
                    .await?
                    .tick_size
            }
        };
        let options = OrderOptions::new(tick_size, order.neg_risk().unwrap_or(false));

        tracing::info!(
            token_id = %order.token_id(),
            signer = %pair.address(),
            tick_size = %tick_size,
            neg_risk = options.neg_risk,
            "submitting order"
        );

        match &order {
            OrderRequest::Limit(limit) => session.post_limit_order(limit, options).await,
            OrderRequest::Market(market) => session.post_market_order(market, options).await,
        }
    }
}

impl<C: Connector> std::fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("default_signer", &self.default_pair.address())
            .finish()
    }
}
