//! Market metadata resolution.

use reqwest::StatusCode;
use serde::Serialize;

use crate::Result;
use crate::clob::types::TickSize;
use crate::error::{Error, Kind, Status};
use crate::types::U256;
use crate::venue::Session;

const NOT_FOUND_MARKERS: [&str; 2] = ["not found", "no orderbook exists"];

/// What the venue knows about a token's market. Never cached.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDescriptor {
    pub tick_size: TickSize,
    pub exists: bool,
}

/// Fetches the tick size for `token_id`.
///
/// A 404, or an upstream error body that says the market does not exist,
/// becomes [`Kind::MarketNotFound`]. Every other failure is returned as-is.
pub async fn resolve_market<S: Session + ?Sized>(
    session: &S,
    token_id: U256,
) -> Result<MarketDescriptor> {
    match session.tick_size(token_id).await {
        Ok(tick_size) => Ok(MarketDescriptor {
            tick_size,
            exists: true,
        }),
        Err(e) if is_not_found(&e) => {
            tracing::debug!(%token_id, error = %e, "market not found");
            Err(Error::market_not_found(token_id))
        }
        Err(e) => Err(e),
    }
}

fn is_not_found(error: &Error) -> bool {
    if error.kind() != Kind::Status {
        return false;
    }

    error.downcast_ref::<Status>().is_some_and(|status| {
        let message = status.message.to_ascii_lowercase();
        status.status_code == StatusCode::NOT_FOUND
            || NOT_FOUND_MARKERS
                .iter()
                .any(|marker| message.contains(marker))
    })
}
