use crate::Result;
use crate::clob::types::response::OrderBookSummary;
use crate::clob::types::{OrderType, Side};
use crate::error::Error;
use crate::types::Decimal;

/// Price at which a market order for `amount` would be fully matched.
///
/// Buys walk the asks accumulating notional (`price * size`); sells walk the
/// bids accumulating shares. If the book is too thin, FOK fails and FAK takes
/// the deepest level available.
pub fn market_price(
    book: &OrderBookSummary,
    side: Side,
    amount: Decimal,
    order_type: OrderType,
) -> Result<Decimal> {
    let levels = match side {
        Side::Buy => &book.asks,
        Side::Sell => &book.bids,
    };

    let deepest = levels.first().ok_or_else(|| {
        Error::internal(format!(
            "no match: the book has no {} liquidity",
            opposite(side)
        ))
    })?;

    let mut matched = Decimal::ZERO;
    for level in levels.iter().rev() {
        matched += match side {
            Side::Buy => level.size * level.price,
            Side::Sell => level.size,
        };
        if matched >= amount {
            return Ok(level.price);
        }
    }

    if order_type == OrderType::FOK {
        return Err(Error::internal(format!(
            "no match: not enough liquidity to fill {amount} as FOK"
        )));
    }

    Ok(deepest.price)
}

fn opposite(side: Side) -> &'static str {
    match side {
        Side::Buy => "ask",
        Side::Sell => "bid",
    }
}
