//! The sweep: one pass of an incoming order over the opposing queue.
//!
//! ```text
//! sweep(incoming, opposing) -> trades
//! ```
//!
//! The same code serves both sides. It is generic over the opposing
//! queue's [`SidePriority`]; crossing is "resting price is at least as good
//! as the incoming limit" in that priority:
//!
//! - incoming bid vs asks (`Ascending`): `ask.price <= bid.limit`
//! - incoming ask vs bids (`Descending`): `bid.price >= ask.limit`
//!
//! Market orders cross any price. Because the queue is sorted, the first
//! resting order that does not cross ends the sweep.

use chrono::{DateTime, Utc};
use matchbook_types::{MarketPair, Order, OrderId, OrderKind, Trade, TradeId, TradeParty};
use rust_decimal::Decimal;

use crate::priority::SidePriority;
use crate::queue::PriceLevelQueue;

/// Per-call values stamped onto every trade of one sweep.
#[derive(Debug, Clone)]
pub(crate) struct FillContext<'a> {
    pub market: &'a MarketPair,
    pub match_sequence: u64,
    pub executed_at: DateTime<Utc>,
}

/// What one sweep did to the opposing queue.
#[derive(Debug, Default)]
pub(crate) struct Sweep {
    /// Trades in generation order, best price first.
    pub trades: Vec<Trade>,
    /// Resting orders that were fully filled and removed.
    pub exhausted: Vec<OrderId>,
}

/// `true` if an incoming order may trade against a resting order at
/// `resting_price` on the opposing side `P`.
#[must_use]
pub fn crosses<P: SidePriority>(incoming: &Order, resting_price: Decimal) -> bool {
    match incoming.kind {
        OrderKind::Market => true,
        OrderKind::Limit => P::better_or_equal(resting_price, incoming.limit_price()),
    }
}

/// Match `incoming` against `opposing` from its head until the incoming
/// order is filled, the queue is exhausted, or prices stop crossing.
///
/// Every fill trades `min(incoming, resting)` at the resting price. A
/// resting order reduced to zero is removed; a resting order left with
/// volume stays at the head and ends the sweep, since the incoming order
/// is then filled.
pub(crate) fn sweep<P: SidePriority>(
    incoming: &mut Order,
    opposing: &mut PriceLevelQueue<P>,
    ctx: &FillContext<'_>,
) -> Sweep {
    let mut out = Sweep::default();
    let mut fill_index: u64 = 0;

    while incoming.volume > 0 {
        let Some(resting) = opposing.front_mut() else {
            break;
        };
        let price = resting.limit_price();
        if !crosses::<P>(incoming, price) {
            break;
        }

        let volume = incoming.volume.min(resting.volume);
        resting.volume -= volume;
        incoming.volume -= volume;

        let (bid, ask) = P::bid_ask(TradeParty::of(incoming), TradeParty::of(resting));
        let resting_done = resting.is_filled();

        let trade = Trade {
            id: TradeId::deterministic(ctx.market, ctx.match_sequence, fill_index),
            market: ctx.market.clone(),
            price,
            volume,
            bid,
            ask,
            aggressor: incoming.side,
            executed_at: ctx.executed_at,
        };
        fill_index += 1;

        tracing::debug!(
            trade_id = %trade.id,
            market = %trade.market,
            aggressor = %trade.aggressor,
            price = %trade.price,
            volume = trade.volume,
            "Trade matched"
        );
        out.trades.push(trade);

        if resting_done {
            if let Some(done) = opposing.pop_front() {
                out.exhausted.push(done.id);
            }
        }
    }

    out
}
