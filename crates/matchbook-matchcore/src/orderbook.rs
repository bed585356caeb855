//! The order book for a single market.
//!
//! Two [`PriceLevelQueue`]s hold the resting orders:
//! - **Bids**: `PriceLevelQueue<Descending>` -- highest price first
//! - **Asks**: `PriceLevelQueue<Ascending>` -- lowest price first
//!
//! [`OrderBook::match_order`] is the single entry point. It routes the
//! incoming order to the sweep over the opposing side and then decides
//! what happens to any leftover volume. The book is the only owner of
//! resting orders; callers get snapshots back, never references.

use std::collections::HashMap;

use chrono::Utc;
use matchbook_types::{
    FillPolicy, MarketPair, MatchbookError, Order, OrderId, OrderSide, Result, Trade,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::matcher::{self, FillContext};
use crate::price_level::PriceLevel;
use crate::priority::{Ascending, Descending, SidePriority};
use crate::queue::{LevelSummary, PriceLevelQueue};

/// What happened to the incoming order once its sweep stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// No volume left.
    Filled,
    /// Limit order with volume left; now resting in the book.
    Rested,
    /// Market order with volume left; handed back as the remainder.
    Returned,
    /// Volume left at or below the fill policy threshold; dropped.
    Discarded,
    /// Side not recognized; nothing was touched.
    Ignored,
}

/// Result of one [`OrderBook::match_order`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Trades in the order they were generated, best price first.
    pub trades: Vec<Trade>,
    /// The unfilled market order, if any. Never set for limit orders.
    pub remainder: Option<Order>,
    pub disposition: Disposition,
}

impl MatchOutcome {
    fn ignored() -> Self {
        Self {
            trades: Vec::new(),
            remainder: None,
            disposition: Disposition::Ignored,
        }
    }

    /// Sum of all trade volumes.
    #[must_use]
    pub fn traded_volume(&self) -> u64 {
        self.trades.iter().map(|t| t.volume).sum()
    }
}

/// Aggregated depth view of a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub market: MarketPair,
    pub bids: Vec<LevelSummary>,
    pub asks: Vec<LevelSummary>,
    /// Number of matches the book has processed.
    pub match_sequence: u64,
}

/// The order book for a single market pair.
#[derive(Debug)]
pub struct OrderBook {
    /// The market this book serves (e.g., BTC/USDT).
    pub market: MarketPair,
    bids: PriceLevelQueue<Descending>,
    asks: PriceLevelQueue<Ascending>,
    /// Resting order ids and the side they rest on.
    index: HashMap<OrderId, OrderSide>,
    policy: FillPolicy,
    /// Incremented once per matched order; seeds trade ids.
    match_sequence: u64,
}

impl OrderBook {
    /// Create a new empty order book with the strict fill policy.
    #[must_use]
    pub fn new(market: MarketPair) -> Self {
        Self::with_policy(market, FillPolicy::default())
    }

    #[must_use]
    pub fn with_policy(market: MarketPair, policy: FillPolicy) -> Self {
        Self {
            market,
            bids: PriceLevelQueue::new(),
            asks: PriceLevelQueue::new(),
            index: HashMap::new(),
            policy,
            match_sequence: 0,
        }
    }

    // =================================================================
    // Matching
    // =================================================================

    /// Match one incoming order against the book.
    ///
    /// Expects `order.volume > 0` and an id not already resting; order
    /// entry guarantees both. Never fails: an order with an unrecognized
    /// side comes back as an empty, [`Disposition::Ignored`] outcome.
    pub fn match_order(&mut self, order: Order) -> MatchOutcome {
        let ctx = FillContext {
            market: &self.market,
            match_sequence: self.match_sequence,
            executed_at: Utc::now(),
        };

        let outcome = match order.side {
            OrderSide::Bid => Self::execute(
                order,
                &mut self.asks,
                &mut self.bids,
                &mut self.index,
                self.policy,
                &ctx,
            ),
            OrderSide::Ask => Self::execute(
                order,
                &mut self.bids,
                &mut self.asks,
                &mut self.index,
                self.policy,
                &ctx,
            ),
            OrderSide::Unrecognized => {
                tracing::debug!(order_id = %order.id, "Ignoring order with unrecognized side");
                return MatchOutcome::ignored();
            }
        };
        self.match_sequence += 1;
        outcome
    }

    /// Sweep `opposing`, then settle the leftover volume: rest it in `own`,
    /// hand it back, or drop it.
    fn execute<O: SidePriority, R: SidePriority>(
        mut order: Order,
        opposing: &mut PriceLevelQueue<O>,
        own: &mut PriceLevelQueue<R>,
        index: &mut HashMap<OrderId, OrderSide>,
        policy: FillPolicy,
        ctx: &FillContext<'_>,
    ) -> MatchOutcome {
        let sweep = matcher::sweep(&mut order, opposing, ctx);
        for id in &sweep.exhausted {
            index.remove(id);
        }
        let trades = sweep.trades;

        if order.is_filled() {
            return MatchOutcome {
                trades,
                remainder: None,
                disposition: Disposition::Filled,
            };
        }

        if !policy.is_unfilled(order.volume) {
            tracing::warn!(
                order_id = %order.id,
                volume = order.volume,
                threshold = policy.unfilled_threshold,
                "Remainder at or below fill threshold discarded"
            );
            return MatchOutcome {
                trades,
                remainder: None,
                disposition: Disposition::Discarded,
            };
        }

        if order.is_market() {
            return MatchOutcome {
                trades,
                remainder: Some(order),
                disposition: Disposition::Returned,
            };
        }

        tracing::trace!(
            order_id = %order.id,
            side = %order.side,
            price = %order.limit_price(),
            volume = order.volume,
            filled = order.filled_volume(),
            sequence = order.sequence,
            "Order resting"
        );
        index.insert(order.id, R::SIDE);
        own.insert(order);
        MatchOutcome {
            trades,
            remainder: None,
            disposition: Disposition::Rested,
        }
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Best (highest) bid price, or `None` if no bids.
    #[must_use]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.best_price()
    }

    /// Best (lowest) ask price, or `None` if no asks.
    #[must_use]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.best_price()
    }

    /// Spread = best_ask - best_bid. `None` if either side is empty.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Mid price = (best_bid + best_ask) / 2. `None` if either side is empty.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// `true` if the best bid is at or above the best ask.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        matches!((self.best_bid(), self.best_ask()), (Some(bid), Some(ask)) if bid >= ask)
    }

    /// Total number of orders currently resting in the book.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    /// Number of distinct bid price levels.
    #[must_use]
    pub fn bid_depth(&self) -> usize {
        self.bids.depth()
    }

    /// Number of distinct ask price levels.
    #[must_use]
    pub fn ask_depth(&self) -> usize {
        self.asks.depth()
    }

    /// Returns `true` if the book has no orders on either side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Check if an order is resting in the book.
    #[must_use]
    pub fn contains_order(&self, order_id: &OrderId) -> bool {
        self.index.contains_key(order_id)
    }

    #[must_use]
    pub fn fill_policy(&self) -> FillPolicy {
        self.policy
    }

    #[must_use]
    pub fn match_sequence(&self) -> u64 {
        self.match_sequence
    }

    /// Resting bids in matching priority.
    #[must_use]
    pub fn bids(&self) -> &PriceLevelQueue<Descending> {
        &self.bids
    }

    /// Resting asks in matching priority.
    #[must_use]
    pub fn asks(&self) -> &PriceLevelQueue<Ascending> {
        &self.asks
    }

    /// Iterate bid levels from best (highest) to worst.
    pub fn bid_levels(&self) -> impl Iterator<Item = &PriceLevel> {
        self.bids.levels()
    }

    /// Iterate ask levels from best (lowest) to worst.
    pub fn ask_levels(&self) -> impl Iterator<Item = &PriceLevel> {
        self.asks.levels()
    }

    /// Up to `depth` levels per side.
    #[must_use]
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            market: self.market.clone(),
            bids: self.bids.snapshot(depth),
            asks: self.asks.snapshot(depth),
            match_sequence: self.match_sequence,
        }
    }

    /// Check every book invariant: per-side ordering and volumes, index
    /// consistency, no order on both sides, and no crossed book.
    pub fn verify_invariants(&self) -> Result<()> {
        self.bids.verify()?;
        self.asks.verify()?;

        if self.index.len() != self.bids.len() + self.asks.len() {
            return Err(MatchbookError::InvariantViolation {
                reason: format!(
                    "index holds {} orders, queues hold {}",
                    self.index.len(),
                    self.bids.len() + self.asks.len()
                ),
            });
        }
        for order in self.bids.orders().chain(self.asks.orders()) {
            if self.index.get(&order.id) != Some(&order.side) {
                return Err(MatchbookError::InvariantViolation {
                    reason: format!("order {} is not indexed on side {}", order.id, order.side),
                });
            }
        }
        if self.is_crossed() {
            return Err(MatchbookError::InvariantViolation {
                reason: format!(
                    "crossed book: best bid {:?} >= best ask {:?}",
                    self.best_bid(),
                    self.best_ask()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use matchbook_types::*;
    use rust_decimal::Decimal;

    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn book() -> OrderBook {
        OrderBook::new(MarketPair::new("BTC", "USDT"))
    }

    #[test]
    fn resting_orders_set_best_bid_and_ask() {
        let mut book = book();
        book.match_order(Order::limit(OrderSide::Bid, dec(100), 1));
        book.match_order(Order::limit(OrderSide::Bid, dec(99), 1));
        book.match_order(Order::limit(OrderSide::Ask, dec(101), 1));
        book.match_order(Order::limit(OrderSide::Ask, dec(102), 1));

        assert_eq!(book.best_bid(), Some(dec(100)));
        assert_eq!(book.best_ask(), Some(dec(101)));
        assert_eq!(book.spread(), Some(Decimal::ONE));
        assert_eq!(book.order_count(), 4);
        assert!(book.verify_invariants().is_ok());
    }

    #[test]
    fn aggressor_gets_price_improvement() {
        let mut book = book();
        book.match_order(Order::limit(OrderSide::Ask, dec(95), 5));
        let out = book.match_order(Order::limit(OrderSide::Bid, dec(100), 5));

        assert_eq!(out.trades.len(), 1);
        assert_eq!(out.trades[0].price, dec(95));
        assert_eq!(out.disposition, Disposition::Filled);
        assert!(book.is_empty());
    }

    #[test]
    fn incoming_ask_walks_bids_best_first() {
        let mut book = book();
        book.match_order(Order::limit(OrderSide::Bid, dec(98), 2));
        book.match_order(Order::limit(OrderSide::Bid, dec(100), 2));
        book.match_order(Order::limit(OrderSide::Bid, dec(99), 2));

        let out = book.match_order(Order::limit(OrderSide::Ask, dec(99), 5));
        let prices: Vec<Decimal> = out.trades.iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![dec(100), dec(99)]);
        assert_eq!(out.traded_volume(), 4);
        assert_eq!(out.disposition, Disposition::Rested);
        assert_eq!(book.best_ask(), Some(dec(99)));
        assert_eq!(book.best_bid(), Some(dec(98)));
        assert!(book.verify_invariants().is_ok());
    }

    #[test]
    fn exhausted_resting_orders_leave_the_index() {
        let mut book = book();
        let resting = Order::limit(OrderSide::Ask, dec(100), 3);
        let id = resting.id;
        book.match_order(resting);
        assert!(book.contains_order(&id));

        book.match_order(Order::market(OrderSide::Bid, 3));
        assert!(!book.contains_order(&id));
        assert_eq!(book.order_count(), 0);
    }

    #[test]
    fn unrecognized_side_is_a_no_op() {
        let mut book = book();
        book.match_order(Order::limit(OrderSide::Ask, dec(100), 3));
        let mut odd = Order::market(OrderSide::Bid, 3);
        odd.side = OrderSide::Unrecognized;

        let out = book.match_order(odd);
        assert!(out.trades.is_empty());
        assert!(out.remainder.is_none());
        assert_eq!(out.disposition, Disposition::Ignored);
        assert_eq!(book.order_count(), 1);
        assert_eq!(book.match_sequence(), 1);
    }

    #[test]
    fn match_sequence_counts_recognized_orders() {
        let mut book = book();
        book.match_order(Order::limit(OrderSide::Ask, dec(100), 1));
        book.match_order(Order::limit(OrderSide::Bid, dec(90), 1));
        assert_eq!(book.match_sequence(), 2);
    }

    #[test]
    fn trades_snapshot_both_parties() {
        let mut book = book();
        let resting = Order::limit(OrderSide::Ask, dec(100), 10);
        let resting_id = resting.id;
        book.match_order(resting);

        let incoming = Order::limit(OrderSide::Bid, dec(100), 4);
        let incoming_id = incoming.id;
        let out = book.match_order(incoming);

        let trade = &out.trades[0];
        assert_eq!(trade.bid.order_id, incoming_id);
        assert_eq!(trade.ask.order_id, resting_id);
        assert_eq!(trade.ask.remaining_volume, 6);
        assert_eq!(trade.maker().order_id, resting_id);

        // Later fills do not reach back into handed-out trades.
        book.match_order(Order::market(OrderSide::Bid, 6));
        assert_eq!(trade.ask.remaining_volume, 6);
    }

    #[test]
    fn snapshot_reports_levels() {
        let mut book = book();
        book.match_order(Order::limit(OrderSide::Bid, dec(100), 2));
        book.match_order(Order::limit(OrderSide::Bid, dec(100), 3));
        book.match_order(Order::limit(OrderSide::Ask, dec(105), 1));

        let snap = book.snapshot(5);
        assert_eq!(snap.bids.len(), 1);
        assert_eq!(snap.bids[0].volume, 5);
        assert_eq!(snap.bids[0].order_count, 2);
        assert_eq!(snap.asks[0].price, dec(105));
        assert_eq!(snap.match_sequence, 3);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("BTC"));
    }

    #[test]
    fn mid_price_calculation() {
        let mut book = book();
        book.match_order(Order::limit(OrderSide::Bid, dec(100), 1));
        book.match_order(Order::limit(OrderSide::Ask, dec(102), 1));
        assert_eq!(book.mid_price(), Some(dec(101)));
        assert!(!book.is_crossed());
    }

    #[test]
    fn empty_book() {
        let book = book();
        assert!(book.is_empty());
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.spread(), None);
        assert_eq!(book.mid_price(), None);
        assert!(book.verify_invariants().is_ok());
    }
}
