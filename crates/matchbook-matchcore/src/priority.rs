//! Price priority of each book side.
//!
//! Bids and asks are the same structure with opposite orderings. Instead of
//! two copies of the queue and the sweep, both are generic over a
//! [`SidePriority`]:
//!
//! - [`Descending`] (bids): highest price first, keyed by `Reverse<Decimal>`
//! - [`Ascending`] (asks): lowest price first, keyed by `Decimal`
//!
//! A smaller key is always the better price, so a `BTreeMap` keyed this way
//! iterates best-first on either side.

use std::cmp::Reverse;
use std::fmt::Debug;

use matchbook_types::{OrderSide, TradeParty};
use rust_decimal::Decimal;

/// Ordering of one side of the book.
pub trait SidePriority: Debug + 'static {
    /// Map key whose natural order is best-price-first.
    type Key: Ord + Copy + Debug;

    /// The side whose orders rest in a queue with this priority.
    const SIDE: OrderSide;

    fn key(price: Decimal) -> Self::Key;

    /// `true` if `a` is the same price as `b` or better for this side.
    fn better_or_equal(a: Decimal, b: Decimal) -> bool {
        Self::key(a) <= Self::key(b)
    }

    /// Order a fill's parties as `(bid, ask)`, given the incoming order and
    /// the order resting on this side.
    fn bid_ask(incoming: TradeParty, resting: TradeParty) -> (TradeParty, TradeParty);
}

/// Bid priority: higher prices first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descending;

impl SidePriority for Descending {
    type Key = Reverse<Decimal>;
    const SIDE: OrderSide = OrderSide::Bid;

    fn key(price: Decimal) -> Self::Key {
        Reverse(price)
    }

    fn bid_ask(incoming: TradeParty, resting: TradeParty) -> (TradeParty, TradeParty) {
        (resting, incoming)
    }
}

/// Ask priority: lower prices first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ascending;

impl SidePriority for Ascending {
    type Key = Decimal;
    const SIDE: OrderSide = OrderSide::Ask;

    fn key(price: Decimal) -> Self::Key {
        price
    }

    fn bid_ask(incoming: TradeParty, resting: TradeParty) -> (TradeParty, TradeParty) {
        (incoming, resting)
    }
}
