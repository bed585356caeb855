//! Trade types produced by the matcher.
//!
//! A [`Trade`] is the immutable record of one fill between an incoming
//! (aggressor) order and one resting order. Both parties are captured as
//! [`TradeParty`] snapshots taken at fill time, so later book mutations
//! never show through a trade that has already been handed out.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MarketPair, Order, OrderId, OrderKind, OrderSide, TradeId};

/// One side of a trade, as it stood immediately after the fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeParty {
    pub order_id: OrderId,
    pub kind: OrderKind,
    /// Remaining volume of the order after this fill.
    pub remaining_volume: u64,
}

impl TradeParty {
    #[must_use]
    pub fn of(order: &Order) -> Self {
        Self {
            order_id: order.id,
            kind: order.kind,
            remaining_volume: order.volume,
        }
    }
}

/// A trade produced by the matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Deterministic from the book's match sequence and fill index.
    pub id: TradeId,
    pub market: MarketPair,
    /// Execution price: always the resting order's price.
    pub price: Decimal,
    pub volume: u64,
    pub bid: TradeParty,
    pub ask: TradeParty,
    /// Side of the incoming order that caused this trade.
    pub aggressor: OrderSide,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Quote amount = price × volume.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.volume)
    }

    #[must_use]
    pub fn aggressor_is_bid(&self) -> bool {
        self.aggressor == OrderSide::Bid
    }

    /// The incoming order's side of the trade.
    #[must_use]
    pub fn taker(&self) -> &TradeParty {
        if self.aggressor_is_bid() {
            &self.bid
        } else {
            &self.ask
        }
    }

    /// The resting order's side of the trade.
    #[must_use]
    pub fn maker(&self) -> &TradeParty {
        if self.aggressor_is_bid() {
            &self.ask
        } else {
            &self.bid
        }
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade[{}] {} {} {} @ {} = {}",
            self.id,
            self.market,
            self.aggressor,
            self.volume,
            self.price,
            self.notional(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_trade() -> Trade {
        Trade {
            id: TradeId::deterministic(&MarketPair::new("BTC", "USDT"), 1, 0),
            market: MarketPair::new("BTC", "USDT"),
            price: Decimal::new(50000, 0),
            volume: 2,
            bid: TradeParty {
                order_id: OrderId::from_bytes([1; 16]),
                kind: OrderKind::Market,
                remaining_volume: 0,
            },
            ask: TradeParty {
                order_id: OrderId::from_bytes([2; 16]),
                kind: OrderKind::Limit,
                remaining_volume: 3,
            },
            aggressor: OrderSide::Bid,
            executed_at: Utc::now(),
        }
    }

    #[test]
    fn trade_notional() {
        let t = make_trade();
        assert_eq!(t.notional(), Decimal::new(100_000, 0));
    }

    #[test]
    fn taker_and_maker_follow_aggressor() {
        let mut t = make_trade();
        assert_eq!(t.taker().order_id, OrderId::from_bytes([1; 16]));
        assert_eq!(t.maker().order_id, OrderId::from_bytes([2; 16]));

        t.aggressor = OrderSide::Ask;
        assert_eq!(t.taker().order_id, OrderId::from_bytes([2; 16]));
        assert_eq!(t.maker().order_id, OrderId::from_bytes([1; 16]));
    }

    #[test]
    fn trade_display() {
        let t = make_trade();
        let s = format!("{t}");
        assert!(s.contains("BTC/USDT"));
        assert!(s.contains("50000"));
        assert!(s.contains("BID"));
    }

    #[test]
    fn trade_serde_roundtrip() {
        let trade = make_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade.id, back.id);
        assert_eq!(trade.price, back.price);
        assert_eq!(trade.bid, back.bid);
        assert_eq!(trade.ask, back.ask);
    }
}
