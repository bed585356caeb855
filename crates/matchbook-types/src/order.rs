//! Order types for the matchbook engine.
//!
//! An [`Order`] has an immutable identity and a mutable remaining volume.
//! Identity is the [`OrderId`] alone: two orders with equal price, side and
//! volume are still different orders.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::OrderId;

/// Which side of the book this order is on.
///
/// `Unrecognized` exists for orders decoded from an outer layer with a side
/// tag this engine does not know. The matcher treats such an order as a
/// no-op instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderSide {
    Bid,
    Ask,
    Unrecognized,
}

impl From<String> for OrderSide {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "bid" | "buy" => Self::Bid,
            "ask" | "sell" => Self::Ask,
            _ => Self::Unrecognized,
        }
    }
}

impl From<OrderSide> for String {
    fn from(side: OrderSide) -> Self {
        side.to_string()
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bid => write!(f, "BID"),
            Self::Ask => write!(f, "ASK"),
            Self::Unrecognized => write!(f, "UNRECOGNIZED"),
        }
    }
}

/// The kind of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderKind {
    /// Trades only at its price or better; rests when not filled.
    Limit,
    /// Trades at any opposing price; never rests.
    Market,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Limit => write!(f, "LIMIT"),
            Self::Market => write!(f, "MARKET"),
        }
    }
}

/// Core order struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: OrderSide,
    pub kind: OrderKind,
    /// Limit price. `None` for market orders.
    pub price: Option<Decimal>,
    /// Remaining volume. Decreases as the order fills.
    pub volume: u64,
    /// Volume at submission.
    pub original_volume: u64,
    /// Arrival sequence stamped by order entry.
    pub sequence: u64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// A limit order with a fresh id.
    #[must_use]
    pub fn limit(side: OrderSide, price: Decimal, volume: u64) -> Self {
        Self::build(side, OrderKind::Limit, Some(price), volume)
    }

    /// A market order with a fresh id.
    #[must_use]
    pub fn market(side: OrderSide, volume: u64) -> Self {
        Self::build(side, OrderKind::Market, None, volume)
    }

    fn build(side: OrderSide, kind: OrderKind, price: Option<Decimal>, volume: u64) -> Self {
        Self {
            id: OrderId::new(),
            side,
            kind,
            price,
            volume,
            original_volume: volume,
            sequence: 0,
            created_at: Utc::now(),
        }
    }

    /// The price this order rests at. Market orders and limit orders
    /// missing a price resolve to zero.
    #[must_use]
    pub fn limit_price(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn is_market(&self) -> bool {
        self.kind == OrderKind::Market
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.volume == 0
    }

    #[must_use]
    pub fn filled_volume(&self) -> u64 {
        self.original_volume.saturating_sub(self.volume)
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Order {}

impl Hash for Order {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// An order as submitted by a client, before it has an identity.
///
/// Order entry validates the request and turns it into an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub side: OrderSide,
    pub kind: OrderKind,
    #[serde(default)]
    pub price: Option<Decimal>,
    pub volume: u64,
}

impl OrderRequest {
    #[must_use]
    pub fn limit(side: OrderSide, price: Decimal, volume: u64) -> Self {
        Self {
            side,
            kind: OrderKind::Limit,
            price: Some(price),
            volume,
        }
    }

    #[must_use]
    pub fn market(side: OrderSide, volume: u64) -> Self {
        Self {
            side,
            kind: OrderKind::Market,
            price: None,
            volume,
        }
    }
}
