//! Identifiers used throughout matchbook.
//!
//! Order identities are UUIDv7 so they sort by creation time. Trade
//! identities are derived from the book's match sequence, so replaying the
//! same order flow reproduces the same ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Globally unique order identifier. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// MarketPair
// ---------------------------------------------------------------------------

/// A trading pair (e.g., BTC/USDT). Labels a book; never used for routing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MarketPair {
    pub base: String,
    pub quote: String,
}

impl MarketPair {
    #[must_use]
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    #[must_use]
    pub fn symbol(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

impl fmt::Display for MarketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

// ---------------------------------------------------------------------------
// TradeId
// ---------------------------------------------------------------------------

/// Unique trade identifier across markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TradeId(pub Uuid);

impl TradeId {
    /// Deterministic `TradeId` from the market, the book's match sequence
    /// and the fill index within that match.
    ///
    /// Two books for the same market fed the same orders in the same order
    /// assign the **exact same** ids to the same fills. Books for different
    /// markets never share an id.
    #[must_use]
    pub fn deterministic(market: &MarketPair, match_sequence: u64, fill_index: u64) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"matchbook:trade_id:v2:");
        for part in [&market.base, &market.quote] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        hasher.update(match_sequence.to_le_bytes());
        hasher.update(fill_index.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&hash[..16]);
        Self(Uuid::from_bytes(bytes))
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_uniqueness() {
        let a = OrderId::new();
        let b = OrderId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn order_id_ordering() {
        let a = OrderId::new();
        let b = OrderId::new();
        assert!(a < b);
    }

    #[test]
    fn trade_id_deterministic() {
        let btc = MarketPair::new("BTC", "USDT");
        let a = TradeId::deterministic(&btc, 7, 0);
        let b = TradeId::deterministic(&btc, 7, 0);
        assert_eq!(a, b);
        assert_ne!(a, TradeId::deterministic(&btc, 7, 1));
        assert_ne!(a, TradeId::deterministic(&btc, 8, 0));
    }

    #[test]
    fn trade_id_differs_across_markets() {
        let btc = TradeId::deterministic(&MarketPair::new("BTC", "USDT"), 0, 0);
        let eth = TradeId::deterministic(&MarketPair::new("ETH", "USDT"), 0, 0);
        assert_ne!(btc, eth);

        // Field boundaries are part of the digest.
        let ab_c = TradeId::deterministic(&MarketPair::new("AB", "C"), 0, 0);
        let a_bc = TradeId::deterministic(&MarketPair::new("A", "BC"), 0, 0);
        assert_ne!(ab_c, a_bc);
    }

    #[test]
    fn market_pair_symbol() {
        let pair = MarketPair::new("BTC", "USDT");
        assert_eq!(pair.symbol(), "BTC/USDT");
        assert_eq!(pair.to_string(), "BTC/USDT");
    }

    #[test]
    fn serde_roundtrips() {
        let oid = OrderId::new();
        let json = serde_json::to_string(&oid).unwrap();
        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(oid, back);
    }
}
