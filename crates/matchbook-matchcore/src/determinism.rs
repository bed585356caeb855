//! Replay verification for trade streams.
//!
//! Two books fed the same orders in the same order must emit the same
//! trades. The `trade_root` is a SHA-256 digest over a trade sequence that
//! lets a replay be checked without comparing full payloads.

use matchbook_types::Trade;
use sha2::{Digest, Sha256};

/// Compute the trade root hash over a set of trades.
///
/// The digest covers, per trade and in order: id, both order ids, price,
/// volume and aggressor side. Execution timestamps are excluded so a replay
/// at a different wall-clock time still verifies.
#[must_use]
pub fn compute_trade_root(trades: &[Trade]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"matchbook:trade_root:v1:");
    hasher.update((trades.len() as u64).to_le_bytes());

    for trade in trades {
        hasher.update(trade.id.0.as_bytes());
        hasher.update(trade.bid.order_id.0.as_bytes());
        hasher.update(trade.ask.order_id.0.as_bytes());
        hasher.update(trade.price.normalize().to_string().as_bytes());
        hasher.update(trade.volume.to_le_bytes());
        hasher.update(trade.aggressor.to_string().as_bytes());
    }

    let result = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&result);
    root
}

/// Hex form of [`compute_trade_root`], for logs and reports.
#[must_use]
pub fn trade_root_hex(trades: &[Trade]) -> String {
    hex::encode(compute_trade_root(trades))
}

/// Verify that a given trade root matches the expected hash.
#[must_use]
pub fn verify_trade_root(trades: &[Trade], expected_root: &[u8; 32]) -> bool {
    compute_trade_root(trades) == *expected_root
}
