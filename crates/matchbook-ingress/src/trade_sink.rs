//! Trade sinks: where executed trades go once the book emits them.
//!
//! A sink records each trade exactly once. Recording the same `TradeId`
//! twice is rejected with [`MatchbookError::TradeAlreadyRecorded`], the
//! same guard a settlement layer applies against double processing.

use std::collections::HashSet;

use matchbook_matchcore::{compute_trade_root, trade_root_hex};
use matchbook_types::{MatchbookError, Result, Trade, TradeId};
use tokio::sync::mpsc;

/// Consumer of executed trades.
pub trait TradeSink: Send {
    /// Record one trade.
    ///
    /// # Errors
    /// Implementation specific; the runner logs and reports it to the
    /// submitter without rolling back the match.
    fn record(&mut self, trade: &Trade) -> Result<()>;
}

/// In-memory trade journal with a replay digest.
#[derive(Debug, Default)]
pub struct TradeLog {
    trades: Vec<Trade>,
    seen: HashSet<TradeId>,
}

impl TradeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trades in the order they were recorded.
    #[must_use]
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn contains(&self, trade_id: &TradeId) -> bool {
        self.seen.contains(trade_id)
    }

    /// Total traded volume.
    pub fn volume(&self) -> u64 {
        self.trades.iter().map(|t| t.volume).sum()
    }

    /// SHA-256 trade root over everything recorded so far.
    #[must_use]
    pub fn root(&self) -> [u8; 32] {
        compute_trade_root(&self.trades)
    }

    #[must_use]
    pub fn root_hex(&self) -> String {
        trade_root_hex(&self.trades)
    }
}

impl TradeSink for TradeLog {
    fn record(&mut self, trade: &Trade) -> Result<()> {
        if !self.seen.insert(trade.id) {
            return Err(MatchbookError::TradeAlreadyRecorded(trade.id));
        }
        self.trades.push(trade.clone());
        Ok(())
    }
}

/// Forwards every trade to an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Trade>,
}

impl ChannelSink {
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<Trade>) -> Self {
        Self { tx }
    }

    /// A sink plus the receiving end for its trades.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Trade>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl TradeSink for ChannelSink {
    fn record(&mut self, trade: &Trade) -> Result<()> {
        self.tx
            .send(trade.clone())
            .map_err(|_| MatchbookError::SinkClosed)
    }
}
