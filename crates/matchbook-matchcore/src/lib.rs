//! # matchbook-matchcore
//!
//! **Continuous price-time priority matching for matchbook.**
//!
//! MatchCore owns a single market's book and matches each incoming order
//! against it as it arrives:
//!
//! - **One entry point**: [`OrderBook::match_order`] never fails
//! - **Price-time priority**: better prices first, FIFO within a price
//! - **Maker price**: every trade executes at the resting order's price
//! - **Single writer**: `&mut self` per match, no internal locking
//! - **Deterministic output**: same orders in, same trades and trade ids out

pub mod determinism;
pub mod matcher;
pub mod orderbook;
pub mod price_level;
pub mod priority;
pub mod queue;

pub use determinism::{compute_trade_root, trade_root_hex, verify_trade_root};
pub use matcher::crosses;
pub use orderbook::{BookSnapshot, Disposition, MatchOutcome, OrderBook};
pub use price_level::PriceLevel;
pub use priority::{Ascending, Descending, SidePriority};
pub use queue::{LevelSummary, PriceLevelQueue};
