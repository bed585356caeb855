//! # matchbook-ingress
//!
//! **Everything around the book**: order entry, trade sinks and the
//! async runner that serializes producers onto a single book.
//!
//! ## Order Flow
//!
//! ```text
//! BookHandle.submit() → OrderEntry.accept() → OrderBook.match_order()
//!     → TradeSink.record() → Execution back to the caller
//! ```
//!
//! 1. **OrderEntry**: validates requests against the market config and
//!    assigns order ids and arrival sequence
//! 2. **BookRunner**: one tokio task per book, the book's only writer
//! 3. **TradeSink**: receives every trade once (`TradeLog`, `ChannelSink`)

pub mod book_runner;
pub mod order_entry;
pub mod trade_sink;

pub use book_runner::{BookHandle, BookRunner, Execution};
pub use order_entry::OrderEntry;
pub use trade_sink::{ChannelSink, TradeLog, TradeSink};
