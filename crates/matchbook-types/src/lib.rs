//! # matchbook-types
//!
//! Shared types, errors, and configuration for the **matchbook** engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`TradeId`], [`MarketPair`]
//! - **Order model**: [`Order`], [`OrderSide`], [`OrderKind`], [`OrderRequest`]
//! - **Trade model**: [`Trade`], [`TradeParty`]
//! - **Configuration**: [`EngineConfig`], [`MarketConfig`], [`FillPolicy`]
//! - **Errors**: [`MatchbookError`] with `MB_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use matchbook_types::{Order, OrderSide, Trade, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use trade::*;

// Constants are accessed via `matchbook_types::constants::FOO`
// (not re-exported to avoid name collisions).
