//! Error types for the matchbook engine.
//!
//! All errors use the `MB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order entry errors
//! - 5xx: Book errors
//! - 7xx: Runtime errors (runner, trade sinks)
//! - 9xx: General / internal errors
//!
//! Matching itself never fails. These errors belong to the layers around it.

use thiserror::Error;

use crate::{OrderId, TradeId};

/// Central error enum for all matchbook operations.
#[derive(Debug, Error)]
pub enum MatchbookError {
    // =================================================================
    // Order Entry Errors (1xx)
    // =================================================================
    /// The order failed validation (missing fields, bad values, etc.).
    #[error("MB_ERR_100: Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// An order with this ID is already resting.
    #[error("MB_ERR_101: Order already exists: {0}")]
    DuplicateOrder(OrderId),

    // =================================================================
    // Book Errors (5xx)
    // =================================================================
    /// A structural book invariant does not hold.
    #[error("MB_ERR_500: Book invariant violated: {reason}")]
    InvariantViolation { reason: String },

    // =================================================================
    // Runtime Errors (7xx)
    // =================================================================
    /// The book runner is no longer accepting commands.
    #[error("MB_ERR_700: Matching engine stopped")]
    EngineStopped,

    /// The downstream end of a trade sink has gone away.
    #[error("MB_ERR_701: Trade sink closed")]
    SinkClosed,

    /// A trade with this ID was already recorded.
    #[error("MB_ERR_702: Trade already recorded: {0}")]
    TradeAlreadyRecorded(TradeId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("MB_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("MB_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("MB_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("MB_ERR_903: I/O error: {0}")]
    Io(String),
}

impl MatchbookError {
    pub fn invalid_order(reason: impl Into<String>) -> Self {
        Self::InvalidOrder {
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MatchbookError>;

impl From<std::io::Error> for MatchbookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MatchbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
