//! Configuration types for matchbook engines and markets.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MarketPair, MatchbookError, Result, constants};

/// How the matcher decides whether an order's leftover volume still counts
/// as unfilled once a sweep stops.
///
/// A remainder is unfilled iff `volume > unfilled_threshold`. Unfilled limit
/// orders rest; unfilled market orders are returned. A non-zero remainder
/// at or below the threshold is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillPolicy {
    pub unfilled_threshold: u64,
}

impl FillPolicy {
    /// Any leftover volume is unfilled.
    pub const STRICT: Self = Self {
        unfilled_threshold: constants::DEFAULT_UNFILLED_THRESHOLD,
    };

    /// A single leftover unit counts as filled and is discarded.
    pub const LEGACY: Self = Self {
        unfilled_threshold: constants::LEGACY_UNFILLED_THRESHOLD,
    };

    #[must_use]
    pub fn is_unfilled(&self, volume: u64) -> bool {
        volume > self.unfilled_threshold
    }
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self::STRICT
    }
}

/// Per-market configuration used by order entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Base asset (e.g., "BTC").
    pub base: String,
    /// Quote asset (e.g., "USDT").
    pub quote: String,
    /// Tick size (price granularity).
    pub tick_size: Decimal,
    /// Minimum order volume.
    pub min_volume: u64,
    /// Maximum order volume.
    pub max_volume: u64,
}

impl MarketConfig {
    /// Create a default BTC/USDT market config.
    #[must_use]
    pub fn btc_usdt() -> Self {
        Self {
            base: "BTC".to_string(),
            quote: "USDT".to_string(),
            tick_size: Decimal::new(1, 2), // 0.01 USDT
            min_volume: constants::DEFAULT_MIN_ORDER_VOLUME,
            max_volume: constants::DEFAULT_MAX_ORDER_VOLUME,
        }
    }

    /// Returns the market symbol (e.g., "BTC/USDT").
    #[must_use]
    pub fn symbol(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }

    #[must_use]
    pub fn pair(&self) -> MarketPair {
        MarketPair::new(self.base.clone(), self.quote.clone())
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self::btc_usdt()
    }
}

/// Configuration for one matching engine instance (one book).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub market: MarketConfig,
    pub fill_policy: FillPolicy,
    /// Bounded capacity of the runner's command channel.
    pub channel_capacity: usize,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MatchbookError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject configurations no engine can run with.
    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(MatchbookError::Configuration(
                "channel_capacity must be > 0".into(),
            ));
        }
        if self.market.tick_size <= Decimal::ZERO {
            return Err(MatchbookError::Configuration(
                "tick_size must be positive".into(),
            ));
        }
        if self.market.min_volume == 0 || self.market.min_volume > self.market.max_volume {
            return Err(MatchbookError::Configuration(format!(
                "volume bounds [{}, {}] are not a valid range",
                self.market.min_volume, self.market.max_volume
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            fill_policy: FillPolicy::default(),
            channel_capacity: constants::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_config_btc_usdt() {
        let cfg = MarketConfig::btc_usdt();
        assert_eq!(cfg.symbol(), "BTC/USDT");
        assert_eq!(cfg.pair(), MarketPair::new("BTC", "USDT"));
        assert!(cfg.tick_size > Decimal::ZERO);
    }

    #[test]
    fn fill_policy_thresholds() {
        assert!(FillPolicy::STRICT.is_unfilled(1));
        assert!(!FillPolicy::STRICT.is_unfilled(0));
        assert!(!FillPolicy::LEGACY.is_unfilled(1));
        assert!(FillPolicy::LEGACY.is_unfilled(2));
        assert_eq!(FillPolicy::default(), FillPolicy::STRICT);
    }

    #[test]
    fn engine_config_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.channel_capacity, constants::DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(cfg.fill_policy, FillPolicy::STRICT);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn engine_config_partial_json() {
        let cfg = EngineConfig::from_json_str(r#"{"fill_policy":{"unfilled_threshold":1}}"#)
            .unwrap();
        assert_eq!(cfg.fill_policy, FillPolicy::LEGACY);
        assert_eq!(cfg.market.symbol(), "BTC/USDT");
        assert_eq!(cfg.channel_capacity, constants::DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn engine_config_rejects_zero_capacity() {
        let err = EngineConfig::from_json_str(r#"{"channel_capacity":0}"#).unwrap_err();
        assert!(matches!(err, MatchbookError::Configuration(_)));
    }

    #[test]
    fn engine_config_rejects_malformed_json() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, MatchbookError::Configuration(_)));
    }

    #[test]
    fn market_config_serde_roundtrip() {
        let cfg = MarketConfig::btc_usdt();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: MarketConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.base, back.base);
        assert_eq!(cfg.quote, back.quote);
        assert_eq!(cfg.tick_size, back.tick_size);
    }
}
