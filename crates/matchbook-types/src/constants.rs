//! System-wide constants for the matchbook engine.

/// Maximum decimal precision for prices (8 decimal places).
pub const PRICE_PRECISION: u32 = 8;

/// Remainders above this volume count as unfilled. Any volume left over
/// either rests or is returned.
pub const DEFAULT_UNFILLED_THRESHOLD: u64 = 0;

/// Threshold that treats a single leftover unit as filled and discards it.
pub const LEGACY_UNFILLED_THRESHOLD: u64 = 1;

/// Default bounded capacity of a book runner's command channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Default smallest accepted order volume.
pub const DEFAULT_MIN_ORDER_VOLUME: u64 = 1;

/// Default largest accepted order volume.
pub const DEFAULT_MAX_ORDER_VOLUME: u64 = 1_000_000_000;

/// Default number of levels per side in a book snapshot.
pub const DEFAULT_SNAPSHOT_DEPTH: usize = 10;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "matchbook";
