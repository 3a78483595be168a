//! Engine configuration.
//!
//! Hosts configure the engine at startup by providing an `EngineConfig`.
//! Only coarse, session-wide knobs live here; per-effect fallbacks are
//! documented beside the effect that uses them.

use serde::{Deserialize, Serialize};

/// Default number of host ticks between container cleanup passes.
pub const DEFAULT_CLEANUP_INTERVAL: u32 = 10;

/// Session-wide engine configuration.
///
/// ## Example
///
/// ```
/// use rust_td::core::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_cleanup_interval(5)
///     .with_starting_gold(200);
///
/// assert_eq!(config.cleanup_interval, 5);
/// assert_eq!(config.starting_gold, 200);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Host ticks between sweeps of expired effects. Zero sweeps every tick.
    pub cleanup_interval: u32,

    /// Gold the player starts a session with.
    pub starting_gold: i64,

    /// Lives the player starts a session with.
    pub starting_lives: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            starting_gold: 100,
            starting_lives: 20,
        }
    }
}

impl EngineConfig {
    /// Set the cleanup interval (builder pattern).
    #[must_use]
    pub fn with_cleanup_interval(mut self, ticks: u32) -> Self {
        self.cleanup_interval = ticks;
        self
    }

    /// Set the starting gold (builder pattern).
    #[must_use]
    pub fn with_starting_gold(mut self, gold: i64) -> Self {
        self.starting_gold = gold;
        self
    }

    /// Set the starting lives (builder pattern).
    #[must_use]
    pub fn with_starting_lives(mut self, lives: i64) -> Self {
        self.starting_lives = lives;
        self
    }
}
