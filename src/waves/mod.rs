//! Wave data - the payload of wave-category effects.
//!
//! The wave generator owns wave construction. Before a wave starts it
//! hands a `WaveData` to every wave effect in play; each returns an altered
//! copy that the next effect receives.

use serde::{Deserialize, Serialize};

/// An upcoming batch of spawns.
///
/// ## Example
///
/// ```
/// use rust_td::waves::WaveData;
///
/// let wave = WaveData::new("grunt", 100.0, 12).with_spawn_interval(0.5);
/// assert_eq!(wave.spawn_count, 12);
/// assert_eq!(wave.total_duration(), 6.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveData {
    /// Enemy kind to spawn.
    pub enemy_type: String,

    /// Difficulty budget the generator spends on the wave.
    pub budget: f32,

    /// Number of enemies to spawn.
    pub spawn_count: u32,

    /// Seconds between spawns.
    pub spawn_interval: f32,

    /// Seconds before the first spawn.
    pub start_delay: f32,
}

impl WaveData {
    /// Create a wave with a one-second spawn interval and no delay.
    pub fn new(enemy_type: impl Into<String>, budget: f32, spawn_count: u32) -> Self {
        Self {
            enemy_type: enemy_type.into(),
            budget,
            spawn_count,
            spawn_interval: 1.0,
            start_delay: 0.0,
        }
    }

    /// Set the spawn interval (builder pattern).
    #[must_use]
    pub fn with_spawn_interval(mut self, seconds: f32) -> Self {
        self.spawn_interval = seconds;
        self
    }

    /// Set the start delay (builder pattern).
    #[must_use]
    pub fn with_start_delay(mut self, seconds: f32) -> Self {
        self.start_delay = seconds;
        self
    }

    /// Seconds from wave start until the last spawn.
    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.start_delay + self.spawn_interval * self.spawn_count as f32
    }
}
