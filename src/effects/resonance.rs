//! Resonance counters - cross-entity aggregate state.
//!
//! Resonance effects on many hosts share a tag. Each spawn of a holder
//! increments the tag's count and each death decrements it. The registry
//! is scoped to one session and passed to effects through the context.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Live-holder counts keyed by resonance tag.
///
/// ```
/// use rust_td::effects::ResonanceRegistry;
///
/// let mut registry = ResonanceRegistry::new();
/// registry.increment("hive");
/// registry.increment("hive");
/// registry.decrement("hive");
/// assert_eq!(registry.count("hive"), 1);
///
/// // Never negative.
/// registry.decrement("hive");
/// registry.decrement("hive");
/// assert_eq!(registry.count("hive"), 0);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResonanceRegistry {
    counts: FxHashMap<String, u32>,
}

impl ResonanceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new live holder of `tag`; returns the new count.
    pub fn increment(&mut self, tag: &str) -> u32 {
        let count = self.counts.entry(tag.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Record a holder of `tag` going away; returns the new count.
    pub fn decrement(&mut self, tag: &str) -> u32 {
        match self.counts.get_mut(tag) {
            Some(count) if *count > 1 => {
                *count -= 1;
                *count
            }
            Some(_) => {
                self.counts.remove(tag);
                0
            }
            None => 0,
        }
    }

    /// Current count for `tag`.
    #[must_use]
    pub fn count(&self, tag: &str) -> u32 {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    /// Number of tags with at least one live holder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Forget every tag (new session).
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
