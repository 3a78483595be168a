//! Health tracking with an expected-health shadow.
//!
//! `expected` is lowered as soon as an attack is launched so targeting can
//! skip an enemy that is already going to die. `current` is lowered when
//! the attack lands.

use serde::{Deserialize, Serialize};

/// Real and expected health of one entity.
///
/// ```
/// use rust_td::combat::Vitals;
///
/// let mut vitals = Vitals::new(10.0);
/// vitals.expect_damage(10.0);
/// assert!(vitals.is_doomed());
/// assert!(!vitals.is_dead());
///
/// vitals.take_damage(10.0);
/// assert!(vitals.is_dead());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub max: f32,
    pub current: f32,
    pub expected: f32,
}

impl Vitals {
    /// Full health.
    #[must_use]
    pub fn new(max: f32) -> Self {
        Self {
            max,
            current: max,
            expected: max,
        }
    }

    /// An attack with `amount` damage was launched at this entity.
    pub fn expect_damage(&mut self, amount: f32) {
        self.expected -= amount;
    }

    /// A tracked attack landed. The expected share was already subtracted.
    pub fn take_damage(&mut self, amount: f32) {
        self.current -= amount;
    }

    /// Damage that was never announced (poison, explosions).
    pub fn take_untracked_damage(&mut self, amount: f32) {
        self.current -= amount;
        self.expected -= amount;
    }

    /// Heal up to max; expected health rises by the same amount.
    pub fn heal(&mut self, amount: f32) {
        let healed = (self.current + amount).min(self.max) - self.current;
        if healed > 0.0 {
            self.current += healed;
            self.expected += healed;
        }
    }

    /// Expected to die once in-flight attacks land.
    #[must_use]
    pub fn is_doomed(&self) -> bool {
        self.expected <= 0.0
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}
