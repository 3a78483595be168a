//! Aggregated passive properties.
//!
//! Property effects are never dispatched. The container folds them, in
//! insertion order, into one `PropertySet` that external collaborators
//! read. Flags are OR-ed together; valued properties take the value of the
//! last effect that sets them.

use serde::{Deserialize, Serialize};

/// Read-only lookup surface over a container's property effects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    /// Attacks from this host ignore armor.
    pub armor_pierce: bool,

    /// Remaining ammunition; `None` means unlimited.
    pub ammo: Option<u32>,

    /// Host only fires when told to.
    pub manual_fire: bool,

    /// Host may not be upgraded.
    pub upgrade_forbidden: bool,

    /// Maximum overcharge level; `None` uses the game default.
    pub max_overcharge: Option<f32>,

    /// Tint for the host's attacks.
    pub attack_color: Option<String>,

    /// Upgrading the host costs nothing.
    pub no_upgrade_cost: bool,

    /// Host never expires.
    pub infinite_lifespan: bool,

    /// Card returns to the top of the deck when played.
    pub returns_to_top_of_deck: bool,

    /// Current die roll supplied by a die effect.
    pub die_roll: Option<i32>,
}

impl PropertySet {
    /// Whether no property has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == PropertySet::default()
    }
}
