//! Damage events.
//!
//! A `DamageEvent` is created when an attack is launched and travels by
//! reference through both phases of the damage protocol. It is never
//! persisted.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::effects::{EffectContainer, PropertySet};

/// One attack's damage, in flight.
///
/// ## Example
///
/// ```
/// use rust_td::combat::DamageEvent;
/// use rust_td::core::EntityId;
///
/// let event = DamageEvent::new(10.0, EntityId(3)).with_source(EntityId(1));
/// assert_eq!(event.raw_damage, 10.0);
/// assert!(!event.armor_pierce());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Damage the attack will deal. Only the expected phase may change it.
    pub raw_damage: f32,

    /// The attacking entity, if any.
    pub source: Option<EntityId>,

    /// The entity being damaged.
    pub dest: EntityId,

    /// Properties of the attacking effects, if the attack carries any.
    pub attack: Option<PropertySet>,

    /// Identifies the attack across both phases while other attacks are in
    /// flight. Gate decisions recorded in the expected phase are keyed by it.
    #[serde(default)]
    pub attack_id: u64,
}

impl DamageEvent {
    /// Create a new event with no source and no attack effects.
    #[must_use]
    pub fn new(raw_damage: f32, dest: EntityId) -> Self {
        Self {
            raw_damage,
            source: None,
            dest,
            attack: None,
            attack_id: 0,
        }
    }

    /// Set the attack id (builder pattern).
    #[must_use]
    pub fn with_attack_id(mut self, attack_id: u64) -> Self {
        self.attack_id = attack_id;
        self
    }

    /// Set the source entity (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach the attacker's effects (builder pattern).
    ///
    /// Only the aggregated properties are kept; the attacker's effects are
    /// dispatched separately by the pipeline.
    #[must_use]
    pub fn with_effects(mut self, effects: &EffectContainer) -> Self {
        self.attack = Some(effects.properties());
        self
    }

    /// Whether the attack ignores armor.
    #[must_use]
    pub fn armor_pierce(&self) -> bool {
        self.attack.as_ref().is_some_and(|p| p.armor_pierce)
    }
}
