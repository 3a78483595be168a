//! Passive property effects.

use serde::{Deserialize, Serialize};

use crate::effects::capability::PropertyEffect;
use crate::effects::category::{CategorySet, EffectCategory};
use crate::effects::effect::{Effect, EffectParams};
use crate::effects::property::PropertySet;

use super::effect_params;

/// Which property a [`PropertyFlag`] contributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    ArmorPierce,
    ManualFire,
    UpgradeForbidden,
    /// Value: strength.
    MaxOvercharge,
    /// Value: the argument, verbatim.
    AttackColor,
    NoUpgradeCost,
    InfiniteLifespan,
    ReturnsToTopOfDeck,
    /// Value: strength, rounded.
    DieRoll,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 9] = [
        PropertyKind::ArmorPierce,
        PropertyKind::ManualFire,
        PropertyKind::UpgradeForbidden,
        PropertyKind::MaxOvercharge,
        PropertyKind::AttackColor,
        PropertyKind::NoUpgradeCost,
        PropertyKind::InfiniteLifespan,
        PropertyKind::ReturnsToTopOfDeck,
        PropertyKind::DieRoll,
    ];

    pub const fn canonical_name(self) -> &'static str {
        match self {
            PropertyKind::ArmorPierce => "armorPierce",
            PropertyKind::ManualFire => "manualFire",
            PropertyKind::UpgradeForbidden => "upgradeForbidden",
            PropertyKind::MaxOvercharge => "maxOvercharge",
            PropertyKind::AttackColor => "attackColor",
            PropertyKind::NoUpgradeCost => "noUpgradeCost",
            PropertyKind::InfiniteLifespan => "infiniteLifespan",
            PropertyKind::ReturnsToTopOfDeck => "returnsToTopOfDeck",
            PropertyKind::DieRoll => "dieRoll",
        }
    }
}

/// A passive flag or value read through the container's [`PropertySet`].
#[derive(Clone, Debug)]
pub struct PropertyFlag {
    kind: PropertyKind,
    params: EffectParams,
}

impl PropertyFlag {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            params: EffectParams::default(),
        }
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }
}

impl Effect for PropertyFlag {
    fn canonical_name(&self) -> &'static str {
        self.kind.canonical_name()
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::Property)
    }

    effect_params!();

    fn as_property(&self) -> Option<&dyn PropertyEffect> {
        Some(self)
    }
}

impl PropertyEffect for PropertyFlag {
    fn contribute(&self, properties: &mut PropertySet) {
        let strength = self.params.strength;
        match self.kind {
            PropertyKind::ArmorPierce => properties.armor_pierce = true,
            PropertyKind::ManualFire => properties.manual_fire = true,
            PropertyKind::UpgradeForbidden => properties.upgrade_forbidden = true,
            PropertyKind::MaxOvercharge => properties.max_overcharge = Some(strength),
            PropertyKind::AttackColor => {
                properties.attack_color = Some(self.params.argument.clone());
            }
            PropertyKind::NoUpgradeCost => properties.no_upgrade_cost = true,
            PropertyKind::InfiniteLifespan => properties.infinite_lifespan = true,
            PropertyKind::ReturnsToTopOfDeck => properties.returns_to_top_of_deck = true,
            PropertyKind::DieRoll => properties.die_roll = Some(strength.round() as i32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valued_properties() {
        let mut color = PropertyFlag::new(PropertyKind::AttackColor);
        color.set_argument("#ff8800");
        let mut roll = PropertyFlag::new(PropertyKind::DieRoll);
        roll.set_strength(4.0);

        let mut properties = PropertySet::default();
        color.contribute(&mut properties);
        roll.contribute(&mut properties);

        assert_eq!(properties.attack_color.as_deref(), Some("#ff8800"));
        assert_eq!(properties.die_roll, Some(4));
        assert!(!properties.armor_pierce);
    }

    #[test]
    fn test_every_kind_sets_something() {
        for kind in PropertyKind::ALL {
            let mut properties = PropertySet::default();
            PropertyFlag::new(kind).contribute(&mut properties);
            assert!(!properties.is_empty(), "{kind:?} contributed nothing");
        }
    }
}
