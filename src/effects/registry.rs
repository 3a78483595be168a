//! Effect registry - canonical name to constructor.
//!
//! The registry turns [`EffectDescriptor`]s into live effects. Construction
//! always follows the same steps: look the name up, build a default
//! instance, set the strength, then set the argument (so effects that parse
//! their argument see the final strength), then build and assign the inner
//! effect if the descriptor nests one.
//!
//! ## Example
//!
//! ```
//! use rust_td::effects::{EffectCategory, EffectDescriptor, EffectRegistry};
//!
//! let registry = EffectRegistry::with_builtin();
//! let descriptor = EffectDescriptor::new("percentageChance", 25.0, "")
//!     .wrapping(EffectDescriptor::new("explodeOnHit", 8.0, "1.5"));
//!
//! let effect = registry.try_create(&descriptor).unwrap();
//! assert_eq!(effect.canonical_name(), "percentageChance");
//! assert!(effect.triggers_as(EffectCategory::EnemyDamaged));
//! assert!(effect.triggers_as(EffectCategory::Meta));
//! ```

use rustc_hash::FxHashMap;
use tracing::{error, warn};

use crate::core::EffectError;

use super::descriptor::EffectDescriptor;
use super::effect::Effect;
use super::library::{
    Armor, CardDraw, ChainAttack, DamageAllEnemies, DamagePercent, ExplodeOnHit, ExtraLifeLoss,
    GainLives, GoldReward, LimitedAmmo, Poison, PoisonOnHit, PropertyFlag, PropertyKind,
    Regeneration, Resonance, SlowOnHit, SpawnOnDeath, TargetMode, TargetPolicy, TowerStatBoost,
    WaveAdjustment, WaveModifier,
};
use super::meta::{
    Cooldown, EveryRound, LimitedCharges, OnSpawn, PercentageChance, RollRange, ScaleWithDamage,
    ScaleWithRank, ScaleWithSourceAttack, ScaleWithTime,
};

/// Builds a default instance of one effect.
pub type EffectConstructor = fn() -> Box<dyn Effect>;

/// Name-keyed effect factory.
#[derive(Clone, Default)]
pub struct EffectRegistry {
    constructors: FxHashMap<&'static str, EffectConstructor>,
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectRegistry")
            .field("effects", &self.constructors.len())
            .finish()
    }
}

impl EffectRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in effect.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register_builtin();
        registry
    }

    /// Register (or replace) a constructor under `name`.
    pub fn register(&mut self, name: &'static str, constructor: EffectConstructor) {
        self.constructors.insert(name, constructor);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.constructors.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Build an effect, logging failures instead of returning them.
    ///
    /// An unknown name is a warning and the effect is dropped. A meta effect
    /// whose inner cannot be built or is rejected keeps the no-op sentinel;
    /// it never dispatches and is swept by its container's next cleanup.
    pub fn create(&self, descriptor: &EffectDescriptor) -> Option<Box<dyn Effect>> {
        match self.build(descriptor, false) {
            Ok(effect) => Some(effect),
            Err(EffectError::UnknownEffect(name)) => {
                warn!(effect = %name, "unknown effect name; dropping effect");
                None
            }
            Err(err) => {
                error!(effect = %descriptor.name, "could not build effect: {err}");
                None
            }
        }
    }

    /// Build an effect, reporting the first failure anywhere in the nesting.
    pub fn try_create(&self, descriptor: &EffectDescriptor) -> Result<Box<dyn Effect>, EffectError> {
        self.build(descriptor, true)
    }

    fn build(
        &self,
        descriptor: &EffectDescriptor,
        strict: bool,
    ) -> Result<Box<dyn Effect>, EffectError> {
        let constructor = self
            .constructors
            .get(descriptor.name.as_str())
            .ok_or_else(|| EffectError::UnknownEffect(descriptor.name.clone()))?;

        let mut effect = constructor();
        effect.set_strength(descriptor.strength);
        effect.set_argument(&descriptor.argument);

        let Some(inner) = &descriptor.inner else {
            return Ok(effect);
        };
        let name = effect.canonical_name();
        let inner = match self.build(inner, strict) {
            Ok(inner) => inner,
            Err(err) if !strict => {
                warn!(effect = name, "{err}; keeping an empty meta effect");
                return Ok(effect);
            }
            Err(err) => return Err(err),
        };
        match effect.as_meta() {
            Some(meta) => {
                // A rejection is logged by `set_inner`, which keeps the sentinel.
                if let Err(err) = meta.set_inner(inner) {
                    if strict {
                        return Err(err);
                    }
                }
            }
            None => {
                let err = EffectError::NotAMetaEffect(name);
                warn!(effect = name, "{err}; ignoring inner");
            }
        }
        Ok(effect)
    }

    /// Build every descriptor, skipping the ones that fail.
    pub fn create_all(&self, descriptors: &[EffectDescriptor]) -> Vec<Box<dyn Effect>> {
        descriptors
            .iter()
            .filter_map(|descriptor| self.create(descriptor))
            .collect()
    }

    fn register_builtin(&mut self) {
        // Cards and resources
        self.register("drawCards", || Box::new(CardDraw::draw_cards(0.0)));
        self.register("drawOnDiscard", || Box::new(CardDraw::on_discard(0.0)));
        self.register("gainGold", || Box::new(GoldReward::gain_gold(0.0)));
        self.register("goldOnDiscard", || Box::new(GoldReward::on_discard(0.0)));
        self.register("goldOnDraw", || Box::new(GoldReward::on_draw(0.0)));
        self.register("goldOnDeath", || Box::new(GoldReward::on_death(0.0)));
        self.register("gainLives", || Box::new(GainLives::default()));
        self.register("extraLifeLoss", || Box::new(ExtraLifeLoss::default()));
        self.register("damageAllEnemies", || Box::new(DamageAllEnemies::default()));

        // Waves
        self.register("waveBudget", || {
            Box::new(WaveModifier::new(WaveAdjustment::Budget, 0.0, ""))
        });
        self.register("extraSpawns", || {
            Box::new(WaveModifier::new(WaveAdjustment::ExtraSpawns, 0.0, ""))
        });
        self.register("spawnInterval", || {
            Box::new(WaveModifier::new(WaveAdjustment::SpawnInterval, 0.0, ""))
        });
        self.register("waveEnemyType", || {
            Box::new(WaveModifier::new(WaveAdjustment::EnemyType, 0.0, ""))
        });

        // Towers
        self.register("statBoost", || Box::new(TowerStatBoost::stat_boost()));
        self.register("overchargeBoost", || Box::new(TowerStatBoost::overcharge_boost()));
        self.register("upgradeBoost", || Box::new(TowerStatBoost::upgrade_boost()));
        self.register("chainAttack", || Box::new(ChainAttack::default()));

        // Damage
        self.register("armor", || Box::new(Armor::default()));
        self.register("damagePercent", || Box::new(DamagePercent::default()));
        self.register("explodeOnHit", || Box::new(ExplodeOnHit::default()));
        self.register("poisonOnHit", || Box::new(PoisonOnHit::default()));
        self.register("slowOnHit", || Box::new(SlowOnHit::default()));
        self.register("limitedAmmo", || Box::new(LimitedAmmo::default()));
        self.register("poison", || Box::new(Poison::default()));
        self.register("regeneration", || Box::new(Regeneration::default()));

        // Lifecycle
        self.register("spawnOnDeath", || Box::new(SpawnOnDeath::default()));
        self.register("resonance", || Box::new(Resonance::default()));

        // Targeting
        self.register("targetAllInRange", || Box::new(TargetPolicy::new(TargetMode::AllInRange)));
        self.register("targetHighestArmor", || {
            Box::new(TargetPolicy::new(TargetMode::HighestArmor))
        });
        self.register("targetHighestHealth", || {
            Box::new(TargetPolicy::new(TargetMode::HighestHealth))
        });
        self.register("targetHighestSpeed", || {
            Box::new(TargetPolicy::new(TargetMode::HighestSpeed))
        });
        self.register("targetRandom", || Box::new(TargetPolicy::new(TargetMode::Random)));
        self.register("targetFirstN", || Box::new(TargetPolicy::new(TargetMode::FirstN)));

        // Properties
        self.register("armorPierce", || Box::new(PropertyFlag::new(PropertyKind::ArmorPierce)));
        self.register("manualFire", || Box::new(PropertyFlag::new(PropertyKind::ManualFire)));
        self.register("upgradeForbidden", || {
            Box::new(PropertyFlag::new(PropertyKind::UpgradeForbidden))
        });
        self.register("maxOvercharge", || {
            Box::new(PropertyFlag::new(PropertyKind::MaxOvercharge))
        });
        self.register("attackColor", || Box::new(PropertyFlag::new(PropertyKind::AttackColor)));
        self.register("noUpgradeCost", || {
            Box::new(PropertyFlag::new(PropertyKind::NoUpgradeCost))
        });
        self.register("infiniteLifespan", || {
            Box::new(PropertyFlag::new(PropertyKind::InfiniteLifespan))
        });
        self.register("returnsToTopOfDeck", || {
            Box::new(PropertyFlag::new(PropertyKind::ReturnsToTopOfDeck))
        });
        self.register("dieRoll", || Box::new(PropertyFlag::new(PropertyKind::DieRoll)));

        // Meta
        self.register("percentageChance", || Box::new(PercentageChance::default()));
        self.register("rollRange", || Box::new(RollRange::default()));
        self.register("limitedCharges", || Box::new(LimitedCharges::default()));
        self.register("cooldown", || Box::new(Cooldown::default()));
        self.register("everyRound", || Box::new(EveryRound::default()));
        self.register("onSpawn", || Box::new(OnSpawn::default()));
        self.register("scaleWithDamage", || Box::new(ScaleWithDamage::default()));
        self.register("scaleWithTime", || Box::new(ScaleWithTime::default()));
        self.register("scaleWithRank", || Box::new(ScaleWithRank::default()));
        self.register("scaleWithSourceAttack", || Box::new(ScaleWithSourceAttack::default()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_match_canonical_names() {
        let registry = EffectRegistry::with_builtin();
        for name in registry.names() {
            let effect = registry
                .try_create(&EffectDescriptor::with_strength(name, 1.0))
                .unwrap();
            assert_eq!(effect.canonical_name(), name);
        }
        assert_eq!(registry.len(), 52);
    }

    #[test]
    fn test_unknown_name_is_dropped() {
        let registry = EffectRegistry::with_builtin();
        let descriptor = EffectDescriptor::with_strength("summonDragon", 3.0);

        assert!(registry.create(&descriptor).is_none());
        assert_eq!(
            registry.try_create(&descriptor).unwrap_err(),
            EffectError::UnknownEffect("summonDragon".to_string())
        );
    }

    #[test]
    fn test_incompatible_inner_is_an_error() {
        let registry = EffectRegistry::with_builtin();
        let descriptor = EffectDescriptor::with_strength("everyRound", 0.0)
            .wrapping(EffectDescriptor::with_strength("armor", 2.0));

        assert_eq!(
            registry.try_create(&descriptor).unwrap_err(),
            EffectError::IncompatibleInner {
                wrapper: "everyRound",
                inner: "armor",
            }
        );

        let effect = registry.create(&descriptor).unwrap();
        assert_eq!(effect.canonical_name(), "everyRound");
        assert!(effect.inner_effect().unwrap().is_noop());
        assert!(effect.should_be_removed());
    }

    #[test]
    fn test_unknown_inner_keeps_empty_meta() {
        let registry = EffectRegistry::with_builtin();
        let descriptor = EffectDescriptor::with_strength("limitedCharges", 2.0)
            .wrapping(EffectDescriptor::with_strength("summonDragon", 1.0));

        assert!(registry.try_create(&descriptor).is_err());
        let effect = registry.create(&descriptor).unwrap();
        assert!(effect.inner_effect().unwrap().is_noop());
    }

    #[test]
    fn test_inner_on_plain_effect_is_ignored() {
        let registry = EffectRegistry::with_builtin();
        let descriptor = EffectDescriptor::with_strength("armor", 2.0)
            .wrapping(EffectDescriptor::with_strength("gainGold", 1.0));

        let effect = registry.try_create(&descriptor).unwrap();
        assert_eq!(effect.canonical_name(), "armor");
        assert!(effect.inner_effect().is_none());
    }
}
