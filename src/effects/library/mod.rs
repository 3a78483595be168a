//! The concrete effect library.
//!
//! Effects that only differ in which call site they answer, or in which
//! stat or reward they touch, share one struct with a selector field
//! (`GoldReward`, `WaveModifier`, `TargetPolicy`, `PropertyFlag`, ...).
//! Every canonical name maps to a constructor in
//! [`EffectRegistry::with_builtin`](super::EffectRegistry::with_builtin).

mod combat;
mod lifecycle;
mod periodic;
mod property;
mod rewards;
mod targeting;
mod tower;
mod wave;

pub use combat::{
    Armor, DamagePercent, ExplodeOnHit, LimitedAmmo, PoisonOnHit, SlowOnHit,
    DEFAULT_EXPLOSION_RADIUS,
};
pub use lifecycle::{Resonance, SpawnOnDeath, RESONANCE_REDUCTION_CAP};
pub use periodic::{Poison, Regeneration, DEFAULT_POISON_DURATION};
pub use property::{PropertyFlag, PropertyKind};
pub use rewards::{CardDraw, DamageAllEnemies, ExtraLifeLoss, GainLives, GoldReward};
pub use targeting::{TargetMode, TargetPolicy};
pub use tower::{ChainAttack, TowerStatBoost, DEFAULT_CHAIN_DELAY, DEFAULT_CHAIN_RADIUS};
pub use wave::{WaveAdjustment, WaveModifier};

/// Storage boilerplate shared by every library effect: `params`,
/// `params_mut` and `clone_box` for a `Clone` struct with a `params` field.
macro_rules! effect_params {
    () => {
        fn params(&self) -> &$crate::effects::EffectParams {
            &self.params
        }

        fn params_mut(&mut self) -> &mut $crate::effects::EffectParams {
            &mut self.params
        }

        fn clone_box(&self) -> Box<dyn $crate::effects::Effect> {
            Box::new(self.clone())
        }
    };
}

pub(crate) use effect_params;
