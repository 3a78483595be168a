//! Capability traits, one per trigger category.
//!
//! An effect exposes a capability through the matching accessor on
//! [`Effect`](super::Effect). Call sites only ever see the capability they
//! need, so an effect never has to stub out operations it does not support.
//!
//! The damage capability has two methods with different receivers for the
//! event: the expected phase gets `&mut DamageEvent` and may change the
//! damage, the actual phase gets `&DamageEvent` and can only cause side
//! effects.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::combat::DamageEvent;
use crate::core::{EffectError, EntityId, Position};
use crate::waves::WaveData;

use super::context::EffectContext;
use super::effect::Effect;
use super::property::PropertySet;

/// Targets chosen by a targeting effect. Empty means "no target".
pub type TargetList = SmallVec<[EntityId; 8]>;

/// Data about an attack the host tower just fired.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackInfo {
    /// The tower that fired.
    pub tower: EntityId,
    /// The enemy the attack was aimed at.
    pub target: EntityId,
    /// Damage the attack was launched with.
    pub damage: f32,
}

pub trait InstantEffect {
    fn trigger(&mut self, ctx: &mut EffectContext<'_>);
}

pub trait WaveEffect {
    /// Return an altered copy of `wave`.
    fn alter_wave(&mut self, wave: WaveData, ctx: &mut EffectContext<'_>) -> WaveData;
}

pub trait DiscardEffect {
    fn on_discard(&mut self, ctx: &mut EffectContext<'_>);
}

pub trait SelfEffect {
    /// Cast onto the host (`ctx.host`).
    fn trigger_on_self(&mut self, ctx: &mut EffectContext<'_>);
}

pub trait EnemyDamagedEffect {
    /// Runs when the attack is launched. May change `event.raw_damage`.
    fn expected_damage(&mut self, event: &mut DamageEvent, ctx: &mut EffectContext<'_>);

    /// Runs when the attack lands. Side effects only.
    fn actual_damage(&mut self, event: &DamageEvent, ctx: &mut EffectContext<'_>);
}

pub trait PeriodicEffect {
    fn update(&mut self, delta_seconds: f32, ctx: &mut EffectContext<'_>);
}

pub trait OverchargeEffect {
    fn on_overcharge(&mut self, ctx: &mut EffectContext<'_>);
}

pub trait ReachedGoalEffect {
    fn on_reached_goal(&mut self, enemy: EntityId, ctx: &mut EffectContext<'_>);
}

pub trait DeathEffect {
    fn on_death(&mut self, ctx: &mut EffectContext<'_>);
}

pub trait SpawnEffect {
    fn on_spawned(&mut self, ctx: &mut EffectContext<'_>);
}

pub trait CardDrawnEffect {
    fn on_card_drawn(&mut self, ctx: &mut EffectContext<'_>);
}

pub trait AttackEffect {
    fn on_attack(&mut self, attack: &AttackInfo, ctx: &mut EffectContext<'_>);
}

pub trait UpgradeEffect {
    fn on_upgrade(&mut self, ctx: &mut EffectContext<'_>);
}

pub trait TargetingEffect {
    /// Choose targets around `position`. Never fails: no candidates yields
    /// an empty list.
    fn find_targets(
        &mut self,
        position: Position,
        radius: f32,
        ctx: &mut EffectContext<'_>,
    ) -> TargetList;
}

pub trait RankEffect {
    fn rank_changed(&mut self, rank: u32);
}

pub trait SourceTrackedEffect {
    /// The attack stat of the entity that applied this effect changed.
    fn source_attack_changed(&mut self, attack: f32);
}

pub trait EveryRoundEffect {
    fn on_round(&mut self, round: u32, ctx: &mut EffectContext<'_>);
}

pub trait PropertyEffect {
    /// Fold this effect's value into the aggregated lookup.
    fn contribute(&self, properties: &mut PropertySet);
}

/// Inner-effect management for meta effects.
pub trait MetaControl {
    fn inner(&self) -> &dyn Effect;

    fn inner_mut(&mut self) -> &mut dyn Effect;

    /// Replace the inner effect. An incompatible inner is rejected, logged,
    /// and the previous inner is kept.
    fn set_inner(&mut self, inner: Box<dyn Effect>) -> Result<(), EffectError>;
}
