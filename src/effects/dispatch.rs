//! Single-effect dispatch.
//!
//! Call sites that return nothing are described by a `TriggerEvent`. The
//! dispatcher matches on it and calls only the capability that call site
//! defines; effects without that capability are skipped.

use crate::core::EntityId;

use super::capability::AttackInfo;
use super::category::EffectCategory;
use super::context::EffectContext;
use super::effect::Effect;

/// A unit-returning gameplay event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerEvent {
    /// A card was played with no target.
    Instant,
    /// A card was discarded.
    Discard,
    /// A card was cast onto the host.
    SelfCast,
    /// One host update, with elapsed seconds.
    Periodic(f32),
    /// The host tower was overcharged.
    Overcharge,
    /// The given enemy reached the goal.
    ReachedGoal(EntityId),
    /// The host died.
    Death,
    /// The host spawned.
    Spawned,
    /// The host card was drawn.
    CardDrawn,
    /// The host tower fired.
    Attack(AttackInfo),
    /// The host tower was upgraded.
    Upgrade,
    /// The host's rank changed.
    RankChanged(u32),
    /// The attack stat of the entity that applied an effect changed.
    SourceAttackChanged(f32),
    /// A new round started.
    Round(u32),
}

impl TriggerEvent {
    /// The category an effect must report to receive this event.
    #[must_use]
    pub const fn category(&self) -> EffectCategory {
        match self {
            TriggerEvent::Instant => EffectCategory::Instant,
            TriggerEvent::Discard => EffectCategory::Discard,
            TriggerEvent::SelfCast => EffectCategory::SelfCast,
            TriggerEvent::Periodic(_) => EffectCategory::Periodic,
            TriggerEvent::Overcharge => EffectCategory::Overcharge,
            TriggerEvent::ReachedGoal(_) => EffectCategory::EnemyReachedGoal,
            TriggerEvent::Death => EffectCategory::Death,
            TriggerEvent::Spawned => EffectCategory::Spawn,
            TriggerEvent::CardDrawn => EffectCategory::CardDrawn,
            TriggerEvent::Attack(_) => EffectCategory::Attack,
            TriggerEvent::Upgrade => EffectCategory::Upgrade,
            TriggerEvent::RankChanged(_) => EffectCategory::Rank,
            TriggerEvent::SourceAttackChanged(_) => EffectCategory::SourceTracked,
            TriggerEvent::Round(_) => EffectCategory::EveryRound,
        }
    }
}

/// Deliver `event` to one effect. Returns whether the effect took part.
pub fn dispatch_effect(
    effect: &mut dyn Effect,
    event: &TriggerEvent,
    ctx: &mut EffectContext<'_>,
) -> bool {
    match *event {
        TriggerEvent::Instant => {
            let Some(instant) = effect.as_instant() else { return false };
            instant.trigger(ctx);
        }
        TriggerEvent::Discard => {
            let Some(discard) = effect.as_discard() else { return false };
            discard.on_discard(ctx);
        }
        TriggerEvent::SelfCast => {
            let Some(cast) = effect.as_self_cast() else { return false };
            cast.trigger_on_self(ctx);
        }
        TriggerEvent::Periodic(delta) => {
            let Some(periodic) = effect.as_periodic() else { return false };
            periodic.update(delta, ctx);
        }
        TriggerEvent::Overcharge => {
            let Some(overcharge) = effect.as_overcharge() else { return false };
            overcharge.on_overcharge(ctx);
        }
        TriggerEvent::ReachedGoal(enemy) => {
            let Some(goal) = effect.as_reached_goal() else { return false };
            goal.on_reached_goal(enemy, ctx);
        }
        TriggerEvent::Death => {
            let Some(death) = effect.as_death() else { return false };
            death.on_death(ctx);
        }
        TriggerEvent::Spawned => {
            let Some(spawn) = effect.as_spawn() else { return false };
            spawn.on_spawned(ctx);
        }
        TriggerEvent::CardDrawn => {
            let Some(drawn) = effect.as_card_drawn() else { return false };
            drawn.on_card_drawn(ctx);
        }
        TriggerEvent::Attack(attack) => {
            let Some(on_attack) = effect.as_attack() else { return false };
            on_attack.on_attack(&attack, ctx);
        }
        TriggerEvent::Upgrade => {
            let Some(upgrade) = effect.as_upgrade() else { return false };
            upgrade.on_upgrade(ctx);
        }
        TriggerEvent::RankChanged(rank) => {
            let Some(ranked) = effect.as_rank() else { return false };
            ranked.rank_changed(rank);
        }
        TriggerEvent::SourceAttackChanged(attack) => {
            let Some(tracked) = effect.as_source_tracked() else { return false };
            tracked.source_attack_changed(attack);
        }
        TriggerEvent::Round(round) => {
            let Some(every_round) = effect.as_every_round() else { return false };
            every_round.on_round(round, ctx);
        }
    }
    true
}
