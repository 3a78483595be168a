//! Meta effects - decorators that gate one inner effect.
//!
//! Every meta effect is a [`MetaEffect`] parameterised by a [`GatePolicy`].
//! The generic type does the forwarding once for every capability: each
//! entry point asks the policy whether the inner may run and, if so, calls
//! the same capability on the inner. The policy only decides, observes
//! events, and reports when it is exhausted.
//!
//! ## Forwarding rules
//!
//! - Categories are `meta` plus whatever the *current* inner reports,
//!   unless the policy overrides them (`everyRound`, `onSpawn`). They are
//!   computed on every query, so replacing the inner re-evaluates them.
//! - A missing inner (the no-op sentinel) closes every gate, with a
//!   warning.
//! - The expected damage phase records its gate decision under the
//!   attack's id and the actual phase of that attack consumes it, so
//!   several attacks can be in flight at once.
//! - `rank_changed` and `source_attack_changed` always propagate,
//!   regardless of the gate, so scaled strengths stay consistent.
//! - `release` always reaches the inner, so shared registrations made
//!   behind an open gate are dropped even when the gate is now closed.
//! - Property lookups pass straight through; they are reads, not triggers.

mod chance;
mod charges;
mod cooldown;
mod roll;
mod scaling;
mod trigger;

pub use chance::{ChanceGate, PercentageChance};
pub use charges::{ChargesGate, LimitedCharges};
pub use cooldown::{Cooldown, CooldownGate};
pub use roll::{RollGate, RollRange};
pub use scaling::{
    Rescale, ScaleWithDamage, ScaleWithRank, ScaleWithSourceAttack, ScaleWithTime,
    SourceAttackScaling, DamageScaling, RankScaling, TimeScaling,
};
pub use trigger::{EveryRound, EveryRoundTrigger, OnSpawn, OnSpawnTrigger};

use smallvec::SmallVec;
use tracing::{debug, error, warn};

use crate::combat::DamageEvent;
use crate::core::{EffectError, EntityId, Position};
use crate::waves::WaveData;

use super::capability::{
    AttackEffect, AttackInfo, CardDrawnEffect, DeathEffect, DiscardEffect, EnemyDamagedEffect,
    EveryRoundEffect, InstantEffect, MetaControl, OverchargeEffect, PeriodicEffect,
    PropertyEffect, RankEffect, ReachedGoalEffect, SelfEffect, SourceTrackedEffect,
    SpawnEffect, TargetList, TargetingEffect, UpgradeEffect, WaveEffect,
};
use super::category::{CategorySet, EffectCategory};
use super::context::EffectContext;
use super::effect::{Effect, EffectParams, NoOpEffect};

/// Event a policy can observe before the gate is consulted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MetaEvent {
    /// Expected damage phase, with the damage seen so far.
    Damage(f32),
    /// Host update, with elapsed seconds.
    Tick(f32),
    /// Host rank changed.
    Rank(u32),
    /// Source attack stat changed.
    SourceAttack(f32),
}

/// What happened after the gate opened and the inner ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Forwarded {
    /// A trigger or damage call ran.
    Triggered,
    /// A targeting search ran and found this many targets.
    Targets(usize),
}

/// Gate decisions kept for attacks that launched but have not landed.
const MAX_PENDING_GATES: usize = 64;

/// The gating policy of a meta effect.
pub trait GatePolicy: std::fmt::Debug + Clone + Default + 'static {
    /// Canonical name of the meta effect.
    const NAME: &'static str;

    /// Display name, given the meta's parameters and the inner effect.
    fn describe(&self, params: &EffectParams, inner: &dyn Effect) -> String;

    /// Categories reported by the meta effect.
    fn categories(&self, inner: &dyn Effect) -> CategorySet {
        inner.categories().with(EffectCategory::Meta)
    }

    /// Whether `inner` may be wrapped.
    fn accepts(&self, _inner: &dyn Effect) -> bool {
        true
    }

    /// Re-read typed state after strength or argument changed.
    fn configure(&mut self, _params: &EffectParams) {}

    /// Decide whether the inner runs this time.
    fn allow(&mut self, params: &EffectParams, ctx: &mut EffectContext<'_>) -> bool;

    /// The gate opened and the inner ran.
    fn on_forwarded(&mut self, _params: &EffectParams, _outcome: Forwarded) {}

    /// Observe an event before gating, with mutable access to the inner.
    fn observe(&mut self, _event: MetaEvent, _params: &EffectParams, _inner: &mut dyn Effect) {}

    /// The policy will never open again.
    fn exhausted(&self) -> bool {
        false
    }

    /// Adjust a freshly cloned inner before it is attached to a new host.
    fn prepare_clone(&self, _inner: &mut dyn Effect) {}

    /// Policy state for the clone.
    fn clone_for_host(&self) -> Self {
        self.clone()
    }
}

/// A decorator around exactly one inner effect.
#[derive(Debug)]
pub struct MetaEffect<P: GatePolicy> {
    params: EffectParams,
    inner: Box<dyn Effect>,
    policy: P,
    damage_gates: SmallVec<[(u64, bool); 4]>,
}

impl<P: GatePolicy> Default for MetaEffect<P> {
    fn default() -> Self {
        Self {
            params: EffectParams::default(),
            inner: Box::new(NoOpEffect::default()),
            policy: P::default(),
            damage_gates: SmallVec::new(),
        }
    }
}

impl<P: GatePolicy> MetaEffect<P> {
    /// Create a meta effect with the no-op sentinel as inner.
    #[must_use]
    pub fn new(strength: f32, argument: &str) -> Self {
        let mut meta = Self::default();
        meta.set_strength(strength);
        meta.set_argument(argument);
        meta
    }

    /// Create a meta effect around `inner`.
    ///
    /// An incompatible inner is logged and the sentinel is kept.
    #[must_use]
    pub fn wrapping(strength: f32, argument: &str, inner: Box<dyn Effect>) -> Self {
        let mut meta = Self::new(strength, argument);
        let _ = meta.set_inner(inner);
        meta
    }

    /// The gating policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    fn open_gate(&mut self, ctx: &mut EffectContext<'_>) -> bool {
        if self.inner.is_noop() {
            warn!(effect = P::NAME, "meta effect has no inner effect; gate closed");
            return false;
        }
        self.policy.allow(&self.params, ctx)
    }

    fn forwarded(&mut self, outcome: Forwarded) {
        self.policy.on_forwarded(&self.params, outcome);
    }

    fn observe(&mut self, event: MetaEvent) {
        self.policy.observe(event, &self.params, self.inner.as_mut());
    }

    fn record_damage_gate(&mut self, attack_id: u64, open: bool) {
        self.damage_gates.retain(|(id, _)| *id != attack_id);
        if self.damage_gates.len() >= MAX_PENDING_GATES {
            let (dropped, _) = self.damage_gates.remove(0);
            debug!(
                effect = P::NAME,
                attack = dropped,
                "dropped gate of an attack that never landed"
            );
        }
        self.damage_gates.push((attack_id, open));
    }

    fn take_damage_gate(&mut self, attack_id: u64) -> Option<bool> {
        let index = self.damage_gates.iter().position(|(id, _)| *id == attack_id)?;
        Some(self.damage_gates.remove(index).1)
    }

    /// Attacks whose gate decision is waiting for the actual phase.
    pub fn pending_attacks(&self) -> usize {
        self.damage_gates.len()
    }
}

impl<P: GatePolicy> Effect for MetaEffect<P> {
    fn canonical_name(&self) -> &'static str {
        P::NAME
    }

    fn display_name(&self) -> String {
        self.policy.describe(&self.params, self.inner.as_ref())
    }

    fn categories(&self) -> CategorySet {
        self.policy.categories(self.inner.as_ref())
    }

    fn params(&self) -> &EffectParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut EffectParams {
        &mut self.params
    }

    fn set_strength(&mut self, strength: f32) {
        self.params.strength = strength;
        self.policy.configure(&self.params);
    }

    fn set_argument(&mut self, argument: &str) {
        self.params.argument = argument.to_string();
        self.policy.configure(&self.params);
    }

    fn should_be_removed(&self) -> bool {
        self.inner.is_noop() || self.inner.should_be_removed() || self.policy.exhausted()
    }

    fn clone_box(&self) -> Box<dyn Effect> {
        let mut inner = self.inner.clone_box();
        self.policy.prepare_clone(inner.as_mut());
        Box::new(Self {
            params: self.params.clone(),
            inner,
            policy: self.policy.clone_for_host(),
            damage_gates: SmallVec::new(),
        })
    }

    fn inner_effect(&self) -> Option<&dyn Effect> {
        Some(self.inner.as_ref())
    }

    fn release(&mut self, ctx: &mut EffectContext<'_>) {
        self.inner.release(ctx);
    }

    fn as_instant(&mut self) -> Option<&mut dyn InstantEffect> {
        if self.triggers_as(EffectCategory::Instant) { Some(self) } else { None }
    }

    fn as_wave(&mut self) -> Option<&mut dyn WaveEffect> {
        if self.triggers_as(EffectCategory::Wave) { Some(self) } else { None }
    }

    fn as_discard(&mut self) -> Option<&mut dyn DiscardEffect> {
        if self.triggers_as(EffectCategory::Discard) { Some(self) } else { None }
    }

    fn as_self_cast(&mut self) -> Option<&mut dyn SelfEffect> {
        if self.triggers_as(EffectCategory::SelfCast) { Some(self) } else { None }
    }

    fn as_enemy_damaged(&mut self) -> Option<&mut dyn EnemyDamagedEffect> {
        if self.triggers_as(EffectCategory::EnemyDamaged) { Some(self) } else { None }
    }

    fn as_periodic(&mut self) -> Option<&mut dyn PeriodicEffect> {
        if self.triggers_as(EffectCategory::Periodic) { Some(self) } else { None }
    }

    fn as_overcharge(&mut self) -> Option<&mut dyn OverchargeEffect> {
        if self.triggers_as(EffectCategory::Overcharge) { Some(self) } else { None }
    }

    fn as_reached_goal(&mut self) -> Option<&mut dyn ReachedGoalEffect> {
        if self.triggers_as(EffectCategory::EnemyReachedGoal) { Some(self) } else { None }
    }

    fn as_death(&mut self) -> Option<&mut dyn DeathEffect> {
        if self.triggers_as(EffectCategory::Death) { Some(self) } else { None }
    }

    fn as_spawn(&mut self) -> Option<&mut dyn SpawnEffect> {
        if self.triggers_as(EffectCategory::Spawn) { Some(self) } else { None }
    }

    fn as_card_drawn(&mut self) -> Option<&mut dyn CardDrawnEffect> {
        if self.triggers_as(EffectCategory::CardDrawn) { Some(self) } else { None }
    }

    fn as_attack(&mut self) -> Option<&mut dyn AttackEffect> {
        if self.triggers_as(EffectCategory::Attack) { Some(self) } else { None }
    }

    fn as_upgrade(&mut self) -> Option<&mut dyn UpgradeEffect> {
        if self.triggers_as(EffectCategory::Upgrade) { Some(self) } else { None }
    }

    fn as_targeting(&mut self) -> Option<&mut dyn TargetingEffect> {
        if self.triggers_as(EffectCategory::TowerTargeting) { Some(self) } else { None }
    }

    fn as_rank(&mut self) -> Option<&mut dyn RankEffect> {
        if self.triggers_as(EffectCategory::Rank) { Some(self) } else { None }
    }

    fn as_source_tracked(&mut self) -> Option<&mut dyn SourceTrackedEffect> {
        if self.triggers_as(EffectCategory::SourceTracked) { Some(self) } else { None }
    }

    fn as_every_round(&mut self) -> Option<&mut dyn EveryRoundEffect> {
        if self.triggers_as(EffectCategory::EveryRound) { Some(self) } else { None }
    }

    fn as_property(&self) -> Option<&dyn PropertyEffect> {
        if self.triggers_as(EffectCategory::Property) {
            self.inner.as_property()
        } else {
            None
        }
    }

    fn as_meta(&mut self) -> Option<&mut dyn MetaControl> {
        Some(self)
    }
}

impl<P: GatePolicy> MetaControl for MetaEffect<P> {
    fn inner(&self) -> &dyn Effect {
        self.inner.as_ref()
    }

    fn inner_mut(&mut self) -> &mut dyn Effect {
        self.inner.as_mut()
    }

    fn set_inner(&mut self, inner: Box<dyn Effect>) -> Result<(), EffectError> {
        if !self.policy.accepts(inner.as_ref()) {
            error!(
                effect = P::NAME,
                inner = inner.canonical_name(),
                "rejected incompatible inner effect"
            );
            return Err(EffectError::IncompatibleInner {
                wrapper: P::NAME,
                inner: inner.canonical_name(),
            });
        }
        self.inner = inner;
        self.damage_gates.clear();
        Ok(())
    }
}

// === Forwarding ===

impl<P: GatePolicy> InstantEffect for MetaEffect<P> {
    fn trigger(&mut self, ctx: &mut EffectContext<'_>) {
        if !self.open_gate(ctx) {
            return;
        }
        if let Some(inner) = self.inner.as_instant() {
            inner.trigger(ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}

impl<P: GatePolicy> WaveEffect for MetaEffect<P> {
    fn alter_wave(&mut self, wave: WaveData, ctx: &mut EffectContext<'_>) -> WaveData {
        if !self.open_gate(ctx) {
            return wave;
        }
        let altered = match self.inner.as_wave() {
            Some(inner) => inner.alter_wave(wave, ctx),
            None => wave,
        };
        self.forwarded(Forwarded::Triggered);
        altered
    }
}

impl<P: GatePolicy> DiscardEffect for MetaEffect<P> {
    fn on_discard(&mut self, ctx: &mut EffectContext<'_>) {
        if !self.open_gate(ctx) {
            return;
        }
        if let Some(inner) = self.inner.as_discard() {
            inner.on_discard(ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}

impl<P: GatePolicy> SelfEffect for MetaEffect<P> {
    fn trigger_on_self(&mut self, ctx: &mut EffectContext<'_>) {
        if !self.open_gate(ctx) {
            return;
        }
        if let Some(inner) = self.inner.as_self_cast() {
            inner.trigger_on_self(ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}

impl<P: GatePolicy> EnemyDamagedEffect for MetaEffect<P> {
    fn expected_damage(&mut self, event: &mut DamageEvent, ctx: &mut EffectContext<'_>) {
        self.observe(MetaEvent::Damage(event.raw_damage));
        let open = self.open_gate(ctx);
        self.record_damage_gate(event.attack_id, open);
        if !open {
            return;
        }
        if let Some(inner) = self.inner.as_enemy_damaged() {
            inner.expected_damage(event, ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }

    fn actual_damage(&mut self, event: &DamageEvent, ctx: &mut EffectContext<'_>) {
        let open = match self.take_damage_gate(event.attack_id) {
            Some(open) => open,
            None => {
                let open = self.open_gate(ctx);
                if open {
                    self.forwarded(Forwarded::Triggered);
                }
                open
            }
        };
        if !open {
            return;
        }
        if let Some(inner) = self.inner.as_enemy_damaged() {
            inner.actual_damage(event, ctx);
        }
    }
}

impl<P: GatePolicy> PeriodicEffect for MetaEffect<P> {
    fn update(&mut self, delta_seconds: f32, ctx: &mut EffectContext<'_>) {
        self.observe(MetaEvent::Tick(delta_seconds));
        if !self.inner.triggers_as(EffectCategory::Periodic) {
            return;
        }
        if !self.open_gate(ctx) {
            return;
        }
        if let Some(inner) = self.inner.as_periodic() {
            inner.update(delta_seconds, ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}

impl<P: GatePolicy> OverchargeEffect for MetaEffect<P> {
    fn on_overcharge(&mut self, ctx: &mut EffectContext<'_>) {
        if !self.open_gate(ctx) {
            return;
        }
        if let Some(inner) = self.inner.as_overcharge() {
            inner.on_overcharge(ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}

impl<P: GatePolicy> ReachedGoalEffect for MetaEffect<P> {
    fn on_reached_goal(&mut self, enemy: EntityId, ctx: &mut EffectContext<'_>) {
        if !self.open_gate(ctx) {
            return;
        }
        if let Some(inner) = self.inner.as_reached_goal() {
            inner.on_reached_goal(enemy, ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}

impl<P: GatePolicy> DeathEffect for MetaEffect<P> {
    fn on_death(&mut self, ctx: &mut EffectContext<'_>) {
        if !self.open_gate(ctx) {
            return;
        }
        if let Some(inner) = self.inner.as_death() {
            inner.on_death(ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}

impl<P: GatePolicy> SpawnEffect for MetaEffect<P> {
    fn on_spawned(&mut self, ctx: &mut EffectContext<'_>) {
        if !self.open_gate(ctx) {
            return;
        }
        // `onSpawn` wraps instant effects and fires them here.
        if self.inner.triggers_as(EffectCategory::Spawn) {
            if let Some(inner) = self.inner.as_spawn() {
                inner.on_spawned(ctx);
            }
        } else if let Some(inner) = self.inner.as_instant() {
            inner.trigger(ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}

impl<P: GatePolicy> CardDrawnEffect for MetaEffect<P> {
    fn on_card_drawn(&mut self, ctx: &mut EffectContext<'_>) {
        if !self.open_gate(ctx) {
            return;
        }
        if let Some(inner) = self.inner.as_card_drawn() {
            inner.on_card_drawn(ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}

impl<P: GatePolicy> AttackEffect for MetaEffect<P> {
    fn on_attack(&mut self, attack: &AttackInfo, ctx: &mut EffectContext<'_>) {
        if !self.open_gate(ctx) {
            return;
        }
        if let Some(inner) = self.inner.as_attack() {
            inner.on_attack(attack, ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}

impl<P: GatePolicy> UpgradeEffect for MetaEffect<P> {
    fn on_upgrade(&mut self, ctx: &mut EffectContext<'_>) {
        if !self.open_gate(ctx) {
            return;
        }
        if let Some(inner) = self.inner.as_upgrade() {
            inner.on_upgrade(ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}

impl<P: GatePolicy> TargetingEffect for MetaEffect<P> {
    fn find_targets(
        &mut self,
        position: Position,
        radius: f32,
        ctx: &mut EffectContext<'_>,
    ) -> TargetList {
        if !self.open_gate(ctx) {
            return TargetList::new();
        }
        let targets = match self.inner.as_targeting() {
            Some(inner) => inner.find_targets(position, radius, ctx),
            None => TargetList::new(),
        };
        self.forwarded(Forwarded::Targets(targets.len()));
        targets
    }
}

impl<P: GatePolicy> RankEffect for MetaEffect<P> {
    fn rank_changed(&mut self, rank: u32) {
        self.observe(MetaEvent::Rank(rank));
        if let Some(inner) = self.inner.as_rank() {
            inner.rank_changed(rank);
        }
    }
}

impl<P: GatePolicy> SourceTrackedEffect for MetaEffect<P> {
    fn source_attack_changed(&mut self, attack: f32) {
        self.observe(MetaEvent::SourceAttack(attack));
        if let Some(inner) = self.inner.as_source_tracked() {
            inner.source_attack_changed(attack);
        }
    }
}

impl<P: GatePolicy> EveryRoundEffect for MetaEffect<P> {
    fn on_round(&mut self, round: u32, ctx: &mut EffectContext<'_>) {
        if !self.open_gate(ctx) {
            return;
        }
        // `everyRound` wraps instant effects and fires them here.
        if self.inner.triggers_as(EffectCategory::EveryRound) {
            if let Some(inner) = self.inner.as_every_round() {
                inner.on_round(round, ctx);
            }
        } else if let Some(inner) = self.inner.as_instant() {
            inner.trigger(ctx);
        }
        self.forwarded(Forwarded::Triggered);
    }
}
