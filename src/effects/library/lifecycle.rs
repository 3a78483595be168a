//! Spawn and death effects, including resonance.

use tracing::{debug, warn};

use crate::combat::DamageEvent;
use crate::effects::capability::{DeathEffect, EnemyDamagedEffect, SpawnEffect};
use crate::effects::category::{CategorySet, EffectCategory};
use crate::effects::context::EffectContext;
use crate::effects::effect::{Effect, EffectParams};

use super::effect_params;

// === spawnOnDeath ===

/// Spawns `strength` enemies of the kind named by the argument where the
/// host died.
#[derive(Clone, Debug, Default)]
pub struct SpawnOnDeath {
    params: EffectParams,
}

impl SpawnOnDeath {
    pub fn new(count: u32, kind: &str) -> Self {
        Self {
            params: EffectParams::new(count as f32, kind),
        }
    }
}

impl Effect for SpawnOnDeath {
    fn canonical_name(&self) -> &'static str {
        "spawnOnDeath"
    }

    fn display_name(&self) -> String {
        format!("On death: spawn {} {}", self.params.strength, self.params.argument)
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::Death)
    }

    effect_params!();

    fn as_death(&mut self) -> Option<&mut dyn DeathEffect> {
        Some(self)
    }
}

impl DeathEffect for SpawnOnDeath {
    fn on_death(&mut self, ctx: &mut EffectContext<'_>) {
        let kind = self.params.argument.trim();
        if kind.is_empty() {
            warn!(effect = "spawnOnDeath", "no enemy kind given; nothing spawned");
            return;
        }
        let position = ctx.host.and_then(|host| ctx.world.position_of(host));
        let count = self.params.strength.round().max(0.0) as u32;
        for _ in 0..count {
            ctx.world.spawn_enemy(kind, position);
        }
    }
}

// === resonance ===

/// Upper bound on resonance damage reduction, in percent.
pub const RESONANCE_REDUCTION_CAP: f32 = 90.0;

/// Hosts sharing a resonance tag (the argument) protect each other.
///
/// Spawning registers the host under the tag in the session's
/// [`ResonanceRegistry`](crate::effects::ResonanceRegistry). Dying, or
/// leaving the field any other way, unregisters it. Only a registered
/// instance ever decrements the count. Every *other* live holder of the tag reduces damage the
/// host takes by `strength` percent, up to [`RESONANCE_REDUCTION_CAP`].
#[derive(Clone, Debug, Default)]
pub struct Resonance {
    params: EffectParams,
    registered: bool,
}

impl Resonance {
    pub fn new(strength: f32, tag: &str) -> Self {
        Self {
            params: EffectParams::new(strength, tag),
            registered: false,
        }
    }

    pub fn tag(&self) -> &str {
        &self.params.argument
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Damage reduction in percent given the tag's live count.
    pub fn reduction(&self, count: u32) -> f32 {
        let others = if self.registered { count.saturating_sub(1) } else { count };
        (self.params.strength * others as f32).clamp(0.0, RESONANCE_REDUCTION_CAP)
    }
}

impl Effect for Resonance {
    fn canonical_name(&self) -> &'static str {
        "resonance"
    }

    fn display_name(&self) -> String {
        format!("Resonance ({})", self.params.argument)
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::Spawn)
            .with(EffectCategory::Death)
            .with(EffectCategory::EnemyDamaged)
    }

    fn params(&self) -> &EffectParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut EffectParams {
        &mut self.params
    }

    // A copy belongs to a host that has not spawned yet.
    fn clone_box(&self) -> Box<dyn Effect> {
        Box::new(Self {
            params: self.params.clone(),
            registered: false,
        })
    }

    fn release(&mut self, ctx: &mut EffectContext<'_>) {
        if !self.registered {
            return;
        }
        let count = ctx.resonance.decrement(&self.params.argument);
        self.registered = false;
        debug!(effect = "resonance", tag = %self.params.argument, count, "unregistered");
    }

    fn as_spawn(&mut self) -> Option<&mut dyn SpawnEffect> {
        Some(self)
    }

    fn as_death(&mut self) -> Option<&mut dyn DeathEffect> {
        Some(self)
    }

    fn as_enemy_damaged(&mut self) -> Option<&mut dyn EnemyDamagedEffect> {
        Some(self)
    }
}

impl SpawnEffect for Resonance {
    fn on_spawned(&mut self, ctx: &mut EffectContext<'_>) {
        if self.registered {
            return;
        }
        let count = ctx.resonance.increment(&self.params.argument);
        self.registered = true;
        debug!(effect = "resonance", tag = %self.params.argument, count, "registered");
    }
}

impl DeathEffect for Resonance {
    fn on_death(&mut self, ctx: &mut EffectContext<'_>) {
        self.release(ctx);
    }
}

impl EnemyDamagedEffect for Resonance {
    fn expected_damage(&mut self, event: &mut DamageEvent, ctx: &mut EffectContext<'_>) {
        let reduction = self.reduction(ctx.resonance.count(&self.params.argument));
        event.raw_damage *= 1.0 - reduction / 100.0;
    }

    fn actual_damage(&mut self, _event: &DamageEvent, _ctx: &mut EffectContext<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, Position};
    use crate::effects::ResonanceRegistry;
    use crate::sandbox::Arena;

    #[test]
    fn test_spawn_and_death_are_idempotent() {
        let mut arena = Arena::new();
        let mut resonance = ResonanceRegistry::new();
        let mut rng = GameRng::new(1);
        let mut effect = Resonance::new(10.0, "hive");

        let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
        effect.on_spawned(&mut ctx);
        effect.on_spawned(&mut ctx);
        assert_eq!(ctx.resonance.count("hive"), 1);
        effect.on_death(&mut ctx);
        effect.on_death(&mut ctx);
        assert_eq!(ctx.resonance.count("hive"), 0);
    }

    #[test]
    fn test_reduction_counts_others_and_caps() {
        let mut effect = Resonance::new(25.0, "hive");
        effect.registered = true;
        assert_eq!(effect.reduction(1), 0.0);
        assert_eq!(effect.reduction(3), 50.0);
        assert_eq!(effect.reduction(10), RESONANCE_REDUCTION_CAP);
    }

    #[test]
    fn test_clone_is_unregistered() {
        let mut effect = Resonance::new(10.0, "hive");
        effect.registered = true;
        let copy = effect.clone_box();
        assert_eq!(copy.argument(), "hive");
        assert_eq!(copy.display_name(), "Resonance (hive)");
        assert!(effect.is_registered());
    }

    #[test]
    fn test_spawn_on_death_uses_host_position() {
        let mut arena = Arena::new();
        let host = arena.add_enemy(Position::new(2.0, 3.0), 10.0, 0.0, 1.0);
        let mut resonance = ResonanceRegistry::new();
        let mut rng = GameRng::new(1);
        let mut effect = SpawnOnDeath::new(2, "spiderling");

        let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng).with_host(host);
        effect.on_death(&mut ctx);
        drop(ctx);

        let expected = ("spiderling".to_string(), Some(Position::new(2.0, 3.0)));
        assert_eq!(arena.spawn_requests(), &[expected.clone(), expected]);
    }
}
