//! Enemy-damaged effects.
//!
//! Effects in the expected phase change `raw_damage`; effects in the actual
//! phase cause side effects on the target once the attack lands. Both run
//! in container order, so an `armor` listed before a `damagePercent` is
//! applied first.

use tracing::{debug, warn};

use crate::combat::DamageEvent;
use crate::effects::capability::{EnemyDamagedEffect, PropertyEffect};
use crate::effects::category::{CategorySet, EffectCategory};
use crate::effects::context::EffectContext;
use crate::effects::effect::{parse_argument, Effect, EffectParams};
use crate::effects::property::PropertySet;

use super::effect_params;
use super::periodic::{Poison, DEFAULT_POISON_DURATION};

fn enemy_damaged() -> CategorySet {
    CategorySet::of(EffectCategory::EnemyDamaged)
}

// === armor ===

/// Flat damage reduction.
///
/// Damage above 1 is reduced by `strength` but never below 1. Attacks that
/// pierce armor skip this effect entirely.
///
/// ```
/// use rust_td::effects::Armor;
///
/// assert_eq!(Armor::reduce(10.0, 3.0), 7.0);
/// assert_eq!(Armor::reduce(10.0, 30.0), 1.0);
/// assert_eq!(Armor::reduce(0.5, 3.0), 0.5);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Armor {
    params: EffectParams,
}

impl Armor {
    pub fn new(strength: f32) -> Self {
        Self {
            params: EffectParams::new(strength, ""),
        }
    }

    /// Armor formula: `max(raw - armor, 1)` for `raw > 1`, else `raw`.
    pub fn reduce(raw: f32, armor: f32) -> f32 {
        if raw > 1.0 {
            (raw - armor).max(1.0)
        } else {
            raw
        }
    }
}

impl Effect for Armor {
    fn canonical_name(&self) -> &'static str {
        "armor"
    }

    fn display_name(&self) -> String {
        format!("Armor {}", self.params.strength)
    }

    fn categories(&self) -> CategorySet {
        enemy_damaged()
    }

    effect_params!();

    fn as_enemy_damaged(&mut self) -> Option<&mut dyn EnemyDamagedEffect> {
        Some(self)
    }
}

impl EnemyDamagedEffect for Armor {
    fn expected_damage(&mut self, event: &mut DamageEvent, _ctx: &mut EffectContext<'_>) {
        if event.armor_pierce() {
            return;
        }
        event.raw_damage = Self::reduce(event.raw_damage, self.params.strength);
    }

    fn actual_damage(&mut self, _event: &DamageEvent, _ctx: &mut EffectContext<'_>) {}
}

// === damagePercent ===

/// Adds `strength` percent of the damage seen so far.
#[derive(Clone, Debug, Default)]
pub struct DamagePercent {
    params: EffectParams,
}

impl DamagePercent {
    pub fn new(strength: f32) -> Self {
        Self {
            params: EffectParams::new(strength, ""),
        }
    }
}

impl Effect for DamagePercent {
    fn canonical_name(&self) -> &'static str {
        "damagePercent"
    }

    fn display_name(&self) -> String {
        format!("+{}% damage", self.params.strength)
    }

    fn categories(&self) -> CategorySet {
        enemy_damaged()
    }

    effect_params!();

    fn as_enemy_damaged(&mut self) -> Option<&mut dyn EnemyDamagedEffect> {
        Some(self)
    }
}

impl EnemyDamagedEffect for DamagePercent {
    fn expected_damage(&mut self, event: &mut DamageEvent, _ctx: &mut EffectContext<'_>) {
        event.raw_damage += event.raw_damage * self.params.strength / 100.0;
    }

    fn actual_damage(&mut self, _event: &DamageEvent, _ctx: &mut EffectContext<'_>) {}
}

// === explodeOnHit ===

/// Explosion radius when the argument is empty or malformed.
pub const DEFAULT_EXPLOSION_RADIUS: f32 = 1.0;

/// Spawns an explosion of `strength` damage where the attack lands.
#[derive(Clone, Debug)]
pub struct ExplodeOnHit {
    params: EffectParams,
    radius: f32,
}

impl Default for ExplodeOnHit {
    fn default() -> Self {
        Self {
            params: EffectParams::default(),
            radius: DEFAULT_EXPLOSION_RADIUS,
        }
    }
}

impl ExplodeOnHit {
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Effect for ExplodeOnHit {
    fn canonical_name(&self) -> &'static str {
        "explodeOnHit"
    }

    fn categories(&self) -> CategorySet {
        enemy_damaged()
    }

    effect_params!();

    fn set_argument(&mut self, argument: &str) {
        self.params.argument = argument.to_string();
        self.radius = parse_argument("explodeOnHit", argument, DEFAULT_EXPLOSION_RADIUS);
    }

    fn as_enemy_damaged(&mut self) -> Option<&mut dyn EnemyDamagedEffect> {
        Some(self)
    }
}

impl EnemyDamagedEffect for ExplodeOnHit {
    fn expected_damage(&mut self, _event: &mut DamageEvent, _ctx: &mut EffectContext<'_>) {}

    fn actual_damage(&mut self, event: &DamageEvent, ctx: &mut EffectContext<'_>) {
        let Some(position) = ctx.world.position_of(event.dest) else {
            debug!(effect = "explodeOnHit", dest = %event.dest, "target gone; no explosion");
            return;
        };
        ctx.world
            .spawn_explosion(position, self.radius, self.params.strength);
    }
}

// === poisonOnHit ===

/// Attaches a `poison` of `strength` per second to the target. The
/// argument is the poison duration in seconds.
#[derive(Clone, Debug, Default)]
pub struct PoisonOnHit {
    params: EffectParams,
}

impl Effect for PoisonOnHit {
    fn canonical_name(&self) -> &'static str {
        "poisonOnHit"
    }

    fn categories(&self) -> CategorySet {
        enemy_damaged()
    }

    effect_params!();

    fn as_enemy_damaged(&mut self) -> Option<&mut dyn EnemyDamagedEffect> {
        Some(self)
    }
}

impl EnemyDamagedEffect for PoisonOnHit {
    fn expected_damage(&mut self, _event: &mut DamageEvent, _ctx: &mut EffectContext<'_>) {}

    fn actual_damage(&mut self, event: &DamageEvent, ctx: &mut EffectContext<'_>) {
        let duration =
            parse_argument("poisonOnHit", &self.params.argument, DEFAULT_POISON_DURATION);
        let poison = Poison::new(self.params.strength, duration);
        ctx.world.attach_effect(event.dest, Box::new(poison));
    }
}

// === slowOnHit ===

/// Slows the target by `strength` percent.
#[derive(Clone, Debug, Default)]
pub struct SlowOnHit {
    params: EffectParams,
}

impl SlowOnHit {
    pub fn new(strength: f32) -> Self {
        Self {
            params: EffectParams::new(strength, ""),
        }
    }

    /// Speed multiplier applied to the target.
    pub fn factor(&self) -> f32 {
        (1.0 - self.params.strength / 100.0).clamp(0.0, 1.0)
    }
}

impl Effect for SlowOnHit {
    fn canonical_name(&self) -> &'static str {
        "slowOnHit"
    }

    fn categories(&self) -> CategorySet {
        enemy_damaged()
    }

    effect_params!();

    fn as_enemy_damaged(&mut self) -> Option<&mut dyn EnemyDamagedEffect> {
        Some(self)
    }
}

impl EnemyDamagedEffect for SlowOnHit {
    fn expected_damage(&mut self, _event: &mut DamageEvent, _ctx: &mut EffectContext<'_>) {}

    fn actual_damage(&mut self, event: &DamageEvent, ctx: &mut EffectContext<'_>) {
        ctx.world.slow(event.dest, self.factor());
    }
}

// === limitedAmmo ===

/// A tower with `strength` shots. Each landed hit spends one; the last
/// one reports depletion to the world. Also exposes the remaining count as
/// the `ammo` property.
#[derive(Clone, Debug, Default)]
pub struct LimitedAmmo {
    params: EffectParams,
    remaining: u32,
}

impl LimitedAmmo {
    pub fn new(shots: u32) -> Self {
        Self {
            params: EffectParams::new(shots as f32, ""),
            remaining: shots,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Effect for LimitedAmmo {
    fn canonical_name(&self) -> &'static str {
        "limitedAmmo"
    }

    fn display_name(&self) -> String {
        format!("Ammo {}/{}", self.remaining, self.params.strength)
    }

    fn categories(&self) -> CategorySet {
        enemy_damaged().with(EffectCategory::Property)
    }

    effect_params!();

    fn set_strength(&mut self, strength: f32) {
        self.params.strength = strength;
        self.remaining = strength.max(0.0).round() as u32;
    }

    fn as_enemy_damaged(&mut self) -> Option<&mut dyn EnemyDamagedEffect> {
        Some(self)
    }

    fn as_property(&self) -> Option<&dyn PropertyEffect> {
        Some(self)
    }
}

impl EnemyDamagedEffect for LimitedAmmo {
    fn expected_damage(&mut self, _event: &mut DamageEvent, _ctx: &mut EffectContext<'_>) {}

    fn actual_damage(&mut self, event: &DamageEvent, ctx: &mut EffectContext<'_>) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;
        if self.remaining > 0 {
            return;
        }
        match ctx.host.or(event.source) {
            Some(tower) => ctx.world.ammo_depleted(tower),
            None => warn!(effect = "limitedAmmo", "ammo depleted with no tower to report"),
        }
    }
}

impl PropertyEffect for LimitedAmmo {
    fn contribute(&self, properties: &mut PropertySet) {
        properties.ammo = Some(self.remaining);
    }
}
