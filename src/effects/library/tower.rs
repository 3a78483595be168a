//! Tower effects: stat boosts and chained attacks.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::EntityId;
use crate::effects::capability::{
    AttackEffect, AttackInfo, OverchargeEffect, PeriodicEffect, SelfEffect, UpgradeEffect,
};
use crate::effects::category::{CategorySet, EffectCategory};
use crate::effects::context::{EffectContext, TowerStat};
use crate::effects::effect::{parse_argument, Effect, EffectParams};

use super::effect_params;

// === Stat boosts ===

/// Adds `strength` to the host tower's stat named by the argument
/// (`damage`, `range` or `fireRate`; anything else falls back to `damage`).
///
/// `statBoost` fires when cast on the tower, `overchargeBoost` when it is
/// overcharged and `upgradeBoost` when it is upgraded.
#[derive(Clone, Debug)]
pub struct TowerStatBoost {
    name: &'static str,
    when: EffectCategory,
    stat: TowerStat,
    params: EffectParams,
}

impl TowerStatBoost {
    fn new(name: &'static str, when: EffectCategory) -> Self {
        Self {
            name,
            when,
            stat: TowerStat::Damage,
            params: EffectParams::default(),
        }
    }

    pub fn stat_boost() -> Self {
        Self::new("statBoost", EffectCategory::SelfCast)
    }

    pub fn overcharge_boost() -> Self {
        Self::new("overchargeBoost", EffectCategory::Overcharge)
    }

    pub fn upgrade_boost() -> Self {
        Self::new("upgradeBoost", EffectCategory::Upgrade)
    }

    pub fn stat(&self) -> TowerStat {
        self.stat
    }

    fn boost(&self, ctx: &mut EffectContext<'_>) {
        let Some(tower) = ctx.host else {
            warn!(effect = self.name, "tower boost dispatched without a host");
            return;
        };
        ctx.world.boost_tower(tower, self.stat, self.params.strength);
    }
}

impl Effect for TowerStatBoost {
    fn canonical_name(&self) -> &'static str {
        self.name
    }

    fn display_name(&self) -> String {
        format!("+{} {:?}", self.params.strength, self.stat)
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(self.when)
    }

    effect_params!();

    fn set_argument(&mut self, argument: &str) {
        self.params.argument = argument.to_string();
        self.stat = parse_argument(self.name, argument, TowerStat::Damage);
    }

    fn as_self_cast(&mut self) -> Option<&mut dyn SelfEffect> {
        if self.when == EffectCategory::SelfCast { Some(self) } else { None }
    }

    fn as_overcharge(&mut self) -> Option<&mut dyn OverchargeEffect> {
        if self.when == EffectCategory::Overcharge { Some(self) } else { None }
    }

    fn as_upgrade(&mut self) -> Option<&mut dyn UpgradeEffect> {
        if self.when == EffectCategory::Upgrade { Some(self) } else { None }
    }
}

impl SelfEffect for TowerStatBoost {
    fn trigger_on_self(&mut self, ctx: &mut EffectContext<'_>) {
        self.boost(ctx);
    }
}

impl OverchargeEffect for TowerStatBoost {
    fn on_overcharge(&mut self, ctx: &mut EffectContext<'_>) {
        self.boost(ctx);
    }
}

impl UpgradeEffect for TowerStatBoost {
    fn on_upgrade(&mut self, ctx: &mut EffectContext<'_>) {
        self.boost(ctx);
    }
}

// === Chain attack ===

/// Seconds between chain hops when the argument is empty or malformed.
pub const DEFAULT_CHAIN_DELAY: f32 = 0.25;

/// Search radius around the last enemy hit for the next hop.
pub const DEFAULT_CHAIN_RADIUS: f32 = 2.0;

#[derive(Clone, Debug)]
struct ChainState {
    current: EntityId,
    damage: f32,
    hops_left: u32,
    timer: f32,
    visited: SmallVec<[EntityId; 8]>,
}

/// `chainAttack`: after each attack, jumps to `strength` further enemies,
/// one every `argument` seconds, dealing the attack's damage to each.
///
/// The hops advance on periodic updates. A new attack replaces a chain
/// still in flight.
#[derive(Clone, Debug)]
pub struct ChainAttack {
    params: EffectParams,
    delay: f32,
    chain: Option<ChainState>,
}

impl Default for ChainAttack {
    fn default() -> Self {
        Self {
            params: EffectParams::default(),
            delay: DEFAULT_CHAIN_DELAY,
            chain: None,
        }
    }
}

impl ChainAttack {
    pub fn new(hops: f32, delay: f32) -> Self {
        Self {
            params: EffectParams::new(hops, delay.to_string()),
            delay,
            chain: None,
        }
    }

    /// Whether hops are still pending.
    pub fn is_chaining(&self) -> bool {
        self.chain.is_some()
    }

    fn hop(&mut self, ctx: &mut EffectContext<'_>) {
        let Some(chain) = self.chain.as_mut() else { return };
        let Some(origin) = ctx.world.position_of(chain.current) else {
            self.chain = None;
            return;
        };
        let next = ctx
            .world
            .entities_in_range(origin, DEFAULT_CHAIN_RADIUS)
            .into_iter()
            .find(|candidate| !chain.visited.contains(candidate));
        let Some(next) = next else {
            debug!(effect = "chainAttack", "chain found no further target");
            self.chain = None;
            return;
        };
        ctx.world.deal_damage(next, chain.damage);
        chain.visited.push(next);
        chain.current = next;
        chain.hops_left -= 1;
        if chain.hops_left == 0 {
            self.chain = None;
        }
    }
}

impl Effect for ChainAttack {
    fn canonical_name(&self) -> &'static str {
        "chainAttack"
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::Attack).with(EffectCategory::Periodic)
    }

    effect_params!();

    fn set_argument(&mut self, argument: &str) {
        self.params.argument = argument.to_string();
        self.delay = parse_argument("chainAttack", argument, DEFAULT_CHAIN_DELAY).max(0.0);
    }

    fn as_attack(&mut self) -> Option<&mut dyn AttackEffect> {
        Some(self)
    }

    fn as_periodic(&mut self) -> Option<&mut dyn PeriodicEffect> {
        Some(self)
    }
}

impl AttackEffect for ChainAttack {
    fn on_attack(&mut self, attack: &AttackInfo, _ctx: &mut EffectContext<'_>) {
        let hops = self.params.strength.round().max(0.0) as u32;
        if hops == 0 {
            return;
        }
        let mut visited = SmallVec::new();
        visited.push(attack.target);
        self.chain = Some(ChainState {
            current: attack.target,
            damage: attack.damage,
            hops_left: hops,
            timer: self.delay,
            visited,
        });
    }
}

impl PeriodicEffect for ChainAttack {
    fn update(&mut self, delta_seconds: f32, ctx: &mut EffectContext<'_>) {
        let mut budget = delta_seconds;
        while let Some(chain) = self.chain.as_mut() {
            if chain.timer > budget {
                chain.timer -= budget;
                return;
            }
            budget -= chain.timer;
            chain.timer = self.delay;
            self.hop(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, Position};
    use crate::effects::ResonanceRegistry;
    use crate::sandbox::Arena;

    #[test]
    fn test_stat_argument_fallback() {
        let mut boost = TowerStatBoost::stat_boost();
        boost.set_argument("range");
        assert_eq!(boost.stat(), TowerStat::Range);
        boost.set_argument("armor");
        assert_eq!(boost.stat(), TowerStat::Damage);
        assert_eq!(boost.argument(), "armor");
    }

    #[test]
    fn test_chain_hops_on_delay() {
        let mut arena = Arena::new();
        let first = arena.add_enemy(Position::new(0.0, 0.0), 20.0, 0.0, 1.0);
        let second = arena.add_enemy(Position::new(1.0, 0.0), 20.0, 0.0, 1.0);
        let third = arena.add_enemy(Position::new(2.0, 0.0), 20.0, 0.0, 1.0);
        let tower = arena.add_tower(Position::new(-3.0, 0.0));
        let mut resonance = ResonanceRegistry::new();
        let mut rng = GameRng::new(1);

        let mut chain = ChainAttack::new(2.0, 0.5);
        let attack = AttackInfo {
            tower,
            target: first,
            damage: 5.0,
        };

        let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
        chain.on_attack(&attack, &mut ctx);
        chain.update(0.25, &mut ctx);
        drop(ctx);
        assert_eq!(arena.health_of(second), Some(20.0));

        let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
        chain.update(0.75, &mut ctx);
        drop(ctx);

        assert_eq!(arena.health_of(first), Some(20.0));
        assert_eq!(arena.health_of(second), Some(15.0));
        assert_eq!(arena.health_of(third), Some(15.0));
        assert!(!chain.is_chaining());
    }
}
