//! Dispatch context and the outbound world interface.
//!
//! Effects never own the entities they act on. Every capability call gets
//! an `EffectContext` holding the collaborators for the current session:
//! the world, the resonance registry, the rng, the host being dispatched
//! and the current die roll.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, GameRng, Position};

use super::effect::Effect;
use super::resonance::ResonanceRegistry;

/// Snapshot of an enemy's combat stats, used by targeting policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub health: f32,
    pub armor: f32,
    pub speed: f32,
}

/// Tower stats effects can boost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TowerStat {
    Damage,
    Range,
    FireRate,
}

impl std::str::FromStr for TowerStat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "damage" => Ok(TowerStat::Damage),
            "range" => Ok(TowerStat::Range),
            "fireRate" => Ok(TowerStat::FireRate),
            other => Err(format!("unknown tower stat `{other}`")),
        }
    }
}

/// The game world as seen by effects.
///
/// Implemented by whatever owns entities (a scene, a simulation, the
/// [`sandbox`](crate::sandbox)). Range queries return entities in a stable
/// order and exclude enemies whose expected health is already exhausted.
pub trait GameWorld {
    /// Live enemies within `radius` of `position`, in the world's order.
    fn entities_in_range(&self, position: Position, radius: f32) -> Vec<EntityId>;

    /// Every live enemy, in the world's order.
    fn enemies(&self) -> Vec<EntityId>;

    fn position_of(&self, entity: EntityId) -> Option<Position>;

    fn enemy_stats(&self, entity: EntityId) -> Option<EnemyStats>;

    /// Damage outside the two-phase protocol (poison ticks, explosions).
    fn deal_damage(&mut self, entity: EntityId, amount: f32);

    fn heal(&mut self, entity: EntityId, amount: f32);

    /// Multiply an enemy's speed by `factor`.
    fn slow(&mut self, entity: EntityId, factor: f32);

    /// Attach an effect to an entity's container.
    fn attach_effect(&mut self, entity: EntityId, effect: Box<dyn Effect>);

    fn spawn_explosion(&mut self, position: Position, radius: f32, damage: f32);

    fn spawn_enemy(&mut self, kind: &str, position: Option<Position>);

    fn draw_cards(&mut self, count: u32);

    fn add_gold(&mut self, amount: i64);

    fn add_lives(&mut self, amount: i64);

    fn boost_tower(&mut self, tower: EntityId, stat: TowerStat, amount: f32);

    /// A tower with limited ammo fired its last shot.
    fn ammo_depleted(&mut self, tower: EntityId);
}

/// Collaborators for one dispatch.
pub struct EffectContext<'a> {
    pub world: &'a mut dyn GameWorld,
    pub resonance: &'a mut ResonanceRegistry,
    pub rng: &'a mut GameRng,
    /// The entity whose container is being dispatched.
    pub host: Option<EntityId>,
    /// Die roll shared by range-gated effects this dispatch.
    pub die_roll: Option<i32>,
}

impl<'a> EffectContext<'a> {
    /// Create a context with no host and no die roll.
    pub fn new(
        world: &'a mut dyn GameWorld,
        resonance: &'a mut ResonanceRegistry,
        rng: &'a mut GameRng,
    ) -> Self {
        Self {
            world,
            resonance,
            rng,
            host: None,
            die_roll: None,
        }
    }

    /// Set the host (builder pattern).
    #[must_use]
    pub fn with_host(mut self, host: EntityId) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the die roll (builder pattern).
    #[must_use]
    pub fn with_die_roll(mut self, roll: i32) -> Self {
        self.die_roll = Some(roll);
        self
    }

    /// Run `f` with `host` as the current host, restoring the previous one.
    pub fn with_host_scope<R>(
        &mut self,
        host: Option<EntityId>,
        f: impl FnOnce(&mut EffectContext<'a>) -> R,
    ) -> R {
        let previous = std::mem::replace(&mut self.host, host);
        let result = f(self);
        self.host = previous;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tower_stat_parse() {
        assert_eq!("range".parse::<TowerStat>(), Ok(TowerStat::Range));
        assert!("armor".parse::<TowerStat>().is_err());
    }
}
