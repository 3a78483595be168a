//! In-memory play field implementing [`GameWorld`].
//!
//! Enemies and towers live in `im::OrdMap`s keyed by entity id, so range
//! queries return entities in id order (spawn order) and the whole field can
//! be snapshotted cheaply. Requests effects make that the arena cannot
//! resolve on its own (attaching effects, spawning enemies by kind) are
//! queued for the owning [`Session`](super::Session).

use im::OrdMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::Vitals;
use crate::core::{EntityId, Position};
use crate::effects::{Effect, EnemyStats, GameWorld, TowerStat};

/// One enemy on the field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    pub kind: String,
    pub position: Position,
    pub vitals: Vitals,
    pub armor: f32,
    pub speed: f32,
}

impl EnemyState {
    pub fn new(kind: impl Into<String>, position: Position, health: f32) -> Self {
        Self {
            kind: kind.into(),
            position,
            vitals: Vitals::new(health),
            armor: 0.0,
            speed: 1.0,
        }
    }

    pub fn stats(&self) -> EnemyStats {
        EnemyStats {
            health: self.vitals.current,
            armor: self.armor,
            speed: self.speed,
        }
    }
}

/// One tower on the field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerState {
    pub kind: String,
    pub position: Position,
    pub damage: f32,
    pub range: f32,
    pub fire_rate: f32,
    pub rank: u32,
    pub out_of_ammo: bool,
}

impl TowerState {
    pub fn new(kind: impl Into<String>, position: Position) -> Self {
        Self {
            kind: kind.into(),
            position,
            damage: 1.0,
            range: 3.0,
            fire_rate: 1.0,
            rank: 1,
            out_of_ammo: false,
        }
    }

    pub fn stat(&self, stat: TowerStat) -> f32 {
        match stat {
            TowerStat::Damage => self.damage,
            TowerStat::Range => self.range,
            TowerStat::FireRate => self.fire_rate,
        }
    }
}

/// An explosion that went off: position, radius and damage.
pub type Explosion = (Position, f32, f32);

/// An enemy spawn requested by an effect: kind and optional position.
pub type SpawnRequest = (String, Option<Position>);

/// The play field plus player resources.
#[derive(Clone, Debug, Default)]
pub struct Arena {
    next_id: u32,
    enemies: OrdMap<EntityId, EnemyState>,
    towers: OrdMap<EntityId, TowerState>,
    gold: i64,
    lives: i64,
    cards_drawn: u32,
    explosions: Vec<Explosion>,
    spawn_requests: Vec<SpawnRequest>,
    depleted: Vec<EntityId>,
    attachments: Vec<(EntityId, Box<dyn Effect>)>,
}

impl Arena {
    /// Empty field, no gold, no lives.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty field with starting resources.
    #[must_use]
    pub fn with_resources(gold: i64, lives: i64) -> Self {
        Self {
            gold,
            lives,
            ..Self::default()
        }
    }

    fn alloc_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    // === Entities ===

    pub fn insert_enemy(&mut self, enemy: EnemyState) -> EntityId {
        let id = self.alloc_id();
        self.enemies.insert(id, enemy);
        id
    }

    /// Add a plain enemy (kind `"enemy"`).
    pub fn add_enemy(&mut self, position: Position, health: f32, armor: f32, speed: f32) -> EntityId {
        let mut enemy = EnemyState::new("enemy", position, health);
        enemy.armor = armor;
        enemy.speed = speed;
        self.insert_enemy(enemy)
    }

    pub fn insert_tower(&mut self, tower: TowerState) -> EntityId {
        let id = self.alloc_id();
        self.towers.insert(id, tower);
        id
    }

    /// Add a tower with default stats (kind `"tower"`).
    pub fn add_tower(&mut self, position: Position) -> EntityId {
        self.insert_tower(TowerState::new("tower", position))
    }

    pub fn enemy(&self, id: EntityId) -> Option<&EnemyState> {
        self.enemies.get(&id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut EnemyState> {
        self.enemies.get_mut(&id)
    }

    pub fn tower(&self, id: EntityId) -> Option<&TowerState> {
        self.towers.get(&id)
    }

    pub fn tower_mut(&mut self, id: EntityId) -> Option<&mut TowerState> {
        self.towers.get_mut(&id)
    }

    pub fn remove_enemy(&mut self, id: EntityId) -> Option<EnemyState> {
        self.enemies.remove(&id)
    }

    pub fn remove_tower(&mut self, id: EntityId) -> Option<TowerState> {
        self.towers.remove(&id)
    }

    /// Every enemy id, including dead ones not yet removed.
    pub fn enemy_ids(&self) -> Vec<EntityId> {
        self.enemies.keys().copied().collect()
    }

    pub fn tower_ids(&self) -> Vec<EntityId> {
        self.towers.keys().copied().collect()
    }

    /// Enemies whose health has run out.
    pub fn dead_enemies(&self) -> Vec<EntityId> {
        self.enemies
            .iter()
            .filter(|(_, enemy)| enemy.vitals.is_dead())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn health_of(&self, id: EntityId) -> Option<f32> {
        self.enemies.get(&id).map(|enemy| enemy.vitals.current)
    }

    // === Resources ===

    pub fn gold(&self) -> i64 {
        self.gold
    }

    pub fn lives(&self) -> i64 {
        self.lives
    }

    pub fn cards_drawn(&self) -> u32 {
        self.cards_drawn
    }

    // === Effect requests ===

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn spawn_requests(&self) -> &[SpawnRequest] {
        &self.spawn_requests
    }

    /// Towers that reported running out of ammo, in order.
    pub fn depleted_towers(&self) -> &[EntityId] {
        &self.depleted
    }

    pub fn take_spawn_requests(&mut self) -> Vec<SpawnRequest> {
        std::mem::take(&mut self.spawn_requests)
    }

    pub fn take_attachments(&mut self) -> Vec<(EntityId, Box<dyn Effect>)> {
        std::mem::take(&mut self.attachments)
    }
}

impl GameWorld for Arena {
    fn entities_in_range(&self, position: Position, radius: f32) -> Vec<EntityId> {
        self.enemies
            .iter()
            .filter(|(_, enemy)| !enemy.vitals.is_doomed() && enemy.position.within(position, radius))
            .map(|(id, _)| *id)
            .collect()
    }

    fn enemies(&self) -> Vec<EntityId> {
        self.enemies
            .iter()
            .filter(|(_, enemy)| !enemy.vitals.is_dead())
            .map(|(id, _)| *id)
            .collect()
    }

    fn position_of(&self, entity: EntityId) -> Option<Position> {
        self.enemies
            .get(&entity)
            .map(|enemy| enemy.position)
            .or_else(|| self.towers.get(&entity).map(|tower| tower.position))
    }

    fn enemy_stats(&self, entity: EntityId) -> Option<EnemyStats> {
        self.enemies.get(&entity).map(EnemyState::stats)
    }

    fn deal_damage(&mut self, entity: EntityId, amount: f32) {
        if let Some(enemy) = self.enemies.get_mut(&entity) {
            enemy.vitals.take_untracked_damage(amount);
        }
    }

    fn heal(&mut self, entity: EntityId, amount: f32) {
        if let Some(enemy) = self.enemies.get_mut(&entity) {
            enemy.vitals.heal(amount);
        }
    }

    fn slow(&mut self, entity: EntityId, factor: f32) {
        if let Some(enemy) = self.enemies.get_mut(&entity) {
            enemy.speed *= factor;
        }
    }

    fn attach_effect(&mut self, entity: EntityId, effect: Box<dyn Effect>) {
        self.attachments.push((entity, effect));
    }

    fn spawn_explosion(&mut self, position: Position, radius: f32, damage: f32) {
        debug!(x = position.x, y = position.y, radius, damage, "explosion");
        self.explosions.push((position, radius, damage));
        for id in self.entities_in_range(position, radius) {
            self.deal_damage(id, damage);
        }
    }

    fn spawn_enemy(&mut self, kind: &str, position: Option<Position>) {
        self.spawn_requests.push((kind.to_string(), position));
    }

    fn draw_cards(&mut self, count: u32) {
        self.cards_drawn += count;
    }

    fn add_gold(&mut self, amount: i64) {
        self.gold += amount;
    }

    fn add_lives(&mut self, amount: i64) {
        self.lives += amount;
    }

    fn boost_tower(&mut self, tower: EntityId, stat: TowerStat, amount: f32) {
        let Some(tower) = self.towers.get_mut(&tower) else { return };
        match stat {
            TowerStat::Damage => tower.damage += amount,
            TowerStat::Range => tower.range += amount,
            TowerStat::FireRate => tower.fire_rate += amount,
        }
    }

    fn ammo_depleted(&mut self, tower: EntityId) {
        if let Some(state) = self.towers.get_mut(&tower) {
            state.out_of_ammo = true;
        }
        self.depleted.push(tower);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_query_order_and_doomed_exclusion() {
        let mut arena = Arena::new();
        let far = arena.add_enemy(Position::new(9.0, 0.0), 10.0, 0.0, 1.0);
        let near = arena.add_enemy(Position::new(1.0, 0.0), 10.0, 0.0, 1.0);
        let doomed = arena.add_enemy(Position::new(0.5, 0.0), 10.0, 0.0, 1.0);
        if let Some(enemy) = arena.enemy_mut(doomed) {
            enemy.vitals.expect_damage(10.0);
        }

        assert_eq!(arena.entities_in_range(Position::new(0.0, 0.0), 2.0), vec![near]);
        assert_eq!(arena.enemies(), vec![far, near, doomed]);
    }

    #[test]
    fn test_explosion_damages_in_radius() {
        let mut arena = Arena::new();
        let hit = arena.add_enemy(Position::new(1.0, 0.0), 10.0, 0.0, 1.0);
        let missed = arena.add_enemy(Position::new(5.0, 0.0), 10.0, 0.0, 1.0);

        arena.spawn_explosion(Position::new(0.0, 0.0), 1.5, 4.0);

        assert_eq!(arena.health_of(hit), Some(6.0));
        assert_eq!(arena.health_of(missed), Some(10.0));
        assert_eq!(arena.explosions().len(), 1);
    }

    #[test]
    fn test_boost_tower() {
        let mut arena = Arena::new();
        let tower = arena.add_tower(Position::new(0.0, 0.0));
        arena.boost_tower(tower, TowerStat::Range, 1.5);
        assert_eq!(arena.tower(tower).map(|t| t.stat(TowerStat::Range)), Some(4.5));
    }
}
