//! A play session: type definitions, live hosts and their effect containers.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::combat::{DamageEvent, DamagePipeline};
use crate::core::{EngineConfig, EntityId, GameRng, GameRngState, Position};
use crate::effects::{
    AttackInfo, Effect, EffectContainer, EffectContext, EffectDescriptor, EffectRegistry,
    GameWorld, PropertySet, ResonanceRegistry, TargetList, TriggerEvent,
};
use crate::waves::WaveData;

use super::arena::{Arena, EnemyState, TowerState};

/// Passes of attach/spawn/death resolution before giving up on a cascade.
const MAX_SETTLE_PASSES: usize = 32;

/// An enemy type: base stats plus the effects every instance starts with.
#[derive(Clone, Debug)]
pub struct EnemyTemplate {
    pub health: f32,
    pub speed: f32,
    pub effects: EffectContainer,
}

/// A tower type: base stats plus the effects every instance starts with.
#[derive(Clone, Debug)]
pub struct TowerTemplate {
    pub damage: f32,
    pub range: f32,
    pub fire_rate: f32,
    pub effects: EffectContainer,
}

/// One play session.
///
/// Type definitions are parsed once from descriptors. Every spawned enemy,
/// placed tower and played card gets its own clone of the type's
/// container.
///
/// ## Example
///
/// ```
/// use rust_td::core::{EngineConfig, Position};
/// use rust_td::effects::EffectDescriptor;
/// use rust_td::sandbox::Session;
///
/// let mut session = Session::new(EngineConfig::default(), 7);
/// session.define_enemy("grunt", 20.0, 1.0, &[EffectDescriptor::with_strength("armor", 2.0)]);
/// session.define_tower("archer", 5.0, 4.0, 1.0, &[]);
///
/// let grunt = session.spawn_enemy("grunt", Position::new(1.0, 0.0)).unwrap();
/// let archer = session.place_tower("archer", Position::new(0.0, 0.0)).unwrap();
///
/// assert_eq!(session.attack(archer), 1);
/// assert_eq!(session.arena().health_of(grunt), Some(17.0));
/// ```
#[derive(Debug)]
pub struct Session {
    config: EngineConfig,
    registry: EffectRegistry,
    arena: Arena,
    resonance: ResonanceRegistry,
    rng: GameRng,
    enemy_types: FxHashMap<String, EnemyTemplate>,
    tower_types: FxHashMap<String, TowerTemplate>,
    card_types: FxHashMap<String, EffectContainer>,
    containers: FxHashMap<EntityId, EffectContainer>,
    round: u32,
    die_roll: Option<i32>,
    next_attack: u64,
}

impl Session {
    /// Create a session with the built-in effect registry.
    #[must_use]
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        Self::with_registry(config, seed, EffectRegistry::with_builtin())
    }

    /// Create a session with a custom effect registry.
    #[must_use]
    pub fn with_registry(config: EngineConfig, seed: u64, registry: EffectRegistry) -> Self {
        Self {
            arena: Arena::with_resources(config.starting_gold, config.starting_lives),
            config,
            registry,
            resonance: ResonanceRegistry::new(),
            rng: GameRng::new(seed),
            enemy_types: FxHashMap::default(),
            tower_types: FxHashMap::default(),
            card_types: FxHashMap::default(),
            containers: FxHashMap::default(),
            round: 0,
            die_roll: None,
            next_attack: 1,
        }
    }

    // === Accessors ===

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn resonance(&self) -> &ResonanceRegistry {
        &self.resonance
    }

    /// Checkpoint of the session's random stream.
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Effects of a live host.
    pub fn container(&self, entity: EntityId) -> Option<&EffectContainer> {
        self.containers.get(&entity)
    }

    pub fn container_mut(&mut self, entity: EntityId) -> Option<&mut EffectContainer> {
        self.containers.get_mut(&entity)
    }

    /// Aggregated properties of a live host.
    pub fn properties(&self, entity: EntityId) -> PropertySet {
        self.containers
            .get(&entity)
            .map(EffectContainer::properties)
            .unwrap_or_default()
    }

    /// Aggregated properties of a card type.
    pub fn card_properties(&self, card: &str) -> Option<PropertySet> {
        self.card_types.get(card).map(EffectContainer::properties)
    }

    /// Roll a die; range-gated effects see the roll until the next one.
    pub fn roll_die(&mut self, sides: u32) -> i32 {
        let roll = self.rng.roll_die(sides);
        self.die_roll = Some(roll);
        roll
    }

    pub fn set_die_roll(&mut self, roll: Option<i32>) {
        self.die_roll = roll;
    }

    // === Type definitions ===

    fn parse(&self, descriptors: &[EffectDescriptor]) -> EffectContainer {
        let mut container = EffectContainer::from_config(&self.config);
        for effect in self.registry.create_all(descriptors) {
            container.push(effect);
        }
        container
    }

    pub fn define_enemy(
        &mut self,
        kind: &str,
        health: f32,
        speed: f32,
        descriptors: &[EffectDescriptor],
    ) {
        let effects = self.parse(descriptors);
        self.enemy_types.insert(
            kind.to_string(),
            EnemyTemplate {
                health,
                speed,
                effects,
            },
        );
    }

    pub fn define_tower(
        &mut self,
        kind: &str,
        damage: f32,
        range: f32,
        fire_rate: f32,
        descriptors: &[EffectDescriptor],
    ) {
        let effects = self.parse(descriptors);
        self.tower_types.insert(
            kind.to_string(),
            TowerTemplate {
                damage,
                range,
                fire_rate,
                effects,
            },
        );
    }

    pub fn define_card(&mut self, name: &str, descriptors: &[EffectDescriptor]) {
        let effects = self.parse(descriptors);
        self.card_types.insert(name.to_string(), effects);
    }

    // === Hosts ===

    /// Spawn an enemy of a defined kind and fire its spawn effects.
    pub fn spawn_enemy(&mut self, kind: &str, position: Position) -> Option<EntityId> {
        let Some(template) = self.enemy_types.get(kind) else {
            warn!(kind, "spawn of undefined enemy kind");
            return None;
        };
        let effects = template.effects.clone();
        let mut enemy = EnemyState::new(kind, position, template.health);
        enemy.speed = template.speed;
        enemy.armor = effects.total_strength("armor");

        let id = self.arena.insert_enemy(enemy);
        self.containers.insert(id, effects);
        debug!(%id, kind, "enemy spawned");
        self.dispatch_to(id, TriggerEvent::Spawned);
        Some(id)
    }

    /// Place a tower of a defined kind and fire its spawn effects.
    pub fn place_tower(&mut self, kind: &str, position: Position) -> Option<EntityId> {
        let Some(template) = self.tower_types.get(kind) else {
            warn!(kind, "placement of undefined tower kind");
            return None;
        };
        let effects = template.effects.clone();
        let mut tower = TowerState::new(kind, position);
        tower.damage = template.damage;
        tower.range = template.range;
        tower.fire_rate = template.fire_rate;

        let id = self.arena.insert_tower(tower);
        self.containers.insert(id, effects);
        self.dispatch_to(id, TriggerEvent::Spawned);
        Some(id)
    }

    /// Attach a clone of `effect` to a live host.
    pub fn attach(&mut self, entity: EntityId, effect: &dyn Effect) -> bool {
        match self.containers.get_mut(&entity) {
            Some(container) => {
                container.attach(effect);
                true
            }
            None => false,
        }
    }

    // === Dispatch ===

    fn dispatch_to(&mut self, entity: EntityId, event: TriggerEvent) -> usize {
        let Some(container) = self.containers.get_mut(&entity) else { return 0 };
        let mut ctx = EffectContext::new(&mut self.arena, &mut self.resonance, &mut self.rng)
            .with_host(entity);
        ctx.die_roll = self.die_roll;
        container.dispatch(&event, &mut ctx)
    }

    fn sorted_hosts(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.containers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Advance every host by `delta_seconds`: periodic effects, cleanup
    /// cadence, then attachments, spawns and deaths.
    ///
    /// Returns how many expired effects were swept.
    pub fn update(&mut self, delta_seconds: f32) -> usize {
        let mut swept = 0;
        for id in self.sorted_hosts() {
            self.dispatch_to(id, TriggerEvent::Periodic(delta_seconds));
            if let Some(container) = self.containers.get_mut(&id) {
                if container.cleanup_due() {
                    let mut ctx =
                        EffectContext::new(&mut self.arena, &mut self.resonance, &mut self.rng)
                            .with_host(id);
                    container.release_expired(&mut ctx);
                }
                swept += container.tick();
            }
        }
        self.settle();
        swept
    }

    /// Start the next round and fire every per-round effect.
    pub fn start_round(&mut self) -> u32 {
        self.round += 1;
        for id in self.sorted_hosts() {
            self.dispatch_to(id, TriggerEvent::Round(self.round));
        }
        self.settle();
        self.round
    }

    // === Combat ===

    /// Targets for a tower: its targeting effects, or the first enemy in
    /// range when it has none.
    pub fn find_targets(&mut self, tower: EntityId) -> TargetList {
        let Some(state) = self.arena.tower(tower) else { return TargetList::new() };
        let (position, range) = (state.position, state.range);

        if let Some(container) = self.containers.get_mut(&tower) {
            let mut ctx = EffectContext::new(&mut self.arena, &mut self.resonance, &mut self.rng)
                .with_host(tower);
            ctx.die_roll = self.die_roll;
            if let Some(targets) = container.find_targets(position, range, &mut ctx) {
                return targets;
            }
        }
        self.arena
            .entities_in_range(position, range)
            .into_iter()
            .take(1)
            .collect()
    }

    /// Launch an attack: runs the expected phase and lowers the target's
    /// expected health. Returns the event to land later.
    pub fn launch_attack(&mut self, tower: EntityId, target: EntityId) -> Option<DamageEvent> {
        let damage = self.arena.tower(tower)?.damage;
        self.arena.enemy(target)?;

        let mut attacker = self.containers.remove(&tower).unwrap_or_default();
        let mut defender = self.containers.remove(&target).unwrap_or_default();
        let attack_id = self.next_attack;
        self.next_attack += 1;
        let mut event = DamageEvent::new(damage, target)
            .with_source(tower)
            .with_effects(&attacker)
            .with_attack_id(attack_id);

        let mut ctx = EffectContext::new(&mut self.arena, &mut self.resonance, &mut self.rng);
        ctx.die_roll = self.die_roll;
        let expected = DamagePipeline::expected(&mut event, Some(&mut attacker), &mut defender, &mut ctx);
        let info = AttackInfo {
            tower,
            target,
            damage: expected,
        };
        ctx.with_host_scope(Some(tower), |ctx| {
            attacker.dispatch(&TriggerEvent::Attack(info), ctx)
        });
        drop(ctx);

        if let Some(enemy) = self.arena.enemy_mut(target) {
            enemy.vitals.expect_damage(expected);
        }
        self.containers.insert(tower, attacker);
        self.containers.insert(target, defender);
        Some(event)
    }

    /// Land a launched attack: runs the actual phase and applies the damage.
    pub fn land_attack(&mut self, event: &DamageEvent) {
        if self.arena.enemy(event.dest).is_none() {
            debug!(dest = %event.dest, "attack landed on a removed enemy");
            return;
        }
        let mut attacker = event.source.and_then(|source| self.containers.remove(&source));
        let mut defender = self.containers.remove(&event.dest).unwrap_or_default();

        let mut ctx = EffectContext::new(&mut self.arena, &mut self.resonance, &mut self.rng);
        ctx.die_roll = self.die_roll;
        DamagePipeline::actual(event, attacker.as_mut(), &mut defender, &mut ctx);
        drop(ctx);

        if let Some(enemy) = self.arena.enemy_mut(event.dest) {
            enemy.vitals.take_damage(event.raw_damage);
        }
        if let (Some(source), Some(attacker)) = (event.source, attacker) {
            self.containers.insert(source, attacker);
        }
        self.containers.insert(event.dest, defender);
        self.settle();
    }

    /// Fire at every target the tower finds, landing immediately.
    ///
    /// Returns the number of hits. Towers out of ammo do not fire.
    pub fn attack(&mut self, tower: EntityId) -> usize {
        if self.arena.tower(tower).is_some_and(|state| state.out_of_ammo) {
            return 0;
        }
        let targets = self.find_targets(tower);
        let events: Vec<DamageEvent> = targets
            .iter()
            .filter_map(|&target| self.launch_attack(tower, target))
            .collect();
        for event in &events {
            self.land_attack(event);
        }
        events.len()
    }

    /// An enemy reached the goal: costs one life plus its goal effects,
    /// then the enemy leaves without dying.
    pub fn enemy_reached_goal(&mut self, enemy: EntityId) {
        if self.arena.enemy(enemy).is_none() {
            return;
        }
        self.arena.add_lives(-1);
        self.dispatch_to(enemy, TriggerEvent::ReachedGoal(enemy));
        self.remove_host(enemy);
        self.settle();
    }

    /// Drop a host's container after releasing its shared registrations,
    /// then remove the enemy from the field.
    fn remove_host(&mut self, entity: EntityId) {
        if let Some(mut container) = self.containers.remove(&entity) {
            let mut ctx = EffectContext::new(&mut self.arena, &mut self.resonance, &mut self.rng)
                .with_host(entity);
            container.release(&mut ctx);
        }
        self.arena.remove_enemy(entity);
    }

    fn kill(&mut self, enemy: EntityId) {
        self.dispatch_to(enemy, TriggerEvent::Death);
        self.remove_host(enemy);
        debug!(%enemy, "enemy died");
    }

    /// Resolve what effects asked the world for: attachments, spawns and
    /// deaths, until nothing new happens.
    fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_PASSES {
            let attachments = self.arena.take_attachments();
            let spawns = self.arena.take_spawn_requests();
            let dead = self.arena.dead_enemies();
            if attachments.is_empty() && spawns.is_empty() && dead.is_empty() {
                return;
            }
            for (entity, effect) in attachments {
                if let Some(container) = self.containers.get_mut(&entity) {
                    container.push(effect);
                }
            }
            for (kind, position) in spawns {
                self.spawn_enemy(&kind, position.unwrap_or_default());
            }
            for enemy in dead {
                self.kill(enemy);
            }
        }
        warn!("effect cascade did not settle");
    }

    // === Towers ===

    /// Upgrade a tower unless its properties forbid it.
    pub fn upgrade_tower(&mut self, tower: EntityId) -> bool {
        if self.properties(tower).upgrade_forbidden {
            return false;
        }
        let Some(state) = self.arena.tower_mut(tower) else { return false };
        state.rank += 1;
        let rank = state.rank;
        self.dispatch_to(tower, TriggerEvent::Upgrade);
        self.dispatch_to(tower, TriggerEvent::RankChanged(rank));
        true
    }

    pub fn overcharge_tower(&mut self, tower: EntityId) -> usize {
        self.dispatch_to(tower, TriggerEvent::Overcharge)
    }

    /// Set a host's rank and rescale rank effects.
    pub fn set_rank(&mut self, entity: EntityId, rank: u32) -> usize {
        if let Some(tower) = self.arena.tower_mut(entity) {
            tower.rank = rank;
        }
        self.dispatch_to(entity, TriggerEvent::RankChanged(rank))
    }

    /// The attack stat of whatever applied effects to `entity` changed.
    pub fn set_source_attack(&mut self, entity: EntityId, attack: f32) -> usize {
        self.dispatch_to(entity, TriggerEvent::SourceAttackChanged(attack))
    }

    /// Cast a card's self effects onto a host.
    pub fn cast_on(&mut self, card: &str, host: EntityId) -> Option<usize> {
        self.run_card(card, TriggerEvent::SelfCast, Some(host))
    }

    // === Cards ===

    fn run_card(&mut self, card: &str, event: TriggerEvent, host: Option<EntityId>) -> Option<usize> {
        let Some(template) = self.card_types.get(card) else {
            warn!(card, "undefined card");
            return None;
        };
        let mut effects = template.clone();
        let die_roll = self.die_roll.or(effects.properties().die_roll);

        let mut ctx = EffectContext::new(&mut self.arena, &mut self.resonance, &mut self.rng);
        ctx.host = host;
        ctx.die_roll = die_roll;
        let delivered = effects.dispatch(&event, &mut ctx);
        drop(ctx);

        self.settle();
        Some(delivered)
    }

    /// Play a card: instant effects fire, then self effects on `target`.
    pub fn play_card(&mut self, card: &str, target: Option<EntityId>) -> Option<usize> {
        let mut delivered = self.run_card(card, TriggerEvent::Instant, None)?;
        if let Some(target) = target {
            delivered += self.run_card(card, TriggerEvent::SelfCast, Some(target))?;
        }
        Some(delivered)
    }

    pub fn discard_card(&mut self, card: &str) -> Option<usize> {
        self.run_card(card, TriggerEvent::Discard, None)
    }

    pub fn draw_card(&mut self, card: &str) -> Option<usize> {
        self.run_card(card, TriggerEvent::CardDrawn, None)
    }

    // === Waves ===

    /// Thread a wave through the wave effects of `cards`, in order.
    pub fn alter_wave(&mut self, wave: WaveData, cards: &[&str]) -> WaveData {
        let mut wave = wave;
        for card in cards {
            let Some(template) = self.card_types.get(*card) else {
                warn!(card, "undefined card");
                continue;
            };
            let mut effects = template.clone();
            let mut ctx = EffectContext::new(&mut self.arena, &mut self.resonance, &mut self.rng);
            wave = effects.alter_wave(wave, &mut ctx);
        }
        wave
    }

    /// Spawn every enemy of a wave at `position`.
    pub fn spawn_wave(&mut self, wave: &WaveData, position: Position) -> Vec<EntityId> {
        (0..wave.spawn_count)
            .filter_map(|_| self.spawn_enemy(&wave.enemy_type, position))
            .collect()
    }
}
