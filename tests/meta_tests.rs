//! Meta effect integration tests: gating, forwarding and the cached
//! damage gate.

use std::cell::RefCell;
use std::rc::Rc;

use rust_td::combat::{DamageEvent, DamagePipeline};
use rust_td::core::{EngineConfig, EntityId, GameRng, Position};
use rust_td::effects::{
    CategorySet, Effect, EffectCategory, EffectContainer, EffectContext, EffectDescriptor,
    EffectParams, EffectRegistry, EnemyDamagedEffect, GoldReward, LimitedCharges,
    PercentageChance, ResonanceRegistry, TriggerEvent,
};
use rust_td::sandbox::{Arena, Session};

/// Records which damage phases reached it.
#[derive(Clone, Debug, Default)]
struct PhaseRecorder {
    params: EffectParams,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl Effect for PhaseRecorder {
    fn canonical_name(&self) -> &'static str {
        "phaseRecorder"
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::EnemyDamaged)
    }

    fn params(&self) -> &EffectParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut EffectParams {
        &mut self.params
    }

    fn clone_box(&self) -> Box<dyn Effect> {
        Box::new(self.clone())
    }

    fn as_enemy_damaged(&mut self) -> Option<&mut dyn EnemyDamagedEffect> {
        Some(self)
    }
}

impl EnemyDamagedEffect for PhaseRecorder {
    fn expected_damage(&mut self, _event: &mut DamageEvent, _ctx: &mut EffectContext<'_>) {
        self.log.borrow_mut().push("expected");
    }

    fn actual_damage(&mut self, _event: &DamageEvent, _ctx: &mut EffectContext<'_>) {
        self.log.borrow_mut().push("actual");
    }
}

// =============================================================================
// Sentinel Tests
// =============================================================================

/// Test that a meta effect without an inner never dispatches and is swept.
#[test]
fn test_empty_meta_is_inert() {
    let mut chance = PercentageChance::new(100.0, "");

    assert!(chance.triggers_as(EffectCategory::Meta));
    assert!(!chance.triggers_as(EffectCategory::Instant));
    assert!(chance.as_instant().is_none());
    assert!(chance.should_be_removed());
}

// =============================================================================
// Gate Tests
// =============================================================================

/// Test that chance 0 never fires and chance 100 always fires.
#[test]
fn test_chance_extremes_over_many_trials() {
    for (strength, expected_gold) in [(0.0, 0), (100.0, 1000)] {
        let mut arena = Arena::new();
        let mut resonance = ResonanceRegistry::new();
        let mut rng = GameRng::new(11);
        let mut chance =
            PercentageChance::wrapping(strength, "", Box::new(GoldReward::gain_gold(1.0)));

        let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
        for _ in 0..1000 {
            if let Some(instant) = chance.as_instant() {
                instant.trigger(&mut ctx);
            }
        }
        drop(ctx);

        assert_eq!(arena.gold(), expected_gold, "chance {strength}");
    }
}

/// Test that two charges fire twice, then the meta is removable and closed.
#[test]
fn test_two_charges() {
    let mut arena = Arena::new();
    let mut resonance = ResonanceRegistry::new();
    let mut rng = GameRng::new(1);
    let mut charges = LimitedCharges::wrapping(2.0, "", Box::new(GoldReward::gain_gold(1.0)));

    let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
    for trial in 1..=4 {
        if let Some(instant) = charges.as_instant() {
            instant.trigger(&mut ctx);
        }
        assert_eq!(charges.should_be_removed(), trial >= 2);
    }
    drop(ctx);

    assert_eq!(arena.gold(), 2);
    assert_eq!(charges.policy().remaining(), 0);
}

/// Test that the gate drawn in the expected phase is the one the actual
/// phase uses.
#[test]
fn test_cached_gate_matches_across_phases() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let recorder = PhaseRecorder {
        params: EffectParams::default(),
        log: Rc::clone(&log),
    };
    let mut defender = EffectContainer::new();
    defender.push(Box::new(PercentageChance::wrapping(50.0, "", Box::new(recorder))));

    let mut arena = Arena::new();
    let dest = arena.add_enemy(Position::new(0.0, 0.0), 1000.0, 0.0, 1.0);
    let mut resonance = ResonanceRegistry::new();
    let mut rng = GameRng::new(2024);
    let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);

    let mut opened = 0;
    for _ in 0..200 {
        log.borrow_mut().clear();
        let mut event = DamageEvent::new(5.0, dest).with_source(EntityId::new(99));
        DamagePipeline::expected(&mut event, None, &mut defender, &mut ctx);
        DamagePipeline::actual(&event, None, &mut defender, &mut ctx);

        let phases = log.borrow().clone();
        match phases.as_slice() {
            [] => {}
            ["expected", "actual"] => opened += 1,
            other => panic!("phases diverged: {other:?}"),
        }
    }

    assert!(opened > 0 && opened < 200, "opened {opened} of 200");
}

/// Test that each in-flight attack lands with the gate its own launch drew,
/// whatever order the attacks land in.
#[test]
fn test_gates_follow_their_attack() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let recorder = PhaseRecorder {
        params: EffectParams::default(),
        log: Rc::clone(&log),
    };
    let mut charges = LimitedCharges::wrapping(1.0, "", Box::new(recorder));

    let mut arena = Arena::new();
    let dest = arena.add_enemy(Position::new(0.0, 0.0), 100.0, 0.0, 1.0);
    let mut resonance = ResonanceRegistry::new();
    let mut rng = GameRng::new(8);
    let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);

    let mut first = DamageEvent::new(5.0, dest).with_attack_id(1);
    let mut second = DamageEvent::new(5.0, dest).with_attack_id(2);
    let damaged = charges.as_enemy_damaged().unwrap();
    damaged.expected_damage(&mut first, &mut ctx);
    damaged.expected_damage(&mut second, &mut ctx);
    damaged.actual_damage(&second, &mut ctx);
    damaged.actual_damage(&first, &mut ctx);

    assert_eq!(log.borrow().as_slice(), &["expected", "actual"]);
    assert_eq!(charges.pending_attacks(), 0);
}

/// Test that a single charge spent by one of several simultaneous attacks
/// still fires its side effect when that attack lands.
#[test]
fn test_single_charge_with_simultaneous_attacks() {
    let mut session = Session::new(EngineConfig::default(), 11);
    session.define_enemy("grunt", 100.0, 1.0, &[]);
    session.define_tower(
        "mortar",
        5.0,
        5.0,
        1.0,
        &[
            EffectDescriptor::with_strength("targetAllInRange", 0.0),
            EffectDescriptor::with_strength("limitedCharges", 1.0)
                .wrapping(EffectDescriptor::new("explodeOnHit", 7.0, "1")),
        ],
    );
    session.spawn_enemy("grunt", Position::new(1.0, 0.0));
    session.spawn_enemy("grunt", Position::new(4.0, 0.0));
    let mortar = session.place_tower("mortar", Position::new(0.0, 0.0)).unwrap();

    assert_eq!(session.attack(mortar), 2);
    assert_eq!(session.arena().explosions().len(), 1);
}

/// Test that rank changes reach a scaler even behind a closed chance gate.
#[test]
fn test_rank_passes_closed_gate() {
    let registry = EffectRegistry::with_builtin();
    let descriptor = EffectDescriptor::with_strength("percentageChance", 0.0).wrapping(
        EffectDescriptor::with_strength("scaleWithRank", 1.0)
            .wrapping(EffectDescriptor::with_strength("damagePercent", 10.0)),
    );
    let mut tower = EffectContainer::from_descriptors(&[descriptor], &registry);

    let mut arena = Arena::new();
    let mut resonance = ResonanceRegistry::new();
    let mut rng = GameRng::new(5);
    let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
    tower.dispatch(&TriggerEvent::RankChanged(3), &mut ctx);
    drop(ctx);

    let scaled = tower.iter().next().unwrap().inner_effect().unwrap().inner_effect().unwrap();
    assert_eq!(scaled.strength(), 30.0);
}
