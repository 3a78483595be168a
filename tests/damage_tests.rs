//! Two-phase damage integration tests.

use proptest::prelude::*;

use rust_td::combat::{DamageEvent, DamagePipeline};
use rust_td::core::{EntityId, GameRng, Position};
use rust_td::effects::{
    EffectContainer, EffectContext, EffectDescriptor, EffectRegistry, ResonanceRegistry,
};
use rust_td::sandbox::Arena;

const TOWER: EntityId = EntityId(1000);

fn container(descriptors: &[EffectDescriptor]) -> EffectContainer {
    EffectContainer::from_descriptors(descriptors, &EffectRegistry::with_builtin())
}

/// Launch `damage` from `attacker` at a fresh enemy, returning the expected
/// damage and the arena after the attack landed.
fn resolve(
    damage: f32,
    attacker: &mut EffectContainer,
    defender: &mut EffectContainer,
) -> (f32, Arena) {
    let mut arena = Arena::new();
    let dest = arena.add_enemy(Position::new(4.0, 4.0), 100.0, 0.0, 1.0);
    let mut resonance = ResonanceRegistry::new();
    let mut rng = GameRng::new(9);
    let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);

    let mut event = DamageEvent::new(damage, dest)
        .with_source(TOWER)
        .with_effects(attacker);
    let expected = DamagePipeline::expected(&mut event, Some(&mut *attacker), defender, &mut ctx);
    DamagePipeline::actual(&event, Some(attacker), defender, &mut ctx);
    drop(ctx);
    (expected, arena)
}

// =============================================================================
// Armor Tests
// =============================================================================

proptest! {
    /// Test that armor leaves max(d - a, 1) for incoming damage above 1.
    #[test]
    fn test_armor_formula(damage in 1.01f32..1000.0, armor in 0.0f32..200.0) {
        let mut attacker = EffectContainer::new();
        let mut defender = container(&[EffectDescriptor::with_strength("armor", armor)]);

        let (expected, _) = resolve(damage, &mut attacker, &mut defender);

        prop_assert_eq!(expected, (damage - armor).max(1.0));
    }

    /// Test that armor-piercing attacks ignore armor entirely.
    #[test]
    fn test_armor_pierce(damage in 1.01f32..1000.0, armor in 0.0f32..200.0) {
        let mut attacker = container(&[EffectDescriptor::with_strength("armorPierce", 0.0)]);
        let mut defender = container(&[EffectDescriptor::with_strength("armor", armor)]);

        let (expected, _) = resolve(damage, &mut attacker, &mut defender);

        prop_assert_eq!(expected, damage);
    }
}

/// Test that damage of 1 or less passes armor unchanged.
#[test]
fn test_armor_ignores_chip_damage() {
    let mut attacker = EffectContainer::new();
    let mut defender = container(&[EffectDescriptor::with_strength("armor", 5.0)]);

    let (expected, _) = resolve(0.5, &mut attacker, &mut defender);

    assert_eq!(expected, 0.5);
}

// =============================================================================
// Ordering Tests
// =============================================================================

/// Test that effects in one container run in insertion order.
#[test]
fn test_insertion_order_is_load_bearing() {
    let armor_first = [
        EffectDescriptor::with_strength("armor", 2.0),
        EffectDescriptor::with_strength("damagePercent", 50.0),
    ];
    let percent_first = [armor_first[1].clone(), armor_first[0].clone()];

    let (expected, _) = resolve(10.0, &mut EffectContainer::new(), &mut container(&armor_first));
    assert_eq!(expected, 12.0);

    let (expected, _) = resolve(10.0, &mut EffectContainer::new(), &mut container(&percent_first));
    assert_eq!(expected, 13.0);
}

/// Test that the attacker's effects run before the defender's.
#[test]
fn test_attacker_runs_before_defender() {
    let mut attacker = container(&[EffectDescriptor::with_strength("damagePercent", 100.0)]);
    let mut defender = container(&[EffectDescriptor::with_strength("armor", 5.0)]);

    let (expected, _) = resolve(10.0, &mut attacker, &mut defender);

    assert_eq!(expected, 15.0);
}

// =============================================================================
// Actual Phase Tests
// =============================================================================

/// Test that on-hit side effects happen when the attack lands.
#[test]
fn test_explosion_on_landing() {
    let mut attacker = container(&[EffectDescriptor::new("explodeOnHit", 7.0, "2")]);
    let mut defender = EffectContainer::new();

    let (expected, arena) = resolve(10.0, &mut attacker, &mut defender);

    assert_eq!(expected, 10.0);
    assert_eq!(arena.explosions(), &[(Position::new(4.0, 4.0), 2.0, 7.0)]);
}

/// Test that a malformed explosion radius falls back to the default.
#[test]
fn test_explosion_radius_fallback() {
    let mut attacker = container(&[EffectDescriptor::new("explodeOnHit", 7.0, "wide")]);

    let (_, arena) = resolve(10.0, &mut attacker, &mut EffectContainer::new());

    assert_eq!(arena.explosions()[0].1, 1.0);
}
