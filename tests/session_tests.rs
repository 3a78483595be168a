//! Session integration tests: every call site driven end to end.

use proptest::prelude::*;

use rust_td::core::{EngineConfig, Position};
use rust_td::effects::{EffectDescriptor, EffectRegistry, GameWorld};
use rust_td::sandbox::Session;
use rust_td::waves::WaveData;

fn session(cleanup_interval: u32) -> Session {
    let config = EngineConfig::default()
        .with_cleanup_interval(cleanup_interval)
        .with_starting_gold(0);
    Session::new(config, 42)
}

// =============================================================================
// Periodic Tests
// =============================================================================

/// Test the poison scenario: 5/s for 3s takes 100 to 85, then the poison
/// is removed and a fourth tick does nothing.
#[test]
fn test_poison_scenario() {
    let mut session = session(1);
    session.define_enemy("grunt", 100.0, 1.0, &[]);
    let grunt = session.spawn_enemy("grunt", Position::new(0.0, 0.0)).unwrap();

    let poison = EffectRegistry::with_builtin()
        .create(&EffectDescriptor::new("poison", 5.0, "3"))
        .unwrap();
    assert!(session.attach(grunt, poison.as_ref()));

    let mut swept = 0;
    for expected in [95.0, 90.0, 85.0] {
        swept += session.update(1.0);
        assert_eq!(session.arena().health_of(grunt), Some(expected));
    }
    assert_eq!(swept, 1);
    assert!(session.container(grunt).unwrap().is_empty());

    session.update(1.0);
    assert_eq!(session.arena().health_of(grunt), Some(85.0));
}

/// Test that poison applied on hit is attached to the target and ticks.
#[test]
fn test_poison_on_hit() {
    let mut session = session(1);
    session.define_enemy("grunt", 100.0, 1.0, &[]);
    session.define_tower("venom", 1.0, 3.0, 1.0, &[EffectDescriptor::new("poisonOnHit", 2.0, "2")]);
    let grunt = session.spawn_enemy("grunt", Position::new(1.0, 0.0)).unwrap();
    let venom = session.place_tower("venom", Position::new(0.0, 0.0)).unwrap();

    assert_eq!(session.attack(venom), 1);
    assert_eq!(session.container(grunt).unwrap().names(), vec!["poison"]);

    session.update(1.0);
    session.update(1.0);
    assert_eq!(session.arena().health_of(grunt), Some(95.0));
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

proptest! {
    /// Test that N spawns and M deaths leave a resonance count of N - M.
    #[test]
    fn test_resonance_count(counts in (0u32..10).prop_flat_map(|n| (Just(n), 0..=n))) {
        let (spawned, killed) = counts;
        let mut session = session(10);
        session.define_enemy("drone", 1.0, 1.0, &[EffectDescriptor::new("resonance", 10.0, "hive")]);

        let drones: Vec<_> = (0..spawned)
            .filter_map(|i| session.spawn_enemy("drone", Position::new(i as f32, 0.0)))
            .collect();
        for drone in drones.iter().take(killed as usize) {
            session.arena_mut().deal_damage(*drone, 5.0);
        }
        session.update(0.0);

        prop_assert_eq!(session.resonance().count("hive"), spawned - killed);
    }
}

/// Test that other holders of a tag reduce the damage a host takes.
#[test]
fn test_resonance_reduces_damage() {
    let mut session = session(10);
    session.define_enemy("drone", 100.0, 1.0, &[EffectDescriptor::new("resonance", 25.0, "hive")]);
    session.define_tower("archer", 10.0, 3.0, 1.0, &[]);
    let drone = session.spawn_enemy("drone", Position::new(1.0, 0.0)).unwrap();
    session.spawn_enemy("drone", Position::new(50.0, 0.0));
    session.spawn_enemy("drone", Position::new(60.0, 0.0));
    let archer = session.place_tower("archer", Position::new(0.0, 0.0)).unwrap();

    session.attack(archer);

    assert_eq!(session.arena().health_of(drone), Some(95.0));
}

/// Test death rewards and spawns.
#[test]
fn test_death_hooks() {
    let mut session = session(10);
    session.define_enemy("spiderling", 5.0, 2.0, &[]);
    session.define_enemy(
        "brood",
        10.0,
        1.0,
        &[
            EffectDescriptor::with_strength("goldOnDeath", 7.0),
            EffectDescriptor::new("spawnOnDeath", 2.0, "spiderling"),
        ],
    );
    session.define_tower("cannon", 50.0, 3.0, 1.0, &[]);
    let brood = session.spawn_enemy("brood", Position::new(1.0, 1.0)).unwrap();
    let cannon = session.place_tower("cannon", Position::new(0.0, 0.0)).unwrap();

    session.attack(cannon);

    assert!(session.arena().enemy(brood).is_none());
    assert_eq!(session.arena().gold(), 7);
    let kinds: Vec<_> = session
        .arena()
        .enemy_ids()
        .into_iter()
        .filter_map(|id| session.arena().enemy(id).map(|enemy| enemy.kind.clone()))
        .collect();
    assert_eq!(kinds, vec!["spiderling", "spiderling"]);
}

/// Test that reaching the goal costs lives and is not a death.
#[test]
fn test_reached_goal() {
    let mut session = session(10);
    session.define_enemy(
        "thief",
        10.0,
        1.0,
        &[
            EffectDescriptor::with_strength("extraLifeLoss", 2.0),
            EffectDescriptor::with_strength("goldOnDeath", 5.0),
            EffectDescriptor::new("resonance", 10.0, "guild"),
        ],
    );
    let thief = session.spawn_enemy("thief", Position::new(0.0, 0.0)).unwrap();
    assert_eq!(session.resonance().count("guild"), 1);

    session.enemy_reached_goal(thief);

    assert_eq!(session.arena().lives(), 17);
    assert_eq!(session.arena().gold(), 0);
    assert_eq!(session.resonance().count("guild"), 0);
    assert!(session.container(thief).is_none());
}

/// Test that a gated resonance registered on spawn is released when its
/// host reaches the goal.
#[test]
fn test_reached_goal_releases_wrapped_resonance() {
    let mut session = session(10);
    session.define_enemy(
        "drone",
        10.0,
        1.0,
        &[EffectDescriptor::with_strength("percentageChance", 100.0)
            .wrapping(EffectDescriptor::new("resonance", 10.0, "hive"))],
    );
    let drone = session.spawn_enemy("drone", Position::new(0.0, 0.0)).unwrap();
    assert_eq!(session.resonance().count("hive"), 1);

    session.enemy_reached_goal(drone);

    assert_eq!(session.resonance().count("hive"), 0);
}

/// Test that a resonance attached after spawn never registered, so its host
/// leaving does not lower another holder's count.
#[test]
fn test_late_resonance_leaves_count_alone() {
    let mut session = session(10);
    session.define_enemy("drone", 10.0, 1.0, &[EffectDescriptor::new("resonance", 10.0, "hive")]);
    session.define_enemy("grunt", 10.0, 1.0, &[]);
    session.spawn_enemy("drone", Position::new(0.0, 0.0));
    let grunt = session.spawn_enemy("grunt", Position::new(1.0, 0.0)).unwrap();

    let resonance = EffectRegistry::with_builtin()
        .create(&EffectDescriptor::new("resonance", 10.0, "hive"))
        .unwrap();
    assert!(session.attach(grunt, resonance.as_ref()));
    session.enemy_reached_goal(grunt);

    assert_eq!(session.resonance().count("hive"), 1);
}

/// Test that death releases a resonance even when its gate has closed.
#[test]
fn test_death_releases_resonance_behind_closed_gate() {
    let mut session = session(10);
    session.define_enemy(
        "drone",
        1.0,
        1.0,
        &[EffectDescriptor::with_strength("limitedCharges", 1.0)
            .wrapping(EffectDescriptor::new("resonance", 10.0, "hive"))],
    );
    let drone = session.spawn_enemy("drone", Position::new(0.0, 0.0)).unwrap();
    assert_eq!(session.resonance().count("hive"), 1);

    session.arena_mut().deal_damage(drone, 5.0);
    session.update(0.0);

    assert!(session.arena().enemy(drone).is_none());
    assert_eq!(session.resonance().count("hive"), 0);
}

/// Test that sweeping an expired effect releases its registration.
#[test]
fn test_sweep_releases_expired_resonance() {
    let mut session = session(1);
    session.define_enemy(
        "drone",
        10.0,
        1.0,
        &[EffectDescriptor::with_strength("limitedCharges", 1.0)
            .wrapping(EffectDescriptor::new("resonance", 10.0, "hive"))],
    );
    let drone = session.spawn_enemy("drone", Position::new(0.0, 0.0)).unwrap();
    assert_eq!(session.resonance().count("hive"), 1);

    assert_eq!(session.update(0.0), 1);

    assert!(session.container(drone).unwrap().is_empty());
    assert_eq!(session.resonance().count("hive"), 0);
}

// =============================================================================
// Combat Tests
// =============================================================================

/// Test that a tower stops firing once its ammo runs out.
#[test]
fn test_limited_ammo() {
    let mut session = session(10);
    session.define_enemy("grunt", 100.0, 1.0, &[]);
    session.define_tower("musket", 1.0, 3.0, 1.0, &[EffectDescriptor::with_strength("limitedAmmo", 2.0)]);
    session.spawn_enemy("grunt", Position::new(1.0, 0.0));
    let musket = session.place_tower("musket", Position::new(0.0, 0.0)).unwrap();

    assert_eq!(session.properties(musket).ammo, Some(2));
    assert_eq!(session.attack(musket), 1);
    assert_eq!(session.attack(musket), 1);
    assert_eq!(session.attack(musket), 0);
    assert_eq!(session.arena().depleted_towers(), &[musket]);
}

/// Test that a targeting effect picks every enemy in range.
#[test]
fn test_targeting_effect_used_by_attacks() {
    let mut session = session(10);
    session.define_enemy("grunt", 10.0, 1.0, &[]);
    session.define_tower("mortar", 2.0, 3.0, 1.0, &[EffectDescriptor::with_strength("targetAllInRange", 0.0)]);
    let near = session.spawn_enemy("grunt", Position::new(1.0, 0.0)).unwrap();
    let also_near = session.spawn_enemy("grunt", Position::new(0.0, 2.0)).unwrap();
    let far = session.spawn_enemy("grunt", Position::new(9.0, 0.0)).unwrap();
    let mortar = session.place_tower("mortar", Position::new(0.0, 0.0)).unwrap();

    assert_eq!(session.attack(mortar), 2);
    assert_eq!(session.arena().health_of(near), Some(8.0));
    assert_eq!(session.arena().health_of(also_near), Some(8.0));
    assert_eq!(session.arena().health_of(far), Some(10.0));
}

/// Test that a doomed enemy is no longer targeted while an attack flies.
#[test]
fn test_in_flight_attack_dooms_target() {
    let mut session = session(10);
    session.define_enemy("grunt", 5.0, 1.0, &[]);
    session.define_tower("archer", 5.0, 3.0, 1.0, &[]);
    let grunt = session.spawn_enemy("grunt", Position::new(1.0, 0.0)).unwrap();
    let archer = session.place_tower("archer", Position::new(0.0, 0.0)).unwrap();

    let event = session.launch_attack(archer, grunt).unwrap();
    assert!(session.find_targets(archer).is_empty());

    session.land_attack(&event);
    assert!(session.arena().enemy(grunt).is_none());
}

// =============================================================================
// Card Tests
// =============================================================================

/// Test instant, discard and draw hooks on cards.
#[test]
fn test_card_hooks() {
    let mut session = session(10);
    session.define_card(
        "prospector",
        &[
            EffectDescriptor::with_strength("gainGold", 3.0),
            EffectDescriptor::with_strength("goldOnDiscard", 2.0),
            EffectDescriptor::with_strength("goldOnDraw", 1.0),
            EffectDescriptor::with_strength("drawOnDiscard", 1.0),
        ],
    );

    assert_eq!(session.play_card("prospector", None), Some(1));
    assert_eq!(session.discard_card("prospector"), Some(2));
    assert_eq!(session.draw_card("prospector"), Some(1));

    assert_eq!(session.arena().gold(), 6);
    assert_eq!(session.arena().cards_drawn(), 1);
}

/// Test that a roll-range card only fires on a matching die roll.
#[test]
fn test_roll_range_card() {
    let mut session = session(10);
    session.define_card(
        "gamble",
        &[EffectDescriptor::new("rollRange", 4.0, "6")
            .wrapping(EffectDescriptor::with_strength("gainGold", 10.0))],
    );

    session.set_die_roll(Some(2));
    session.play_card("gamble", None);
    assert_eq!(session.arena().gold(), 0);

    session.set_die_roll(Some(5));
    session.play_card("gamble", None);
    assert_eq!(session.arena().gold(), 10);
}

/// Test that a self-cast card boosts the targeted tower.
#[test]
fn test_self_cast_card() {
    let mut session = session(10);
    session.define_tower("archer", 5.0, 3.0, 1.0, &[]);
    session.define_card("sharpen", &[EffectDescriptor::new("statBoost", 2.0, "damage")]);
    let archer = session.place_tower("archer", Position::new(0.0, 0.0)).unwrap();

    session.play_card("sharpen", Some(archer));

    assert_eq!(session.arena().tower(archer).map(|t| t.damage), Some(7.0));
}

// =============================================================================
// Wave And Round Tests
// =============================================================================

/// Test that wave cards alter the wave in order before it spawns.
#[test]
fn test_wave_alteration() {
    let mut session = session(10);
    session.define_enemy("grunt", 10.0, 1.0, &[]);
    session.define_enemy("ogre", 40.0, 0.5, &[]);
    session.define_card(
        "horde",
        &[
            EffectDescriptor::with_strength("extraSpawns", 2.0),
            EffectDescriptor::with_strength("waveBudget", 50.0),
        ],
    );
    session.define_card("giants", &[EffectDescriptor::new("waveEnemyType", 0.0, "ogre")]);

    let wave = session.alter_wave(WaveData::new("grunt", 100.0, 1), &["horde", "giants"]);
    assert_eq!(wave.spawn_count, 3);
    assert_eq!(wave.budget, 150.0);
    assert_eq!(wave.enemy_type, "ogre");

    let spawned = session.spawn_wave(&wave, Position::new(0.0, 0.0));
    assert_eq!(spawned.len(), 3);
    assert_eq!(session.arena().enemy(spawned[0]).map(|e| e.vitals.max), Some(40.0));
}

/// Test that per-round effects fire once per round.
#[test]
fn test_every_round() {
    let mut session = session(10);
    session.define_tower(
        "mint",
        0.0,
        0.0,
        0.0,
        &[EffectDescriptor::with_strength("everyRound", 0.0)
            .wrapping(EffectDescriptor::with_strength("gainGold", 5.0))],
    );
    session.place_tower("mint", Position::new(0.0, 0.0));

    session.start_round();
    session.start_round();

    assert_eq!(session.round(), 2);
    assert_eq!(session.arena().gold(), 10);
}

// =============================================================================
// Tower Tests
// =============================================================================

/// Test upgrades: boosts fire, rank rises, and forbidden towers refuse.
#[test]
fn test_upgrades() {
    let mut session = session(10);
    session.define_tower("archer", 5.0, 3.0, 1.0, &[EffectDescriptor::new("upgradeBoost", 1.0, "range")]);
    session.define_tower("relic", 5.0, 3.0, 1.0, &[EffectDescriptor::with_strength("upgradeForbidden", 0.0)]);
    let archer = session.place_tower("archer", Position::new(0.0, 0.0)).unwrap();
    let relic = session.place_tower("relic", Position::new(5.0, 0.0)).unwrap();

    assert!(session.upgrade_tower(archer));
    assert!(!session.upgrade_tower(relic));

    let archer_state = session.arena().tower(archer).unwrap();
    assert_eq!(archer_state.rank, 2);
    assert_eq!(archer_state.range, 4.0);
    assert_eq!(session.arena().tower(relic).map(|t| t.rank), Some(1));
}

/// Test that rank changes rescale rank-scaled effects.
#[test]
fn test_rank_scaling() {
    let mut session = session(10);
    session.define_enemy("grunt", 100.0, 1.0, &[]);
    session.define_tower(
        "archer",
        10.0,
        3.0,
        1.0,
        &[EffectDescriptor::with_strength("scaleWithRank", 1.0)
            .wrapping(EffectDescriptor::with_strength("damagePercent", 10.0))],
    );
    let grunt = session.spawn_enemy("grunt", Position::new(1.0, 0.0)).unwrap();
    let archer = session.place_tower("archer", Position::new(0.0, 0.0)).unwrap();

    session.set_rank(archer, 3);
    session.attack(archer);

    assert_eq!(session.arena().health_of(grunt), Some(87.0));
}

/// Test that overcharge effects fire on overcharge.
#[test]
fn test_overcharge() {
    let mut session = session(10);
    session.define_tower("archer", 5.0, 3.0, 1.0, &[EffectDescriptor::new("overchargeBoost", 0.5, "fireRate")]);
    let archer = session.place_tower("archer", Position::new(0.0, 0.0)).unwrap();

    assert_eq!(session.overcharge_tower(archer), 1);
    assert_eq!(session.arena().tower(archer).map(|t| t.fire_rate), Some(1.5));
}
