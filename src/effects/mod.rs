//! The effect composition and dispatch engine.
//!
//! Cards, towers and enemies carry small declarative effect descriptors
//! (name, strength, argument). This module turns them into live behavior:
//!
//! - [`EffectRegistry`]: canonical name to constructor
//! - [`Effect`]: the polymorphic unit, with checked capability accessors
//! - capability traits ([`InstantEffect`], [`EnemyDamagedEffect`], ...):
//!   one per call site
//! - [`MetaEffect`]: a decorator that gates one inner effect
//! - [`EffectContainer`]: the ordered effects owned by one host
//! - [`ResonanceRegistry`]: tag counts shared across hosts in a session
//!
//! ## Dispatch
//!
//! Unit-returning call sites are described by a [`TriggerEvent`] and go
//! through [`EffectContainer::dispatch`]. Call sites that return a value
//! have dedicated container methods: [`EffectContainer::alter_wave`],
//! [`EffectContainer::expected_damage`] / [`EffectContainer::actual_damage`],
//! [`EffectContainer::find_targets`] and [`EffectContainer::properties`].
//!
//! ## Example
//!
//! ```
//! use rust_td::core::GameRng;
//! use rust_td::effects::{
//!     EffectContainer, EffectContext, EffectDescriptor, EffectRegistry, ResonanceRegistry,
//!     TriggerEvent,
//! };
//! use rust_td::sandbox::Arena;
//!
//! let registry = EffectRegistry::with_builtin();
//! let mut card = EffectContainer::from_descriptors(
//!     &[
//!         EffectDescriptor::with_strength("gainGold", 5.0),
//!         EffectDescriptor::with_strength("drawCards", 2.0),
//!     ],
//!     &registry,
//! );
//!
//! let mut arena = Arena::new();
//! let mut resonance = ResonanceRegistry::new();
//! let mut rng = GameRng::new(42);
//! let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
//! assert_eq!(card.dispatch(&TriggerEvent::Instant, &mut ctx), 2);
//! drop(ctx);
//!
//! assert_eq!(arena.gold(), 5);
//! assert_eq!(arena.cards_drawn(), 2);
//! ```

mod capability;
mod category;
mod container;
mod context;
mod descriptor;
mod dispatch;
mod effect;
mod property;
mod registry;
mod resonance;

pub mod library;
pub mod meta;

pub use capability::{
    AttackEffect, AttackInfo, CardDrawnEffect, DeathEffect, DiscardEffect, EnemyDamagedEffect,
    EveryRoundEffect, InstantEffect, MetaControl, OverchargeEffect, PeriodicEffect,
    PropertyEffect, RankEffect, ReachedGoalEffect, SelfEffect, SourceTrackedEffect, SpawnEffect,
    TargetList, TargetingEffect, UpgradeEffect, WaveEffect,
};
pub use category::{CategorySet, EffectCategory};
pub use container::EffectContainer;
pub use context::{EffectContext, EnemyStats, GameWorld, TowerStat};
pub use descriptor::EffectDescriptor;
pub use dispatch::{dispatch_effect, TriggerEvent};
pub use effect::{parse_argument, try_parse_argument, Effect, EffectParams, NoOpEffect};
pub use library::*;
pub use meta::{
    Cooldown, EveryRound, GatePolicy, LimitedCharges, MetaEffect, OnSpawn, PercentageChance,
    RollRange, ScaleWithDamage, ScaleWithRank, ScaleWithSourceAttack, ScaleWithTime,
};
pub use property::PropertySet;
pub use registry::{EffectConstructor, EffectRegistry};
pub use resonance::ResonanceRegistry;
