//! # rust-td
//!
//! An effect composition and dispatch engine for a tower-defense
//! deckbuilder.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven Content**: Cards, towers and enemies are described by
//!    `(name, strength, argument)` effect descriptors, optionally nested.
//!    The engine turns them into live behavior at load time.
//!
//! 2. **Capability Queries**: An effect declares the call sites it reacts
//!    to. Call sites ask a container for the effects that support them and
//!    never downcast to concrete types.
//!
//! 3. **Decorators Over Special Cases**: Chance, charges, cooldowns, roll
//!    ranges, re-triggers and scaling all wrap one inner effect and forward
//!    to it.
//!
//! ## Architecture
//!
//! - **Two-Phase Damage**: An attack's damage is settled when it launches
//!   (expected phase) and its side effects happen when it lands (actual
//!   phase). Only the expected phase may change the damage.
//!
//! - **Host-Owned Containers**: Every spawned enemy, placed tower and played
//!   card gets a deep clone of its type's effects.
//!
//! ## Modules
//!
//! - `core`: Entity IDs, positions, RNG, configuration, errors
//! - `effects`: Registry, effect contract, capabilities, meta effects,
//!   containers, resonance
//! - `combat`: Damage events, vitals, the damage pipeline
//! - `waves`: Wave descriptions altered by wave effects
//! - `sandbox`: In-memory world and session driving every call site

pub mod core;
pub mod effects;
pub mod combat;
pub mod waves;
pub mod sandbox;

// Re-export commonly used types
pub use crate::core::{EffectError, EngineConfig, EntityId, GameRng, GameRngState, Position};

pub use crate::effects::{
    CategorySet, Effect, EffectCategory, EffectContainer, EffectContext, EffectDescriptor,
    EffectRegistry, GameWorld, MetaEffect, PropertySet, ResonanceRegistry, TriggerEvent,
};

pub use crate::combat::{DamageEvent, DamagePipeline, Vitals};

pub use crate::waves::WaveData;

pub use crate::sandbox::{Arena, Session};
