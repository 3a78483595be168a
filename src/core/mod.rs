//! Core engine types: entities, RNG, configuration, errors.
//!
//! This module contains the fundamental building blocks shared by the
//! effect engine and its collaborators.

pub mod entity;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::{EntityId, Position};
pub use rng::{GameRng, GameRngState};
pub use config::EngineConfig;
pub use error::EffectError;
