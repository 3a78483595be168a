//! Reference host for the effect engine.
//!
//! [`Arena`] is an in-memory [`GameWorld`](crate::effects::GameWorld):
//! enemies, towers, gold and lives. [`Session`] drives it the way a game
//! would, calling every effect hook at the right moment: type definitions,
//! spawning and placement, two-phase attacks, periodic updates with
//! cleanup, cards, waves, rounds and tower upgrades.

mod arena;
mod session;

pub use arena::{Arena, EnemyState, Explosion, SpawnRequest, TowerState};
pub use session::{EnemyTemplate, Session, TowerTemplate};
