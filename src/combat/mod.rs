//! Combat payloads: damage events, vitals and the two-phase pipeline.
//!
//! The effect engine does not move projectiles or resolve collisions. A
//! combat collaborator creates a [`DamageEvent`] when an attack launches,
//! runs [`DamagePipeline::expected`], subtracts the result from the
//! target's expected health, and after the travel delay runs
//! [`DamagePipeline::actual`] and applies the damage for real.

mod damage;
mod pipeline;
mod vitals;

pub use damage::DamageEvent;
pub use pipeline::DamagePipeline;
pub use vitals::Vitals;
