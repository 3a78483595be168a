//! The two-phase damage protocol.
//!
//! 1. **Expected phase**, when the attack is launched: the attacker's
//!    enemy-damaged effects run, then the defender's, each with its own
//!    host set on the context. They may change `raw_damage`.
//! 2. **Actual phase**, when the attack lands: the same effects run in the
//!    same order with a shared borrow of the event. They can only cause
//!    side effects.
//!
//! Within one container, effects run in insertion order and later effects
//! see what earlier ones did to the damage.

use tracing::debug;

use crate::effects::{EffectContainer, EffectContext};

use super::damage::DamageEvent;

/// Runs both phases of the damage protocol over attacker and defender.
pub struct DamagePipeline;

impl DamagePipeline {
    /// Expected phase. Returns the damage the attack will deal.
    pub fn expected(
        event: &mut DamageEvent,
        attacker: Option<&mut EffectContainer>,
        defender: &mut EffectContainer,
        ctx: &mut EffectContext<'_>,
    ) -> f32 {
        let launched = event.raw_damage;

        if let Some(attacker) = attacker {
            ctx.with_host_scope(event.source, |ctx| attacker.expected_damage(event, ctx));
        }
        let dest = event.dest;
        ctx.with_host_scope(Some(dest), |ctx| defender.expected_damage(event, ctx));

        debug!(
            dest = %event.dest,
            launched,
            expected = event.raw_damage,
            "expected damage resolved"
        );
        event.raw_damage
    }

    /// Actual phase. The event is only borrowed, so the damage cannot move.
    pub fn actual(
        event: &DamageEvent,
        attacker: Option<&mut EffectContainer>,
        defender: &mut EffectContainer,
        ctx: &mut EffectContext<'_>,
    ) {
        if let Some(attacker) = attacker {
            ctx.with_host_scope(event.source, |ctx| attacker.actual_damage(event, ctx));
        }
        ctx.with_host_scope(Some(event.dest), |ctx| defender.actual_damage(event, ctx));
    }
}
