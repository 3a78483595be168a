//! Periodic effects: damage and healing over time on the host.

use tracing::debug;

use crate::effects::capability::PeriodicEffect;
use crate::effects::category::{CategorySet, EffectCategory};
use crate::effects::context::EffectContext;
use crate::effects::effect::{parse_argument, Effect, EffectParams};

use super::effect_params;

/// Poison duration in seconds when the argument is empty or malformed.
pub const DEFAULT_POISON_DURATION: f32 = 3.0;

/// `poison`: `strength` damage per second to the host for `argument`
/// seconds, then removable.
///
/// The last tick is clamped so the total never exceeds
/// `strength * duration`.
#[derive(Clone, Debug)]
pub struct Poison {
    params: EffectParams,
    duration: f32,
    elapsed: f32,
}

impl Default for Poison {
    fn default() -> Self {
        Self {
            params: EffectParams::default(),
            duration: DEFAULT_POISON_DURATION,
            elapsed: 0.0,
        }
    }
}

impl Poison {
    pub fn new(strength: f32, duration: f32) -> Self {
        Self {
            params: EffectParams::new(strength, duration.to_string()),
            duration,
            elapsed: 0.0,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.duration
    }
}

impl Effect for Poison {
    fn canonical_name(&self) -> &'static str {
        "poison"
    }

    fn display_name(&self) -> String {
        format!("Poison {}/s for {}s", self.params.strength, self.duration)
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::Periodic)
    }

    effect_params!();

    fn set_argument(&mut self, argument: &str) {
        self.params.argument = argument.to_string();
        self.duration = parse_argument("poison", argument, DEFAULT_POISON_DURATION);
    }

    fn should_be_removed(&self) -> bool {
        self.is_expired()
    }

    fn as_periodic(&mut self) -> Option<&mut dyn PeriodicEffect> {
        Some(self)
    }
}

impl PeriodicEffect for Poison {
    fn update(&mut self, delta_seconds: f32, ctx: &mut EffectContext<'_>) {
        let step = delta_seconds.min(self.duration - self.elapsed);
        if step <= 0.0 {
            return;
        }
        self.elapsed += step;
        let Some(host) = ctx.host else {
            debug!(effect = "poison", "poison ticked without a host");
            return;
        };
        ctx.world.deal_damage(host, self.params.strength * step);
    }
}

/// `regeneration`: heals the host `strength` per second, forever.
#[derive(Clone, Debug, Default)]
pub struct Regeneration {
    params: EffectParams,
}

impl Regeneration {
    pub fn new(strength: f32) -> Self {
        Self {
            params: EffectParams::new(strength, ""),
        }
    }
}

impl Effect for Regeneration {
    fn canonical_name(&self) -> &'static str {
        "regeneration"
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::Periodic)
    }

    effect_params!();

    fn as_periodic(&mut self) -> Option<&mut dyn PeriodicEffect> {
        Some(self)
    }
}

impl PeriodicEffect for Regeneration {
    fn update(&mut self, delta_seconds: f32, ctx: &mut EffectContext<'_>) {
        if let Some(host) = ctx.host {
            ctx.world.heal(host, self.params.strength * delta_seconds);
        }
    }
}
