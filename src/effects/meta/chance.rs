//! `percentageChance` - applies the inner with `strength` percent probability.

use tracing::debug;

use crate::effects::context::EffectContext;
use crate::effects::effect::{Effect, EffectParams};

use super::{GatePolicy, MetaEffect};

/// One uniform draw in `[0, 100)` per gate check, compared against strength.
#[derive(Clone, Debug, Default)]
pub struct ChanceGate;

impl GatePolicy for ChanceGate {
    const NAME: &'static str = "percentageChance";

    fn describe(&self, params: &EffectParams, inner: &dyn Effect) -> String {
        format!("{}% chance: {}", params.strength, inner.display_name())
    }

    fn allow(&mut self, params: &EffectParams, ctx: &mut EffectContext<'_>) -> bool {
        let draw = ctx.rng.gen_percent();
        let open = draw < params.strength;
        debug!(effect = Self::NAME, draw, chance = params.strength, open, "chance gate");
        open
    }
}

pub type PercentageChance = MetaEffect<ChanceGate>;
