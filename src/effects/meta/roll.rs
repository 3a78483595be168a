//! `rollRange` - applies the inner when the shared die roll lands in range.
//!
//! The range is `[strength, argument]`, inclusive. The argument is parsed as
//! an integer upper bound; an empty or malformed argument makes the range a
//! single value (`strength`). An upper bound below the lower bound is a
//! configuration error: it is warned about and the gate stays closed.

use tracing::{debug, warn};

use crate::effects::context::EffectContext;
use crate::effects::effect::{parse_argument, Effect, EffectParams};

use super::{GatePolicy, MetaEffect};

#[derive(Clone, Debug, Default)]
pub struct RollGate {
    lower: i32,
    upper: i32,
}

impl RollGate {
    /// Inclusive bounds, as configured.
    pub fn bounds(&self) -> (i32, i32) {
        (self.lower, self.upper)
    }
}

impl GatePolicy for RollGate {
    const NAME: &'static str = "rollRange";

    fn describe(&self, _params: &EffectParams, inner: &dyn Effect) -> String {
        if self.lower == self.upper {
            format!("On {}: {}", self.lower, inner.display_name())
        } else {
            format!("On {}-{}: {}", self.lower, self.upper, inner.display_name())
        }
    }

    fn configure(&mut self, params: &EffectParams) {
        self.lower = params.strength.round() as i32;
        self.upper = parse_argument(Self::NAME, &params.argument, self.lower);
    }

    fn allow(&mut self, _params: &EffectParams, ctx: &mut EffectContext<'_>) -> bool {
        if self.upper < self.lower {
            warn!(
                effect = Self::NAME,
                lower = self.lower,
                upper = self.upper,
                "roll range upper bound is below lower bound"
            );
            return false;
        }
        let Some(roll) = ctx.die_roll else {
            debug!(effect = Self::NAME, "no die roll this dispatch");
            return false;
        };
        (self.lower..=self.upper).contains(&roll)
    }
}

pub type RollRange = MetaEffect<RollGate>;
