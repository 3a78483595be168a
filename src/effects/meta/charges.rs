//! `limitedCharges` - applies the inner at most `strength` times.

use crate::effects::context::EffectContext;
use crate::effects::effect::{Effect, EffectParams};

use super::{Forwarded, GatePolicy, MetaEffect};

/// Remaining charges, rounded from strength whenever strength is set.
#[derive(Clone, Debug, Default)]
pub struct ChargesGate {
    remaining: u32,
}

impl ChargesGate {
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl GatePolicy for ChargesGate {
    const NAME: &'static str = "limitedCharges";

    fn describe(&self, _params: &EffectParams, inner: &dyn Effect) -> String {
        format!("{} ({} charges)", inner.display_name(), self.remaining)
    }

    fn configure(&mut self, params: &EffectParams) {
        self.remaining = params.strength.max(0.0).round() as u32;
    }

    fn allow(&mut self, _params: &EffectParams, _ctx: &mut EffectContext<'_>) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    // A targeting search that found nothing gives its charge back.
    fn on_forwarded(&mut self, _params: &EffectParams, outcome: Forwarded) {
        if outcome == Forwarded::Targets(0) {
            self.remaining += 1;
        }
    }

    fn exhausted(&self) -> bool {
        self.remaining == 0
    }
}

pub type LimitedCharges = MetaEffect<ChargesGate>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameRng;
    use crate::effects::capability::InstantEffect;
    use crate::effects::library::GoldReward;
    use crate::effects::ResonanceRegistry;
    use crate::sandbox::Arena;

    #[test]
    fn test_two_charges_then_removable() {
        let mut arena = Arena::new();
        let mut resonance = ResonanceRegistry::new();
        let mut rng = GameRng::new(3);
        let mut meta = LimitedCharges::wrapping(2.0, "", Box::new(GoldReward::gain_gold(1.0)));
        assert!(!meta.should_be_removed());

        for _ in 0..5 {
            let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
            meta.trigger(&mut ctx);
        }

        assert_eq!(arena.gold(), 2);
        assert_eq!(meta.policy().remaining(), 0);
        assert!(meta.should_be_removed());
    }

    #[test]
    fn test_clone_keeps_remaining_charges() {
        let mut arena = Arena::new();
        let mut resonance = ResonanceRegistry::new();
        let mut rng = GameRng::new(3);
        let mut meta = LimitedCharges::wrapping(3.0, "", Box::new(GoldReward::gain_gold(1.0)));
        {
            let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
            meta.trigger(&mut ctx);
        }
        let copy = meta.clone_box();
        assert_eq!(copy.display_name(), "gainGold (2 charges)");
    }
}
