//! `cooldown` - closes the gate for `strength` seconds after each use.
//!
//! The timer only runs down on host updates, so the wrapper always takes
//! part in the periodic call site. A targeting search that finds nothing
//! does not start the timer.

use crate::effects::category::{CategorySet, EffectCategory};
use crate::effects::context::EffectContext;
use crate::effects::effect::{Effect, EffectParams};

use super::{Forwarded, GatePolicy, MetaEffect, MetaEvent};

#[derive(Clone, Debug, Default)]
pub struct CooldownGate {
    remaining: f32,
}

impl CooldownGate {
    /// Seconds until the gate opens again.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_cooling_down(&self) -> bool {
        self.remaining > 0.0
    }
}

impl GatePolicy for CooldownGate {
    const NAME: &'static str = "cooldown";

    fn describe(&self, params: &EffectParams, inner: &dyn Effect) -> String {
        format!("{} (every {}s)", inner.display_name(), params.strength)
    }

    fn categories(&self, inner: &dyn Effect) -> CategorySet {
        inner
            .categories()
            .with(EffectCategory::Meta)
            .with(EffectCategory::Periodic)
    }

    fn allow(&mut self, _params: &EffectParams, _ctx: &mut EffectContext<'_>) -> bool {
        !self.is_cooling_down()
    }

    fn on_forwarded(&mut self, params: &EffectParams, outcome: Forwarded) {
        match outcome {
            Forwarded::Triggered => self.remaining = params.strength,
            Forwarded::Targets(found) if found > 0 => self.remaining = params.strength,
            Forwarded::Targets(_) => {}
        }
    }

    fn observe(&mut self, event: MetaEvent, _params: &EffectParams, _inner: &mut dyn Effect) {
        if let MetaEvent::Tick(delta) = event {
            self.remaining = (self.remaining - delta).max(0.0);
        }
    }
}

pub type Cooldown = MetaEffect<CooldownGate>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityId, GameRng, Position};
    use crate::effects::capability::{InstantEffect, PeriodicEffect, TargetingEffect};
    use crate::effects::library::{GoldReward, TargetPolicy};
    use crate::effects::ResonanceRegistry;
    use crate::sandbox::Arena;

    #[test]
    fn test_cooldown_blocks_until_elapsed() {
        let mut arena = Arena::new();
        let mut resonance = ResonanceRegistry::new();
        let mut rng = GameRng::new(3);
        let mut meta = Cooldown::wrapping(2.0, "", Box::new(GoldReward::gain_gold(1.0)));
        assert!(meta.triggers_as(EffectCategory::Periodic));

        let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
        meta.trigger(&mut ctx);
        meta.trigger(&mut ctx);
        meta.update(1.5, &mut ctx);
        meta.trigger(&mut ctx);
        meta.update(0.5, &mut ctx);
        meta.trigger(&mut ctx);
        drop(ctx);

        assert_eq!(arena.gold(), 2);
        assert!(meta.policy().is_cooling_down());
    }

    #[test]
    fn test_empty_search_does_not_start_cooldown() {
        let mut arena = Arena::new();
        let mut resonance = ResonanceRegistry::new();
        let mut rng = GameRng::new(3);
        let mut meta = Cooldown::wrapping(5.0, "", Box::new(TargetPolicy::all_in_range()));

        {
            let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
            let found = meta.find_targets(Position::new(0.0, 0.0), 3.0, &mut ctx);
            assert!(found.is_empty());
        }
        assert!(!meta.policy().is_cooling_down());

        let enemy: EntityId = arena.add_enemy(Position::new(1.0, 0.0), 10.0, 0.0, 1.0);
        let mut ctx = EffectContext::new(&mut arena, &mut resonance, &mut rng);
        let found = meta.find_targets(Position::new(0.0, 0.0), 3.0, &mut ctx);
        assert_eq!(found.as_slice(), &[enemy]);
        assert!(meta.policy().is_cooling_down());

        let blocked = meta.find_targets(Position::new(0.0, 0.0), 3.0, &mut ctx);
        assert!(blocked.is_empty());
    }
}
