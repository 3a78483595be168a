//! Scaling metas - always open, rewrite the inner's strength on events.
//!
//! Each scaling policy remembers the inner's strength the first time it
//! rescales (the base) and from then on sets `inner.strength` to the base
//! times a multiplier. A clone resets its inner to the base so a new host
//! starts scaling from the unscaled value.

use crate::effects::category::{CategorySet, EffectCategory};
use crate::effects::context::EffectContext;
use crate::effects::effect::{Effect, EffectParams};

use super::{GatePolicy, MetaEffect, MetaEvent};

/// Lazily captured base strength shared by the scaling policies.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rescale {
    base: Option<f32>,
}

impl Rescale {
    /// The captured base, if the inner has been rescaled yet.
    pub fn base(&self) -> Option<f32> {
        self.base
    }

    /// Set `inner.strength` to `base * multiplier`, capturing the base first.
    pub fn apply(&mut self, inner: &mut dyn Effect, multiplier: f32) {
        if inner.is_noop() {
            return;
        }
        let base = *self.base.get_or_insert_with(|| inner.strength());
        inner.set_strength(base * multiplier);
    }

    /// Put a freshly cloned inner back on its base strength.
    pub fn reset(&self, inner: &mut dyn Effect) {
        if let Some(base) = self.base {
            inner.set_strength(base);
        }
    }
}

// === scaleWithDamage ===

/// Inner strength becomes `base * raw_damage * strength` on every hit.
#[derive(Clone, Debug, Default)]
pub struct DamageScaling {
    rescale: Rescale,
}

impl GatePolicy for DamageScaling {
    const NAME: &'static str = "scaleWithDamage";

    fn describe(&self, _params: &EffectParams, inner: &dyn Effect) -> String {
        format!("{} (scales with damage)", inner.display_name())
    }

    fn allow(&mut self, _params: &EffectParams, _ctx: &mut EffectContext<'_>) -> bool {
        true
    }

    fn observe(&mut self, event: MetaEvent, params: &EffectParams, inner: &mut dyn Effect) {
        if let MetaEvent::Damage(raw) = event {
            self.rescale.apply(inner, raw * params.strength);
        }
    }

    fn prepare_clone(&self, inner: &mut dyn Effect) {
        self.rescale.reset(inner);
    }
}

// === scaleWithTime ===

/// Inner strength ramps as `base * (1 + strength * elapsed_seconds)`.
#[derive(Clone, Debug, Default)]
pub struct TimeScaling {
    rescale: Rescale,
    elapsed: f32,
}

impl TimeScaling {
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl GatePolicy for TimeScaling {
    const NAME: &'static str = "scaleWithTime";

    fn describe(&self, _params: &EffectParams, inner: &dyn Effect) -> String {
        format!("{} (grows over time)", inner.display_name())
    }

    fn categories(&self, inner: &dyn Effect) -> CategorySet {
        inner
            .categories()
            .with(EffectCategory::Meta)
            .with(EffectCategory::Periodic)
    }

    fn allow(&mut self, _params: &EffectParams, _ctx: &mut EffectContext<'_>) -> bool {
        true
    }

    fn observe(&mut self, event: MetaEvent, params: &EffectParams, inner: &mut dyn Effect) {
        if let MetaEvent::Tick(delta) = event {
            self.elapsed += delta;
            self.rescale.apply(inner, 1.0 + params.strength * self.elapsed);
        }
    }

    fn prepare_clone(&self, inner: &mut dyn Effect) {
        self.rescale.reset(inner);
    }

    fn clone_for_host(&self) -> Self {
        Self {
            rescale: self.rescale,
            elapsed: 0.0,
        }
    }
}

// === scaleWithRank ===

/// Inner strength becomes `base * (1 + strength * (rank - 1))`.
#[derive(Clone, Debug, Default)]
pub struct RankScaling {
    rescale: Rescale,
}

impl GatePolicy for RankScaling {
    const NAME: &'static str = "scaleWithRank";

    fn describe(&self, _params: &EffectParams, inner: &dyn Effect) -> String {
        format!("{} (scales with rank)", inner.display_name())
    }

    fn categories(&self, inner: &dyn Effect) -> CategorySet {
        inner
            .categories()
            .with(EffectCategory::Meta)
            .with(EffectCategory::Rank)
    }

    fn allow(&mut self, _params: &EffectParams, _ctx: &mut EffectContext<'_>) -> bool {
        true
    }

    fn observe(&mut self, event: MetaEvent, params: &EffectParams, inner: &mut dyn Effect) {
        if let MetaEvent::Rank(rank) = event {
            let steps = rank.saturating_sub(1) as f32;
            self.rescale.apply(inner, 1.0 + params.strength * steps);
        }
    }

    fn prepare_clone(&self, inner: &mut dyn Effect) {
        self.rescale.reset(inner);
    }
}

// === scaleWithSourceAttack ===

/// Inner strength becomes `base * source_attack * strength`.
#[derive(Clone, Debug, Default)]
pub struct SourceAttackScaling {
    rescale: Rescale,
}

impl GatePolicy for SourceAttackScaling {
    const NAME: &'static str = "scaleWithSourceAttack";

    fn describe(&self, _params: &EffectParams, inner: &dyn Effect) -> String {
        format!("{} (scales with source attack)", inner.display_name())
    }

    fn categories(&self, inner: &dyn Effect) -> CategorySet {
        inner
            .categories()
            .with(EffectCategory::Meta)
            .with(EffectCategory::SourceTracked)
    }

    fn allow(&mut self, _params: &EffectParams, _ctx: &mut EffectContext<'_>) -> bool {
        true
    }

    fn observe(&mut self, event: MetaEvent, params: &EffectParams, inner: &mut dyn Effect) {
        if let MetaEvent::SourceAttack(attack) = event {
            self.rescale.apply(inner, attack * params.strength);
        }
    }

    fn prepare_clone(&self, inner: &mut dyn Effect) {
        self.rescale.reset(inner);
    }
}

pub type ScaleWithDamage = MetaEffect<DamageScaling>;
pub type ScaleWithTime = MetaEffect<TimeScaling>;
pub type ScaleWithRank = MetaEffect<RankScaling>;
pub type ScaleWithSourceAttack = MetaEffect<SourceAttackScaling>;
