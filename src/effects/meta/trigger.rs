//! `everyRound` and `onSpawn` - re-home an instant effect onto another call site.
//!
//! Both override the category set instead of taking the inner's union,
//! always open, and only accept an instant inner.

use crate::effects::category::{CategorySet, EffectCategory};
use crate::effects::context::EffectContext;
use crate::effects::effect::{Effect, EffectParams};

use super::{GatePolicy, MetaEffect};

/// Fires the inner instant effect at the start of every round.
#[derive(Clone, Debug, Default)]
pub struct EveryRoundTrigger;

impl GatePolicy for EveryRoundTrigger {
    const NAME: &'static str = "everyRound";

    fn describe(&self, _params: &EffectParams, inner: &dyn Effect) -> String {
        format!("Every round: {}", inner.display_name())
    }

    fn categories(&self, _inner: &dyn Effect) -> CategorySet {
        CategorySet::of(EffectCategory::EveryRound).with(EffectCategory::Meta)
    }

    fn accepts(&self, inner: &dyn Effect) -> bool {
        inner.triggers_as(EffectCategory::Instant)
    }

    fn allow(&mut self, _params: &EffectParams, _ctx: &mut EffectContext<'_>) -> bool {
        true
    }
}

/// Fires the inner instant effect when the host spawns.
#[derive(Clone, Debug, Default)]
pub struct OnSpawnTrigger;

impl GatePolicy for OnSpawnTrigger {
    const NAME: &'static str = "onSpawn";

    fn describe(&self, _params: &EffectParams, inner: &dyn Effect) -> String {
        format!("On spawn: {}", inner.display_name())
    }

    fn categories(&self, _inner: &dyn Effect) -> CategorySet {
        CategorySet::of(EffectCategory::Spawn).with(EffectCategory::Meta)
    }

    fn accepts(&self, inner: &dyn Effect) -> bool {
        inner.triggers_as(EffectCategory::Instant)
    }

    fn allow(&mut self, _params: &EffectParams, _ctx: &mut EffectContext<'_>) -> bool {
        true
    }
}

pub type EveryRound = MetaEffect<EveryRoundTrigger>;
pub type OnSpawn = MetaEffect<OnSpawnTrigger>;
