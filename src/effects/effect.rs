//! The polymorphic effect unit.
//!
//! An `Effect` is a trait object with an identity, a category set, a
//! mutable strength/argument pair and a handful of checked capability
//! accessors. Call sites never downcast: they ask `as_instant()`,
//! `as_enemy_damaged()` and so on, and get `None` when the effect does not
//! take part in that call site.

use std::str::FromStr;

use tracing::warn;

use crate::core::EffectError;

use super::capability::{
    AttackEffect, CardDrawnEffect, DeathEffect, DiscardEffect, EnemyDamagedEffect,
    EveryRoundEffect, InstantEffect, MetaControl, OverchargeEffect, PeriodicEffect,
    PropertyEffect, RankEffect, ReachedGoalEffect, SelfEffect, SourceTrackedEffect,
    SpawnEffect, TargetingEffect, UpgradeEffect, WaveEffect,
};
use super::category::{CategorySet, EffectCategory};
use super::context::EffectContext;

/// Strength and argument as read from the descriptor.
///
/// `argument` always keeps the raw string so a descriptor round-trips
/// losslessly; effects that need a typed value parse it into their own
/// fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectParams {
    pub strength: f32,
    pub argument: String,
}

impl EffectParams {
    /// Create a new parameter pair.
    pub fn new(strength: f32, argument: impl Into<String>) -> Self {
        Self {
            strength,
            argument: argument.into(),
        }
    }
}

/// A live effect attached to one host.
///
/// Implementors provide identity, categories, parameter storage and
/// `clone_box`; everything else has a default. Capability accessors
/// default to `None` so an effect only implements the call sites it
/// actually takes part in.
pub trait Effect: std::fmt::Debug {
    /// Stable name used for lookup and serialization.
    fn canonical_name(&self) -> &'static str;

    /// Human-readable name; may depend on the current strength and argument.
    fn display_name(&self) -> String {
        self.canonical_name().to_string()
    }

    /// Every call site this effect takes part in.
    fn categories(&self) -> CategorySet;

    /// Whether this effect takes part in `category`.
    fn triggers_as(&self, category: EffectCategory) -> bool {
        self.categories().contains(category)
    }

    fn params(&self) -> &EffectParams;

    fn params_mut(&mut self) -> &mut EffectParams;

    fn strength(&self) -> f32 {
        self.params().strength
    }

    fn set_strength(&mut self, strength: f32) {
        self.params_mut().strength = strength;
    }

    fn argument(&self) -> &str {
        &self.params().argument
    }

    /// Store a new argument. Effects with typed arguments override this to
    /// parse; a parse failure logs a warning and substitutes a documented
    /// fallback, it never panics.
    fn set_argument(&mut self, argument: &str) {
        self.params_mut().argument = argument.to_string();
    }

    /// Whether the host's container should drop this effect on its next sweep.
    fn should_be_removed(&self) -> bool {
        false
    }

    /// Whether this is the no-op sentinel.
    fn is_noop(&self) -> bool {
        false
    }

    /// Deep clone for attaching to a new host.
    fn clone_box(&self) -> Box<dyn Effect>;

    /// The wrapped effect, for meta effects.
    fn inner_effect(&self) -> Option<&dyn Effect> {
        None
    }

    /// The host is leaving the field. Drop anything registered with shared
    /// session services. Never gated, and a no-op when nothing is held.
    fn release(&mut self, _ctx: &mut EffectContext<'_>) {}

    // === Capability accessors ===

    fn as_instant(&mut self) -> Option<&mut dyn InstantEffect> {
        None
    }

    fn as_wave(&mut self) -> Option<&mut dyn WaveEffect> {
        None
    }

    fn as_discard(&mut self) -> Option<&mut dyn DiscardEffect> {
        None
    }

    fn as_self_cast(&mut self) -> Option<&mut dyn SelfEffect> {
        None
    }

    fn as_enemy_damaged(&mut self) -> Option<&mut dyn EnemyDamagedEffect> {
        None
    }

    fn as_periodic(&mut self) -> Option<&mut dyn PeriodicEffect> {
        None
    }

    fn as_overcharge(&mut self) -> Option<&mut dyn OverchargeEffect> {
        None
    }

    fn as_reached_goal(&mut self) -> Option<&mut dyn ReachedGoalEffect> {
        None
    }

    fn as_death(&mut self) -> Option<&mut dyn DeathEffect> {
        None
    }

    fn as_spawn(&mut self) -> Option<&mut dyn SpawnEffect> {
        None
    }

    fn as_card_drawn(&mut self) -> Option<&mut dyn CardDrawnEffect> {
        None
    }

    fn as_attack(&mut self) -> Option<&mut dyn AttackEffect> {
        None
    }

    fn as_upgrade(&mut self) -> Option<&mut dyn UpgradeEffect> {
        None
    }

    fn as_targeting(&mut self) -> Option<&mut dyn TargetingEffect> {
        None
    }

    fn as_rank(&mut self) -> Option<&mut dyn RankEffect> {
        None
    }

    fn as_source_tracked(&mut self) -> Option<&mut dyn SourceTrackedEffect> {
        None
    }

    fn as_every_round(&mut self) -> Option<&mut dyn EveryRoundEffect> {
        None
    }

    fn as_property(&self) -> Option<&dyn PropertyEffect> {
        None
    }

    fn as_meta(&mut self) -> Option<&mut dyn MetaControl> {
        None
    }
}

impl Clone for Box<dyn Effect> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// The no-op sentinel a meta effect holds until it is given an inner.
#[derive(Clone, Debug, Default)]
pub struct NoOpEffect {
    params: EffectParams,
}

impl Effect for NoOpEffect {
    fn canonical_name(&self) -> &'static str {
        "none"
    }

    fn categories(&self) -> CategorySet {
        CategorySet::empty()
    }

    fn params(&self) -> &EffectParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut EffectParams {
        &mut self.params
    }

    fn is_noop(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn Effect> {
        Box::new(self.clone())
    }
}

/// Parse a typed argument strictly.
///
/// An empty argument is `Ok(None)`.
pub fn try_parse_argument<T>(effect: &'static str, argument: &str) -> Result<Option<T>, EffectError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let trimmed = argument.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|err| EffectError::InvalidArgument {
            effect,
            argument: argument.to_string(),
            reason: err.to_string(),
        })
}

/// Parse a typed argument, falling back on failure.
///
/// An empty argument silently yields `fallback`; anything else that fails
/// to parse logs a warning naming the effect.
pub fn parse_argument<T>(effect: &'static str, argument: &str, fallback: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
    T::Err: std::fmt::Display,
{
    match try_parse_argument(effect, argument) {
        Ok(value) => value.unwrap_or(fallback),
        Err(err) => {
            warn!(effect, ?fallback, "{err}; using fallback");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sentinel() {
        let noop = NoOpEffect::default();
        assert!(noop.is_noop());
        assert!(noop.categories().is_empty());
        assert!(!noop.triggers_as(EffectCategory::Instant));
    }

    #[test]
    fn test_boxed_clone_is_independent() {
        let mut original: Box<dyn Effect> = Box::new(NoOpEffect::default());
        let copy = original.clone();
        original.set_strength(4.0);
        assert_eq!(copy.strength(), 0.0);
        assert_eq!(original.strength(), 4.0);
    }

    #[test]
    fn test_parse_argument() {
        assert_eq!(parse_argument("test", "2.5", 1.0f32), 2.5);
        assert_eq!(parse_argument("test", "", 1.0f32), 1.0);
        assert_eq!(parse_argument("test", "wide", 1.0f32), 1.0);
        assert_eq!(parse_argument("test", " 7 ", 0i32), 7);
    }

    #[test]
    fn test_try_parse_argument() {
        assert_eq!(try_parse_argument::<f32>("test", ""), Ok(None));
        assert_eq!(try_parse_argument::<u32>("test", "3"), Ok(Some(3)));
        assert!(matches!(
            try_parse_argument::<f32>("explodeOnHit", "wide"),
            Err(EffectError::InvalidArgument { effect: "explodeOnHit", .. })
        ));
    }
}
