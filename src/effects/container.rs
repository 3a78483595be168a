//! Effect containers - the ordered effects owned by one host.
//!
//! A container belongs to exactly one card type, tower or enemy. Effects
//! are dispatched in insertion order, and later effects observe whatever
//! earlier ones changed. Attaching an effect to a container always clones
//! it, so no effect instance is ever shared between two hosts.
//!
//! Expired effects are swept on a coarse cadence: the host calls
//! [`EffectContainer::tick`] once per update and the container runs
//! [`EffectContainer::cleanup`] every `cleanup_interval` ticks.

use tracing::debug;

use crate::combat::DamageEvent;
use crate::core::config::DEFAULT_CLEANUP_INTERVAL;
use crate::core::{EngineConfig, Position};
use crate::waves::WaveData;

use super::capability::TargetList;
use super::category::EffectCategory;
use super::context::EffectContext;
use super::descriptor::EffectDescriptor;
use super::dispatch::{dispatch_effect, TriggerEvent};
use super::effect::Effect;
use super::property::PropertySet;
use super::registry::EffectRegistry;

/// Ordered, clonable collection of effects owned by one host.
///
/// ## Example
///
/// ```
/// use rust_td::effects::{EffectContainer, EffectDescriptor, EffectRegistry};
///
/// let registry = EffectRegistry::with_builtin();
/// let template = EffectContainer::from_descriptors(
///     &[
///         EffectDescriptor::with_strength("armor", 2.0),
///         EffectDescriptor::with_strength("armorPierce", 0.0),
///     ],
///     &registry,
/// );
///
/// // Each spawned host gets its own copy.
/// let instance = template.clone();
/// assert_eq!(instance.len(), 2);
/// assert!(instance.properties().armor_pierce);
/// ```
#[derive(Debug)]
pub struct EffectContainer {
    effects: Vec<Box<dyn Effect>>,
    cleanup_interval: u32,
    ticks_since_cleanup: u32,
}

impl Default for EffectContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EffectContainer {
    /// Deep clone for a new host: every effect is cloned and the cleanup
    /// cadence restarts.
    fn clone(&self) -> Self {
        Self {
            effects: self.effects.iter().map(|effect| effect.clone_box()).collect(),
            cleanup_interval: self.cleanup_interval,
            ticks_since_cleanup: 0,
        }
    }
}

impl EffectContainer {
    /// Create an empty container with the default cleanup interval.
    #[must_use]
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            ticks_since_cleanup: 0,
        }
    }

    /// Create an empty container using the session's cleanup interval.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new().with_cleanup_interval(config.cleanup_interval)
    }

    /// Set the cleanup interval in host ticks (builder pattern).
    #[must_use]
    pub fn with_cleanup_interval(mut self, ticks: u32) -> Self {
        self.cleanup_interval = ticks;
        self
    }

    /// Build a container from descriptors.
    ///
    /// Unknown names and rejected meta inners are logged by the registry
    /// and dropped; the host still loads.
    #[must_use]
    pub fn from_descriptors(descriptors: &[EffectDescriptor], registry: &EffectRegistry) -> Self {
        let mut container = Self::new();
        for descriptor in descriptors {
            if let Some(effect) = registry.create(descriptor) {
                container.push(effect);
            }
        }
        container
    }

    /// Take ownership of a freshly built effect.
    pub fn push(&mut self, effect: Box<dyn Effect>) {
        self.effects.push(effect);
    }

    /// Attach a clone of an effect owned elsewhere.
    pub fn attach(&mut self, effect: &dyn Effect) {
        self.effects.push(effect.clone_box());
    }

    /// Attach clones of every effect in `other`, preserving its order.
    pub fn attach_all(&mut self, other: &EffectContainer) {
        self.effects
            .extend(other.effects.iter().map(|effect| effect.clone_box()));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate effects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Effect> {
        self.effects.iter().map(|effect| &**effect)
    }

    /// Effect at `index`, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Effect + 'static)> {
        self.effects.get_mut(index).map(|effect| &mut **effect)
    }

    /// Canonical names in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|effect| effect.canonical_name()).collect()
    }

    /// Whether any effect takes part in `category`.
    #[must_use]
    pub fn has_category(&self, category: EffectCategory) -> bool {
        self.effects.iter().any(|effect| effect.triggers_as(category))
    }

    /// Sum of strengths of every effect named `name`.
    #[must_use]
    pub fn total_strength(&self, name: &str) -> f32 {
        self.effects
            .iter()
            .filter(|effect| effect.canonical_name() == name)
            .map(|effect| effect.strength())
            .sum()
    }

    // === Dispatch ===

    /// Deliver a unit-returning event to every matching effect, in order.
    ///
    /// Returns how many effects took part.
    pub fn dispatch(&mut self, event: &TriggerEvent, ctx: &mut EffectContext<'_>) -> usize {
        let mut delivered = 0;
        for effect in self.effects.iter_mut() {
            if dispatch_effect(&mut **effect, event, ctx) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Thread `wave` through every wave effect, in order.
    pub fn alter_wave(&mut self, wave: WaveData, ctx: &mut EffectContext<'_>) -> WaveData {
        let mut wave = wave;
        for effect in self.effects.iter_mut() {
            if let Some(modifier) = effect.as_wave() {
                wave = modifier.alter_wave(wave, ctx);
            }
        }
        wave
    }

    /// Expected damage phase over this container.
    pub fn expected_damage(&mut self, event: &mut DamageEvent, ctx: &mut EffectContext<'_>) {
        for effect in self.effects.iter_mut() {
            if let Some(damaged) = effect.as_enemy_damaged() {
                damaged.expected_damage(event, ctx);
            }
        }
    }

    /// Actual damage phase over this container.
    pub fn actual_damage(&mut self, event: &DamageEvent, ctx: &mut EffectContext<'_>) {
        for effect in self.effects.iter_mut() {
            if let Some(damaged) = effect.as_enemy_damaged() {
                damaged.actual_damage(event, ctx);
            }
        }
    }

    /// Ask the targeting effects for targets.
    ///
    /// Targeting effects are tried in order and the first non-empty result
    /// wins, so a gated policy falls through to the next one while closed.
    /// Returns `None` when the container has no targeting effect at all and
    /// the caller should use its default policy.
    pub fn find_targets(
        &mut self,
        position: Position,
        radius: f32,
        ctx: &mut EffectContext<'_>,
    ) -> Option<TargetList> {
        let mut result: Option<TargetList> = None;
        for effect in self.effects.iter_mut() {
            if let Some(targeting) = effect.as_targeting() {
                let targets = targeting.find_targets(position, radius, ctx);
                if !targets.is_empty() {
                    return Some(targets);
                }
                result = Some(targets);
            }
        }
        result
    }

    /// Aggregate property effects into one lookup.
    #[must_use]
    pub fn properties(&self) -> PropertySet {
        let mut properties = PropertySet::default();
        for effect in &self.effects {
            if let Some(property) = effect.as_property() {
                property.contribute(&mut properties);
            }
        }
        properties
    }

    // === Lifecycle ===

    /// The host is leaving the field: release every effect's shared
    /// registrations, gated or not.
    pub fn release(&mut self, ctx: &mut EffectContext<'_>) {
        for effect in self.effects.iter_mut() {
            effect.release(ctx);
        }
    }

    /// Whether the next [`tick`](Self::tick) runs a sweep.
    #[must_use]
    pub fn cleanup_due(&self) -> bool {
        self.ticks_since_cleanup + 1 >= self.cleanup_interval
    }

    /// Release the shared registrations of effects the next sweep removes.
    pub fn release_expired(&mut self, ctx: &mut EffectContext<'_>) {
        for effect in self.effects.iter_mut() {
            if effect.should_be_removed() {
                effect.release(ctx);
            }
        }
    }

    /// Advance the cleanup cadence by one host tick.
    ///
    /// Returns how many effects were removed (zero between sweeps).
    pub fn tick(&mut self) -> usize {
        self.ticks_since_cleanup += 1;
        if self.ticks_since_cleanup < self.cleanup_interval {
            return 0;
        }
        self.ticks_since_cleanup = 0;
        self.cleanup()
    }

    /// Remove every effect that reports it should be removed.
    pub fn cleanup(&mut self) -> usize {
        let before = self.effects.len();
        self.effects.retain(|effect| {
            let remove = effect.should_be_removed();
            if remove {
                debug!(effect = effect.canonical_name(), "removing expired effect");
            }
            !remove
        });
        before - self.effects.len()
    }
}
