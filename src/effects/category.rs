//! Trigger categories.
//!
//! Every effect reports the set of call sites it participates in. The set
//! is a small bitmask so meta effects can union their own category with
//! whatever the current inner effect reports without allocating.

use serde::{Deserialize, Serialize};

/// A dispatch call site an effect can participate in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectCategory {
    /// Played as a card with no target.
    Instant,
    /// Alters an upcoming wave.
    Wave,
    /// Card discarded from hand.
    Discard,
    /// Cast onto the host tower itself.
    SelfCast,
    /// Participates in the two-phase damage protocol.
    EnemyDamaged,
    /// Receives a time delta once per host update.
    Periodic,
    /// Host tower was overcharged.
    Overcharge,
    /// An enemy reached the goal.
    EnemyReachedGoal,
    /// Host died.
    Death,
    /// Host spawned.
    Spawn,
    /// Host card was drawn.
    CardDrawn,
    /// Host tower fired an attack.
    Attack,
    /// Host tower was upgraded.
    Upgrade,
    /// Chooses attack targets for the host tower.
    TowerTargeting,
    /// Host rank changed.
    Rank,
    /// Tracks the attack stat of the entity that applied it.
    SourceTracked,
    /// Passive lookup value, never dispatched.
    Property,
    /// Wraps another effect.
    Meta,
    /// Fires once per round.
    EveryRound,
}

impl EffectCategory {
    /// Every category, in declaration order.
    pub const ALL: [EffectCategory; 19] = [
        EffectCategory::Instant,
        EffectCategory::Wave,
        EffectCategory::Discard,
        EffectCategory::SelfCast,
        EffectCategory::EnemyDamaged,
        EffectCategory::Periodic,
        EffectCategory::Overcharge,
        EffectCategory::EnemyReachedGoal,
        EffectCategory::Death,
        EffectCategory::Spawn,
        EffectCategory::CardDrawn,
        EffectCategory::Attack,
        EffectCategory::Upgrade,
        EffectCategory::TowerTargeting,
        EffectCategory::Rank,
        EffectCategory::SourceTracked,
        EffectCategory::Property,
        EffectCategory::Meta,
        EffectCategory::EveryRound,
    ];

    const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Stable lowercase name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EffectCategory::Instant => "instant",
            EffectCategory::Wave => "wave",
            EffectCategory::Discard => "discard",
            EffectCategory::SelfCast => "selfCast",
            EffectCategory::EnemyDamaged => "enemyDamaged",
            EffectCategory::Periodic => "periodic",
            EffectCategory::Overcharge => "overcharge",
            EffectCategory::EnemyReachedGoal => "enemyReachedGoal",
            EffectCategory::Death => "death",
            EffectCategory::Spawn => "spawn",
            EffectCategory::CardDrawn => "cardDrawn",
            EffectCategory::Attack => "attack",
            EffectCategory::Upgrade => "upgrade",
            EffectCategory::TowerTargeting => "towerTargeting",
            EffectCategory::Rank => "rank",
            EffectCategory::SourceTracked => "sourceTracked",
            EffectCategory::Property => "property",
            EffectCategory::Meta => "meta",
            EffectCategory::EveryRound => "everyRound",
        }
    }
}

impl std::fmt::Display for EffectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of trigger categories.
///
/// ```
/// use rust_td::effects::{CategorySet, EffectCategory};
///
/// let set = CategorySet::of(EffectCategory::Instant).with(EffectCategory::Meta);
/// assert!(set.contains(EffectCategory::Meta));
/// assert!(!set.contains(EffectCategory::Wave));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategorySet(u32);

impl CategorySet {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// A set holding a single category.
    #[must_use]
    pub const fn of(category: EffectCategory) -> Self {
        Self(category.bit())
    }

    /// Add a category (builder pattern).
    #[must_use]
    pub const fn with(self, category: EffectCategory) -> Self {
        Self(self.0 | category.bit())
    }

    /// Remove a category (builder pattern).
    #[must_use]
    pub const fn without(self, category: EffectCategory) -> Self {
        Self(self.0 & !category.bit())
    }

    /// Union of two sets.
    #[must_use]
    pub const fn union(self, other: CategorySet) -> Self {
        Self(self.0 | other.0)
    }

    /// Check membership.
    #[must_use]
    pub const fn contains(self, category: EffectCategory) -> bool {
        self.0 & category.bit() != 0
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of categories in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = EffectCategory> {
        EffectCategory::ALL
            .into_iter()
            .filter(move |category| self.contains(*category))
    }
}

impl std::ops::BitOr for CategorySet {
    type Output = CategorySet;

    fn bitor(self, rhs: CategorySet) -> CategorySet {
        self.union(rhs)
    }
}

impl From<EffectCategory> for CategorySet {
    fn from(category: EffectCategory) -> Self {
        Self::of(category)
    }
}

impl FromIterator<EffectCategory> for CategorySet {
    fn from_iter<I: IntoIterator<Item = EffectCategory>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), CategorySet::with)
    }
}

impl std::fmt::Debug for CategorySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_categories_have_distinct_bits() {
        let set: CategorySet = EffectCategory::ALL.into_iter().collect();
        assert_eq!(set.len(), EffectCategory::ALL.len());
    }

    #[test]
    fn test_union_and_without() {
        let a = CategorySet::of(EffectCategory::Death);
        let b = CategorySet::of(EffectCategory::Spawn);
        let both = a | b;

        assert!(both.contains(EffectCategory::Death));
        assert!(both.contains(EffectCategory::Spawn));
        assert_eq!(both.without(EffectCategory::Death), b);
    }

    #[test]
    fn test_iter_in_declaration_order() {
        let set = CategorySet::of(EffectCategory::Meta).with(EffectCategory::Instant);
        let members: Vec<_> = set.iter().collect();
        assert_eq!(members, vec![EffectCategory::Instant, EffectCategory::Meta]);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&EffectCategory::EnemyDamaged).unwrap();
        assert_eq!(json, "\"enemyDamaged\"");
    }
}
