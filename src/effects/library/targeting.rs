//! Targeting policies.
//!
//! Candidates always come from the world's range query, in the world's
//! order. An empty candidate set yields an empty list, which is the only
//! "no target" signal.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, Position};
use crate::effects::capability::{TargetList, TargetingEffect};
use crate::effects::category::{CategorySet, EffectCategory};
use crate::effects::context::{EffectContext, EnemyStats};
use crate::effects::effect::{Effect, EffectParams};

use super::effect_params;

/// How a tower picks among the enemies in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    /// Every enemy in range.
    AllInRange,
    HighestArmor,
    HighestHealth,
    HighestSpeed,
    /// One enemy at random.
    Random,
    /// The first `strength` enemies in range-query order.
    FirstN,
}

impl TargetMode {
    pub const fn canonical_name(self) -> &'static str {
        match self {
            TargetMode::AllInRange => "targetAllInRange",
            TargetMode::HighestArmor => "targetHighestArmor",
            TargetMode::HighestHealth => "targetHighestHealth",
            TargetMode::HighestSpeed => "targetHighestSpeed",
            TargetMode::Random => "targetRandom",
            TargetMode::FirstN => "targetFirstN",
        }
    }
}

#[derive(Clone, Debug)]
pub struct TargetPolicy {
    mode: TargetMode,
    params: EffectParams,
}

impl TargetPolicy {
    pub fn new(mode: TargetMode) -> Self {
        Self {
            mode,
            params: EffectParams::default(),
        }
    }

    pub fn all_in_range() -> Self {
        Self::new(TargetMode::AllInRange)
    }

    /// The first `count` enemies in range.
    pub fn first_n(count: u32) -> Self {
        let mut policy = Self::new(TargetMode::FirstN);
        policy.params.strength = count as f32;
        policy
    }

    pub fn mode(&self) -> TargetMode {
        self.mode
    }
}

/// Linear scan keeping the first candidate with the greatest key.
fn first_maximal(
    candidates: &[EntityId],
    ctx: &EffectContext<'_>,
    key: impl Fn(&EnemyStats) -> f32,
) -> Option<EntityId> {
    let mut best: Option<(EntityId, f32)> = None;
    for &candidate in candidates {
        let Some(stats) = ctx.world.enemy_stats(candidate) else { continue };
        let value = key(&stats);
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((candidate, value)),
        }
    }
    best.map(|(entity, _)| entity)
}

impl Effect for TargetPolicy {
    fn canonical_name(&self) -> &'static str {
        self.mode.canonical_name()
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::TowerTargeting)
    }

    effect_params!();

    fn as_targeting(&mut self) -> Option<&mut dyn TargetingEffect> {
        Some(self)
    }
}

impl TargetingEffect for TargetPolicy {
    fn find_targets(
        &mut self,
        position: Position,
        radius: f32,
        ctx: &mut EffectContext<'_>,
    ) -> TargetList {
        let candidates = ctx.world.entities_in_range(position, radius);
        if candidates.is_empty() {
            return TargetList::new();
        }

        let single = |entity: Option<EntityId>| entity.into_iter().collect::<TargetList>();
        match self.mode {
            TargetMode::AllInRange => candidates.into_iter().collect(),
            TargetMode::HighestArmor => single(first_maximal(&candidates, ctx, |s| s.armor)),
            TargetMode::HighestHealth => single(first_maximal(&candidates, ctx, |s| s.health)),
            TargetMode::HighestSpeed => single(first_maximal(&candidates, ctx, |s| s.speed)),
            TargetMode::Random => single(ctx.rng.choose(&candidates).copied()),
            TargetMode::FirstN => {
                let count = self.params.strength.round().max(1.0) as usize;
                candidates.into_iter().take(count).collect()
            }
        }
    }
}
