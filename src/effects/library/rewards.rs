//! Resource effects on cards and hosts: gold, cards, lives and global damage.

use tracing::debug;

use crate::core::EntityId;
use crate::effects::capability::{
    CardDrawnEffect, DeathEffect, DiscardEffect, InstantEffect, ReachedGoalEffect,
};
use crate::effects::category::{CategorySet, EffectCategory};
use crate::effects::context::EffectContext;
use crate::effects::effect::{Effect, EffectParams};

use super::effect_params;

fn whole(strength: f32) -> i64 {
    strength.round() as i64
}

// === Gold ===

/// Grants `strength` gold when its call site fires.
///
/// One struct covers `gainGold` (instant), `goldOnDiscard`, `goldOnDraw`
/// and `goldOnDeath`.
#[derive(Clone, Debug)]
pub struct GoldReward {
    name: &'static str,
    when: EffectCategory,
    params: EffectParams,
}

impl GoldReward {
    fn new(name: &'static str, when: EffectCategory, strength: f32) -> Self {
        Self {
            name,
            when,
            params: EffectParams::new(strength, ""),
        }
    }

    pub fn gain_gold(strength: f32) -> Self {
        Self::new("gainGold", EffectCategory::Instant, strength)
    }

    pub fn on_discard(strength: f32) -> Self {
        Self::new("goldOnDiscard", EffectCategory::Discard, strength)
    }

    pub fn on_draw(strength: f32) -> Self {
        Self::new("goldOnDraw", EffectCategory::CardDrawn, strength)
    }

    pub fn on_death(strength: f32) -> Self {
        Self::new("goldOnDeath", EffectCategory::Death, strength)
    }

    fn grant(&self, ctx: &mut EffectContext<'_>) {
        debug!(effect = self.name, gold = self.params.strength, "granting gold");
        ctx.world.add_gold(whole(self.params.strength));
    }
}

impl Effect for GoldReward {
    fn canonical_name(&self) -> &'static str {
        self.name
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(self.when)
    }

    effect_params!();

    fn as_instant(&mut self) -> Option<&mut dyn InstantEffect> {
        (self.when == EffectCategory::Instant).then_some(self as &mut dyn InstantEffect)
    }

    fn as_discard(&mut self) -> Option<&mut dyn DiscardEffect> {
        (self.when == EffectCategory::Discard).then_some(self as &mut dyn DiscardEffect)
    }

    fn as_card_drawn(&mut self) -> Option<&mut dyn CardDrawnEffect> {
        (self.when == EffectCategory::CardDrawn).then_some(self as &mut dyn CardDrawnEffect)
    }

    fn as_death(&mut self) -> Option<&mut dyn DeathEffect> {
        (self.when == EffectCategory::Death).then_some(self as &mut dyn DeathEffect)
    }
}

impl InstantEffect for GoldReward {
    fn trigger(&mut self, ctx: &mut EffectContext<'_>) {
        self.grant(ctx);
    }
}

impl DiscardEffect for GoldReward {
    fn on_discard(&mut self, ctx: &mut EffectContext<'_>) {
        self.grant(ctx);
    }
}

impl CardDrawnEffect for GoldReward {
    fn on_card_drawn(&mut self, ctx: &mut EffectContext<'_>) {
        self.grant(ctx);
    }
}

impl DeathEffect for GoldReward {
    fn on_death(&mut self, ctx: &mut EffectContext<'_>) {
        self.grant(ctx);
    }
}

// === Cards ===

/// Draws `strength` cards: `drawCards` (instant) or `drawOnDiscard`.
#[derive(Clone, Debug)]
pub struct CardDraw {
    name: &'static str,
    when: EffectCategory,
    params: EffectParams,
}

impl CardDraw {
    pub fn draw_cards(strength: f32) -> Self {
        Self {
            name: "drawCards",
            when: EffectCategory::Instant,
            params: EffectParams::new(strength, ""),
        }
    }

    pub fn on_discard(strength: f32) -> Self {
        Self {
            name: "drawOnDiscard",
            when: EffectCategory::Discard,
            params: EffectParams::new(strength, ""),
        }
    }

    fn draw(&self, ctx: &mut EffectContext<'_>) {
        let count = whole(self.params.strength).max(0) as u32;
        ctx.world.draw_cards(count);
    }
}

impl Effect for CardDraw {
    fn canonical_name(&self) -> &'static str {
        self.name
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(self.when)
    }

    effect_params!();

    fn as_instant(&mut self) -> Option<&mut dyn InstantEffect> {
        (self.when == EffectCategory::Instant).then_some(self as &mut dyn InstantEffect)
    }

    fn as_discard(&mut self) -> Option<&mut dyn DiscardEffect> {
        (self.when == EffectCategory::Discard).then_some(self as &mut dyn DiscardEffect)
    }
}

impl InstantEffect for CardDraw {
    fn trigger(&mut self, ctx: &mut EffectContext<'_>) {
        self.draw(ctx);
    }
}

impl DiscardEffect for CardDraw {
    fn on_discard(&mut self, ctx: &mut EffectContext<'_>) {
        self.draw(ctx);
    }
}

// === Lives ===

/// `gainLives`: restores `strength` lives.
#[derive(Clone, Debug, Default)]
pub struct GainLives {
    params: EffectParams,
}

impl GainLives {
    pub fn new(strength: f32) -> Self {
        Self {
            params: EffectParams::new(strength, ""),
        }
    }
}

impl Effect for GainLives {
    fn canonical_name(&self) -> &'static str {
        "gainLives"
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::Instant)
    }

    effect_params!();

    fn as_instant(&mut self) -> Option<&mut dyn InstantEffect> {
        Some(self)
    }
}

impl InstantEffect for GainLives {
    fn trigger(&mut self, ctx: &mut EffectContext<'_>) {
        ctx.world.add_lives(whole(self.params.strength));
    }
}

/// `extraLifeLoss`: an enemy carrying this costs `strength` extra lives
/// when it reaches the goal.
#[derive(Clone, Debug, Default)]
pub struct ExtraLifeLoss {
    params: EffectParams,
}

impl ExtraLifeLoss {
    pub fn new(strength: f32) -> Self {
        Self {
            params: EffectParams::new(strength, ""),
        }
    }
}

impl Effect for ExtraLifeLoss {
    fn canonical_name(&self) -> &'static str {
        "extraLifeLoss"
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::EnemyReachedGoal)
    }

    effect_params!();

    fn as_reached_goal(&mut self) -> Option<&mut dyn ReachedGoalEffect> {
        Some(self)
    }
}

impl ReachedGoalEffect for ExtraLifeLoss {
    fn on_reached_goal(&mut self, enemy: EntityId, ctx: &mut EffectContext<'_>) {
        debug!(effect = "extraLifeLoss", %enemy, lives = self.params.strength, "enemy reached goal");
        ctx.world.add_lives(-whole(self.params.strength));
    }
}

// === Damage ===

/// `damageAllEnemies`: deals `strength` damage to every live enemy.
#[derive(Clone, Debug, Default)]
pub struct DamageAllEnemies {
    params: EffectParams,
}

impl DamageAllEnemies {
    pub fn new(strength: f32) -> Self {
        Self {
            params: EffectParams::new(strength, ""),
        }
    }
}

impl Effect for DamageAllEnemies {
    fn canonical_name(&self) -> &'static str {
        "damageAllEnemies"
    }

    fn display_name(&self) -> String {
        format!("Deal {} damage to all enemies", self.params.strength)
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::Instant)
    }

    effect_params!();

    fn as_instant(&mut self) -> Option<&mut dyn InstantEffect> {
        Some(self)
    }
}

impl InstantEffect for DamageAllEnemies {
    fn trigger(&mut self, ctx: &mut EffectContext<'_>) {
        for enemy in ctx.world.enemies() {
            ctx.world.deal_damage(enemy, self.params.strength);
        }
    }
}
