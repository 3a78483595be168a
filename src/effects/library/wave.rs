//! Wave modifiers.

use serde::{Deserialize, Serialize};

use crate::effects::capability::WaveEffect;
use crate::effects::category::{CategorySet, EffectCategory};
use crate::effects::context::EffectContext;
use crate::effects::effect::{Effect, EffectParams};
use crate::waves::WaveData;

use super::effect_params;

/// Which part of the wave a modifier changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveAdjustment {
    /// `waveBudget`: budget grows by `strength` percent.
    Budget,
    /// `extraSpawns`: `strength` more enemies.
    ExtraSpawns,
    /// `spawnInterval`: interval multiplied by `strength`.
    SpawnInterval,
    /// `waveEnemyType`: the argument replaces the enemy kind.
    EnemyType,
}

impl WaveAdjustment {
    pub const fn canonical_name(self) -> &'static str {
        match self {
            WaveAdjustment::Budget => "waveBudget",
            WaveAdjustment::ExtraSpawns => "extraSpawns",
            WaveAdjustment::SpawnInterval => "spawnInterval",
            WaveAdjustment::EnemyType => "waveEnemyType",
        }
    }
}

#[derive(Clone, Debug)]
pub struct WaveModifier {
    adjustment: WaveAdjustment,
    params: EffectParams,
}

impl WaveModifier {
    pub fn new(adjustment: WaveAdjustment, strength: f32, argument: &str) -> Self {
        Self {
            adjustment,
            params: EffectParams::new(strength, argument),
        }
    }

    pub fn adjustment(&self) -> WaveAdjustment {
        self.adjustment
    }
}

impl Effect for WaveModifier {
    fn canonical_name(&self) -> &'static str {
        self.adjustment.canonical_name()
    }

    fn categories(&self) -> CategorySet {
        CategorySet::of(EffectCategory::Wave)
    }

    effect_params!();

    fn as_wave(&mut self) -> Option<&mut dyn WaveEffect> {
        Some(self)
    }
}

impl WaveEffect for WaveModifier {
    fn alter_wave(&mut self, wave: WaveData, _ctx: &mut EffectContext<'_>) -> WaveData {
        let strength = self.params.strength;
        let mut wave = wave;
        match self.adjustment {
            WaveAdjustment::Budget => wave.budget *= 1.0 + strength / 100.0,
            WaveAdjustment::ExtraSpawns => {
                let extra = strength.round().max(0.0) as u32;
                wave.spawn_count = wave.spawn_count.saturating_add(extra);
            }
            WaveAdjustment::SpawnInterval => wave.spawn_interval *= strength.max(0.0),
            WaveAdjustment::EnemyType => {
                if !self.params.argument.is_empty() {
                    wave.enemy_type = self.params.argument.clone();
                }
            }
        }
        wave
    }
}
