//! Power-ups and timed effects
//!
//! Timed effects store an absolute expiry timestamp (ms). An effect is
//! active while its expiry is strictly after `now`. The shield is a one-shot
//! flag consumed by the tick that it saves.

use serde::{Deserialize, Serialize};

use super::geometry::Point;
use super::rng::{RandomSource, pick_weighted};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerUpKind {
    SpeedUp,
    SlowDown,
    GhostWall,
    DoubleScore,
    Shorten,
    Shield,
}

/// Spawn weights, in draw order
pub const POWER_UP_WEIGHTS: [(PowerUpKind, u32); 6] = [
    (PowerUpKind::SpeedUp, 20),
    (PowerUpKind::SlowDown, 20),
    (PowerUpKind::GhostWall, 15),
    (PowerUpKind::DoubleScore, 20),
    (PowerUpKind::Shorten, 15),
    (PowerUpKind::Shield, 10),
];

impl PowerUpKind {
    /// Effect duration for timed power-ups
    pub fn duration_ms(self) -> Option<u64> {
        match self {
            PowerUpKind::SpeedUp => Some(6_000),
            PowerUpKind::SlowDown => Some(6_000),
            PowerUpKind::GhostWall => Some(8_000),
            PowerUpKind::DoubleScore => Some(10_000),
            PowerUpKind::Shorten | PowerUpKind::Shield => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedUp => "SPEED_UP",
            PowerUpKind::SlowDown => "SLOW_DOWN",
            PowerUpKind::GhostWall => "GHOST_WALL",
            PowerUpKind::DoubleScore => "DOUBLE_SCORE",
            PowerUpKind::Shorten => "SHORTEN",
            PowerUpKind::Shield => "SHIELD",
        }
    }
}

/// The single power-up lying on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub position: Point,
    /// Absolute timestamp (ms) after which the pickup disappears
    pub expires_at: u64,
}

/// Active power-up effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEffects {
    #[serde(default)]
    pub speed_up_until: Option<u64>,
    #[serde(default)]
    pub slow_down_until: Option<u64>,
    #[serde(default)]
    pub ghost_wall_until: Option<u64>,
    #[serde(default)]
    pub double_score_until: Option<u64>,
    pub shield: bool,
}

/// Outcome of picking up a power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedPowerUp {
    pub effects: ActiveEffects,
    /// Segments to cut from the player (clamped by the caller)
    pub shorten_by: usize,
}

/// Remaining time per effect, for HUD display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectTimers {
    pub speed_up: u64,
    pub slow_down: u64,
    pub ghost_wall: u64,
    pub double_score: u64,
    pub shield: bool,
}

#[inline]
pub fn is_effect_active(until: Option<u64>, now: u64) -> bool {
    until.is_some_and(|t| t > now)
}

#[inline]
pub fn effect_remaining_ms(until: Option<u64>, now: u64) -> u64 {
    until.map_or(0, |t| t.saturating_sub(now))
}

pub fn choose_power_up_type(rng: &mut dyn RandomSource) -> PowerUpKind {
    // The weight table is never empty
    pick_weighted(&POWER_UP_WEIGHTS, rng).unwrap_or(PowerUpKind::Shield)
}

impl ActiveEffects {
    pub fn speed_up_active(&self, now: u64) -> bool {
        is_effect_active(self.speed_up_until, now)
    }

    pub fn slow_down_active(&self, now: u64) -> bool {
        is_effect_active(self.slow_down_until, now)
    }

    pub fn ghost_wall_active(&self, now: u64) -> bool {
        is_effect_active(self.ghost_wall_until, now)
    }

    pub fn double_score_active(&self, now: u64) -> bool {
        is_effect_active(self.double_score_until, now)
    }

    /// Drop timed effects that have run out (shield untouched)
    pub fn cleanup_expired(&self, now: u64) -> Self {
        let keep = |until: Option<u64>| until.filter(|t| *t > now);
        Self {
            speed_up_until: keep(self.speed_up_until),
            slow_down_until: keep(self.slow_down_until),
            ghost_wall_until: keep(self.ghost_wall_until),
            double_score_until: keep(self.double_score_until),
            shield: self.shield,
        }
    }

    pub fn apply(&self, kind: PowerUpKind, now: u64) -> AppliedPowerUp {
        let mut effects = *self;
        let until = kind.duration_ms().map(|d| now.saturating_add(d));

        match kind {
            PowerUpKind::SpeedUp => effects.speed_up_until = until,
            PowerUpKind::SlowDown => effects.slow_down_until = until,
            PowerUpKind::GhostWall => effects.ghost_wall_until = until,
            PowerUpKind::DoubleScore => effects.double_score_until = until,
            PowerUpKind::Shield => effects.shield = true,
            PowerUpKind::Shorten => {
                return AppliedPowerUp {
                    effects,
                    shorten_by: crate::consts::SHORTEN_AMOUNT,
                };
            }
        }

        AppliedPowerUp {
            effects,
            shorten_by: 0,
        }
    }

    pub fn timers(&self, now: u64) -> EffectTimers {
        EffectTimers {
            speed_up: effect_remaining_ms(self.speed_up_until, now),
            slow_down: effect_remaining_ms(self.slow_down_until, now),
            ghost_wall: effect_remaining_ms(self.ghost_wall_until, now),
            double_score: effect_remaining_ms(self.double_score_until, now),
            shield: self.shield,
        }
    }
}
