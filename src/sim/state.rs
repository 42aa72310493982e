//! Game state and core simulation types
//!
//! `GameState` is a plain value: every transition clones it and returns the
//! new snapshot, so a renderer can hold on to the previous one.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::effects::{ActiveEffects, PowerUp};
use super::enemy::EnemySnake;
use super::geometry::{Direction, Point};
use super::rng::{Lcg, Occupied, RandomSource};
use super::spawn::{fill_foods, spawn_enemy};
use crate::consts::*;
use crate::stats::Stats;

/// Enemy slots, indexed by spawn order. An empty slot is an absent enemy.
pub type EnemySlots = [Option<EnemySnake>; MAX_ENEMY_COUNT];

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Player snake, head first
    pub snake: Vec<Point>,
    pub direction: Direction,
    /// Latest accepted turn, consumed by the next tick
    pub queued_direction: Option<Direction>,
    pub enemies: EnemySlots,
    pub foods: Vec<Point>,
    /// Target food count
    pub food_count: usize,
    /// Target enemy count
    pub enemy_count: usize,
    pub power_up: Option<PowerUp>,
    pub effects: ActiveEffects,
    pub score: u32,
    pub best_score: u32,
    pub games_played: u32,
    /// Current tick period; the driver re-arms its timer when this changes
    pub tick_ms: u32,
    pub is_paused: bool,
    pub is_game_over: bool,
    /// Set once this game's result has been folded into the stats
    #[serde(default)]
    pub result_recorded: bool,
}

impl GameState {
    /// Fresh paused game with default food and enemy counts
    pub fn new(rng: &mut dyn RandomSource) -> Self {
        let mid_x = BOARD_WIDTH / 2;
        let mid_y = BOARD_HEIGHT / 2;
        let snake: Vec<Point> = (0..INITIAL_SNAKE_LENGTH as i32)
            .map(|i| IVec2::new(mid_x - i, mid_y))
            .collect();

        let player: Occupied = snake.iter().copied().collect();
        let mut occupied = player.clone();
        let mut enemies = EnemySlots::default();
        for (slot, entry) in enemies.iter_mut().enumerate().take(DEFAULT_ENEMY_COUNT) {
            *entry = spawn_enemy(slot, &mut occupied, rng);
        }

        // occupied now holds the player plus every placed enemy
        let foods = fill_foods(&[], DEFAULT_FOOD_COUNT, &occupied, rng);

        Self {
            snake,
            direction: Direction::Right,
            queued_direction: None,
            enemies,
            foods,
            food_count: DEFAULT_FOOD_COUNT,
            enemy_count: DEFAULT_ENEMY_COUNT,
            power_up: None,
            effects: ActiveEffects::default(),
            score: 0,
            best_score: 0,
            games_played: 0,
            tick_ms: INITIAL_TICK_MS,
            is_paused: true,
            is_game_over: false,
            result_recorded: false,
        }
    }

    /// Fresh game from a reproducible seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(&mut Lcg::new(seed))
    }

    /// Fresh game from host entropy
    pub fn with_entropy() -> Self {
        Self::new(&mut rand::rng())
    }

    /// Load persisted stats into this state
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.best_score = self.best_score.max(stats.best_score);
        self.games_played = stats.games_played;
        self
    }

    /// Values to hand to the storage layer
    pub fn stats(&self) -> Stats {
        Stats {
            best_score: self.best_score.max(self.score),
            games_played: self.games_played,
        }
    }

    pub fn head(&self) -> Option<Point> {
        self.snake.first().copied()
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = &EnemySnake> {
        self.enemies.iter().flatten().filter(|e| e.alive)
    }

    pub fn live_enemy_count(&self) -> usize {
        self.live_enemies().count()
    }

    pub fn player_occupied(&self) -> Occupied {
        self.snake.iter().copied().collect()
    }

    /// Cells covered by every live enemy
    pub fn enemy_occupied(&self) -> Occupied {
        enemy_cells(&self.enemies, None)
    }

    /// Effective heading the next turn is measured against
    pub fn anchor_direction(&self) -> Direction {
        self.queued_direction.unwrap_or(self.direction)
    }
}

/// Cells of every live enemy, optionally skipping one slot
pub(crate) fn enemy_cells(enemies: &EnemySlots, skip: Option<usize>) -> Occupied {
    enemies
        .iter()
        .enumerate()
        .filter(|(slot, _)| Some(*slot) != skip)
        .filter_map(|(_, enemy)| enemy.as_ref())
        .filter(|enemy| enemy.alive)
        .flat_map(|enemy| enemy.body.iter().copied())
        .collect()
}

/// Tick period from score alone
pub fn compute_base_tick_ms(score: u32) -> u32 {
    let reduction = (score / SCORE_PER_SPEED_STEP) * SPEED_STEP_MS;
    INITIAL_TICK_MS
        .saturating_sub(reduction)
        .max(MIN_BASE_TICK_MS)
}

/// Tick period with speed effects applied
pub fn compute_tick_ms(score: u32, effects: &ActiveEffects, now: u64) -> u32 {
    let mut tick = f64::from(compute_base_tick_ms(score));
    if effects.speed_up_active(now) {
        tick *= SPEED_UP_MULTIPLIER;
    }
    if effects.slow_down_active(now) {
        tick *= SLOW_DOWN_MULTIPLIER;
    }
    (tick.round() as u32).max(MIN_TICK_MS)
}
