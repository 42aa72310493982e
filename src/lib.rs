//! Candy Snake - a grid snake arcade game against AI rivals
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, power-ups, spawning)
//! - `stats`: Best score / games played record
//! - `settings`: Player preferences (food and enemy counts)
//! - `persistence`: Key/value storage backends

pub mod persistence;
pub mod settings;
pub mod sim;
pub mod stats;

pub use settings::Settings;
pub use sim::{GameState, Lcg, RandomSource, step};
pub use stats::Stats;

/// Game configuration constants
pub mod consts {
    /// Board dimensions (cells)
    pub const BOARD_WIDTH: i32 = 32;
    pub const BOARD_HEIGHT: i32 = 32;

    /// Snake lengths
    pub const INITIAL_SNAKE_LENGTH: usize = 4;
    pub const ENEMY_INITIAL_LENGTH: usize = 4;
    /// Power-ups never shrink the player below this
    pub const MIN_SNAKE_LENGTH: usize = 3;

    /// Food count bounds (runtime configurable)
    pub const MIN_FOOD_COUNT: usize = 1;
    pub const MAX_FOOD_COUNT: usize = 12;
    pub const DEFAULT_FOOD_COUNT: usize = 5;

    /// Enemy count bounds (runtime configurable)
    pub const MIN_ENEMY_COUNT: usize = 1;
    pub const MAX_ENEMY_COUNT: usize = 3;
    pub const DEFAULT_ENEMY_COUNT: usize = 1;

    /// Tick timing
    pub const INITIAL_TICK_MS: u32 = 150;
    /// Every this many points the base tick shrinks by `SPEED_STEP_MS`
    pub const SCORE_PER_SPEED_STEP: u32 = 5;
    pub const SPEED_STEP_MS: u32 = 5;
    pub const MIN_BASE_TICK_MS: u32 = 75;
    /// Absolute floor after effect multipliers
    pub const MIN_TICK_MS: u32 = 40;
    pub const SPEED_UP_MULTIPLIER: f64 = 0.75;
    pub const SLOW_DOWN_MULTIPLIER: f64 = 1.35;

    /// Power-ups
    pub const POWER_UP_SPAWN_CHANCE: f64 = 0.08;
    pub const POWER_UP_TTL_MS: u64 = 8_000;
    pub const SHORTEN_AMOUNT: usize = 3;

    /// Placement search limits
    pub const EMPTY_CELL_RANDOM_TRIES: u32 = 200;
    pub const ENEMY_RANDOM_PLACEMENT_TRIES: u32 = 40;

    /// Food is forced here when the board cannot supply a single free cell
    pub const FOOD_FALLBACK_CELL: (i32, i32) = (0, 0);
}

/// Clamp a requested entity count into `[min, max]`
#[inline]
pub fn clamp_count(requested: i64, min: usize, max: usize) -> usize {
    requested.clamp(min as i64, max as i64) as usize
}
