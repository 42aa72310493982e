//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Every transition returns a new snapshot
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (enemies by slot)
//! - No rendering, clock or storage dependencies

pub mod commands;
pub mod effects;
pub mod enemy;
pub mod events;
pub mod geometry;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use commands::{
    record_game_over, restart, set_enemy_count, set_food_count, start, toggle_pause, turn,
};
pub use effects::{
    ActiveEffects, AppliedPowerUp, EffectTimers, POWER_UP_WEIGHTS, PowerUp, PowerUpKind,
    choose_power_up_type, effect_remaining_ms, is_effect_active,
};
pub use enemy::{EnemySnake, choose_enemy_direction, greedy_direction, nearest_food_distance};
pub use events::{Consumption, ConsumptionKind, detect_consumption};
pub use geometry::{Direction, Point, manhattan, move_point, out_of_bounds, wrap_point};
pub use rng::{Lcg, Occupied, RandomSource, chance, pick_weighted, random_empty_cell, random_int};
pub use spawn::{
    ENEMY_TEMPLATES, EnemyTemplate, can_place_snake, create_snake_body, fill_foods,
    refill_food_at, spawn_enemy,
};
pub use state::{EnemySlots, GameState, compute_base_tick_ms, compute_tick_ms};
pub use tick::step;
