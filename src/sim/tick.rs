//! Simulation tick
//!
//! Core game loop that advances the board by one cell-move. The player
//! moves and resolves collisions and pickups first, then enemies move in
//! slot order, each seeing earlier slots already moved and later slots not
//! yet moved.

use super::effects::{PowerUp, choose_power_up_type};
use super::enemy::{EnemySnake, choose_enemy_direction, move_blocked};
use super::geometry::{move_point, out_of_bounds, wrap_point};
use super::rng::{Occupied, RandomSource, chance, random_empty_cell};
use super::spawn::{refill_food_at, spawn_enemy};
use super::state::{GameState, compute_tick_ms, enemy_cells};
use crate::consts::*;

/// Advance the game by one tick at wall-clock time `now` (ms)
///
/// Returns the input unchanged while paused or over.
pub fn step(state: &GameState, now: u64, rng: &mut dyn RandomSource) -> GameState {
    if state.is_game_over || state.is_paused {
        return state.clone();
    }
    let Some(head) = state.head() else {
        return state.clone();
    };

    let effects = state.effects.cleanup_expired(now);
    let move_direction = state.anchor_direction();
    let ghost_wall = effects.ghost_wall_active(now);
    let raw_next = move_point(head, move_direction);
    let next_head = if ghost_wall {
        wrap_point(raw_next)
    } else {
        raw_next
    };
    let hit_wall = !ghost_wall && out_of_bounds(raw_next);

    let eaten_food = state.foods.iter().position(|food| *food == next_head);
    let future_body = match eaten_food {
        Some(_) => &state.snake[..],
        None => &state.snake[..state.snake.len() - 1],
    };
    let hit_self = future_body.contains(&next_head);
    let hit_enemy = state.enemy_occupied().contains(&next_head);

    let mut next = state.clone();
    next.direction = move_direction;
    next.queued_direction = None;

    // --- FATAL COLLISION ---
    if hit_wall || hit_self || hit_enemy {
        next.tick_ms = compute_tick_ms(state.score, &effects, now);
        if effects.shield {
            log::debug!("Shield absorbed collision at {next_head}");
            next.effects = effects;
            next.effects.shield = false;
        } else {
            log::info!(
                "Game over: score {} (wall={hit_wall}, self={hit_self}, enemy={hit_enemy})",
                state.score
            );
            next.effects = effects;
            next.is_game_over = true;
            next.is_paused = true;
        }
        return next;
    }

    // --- PLAYER MOVE ---
    let mut snake = Vec::with_capacity(state.snake.len() + 1);
    snake.push(next_head);
    snake.extend_from_slice(&state.snake);
    let mut score = state.score;
    if eaten_food.is_some() {
        score += if effects.double_score_active(now) { 2 } else { 1 };
    } else {
        snake.pop();
    }

    // --- POWER-UP PICKUP ---
    let mut effects = effects;
    let mut power_up = state.power_up.filter(|p| p.expires_at > now);
    if let Some(picked) = power_up.filter(|p| p.position == next_head) {
        log::debug!("Picked up {} at {next_head}", picked.kind.as_str());
        let applied = effects.apply(picked.kind, now);
        effects = applied.effects;
        if applied.shorten_by > 0 {
            let target = snake
                .len()
                .saturating_sub(applied.shorten_by)
                .max(MIN_SNAKE_LENGTH);
            snake.truncate(target);
        }
        power_up = None;
    }

    let mut foods = state.foods.clone();
    if let Some(index) = eaten_food {
        let mut occupied: Occupied = snake.iter().copied().collect();
        occupied.extend(enemy_cells(&state.enemies, None));
        if let Some(p) = &power_up {
            occupied.insert(p.position);
        }
        foods = refill_food_at(&foods, index, &occupied, rng);
    }

    // --- ENEMIES ---
    let player_occupied: Occupied = snake.iter().copied().collect();
    let mut enemies = state.enemies.clone();
    for slot in 0..enemies.len() {
        let Some(enemy) = enemies[slot].clone().filter(|e| e.alive) else {
            continue;
        };
        let Some(enemy_head) = enemy.head() else {
            continue;
        };

        // Earlier slots already hold their moved bodies
        let others = enemy_cells(&enemies, Some(slot));
        let direction = choose_enemy_direction(&enemy, &foods, &player_occupied, &others);
        let enemy_next = move_point(enemy_head, direction);

        if move_blocked(&enemy.body, enemy_next, &foods, &player_occupied, &others) {
            let mut occupied = player_occupied.clone();
            occupied.extend(others);
            occupied.extend(foods.iter().copied());
            if let Some(p) = &power_up {
                occupied.insert(p.position);
            }
            enemies[slot] = spawn_enemy(slot, &mut occupied, rng);
            log::debug!(
                "{} trapped, respawned: {}",
                enemy.label(),
                enemies[slot].is_some()
            );
            continue;
        }

        let enemy_food = foods.iter().position(|food| *food == enemy_next);
        let mut body = Vec::with_capacity(enemy.body.len() + 1);
        body.push(enemy_next);
        body.extend_from_slice(&enemy.body);
        if enemy_food.is_none() {
            body.pop();
        }
        enemies[slot] = Some(EnemySnake {
            body,
            direction,
            alive: true,
            ..enemy
        });

        if let Some(index) = enemy_food {
            let mut occupied = player_occupied.clone();
            occupied.extend(enemy_cells(&enemies, None));
            if let Some(p) = &power_up {
                occupied.insert(p.position);
            }
            foods = refill_food_at(&foods, index, &occupied, rng);
        }
    }

    // --- POWER-UP SPAWN ---
    if power_up.is_none() && chance(POWER_UP_SPAWN_CHANCE, rng) {
        let mut occupied = player_occupied.clone();
        occupied.extend(enemy_cells(&enemies, None));
        occupied.extend(foods.iter().copied());
        if let Some(position) = random_empty_cell(&occupied, rng) {
            let kind = choose_power_up_type(rng);
            log::debug!("Spawned {} at {position}", kind.as_str());
            power_up = Some(PowerUp {
                kind,
                position,
                expires_at: now.saturating_add(POWER_UP_TTL_MS),
            });
        }
    }

    next.snake = snake;
    next.enemies = enemies;
    next.foods = foods;
    next.power_up = power_up;
    next.effects = effects;
    next.score = score;
    next.best_score = state.best_score.max(score);
    next.tick_ms = compute_tick_ms(score, &effects, now);
    next
}
