//! Player commands and runtime reconfiguration
//!
//! Every command returns a new snapshot. Commands other than `restart` are
//! ignored once the game is over.

use super::geometry::Direction;
use super::rng::{Occupied, RandomSource};
use super::spawn::{fill_foods, spawn_enemy};
use super::state::{GameState, enemy_cells};
use crate::clamp_count;
use crate::consts::*;

/// Queue a turn for the next tick
///
/// A reversal of the effective heading (queued turn, else current heading)
/// is ignored. A newer turn replaces an older queued one.
pub fn turn(state: &GameState, direction: Direction) -> GameState {
    if state.is_game_over || state.anchor_direction().opposite() == direction {
        return state.clone();
    }
    GameState {
        queued_direction: Some(direction),
        ..state.clone()
    }
}

pub fn toggle_pause(state: &GameState) -> GameState {
    if state.is_game_over {
        return state.clone();
    }
    GameState {
        is_paused: !state.is_paused,
        ..state.clone()
    }
}

/// Unpause a game that has not ended (first input starts play)
pub fn start(state: &GameState) -> GameState {
    if state.is_game_over {
        return state.clone();
    }
    GameState {
        is_paused: false,
        ..state.clone()
    }
}

/// Change the target food count, keeping as much current food as fits
pub fn set_food_count(state: &GameState, requested: i64, rng: &mut dyn RandomSource) -> GameState {
    if state.is_game_over {
        return state.clone();
    }
    let food_count = clamp_count(requested, MIN_FOOD_COUNT, MAX_FOOD_COUNT);
    let occupied = food_blockers(state, &enemy_cells(&state.enemies, None));
    let foods = fill_foods(&state.foods, food_count, &occupied, rng);
    GameState {
        food_count,
        foods,
        ..state.clone()
    }
}

/// Change the target enemy count
///
/// Slots past the new count are cleared, live slots below it are kept and
/// empty ones are spawned. Food is then re-validated against the new
/// enemy layout.
pub fn set_enemy_count(
    state: &GameState,
    requested: i64,
    rng: &mut dyn RandomSource,
) -> GameState {
    if state.is_game_over {
        return state.clone();
    }
    let enemy_count = clamp_count(requested, MIN_ENEMY_COUNT, MAX_ENEMY_COUNT);
    let mut enemies = state.enemies.clone();
    for entry in enemies.iter_mut().skip(enemy_count) {
        *entry = None;
    }

    let mut occupied = state.player_occupied();
    occupied.extend(enemy_cells(&enemies, None));
    if let Some(p) = &state.power_up {
        occupied.insert(p.position);
    }
    for (slot, entry) in enemies.iter_mut().enumerate().take(enemy_count) {
        if entry.as_ref().is_none_or(|e| !e.alive) {
            *entry = spawn_enemy(slot, &mut occupied, rng);
        }
    }

    let occupied = food_blockers(state, &enemy_cells(&enemies, None));
    let foods = fill_foods(&state.foods, state.food_count, &occupied, rng);

    GameState {
        enemy_count,
        enemies,
        foods,
        ..state.clone()
    }
}

/// Fresh board with the same food/enemy settings
///
/// Only `best_score` and `games_played` carry over.
pub fn restart(state: &GameState, rng: &mut dyn RandomSource) -> GameState {
    let fresh = GameState::new(rng);
    let fresh = set_food_count(&fresh, state.food_count as i64, rng);
    let fresh = set_enemy_count(&fresh, state.enemy_count as i64, rng);
    log::info!(
        "Restart (best {}, played {})",
        state.best_score,
        state.games_played
    );
    GameState {
        best_score: state.best_score,
        games_played: state.games_played,
        ..fresh
    }
}

/// Fold a finished game into best score / games played, once per game
pub fn record_game_over(state: &GameState) -> GameState {
    if !state.is_game_over || state.result_recorded {
        return state.clone();
    }
    GameState {
        best_score: state.best_score.max(state.score),
        games_played: state.games_played + 1,
        result_recorded: true,
        ..state.clone()
    }
}

/// Cells food may not occupy: player, the given enemy cells, power-up
fn food_blockers(state: &GameState, enemy_cells: &Occupied) -> Occupied {
    let mut occupied = state.player_occupied();
    occupied.extend(enemy_cells.iter().copied());
    if let Some(p) = &state.power_up {
        occupied.insert(p.position);
    }
    occupied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::Lcg;
    use crate::sim::state::EnemySlots;

    #[test]
    fn test_reverse_turn_is_ignored() {
        let state = GameState::seeded(1);
        let reversed = turn(&state, Direction::Left);
        assert_eq!(reversed.queued_direction, None);
        let allowed = turn(&state, Direction::Up);
        assert_eq!(allowed.queued_direction, Some(Direction::Up));
    }

    #[test]
    fn test_reverse_checked_against_queued_turn() {
        let state = turn(&GameState::seeded(1), Direction::Up);
        // Down reverses the queued Up, even though Right is the heading
        assert_eq!(
            turn(&state, Direction::Down).queued_direction,
            Some(Direction::Up)
        );
        // Left is no longer a reversal once Up is queued
        assert_eq!(
            turn(&state, Direction::Left).queued_direction,
            Some(Direction::Left)
        );
    }

    #[test]
    fn test_latest_turn_wins() {
        let state = GameState::seeded(1);
        let state = turn(&state, Direction::Up);
        let state = turn(&state, Direction::Right);
        assert_eq!(state.queued_direction, Some(Direction::Right));
    }

    #[test]
    fn test_commands_ignored_after_game_over() {
        let mut state = GameState::seeded(2);
        state.is_game_over = true;
        let mut rng = Lcg::new(2);
        assert_eq!(turn(&state, Direction::Up), state);
        assert_eq!(toggle_pause(&state), state);
        assert_eq!(start(&state), state);
        assert_eq!(set_food_count(&state, 9, &mut rng), state);
        assert_eq!(set_enemy_count(&state, 3, &mut rng), state);
    }

    #[test]
    fn test_toggle_pause_and_start() {
        let state = GameState::seeded(3);
        assert!(state.is_paused);
        let running = toggle_pause(&state);
        assert!(!running.is_paused);
        assert!(toggle_pause(&running).is_paused);
        assert!(!start(&state).is_paused);
        assert!(!start(&running).is_paused);
    }

    #[test]
    fn test_set_food_count_up_and_down() {
        let mut rng = Lcg::new(4);
        let state = GameState::new(&mut rng);
        let more = set_food_count(&state, 10, &mut rng);
        assert_eq!(more.food_count, 10);
        assert_eq!(more.foods.len(), 10);
        assert_eq!(&more.foods[..5], &state.foods[..]);

        let less = set_food_count(&more, 2, &mut rng);
        assert_eq!(less.food_count, 2);
        assert_eq!(less.foods, more.foods[..2].to_vec());
    }

    #[test]
    fn test_counts_are_clamped() {
        let mut rng = Lcg::new(5);
        let state = GameState::new(&mut rng);
        let high = set_food_count(&state, 99, &mut rng);
        assert_eq!(high.foods.len(), MAX_FOOD_COUNT);
        let low = set_food_count(&state, -4, &mut rng);
        assert_eq!(low.foods.len(), MIN_FOOD_COUNT);
        assert_eq!(set_enemy_count(&state, 10, &mut rng).enemy_count, MAX_ENEMY_COUNT);
        assert_eq!(set_enemy_count(&state, 0, &mut rng).enemy_count, MIN_ENEMY_COUNT);
    }

    #[test]
    fn test_set_enemy_count_grows_and_shrinks() {
        let mut rng = Lcg::new(6);
        let state = GameState::new(&mut rng);
        let triple = set_enemy_count(&state, 3, &mut rng);
        assert_eq!(triple.enemy_count, 3);
        assert_eq!(triple.live_enemy_count(), 3);
        assert_eq!(triple.enemies[0], state.enemies[0]);
        for (slot, enemy) in triple.enemies.iter().enumerate() {
            assert_eq!(enemy.as_ref().unwrap().id, slot as u32 + 1);
        }

        let single = set_enemy_count(&triple, 1, &mut rng);
        assert_eq!(single.live_enemy_count(), 1);
        assert!(single.enemies[1].is_none() && single.enemies[2].is_none());
    }

    #[test]
    fn test_set_enemy_count_moves_food_off_new_enemies() {
        let mut rng = Lcg::new(7);
        let mut state = GameState::new(&mut rng);
        // Food sitting where slot 1 will spawn
        state.foods[0] = crate::sim::spawn::ENEMY_TEMPLATES[1].head;
        let next = set_enemy_count(&state, 2, &mut rng);
        let enemy_cells = next.enemy_occupied();
        assert_eq!(next.foods.len(), next.food_count);
        assert!(next.foods.iter().all(|f| !enemy_cells.contains(f)));
    }

    #[test]
    fn test_set_enemy_count_avoids_power_up() {
        let mut rng = Lcg::new(8);
        let mut state = GameState::new(&mut rng);
        let cell = crate::sim::spawn::ENEMY_TEMPLATES[1].head;
        state.foods.retain(|f| *f != cell);
        state.power_up = Some(crate::sim::effects::PowerUp {
            kind: crate::sim::effects::PowerUpKind::Shield,
            position: cell,
            expires_at: 10_000,
        });
        let next = set_enemy_count(&state, 2, &mut rng);
        let spawned = next.enemies[1].as_ref().unwrap();
        assert!(!spawned.body.contains(&cell));
        assert_eq!(next.power_up, state.power_up);
    }

    #[test]
    fn test_set_enemy_count_respawns_dead_slot() {
        let mut rng = Lcg::new(9);
        let mut state = GameState::new(&mut rng);
        if let Some(enemy) = state.enemies[0].as_mut() {
            enemy.alive = false;
        }
        assert_eq!(state.live_enemy_count(), 0);
        let next = set_enemy_count(&state, 1, &mut rng);
        let enemy = next.enemies[0].as_ref().unwrap();
        assert!(enemy.alive);
        assert_eq!(enemy.id, 1);
        assert_eq!(next.live_enemy_count(), 1);
    }

    #[test]
    fn test_set_enemy_count_refills_empty_slot() {
        let mut rng = Lcg::new(8);
        let mut state = GameState::new(&mut rng);
        state.enemies = EnemySlots::default();
        let next = set_enemy_count(&state, 1, &mut rng);
        assert_eq!(next.live_enemy_count(), 1);
    }

    #[test]
    fn test_restart_carries_stats_and_settings() {
        let mut rng = Lcg::new(9);
        let state = GameState::new(&mut rng);
        let state = set_food_count(&state, 8, &mut rng);
        let mut state = set_enemy_count(&state, 2, &mut rng);
        state.score = 14;
        state.best_score = 20;
        state.games_played = 6;
        state.is_game_over = true;

        let fresh = restart(&state, &mut rng);
        assert_eq!(fresh.score, 0);
        assert_eq!(fresh.best_score, 20);
        assert_eq!(fresh.games_played, 6);
        assert_eq!(fresh.food_count, 8);
        assert_eq!(fresh.foods.len(), 8);
        assert_eq!(fresh.enemy_count, 2);
        assert_eq!(fresh.live_enemy_count(), 2);
        assert!(!fresh.is_game_over);
        assert!(fresh.is_paused);
        assert!(!fresh.result_recorded);
    }

    #[test]
    fn test_record_game_over_once() {
        let mut state = GameState::seeded(10);
        state.score = 12;
        state.best_score = 7;
        assert_eq!(record_game_over(&state), state);

        state.is_game_over = true;
        let recorded = record_game_over(&state);
        assert_eq!(recorded.best_score, 12);
        assert_eq!(recorded.games_played, 1);
        assert_eq!(record_game_over(&recorded), recorded);
    }
}
