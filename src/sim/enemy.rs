//! Enemy snakes and their one-step greedy steering
//!
//! Enemies never path-find: each tick they look one cell ahead in four
//! directions and head for whichever free cell is closest to food.

use serde::{Deserialize, Serialize};

use super::geometry::{Direction, Point, manhattan, move_point, out_of_bounds};
use super::rng::Occupied;

/// An AI-controlled snake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySnake {
    /// Stable slot label (slot index + 1)
    pub id: u32,
    /// Head first
    pub body: Vec<Point>,
    pub direction: Direction,
    /// Snapshots from `step` only hold live enemies (a removed enemy empties
    /// its slot). A `false` here, e.g. from a stored snapshot, is treated
    /// like an empty slot: never moved, never collided with, refilled by
    /// `set_enemy_count`.
    pub alive: bool,
    /// Display hue in degrees
    pub hue: u16,
}

impl EnemySnake {
    pub fn head(&self) -> Option<Point> {
        self.body.first().copied()
    }

    /// Display label, e.g. `enemy-2`
    pub fn label(&self) -> String {
        format!("enemy-{}", self.id)
    }
}

/// Manhattan distance from `point` to the closest food, `None` without food
pub fn nearest_food_distance(point: Point, foods: &[Point]) -> Option<i32> {
    foods.iter().map(|food| manhattan(*food, point)).min()
}

/// Whether moving a snake's head to `next_head` is illegal
///
/// The snake's own tail only counts when it is about to eat, since it
/// otherwise vacates this tick.
pub(crate) fn move_blocked(
    body: &[Point],
    next_head: Point,
    foods: &[Point],
    player: &Occupied,
    others: &Occupied,
) -> bool {
    if out_of_bounds(next_head) || player.contains(&next_head) || others.contains(&next_head) {
        return true;
    }
    let will_eat = foods.contains(&next_head);
    let own = if will_eat {
        body
    } else {
        &body[..body.len().saturating_sub(1)]
    };
    own.contains(&next_head)
}

/// Greedy heading for any snake body
///
/// Candidates in priority order: straight, left, right, reverse. Ties go to
/// the earlier candidate. With every candidate blocked (or no food), the
/// current heading is kept.
pub fn greedy_direction(
    body: &[Point],
    heading: Direction,
    foods: &[Point],
    player: &Occupied,
    others: &Occupied,
) -> Direction {
    let Some(&head) = body.first() else {
        return heading;
    };
    let candidates = [
        heading,
        heading.turn_left(),
        heading.turn_right(),
        heading.opposite(),
    ];

    let mut best = heading;
    let mut best_distance: Option<i32> = None;

    for direction in candidates {
        let next_head = move_point(head, direction);
        if move_blocked(body, next_head, foods, player, others) {
            continue;
        }
        let Some(distance) = nearest_food_distance(next_head, foods) else {
            continue;
        };
        if best_distance.is_none_or(|d| distance < d) {
            best_distance = Some(distance);
            best = direction;
        }
    }

    best
}

pub fn choose_enemy_direction(
    enemy: &EnemySnake,
    foods: &[Point],
    player_occupied: &Occupied,
    other_enemies: &Occupied,
) -> Direction {
    greedy_direction(
        &enemy.body,
        enemy.direction,
        foods,
        player_occupied,
        other_enemies,
    )
}
