//! Entity spawning and placement
//!
//! Snake bodies, enemy placement (template first, then random fallback) and
//! food top-up. Placement degrades instead of failing: an enemy that cannot
//! be placed is omitted, and food is forced onto a fixed cell as a last
//! resort.

use glam::IVec2;

use super::enemy::EnemySnake;
use super::geometry::{Direction, Point, move_point, out_of_bounds};
use super::rng::{Occupied, RandomSource, random_empty_cell};
use crate::consts::*;

/// Canonical spawn for an enemy slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyTemplate {
    pub head: Point,
    pub direction: Direction,
    pub hue: u16,
}

/// One template per slot, indexed by slot modulo the table length
pub const ENEMY_TEMPLATES: [EnemyTemplate; 3] = [
    EnemyTemplate {
        head: IVec2::new(BOARD_WIDTH - 6, 5),
        direction: Direction::Left,
        hue: 210,
    },
    EnemyTemplate {
        head: IVec2::new(5, BOARD_HEIGHT - 6),
        direction: Direction::Right,
        hue: 290,
    },
    EnemyTemplate {
        head: IVec2::new(BOARD_WIDTH - 6, BOARD_HEIGHT - 6),
        direction: Direction::Up,
        hue: 170,
    },
];

/// Lay `length` cells backward from `head`, trailing opposite `direction`
pub fn create_snake_body(head: Point, direction: Direction, length: usize) -> Vec<Point> {
    let reverse = direction.opposite();
    let mut body = Vec::with_capacity(length);
    let mut cursor = head;
    body.push(cursor);
    for _ in 1..length {
        cursor = move_point(cursor, reverse);
        body.push(cursor);
    }
    body
}

pub fn can_place_snake(body: &[Point], occupied: &Occupied) -> bool {
    body.iter()
        .all(|segment| !out_of_bounds(*segment) && !occupied.contains(segment))
}

/// Place the enemy for `slot`, marking its cells in `occupied`
///
/// Returns `None` when neither the template nor any random attempt fits.
pub fn spawn_enemy(
    slot: usize,
    occupied: &mut Occupied,
    rng: &mut dyn RandomSource,
) -> Option<EnemySnake> {
    let id = slot as u32 + 1;
    let template = ENEMY_TEMPLATES[slot % ENEMY_TEMPLATES.len()];
    let body = create_snake_body(template.head, template.direction, ENEMY_INITIAL_LENGTH);
    if can_place_snake(&body, occupied) {
        occupied.extend(body.iter().copied());
        return Some(EnemySnake {
            id,
            body,
            direction: template.direction,
            alive: true,
            hue: template.hue,
        });
    }

    log::debug!("enemy-{id} template blocked, trying random placement");
    for _ in 0..ENEMY_RANDOM_PLACEMENT_TRIES {
        let head = random_empty_cell(occupied, rng)?;
        let index = (rng.next_f64() * Direction::ALL.len() as f64) as usize;
        let direction = Direction::ALL[index.min(Direction::ALL.len() - 1)];
        let body = create_snake_body(head, direction, ENEMY_INITIAL_LENGTH);
        if can_place_snake(&body, occupied) {
            occupied.extend(body.iter().copied());
            return Some(EnemySnake {
                id,
                body,
                direction,
                alive: true,
                hue: ((200 + slot * 70) % 360) as u16,
            });
        }
    }

    log::warn!("enemy-{id} could not be placed, leaving slot empty");
    None
}

/// Keep valid existing food, then top up to `desired`
///
/// Existing food sitting on an occupied cell (or duplicated) is dropped.
/// If nothing at all can be placed, one food is forced onto the fallback
/// cell even if that overlaps something.
pub fn fill_foods(
    existing: &[Point],
    desired: usize,
    occupied_base: &Occupied,
    rng: &mut dyn RandomSource,
) -> Vec<Point> {
    let mut occupied = occupied_base.clone();
    let mut foods = Vec::with_capacity(desired);

    for food in existing {
        if foods.len() >= desired {
            break;
        }
        if occupied.insert(*food) {
            foods.push(*food);
        }
    }

    while foods.len() < desired {
        let Some(cell) = random_empty_cell(&occupied, rng) else {
            break;
        };
        foods.push(cell);
        occupied.insert(cell);
    }

    if foods.is_empty() {
        let (x, y) = FOOD_FALLBACK_CELL;
        log::warn!("Board saturated, forcing food onto ({x}, {y})");
        foods.push(IVec2::new(x, y));
    }
    foods
}

/// Replace the food at `index` with a fresh cell
///
/// The other foods count as occupied. When the board is full the old cell
/// is kept.
pub fn refill_food_at(
    foods: &[Point],
    index: usize,
    occupied_base: &Occupied,
    rng: &mut dyn RandomSource,
) -> Vec<Point> {
    let mut next = foods.to_vec();
    let mut occupied = occupied_base.clone();
    occupied.extend(
        foods
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, food)| *food),
    );

    if let Some(replacement) = random_empty_cell(&occupied, rng)
        && let Some(slot) = next.get_mut(index)
    {
        *slot = replacement;
    }
    next
}
