//! Visual events derived from consecutive snapshots
//!
//! The core does not emit an event stream; a renderer compares the state
//! before and after a tick to find out what was picked up where.

use serde::{Deserialize, Serialize};

use super::geometry::Point;
use super::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumptionKind {
    Food,
    PowerUp,
}

/// Something the player consumed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    pub kind: ConsumptionKind,
    /// Player head cell after the tick
    pub at: Point,
}

/// Compare two snapshots; a power-up pickup wins over food on the same tick
pub fn detect_consumption(prev: &GameState, next: &GameState) -> Option<Consumption> {
    let head = next.head()?;

    let took_power_up = match (&prev.power_up, &next.power_up) {
        (Some(p), None) => p.position == head,
        _ => false,
    };
    if took_power_up {
        return Some(Consumption {
            kind: ConsumptionKind::PowerUp,
            at: head,
        });
    }

    (next.score > prev.score).then_some(Consumption {
        kind: ConsumptionKind::Food,
        at: head,
    })
}
