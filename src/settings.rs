//! Game settings and preferences
//!
//! Persisted separately from stats. Counts are clamped on load, so a stale
//! or hand-edited payload can never push the board out of bounds.

use serde::{Deserialize, Serialize};

use crate::clamp_count;
use crate::consts::*;
use crate::persistence::KeyValueStore;
use crate::sim::{GameState, RandomSource, set_enemy_count, set_food_count};

/// Player preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Food items kept on the board
    #[serde(default = "default_food_count")]
    pub food_count: usize,
    /// AI rivals
    #[serde(default = "default_enemy_count")]
    pub enemy_count: usize,
}

fn default_food_count() -> usize {
    DEFAULT_FOOD_COUNT
}

fn default_enemy_count() -> usize {
    DEFAULT_ENEMY_COUNT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            food_count: DEFAULT_FOOD_COUNT,
            enemy_count: DEFAULT_ENEMY_COUNT,
        }
    }
}

/// Stored form; counts stay signed so out-of-range values clamp instead of
/// failing the whole payload
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    #[serde(default = "default_food_count_raw")]
    food_count: i64,
    #[serde(default = "default_enemy_count_raw")]
    enemy_count: i64,
}

fn default_food_count_raw() -> i64 {
    DEFAULT_FOOD_COUNT as i64
}

fn default_enemy_count_raw() -> i64 {
    DEFAULT_ENEMY_COUNT as i64
}

impl From<StoredSettings> for Settings {
    fn from(stored: StoredSettings) -> Self {
        Self {
            food_count: clamp_count(stored.food_count, MIN_FOOD_COUNT, MAX_FOOD_COUNT),
            enemy_count: clamp_count(stored.enemy_count, MIN_ENEMY_COUNT, MAX_ENEMY_COUNT),
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "candy-snake:settings";

    /// Settings currently in effect on a board
    pub fn from_state(state: &GameState) -> Self {
        Self {
            food_count: state.food_count,
            enemy_count: state.enemy_count,
        }
    }

    /// Force both counts into their bounds
    pub fn clamped(self) -> Self {
        Self {
            food_count: self.food_count.clamp(MIN_FOOD_COUNT, MAX_FOOD_COUNT),
            enemy_count: self.enemy_count.clamp(MIN_ENEMY_COUNT, MAX_ENEMY_COUNT),
        }
    }

    /// Reconfigure a board to these counts
    pub fn apply(&self, state: &GameState, rng: &mut dyn RandomSource) -> GameState {
        let state = set_food_count(state, self.food_count as i64, rng);
        set_enemy_count(&state, self.enemy_count as i64, rng)
    }

    /// Load settings from storage
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let stored = store
            .get_item(Self::STORAGE_KEY)
            .inspect_err(|e| log::warn!("Settings storage unavailable ({e})"))
            .ok()
            .flatten();

        if let Some(json) = stored {
            if let Ok(stored) = serde_json::from_str::<StoredSettings>(&json) {
                log::info!("Loaded settings");
                return Settings::from(stored);
            }
            log::warn!("Settings payload unreadable, using defaults");
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to storage
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            match store.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings not saved: {e}"),
            }
        }
    }
}
