//! Best score and games played
//!
//! Persisted under a single key as `{"bestScore": n, "gamesPlayed": n}`.
//! Loading never fails: anything unreadable becomes zero.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::persistence::KeyValueStore;

/// Lifetime stats across games
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub best_score: u32,
    pub games_played: u32,
}

impl Stats {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "candy-snake:stats";

    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored payload, defaulting each missing or non-numeric field
    pub fn from_json(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Stats payload unreadable ({e}), starting fresh");
                return Self::new();
            }
        };
        Self {
            best_score: read_count(&value, "bestScore"),
            games_played: read_count(&value, "gamesPlayed"),
        }
    }

    pub fn to_json(&self) -> String {
        // Two integer fields cannot fail to serialize
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Load stats from storage
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                let stats = Self::from_json(&json);
                log::info!(
                    "Loaded stats: best {}, played {}",
                    stats.best_score,
                    stats.games_played
                );
                stats
            }
            Ok(None) => {
                log::info!("No stats found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Stats storage unavailable ({e}), starting fresh");
                Self::new()
            }
        }
    }

    /// Save stats to storage; failures are logged, never raised
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match store.set_item(Self::STORAGE_KEY, &self.to_json()) {
            Ok(()) => log::info!(
                "Stats saved (best {}, played {})",
                self.best_score,
                self.games_played
            ),
            Err(e) => log::warn!("Stats not saved: {e}"),
        }
    }
}

/// Finite non-negative number, else 0
fn read_count(value: &Value, field: &str) -> u32 {
    value
        .get(field)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map_or(0, |n| n.min(f64::from(u32::MAX)) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use std::io;

    /// Storage that refuses every call
    struct Blocked;

    impl KeyValueStore for Blocked {
        fn get_item(&self, _key: &str) -> io::Result<Option<String>> {
            Err(io::Error::other("blocked"))
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::other("blocked"))
        }
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let stats = Stats {
            best_score: 12,
            games_played: 4,
        };
        stats.save(&mut store);
        assert_eq!(Stats::load(&store), stats);
    }

    #[test]
    fn test_json_shape() {
        let stats = Stats {
            best_score: 12,
            games_played: 4,
        };
        assert_eq!(stats.to_json(), r#"{"bestScore":12,"gamesPlayed":4}"#);
    }

    #[test]
    fn test_defaults_when_storage_blocked() {
        assert_eq!(Stats::load(&Blocked), Stats::new());
        // Saving must not panic
        Stats::new().save(&mut Blocked);
    }

    #[test]
    fn test_defaults_when_missing() {
        assert_eq!(Stats::load(&MemoryStore::new()), Stats::new());
    }

    #[test]
    fn test_tolerant_parsing() {
        assert_eq!(Stats::from_json("not json"), Stats::new());
        assert_eq!(
            Stats::from_json(r#"{"bestScore":9}"#),
            Stats {
                best_score: 9,
                games_played: 0
            }
        );
        assert_eq!(
            Stats::from_json(r#"{"bestScore":"lots","gamesPlayed":3}"#),
            Stats {
                best_score: 0,
                games_played: 3
            }
        );
        assert_eq!(Stats::from_json(r#"{"bestScore":-5}"#).best_score, 0);
    }
}
