//! Candy Snake headless runner
//!
//! Plays one game on a simulated clock with a greedy autopilot steering the
//! player, then folds the result into the persisted stats.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use candy_snake::persistence::{FileStore, KeyValueStore, MemoryStore};
    use candy_snake::sim::{
        self, GameState, Lcg, RandomSource, detect_consumption, greedy_direction,
    };
    use candy_snake::{Settings, Stats};

    /// Odds per tick that the autopilot takes a random legal-looking turn
    const JITTER_CHANCE: f64 = 0.05;

    #[derive(Parser)]
    #[command(name = "candy-snake", about = "Run a headless Candy Snake game")]
    struct Args {
        /// Seed for a reproducible run (host entropy when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many ticks even if the game is still running
        #[arg(long, default_value_t = 5_000)]
        max_ticks: u32,

        /// Food count override
        #[arg(long)]
        food: Option<i64>,

        /// Enemy count override
        #[arg(long)]
        enemies: Option<i64>,

        /// Directory for stats and settings (nothing is persisted when omitted)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    }

    pub fn run() {
        let args = Args::parse();
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        log::info!("Candy Snake (headless) starting...");

        let mut store: Box<dyn KeyValueStore> = match &args.data_dir {
            Some(dir) => Box::new(FileStore::new(dir)),
            None => Box::new(MemoryStore::new()),
        };

        let mut settings = Settings::load(store.as_ref());
        if let Some(food) = args.food {
            settings.food_count = candy_snake::clamp_count(
                food,
                candy_snake::consts::MIN_FOOD_COUNT,
                candy_snake::consts::MAX_FOOD_COUNT,
            );
        }
        if let Some(enemies) = args.enemies {
            settings.enemy_count = candy_snake::clamp_count(
                enemies,
                candy_snake::consts::MIN_ENEMY_COUNT,
                candy_snake::consts::MAX_ENEMY_COUNT,
            );
        }
        settings.save(store.as_mut());

        let stats = Stats::load(store.as_ref());

        let (mut rng, mut jitter): (Box<dyn RandomSource>, Pcg32) = match args.seed {
            Some(seed) => {
                log::info!("Seed: {seed}");
                (Box::new(Lcg::new(seed)), Pcg32::seed_from_u64(seed))
            }
            None => (Box::new(rand::rng()), Pcg32::from_rng(&mut rand::rng())),
        };

        let state = GameState::new(rng.as_mut()).with_stats(stats);
        let state = settings.apply(&state, rng.as_mut());
        let mut state = sim::start(&state);

        let mut now: u64 = 0;
        let mut ticks = 0;
        let mut foods_eaten = 0u32;
        let mut power_ups_taken = 0u32;

        while !state.is_game_over && ticks < args.max_ticks {
            let direction = autopilot(&state, &mut jitter);
            state = sim::turn(&state, direction);

            now += u64::from(state.tick_ms);
            let next = sim::step(&state, now, rng.as_mut());

            if let Some(event) = detect_consumption(&state, &next) {
                match event.kind {
                    sim::ConsumptionKind::Food => foods_eaten += 1,
                    sim::ConsumptionKind::PowerUp => {
                        power_ups_taken += 1;
                        if let Some(power_up) = &state.power_up {
                            log::debug!("Picked up {} at {}", power_up.kind.as_str(), event.at);
                        }
                    }
                }
            }
            if next.tick_ms != state.tick_ms {
                log::debug!("Tick period {}ms -> {}ms", state.tick_ms, next.tick_ms);
            }

            state = next;
            ticks += 1;
        }

        if state.is_game_over {
            state = sim::record_game_over(&state);
            state.stats().save(store.as_mut());
        } else {
            log::info!("Tick limit reached, game abandoned");
        }

        log::info!(
            "Finished after {} ticks ({}ms simulated): score {}, best {}, games {}, food {}, power-ups {}",
            ticks,
            now,
            state.score,
            state.best_score,
            state.games_played,
            foods_eaten,
            power_ups_taken
        );
    }

    /// Head for the nearest food, occasionally wandering
    fn autopilot(state: &GameState, jitter: &mut Pcg32) -> sim::Direction {
        let heading = state.anchor_direction();
        if jitter.random_bool(JITTER_CHANCE) {
            return if jitter.random_bool(0.5) {
                heading.turn_left()
            } else {
                heading.turn_right()
            };
        }
        greedy_direction(
            &state.snake,
            heading,
            &state.foods,
            &Default::default(),
            &state.enemy_occupied(),
        )
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is consumed as a library
}
