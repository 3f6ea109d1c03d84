//! Garuda headless runner
//!
//! Flies the player on autopilot for a fixed number of ticks with no window,
//! then prints the final snapshot as JSON. Useful for soak runs, balancing
//! data files and reproducing a seed.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;

    use garuda::sim::{Catalog, GameEvent, GameState, LevelSequence, TickInput, tick};
    use garuda::{GameConfig, SimError};

    #[derive(Parser, Debug)]
    #[command(name = "garuda")]
    #[command(about = "Run the Garuda simulation headless on autopilot")]
    pub struct Args {
        /// Config file (defaults are used when it is missing or invalid)
        #[arg(long, default_value = "garuda.json")]
        config: PathBuf,
        /// Catalog JSON replacing the builtin ships and lasers
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Campaign JSON replacing the builtin waves
        #[arg(long)]
        levels: Option<PathBuf>,
        /// Override the seed from the config
        #[arg(long)]
        seed: Option<u64>,
        /// Ticks to simulate; stops early on game over
        #[arg(long, default_value_t = 3600)]
        ticks: u64,
        /// Pretty-print the final snapshot
        #[arg(long)]
        pretty: bool,
    }

    pub fn run(args: Args) -> Result<(), SimError> {
        let mut config = GameConfig::load_or_default(&args.config);
        if let Some(seed) = args.seed {
            config.seed = seed;
        }

        let catalog = match &args.catalog {
            Some(path) => Catalog::from_json(&std::fs::read_to_string(path)?)?,
            None => Catalog::builtin()?,
        };
        let levels = match &args.levels {
            Some(path) => LevelSequence::from_json(&std::fs::read_to_string(path)?)?,
            None => LevelSequence::builtin(),
        };

        log::info!(
            "Garuda starting: {}x{} @ {} fps, seed {:#x}, {} waves",
            config.width,
            config.height,
            config.fps,
            config.seed,
            levels.len()
        );
        let mut state = GameState::new(config, catalog, levels)?;

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut kills = 0u32;
        let mut hits = 0u32;
        while state.time_ticks < args.ticks && !state.is_over() {
            tick(&mut state, &input);
            for event in &state.events {
                match event {
                    GameEvent::EnemyDestroyed { .. } => kills += 1,
                    GameEvent::PlayerHit { .. } => hits += 1,
                    _ => {}
                }
            }
        }

        log::info!(
            "Stopped after {} ticks: score {}, {} kills, {} hits taken, {} waves, phase {:?}",
            state.time_ticks,
            state.score,
            kills,
            hits,
            state.waves_started,
            state.phase
        );

        let snapshot = state.snapshot();
        let json = if args.pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        println!("{json}");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let args = headless::Args::parse();
    if let Err(err) = headless::run(args) {
        log::error!("{err}");
        eprintln!("garuda: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library on the web; hosts drive `garuda::sim::tick`
}
