use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use snake_engine::audio::SoundBoard;
use snake_engine::config::AppConfig;
use snake_engine::game::Simulation;
use snake_engine::logger;
use snake_engine::modes::{print_scores, PlayMode};
use snake_engine::persistence::{JsonFileStore, MemoryStore, ScoreStore};

#[derive(Parser)]
#[command(name = "snake_engine")]
#[command(version, about = "Grid snake with power-ups and high scores")]
struct Cli {
    /// What to run
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid side length
    #[arg(long)]
    grid_size: Option<i32>,

    /// Seed for food and power-up placement
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for scores and logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep scores in memory only
    #[arg(long)]
    no_persist: bool,

    /// Player name for leaderboard submissions
    #[arg(long)]
    name: Option<String>,

    /// Leaderboard endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Never contact the leaderboard
    #[arg(long)]
    no_submit: bool,

    /// Directory with sound assets
    #[arg(long)]
    sounds_dir: Option<PathBuf>,

    /// Ring the terminal bell for sound effects
    #[arg(long)]
    bell: bool,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play with keyboard controls
    Play,
    /// Print the high score and local top 10
    Scores,
}

impl Cli {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(grid_size) = self.grid_size {
            config.game.grid_size = grid_size;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(name) = &self.name {
            config.player_name = Some(name.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            config.leaderboard_endpoint = endpoint.clone();
        }
        if self.no_submit {
            config.submit_enabled = false;
        }
        if let Some(dir) = &self.sounds_dir {
            config.sounds_dir = Some(dir.clone());
        }
        if self.bell {
            config.bell = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    cli.apply_to(&mut config);

    let store: Arc<dyn ScoreStore> = if cli.no_persist {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::new(config.data_dir.clone()))
    };

    match cli.mode {
        Mode::Scores => print_scores(store.as_ref()),
        Mode::Play => {
            let log_file = logger::init(&config.data_dir)?;
            log::info!("Logging to {:?}", log_file);

            let simulation = match cli.seed {
                Some(seed) => Simulation::with_seed(config.game.clone(), store.clone(), seed),
                None => Simulation::new(config.game.clone(), store.clone()),
            }
            .context("Invalid game configuration")?;

            let bell: Option<Box<dyn std::io::Write + Send>> = if config.bell {
                Some(Box::new(std::io::stdout()))
            } else {
                None
            };
            let sounds = SoundBoard::new(config.sounds_dir.as_deref(), bell);

            let mut play_mode = PlayMode::new(config, simulation, store, sounds);
            play_mode.run().await
        }
    }
}
